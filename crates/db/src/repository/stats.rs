//! Aggregate counts over the jobs table.

use crate::{models::JobStats, DbError, DbPool};

/// Total jobs, jobs per tracked status, and the number of distinct companies.
pub async fn job_stats(pool: &DbPool) -> Result<JobStats, DbError> {
    let stats = sqlx::query_as::<_, JobStats>(
        r#"
        SELECT
            COUNT(*) AS total,
            COALESCE(SUM(CASE WHEN status = 'new' THEN 1 ELSE 0 END), 0) AS "new",
            COALESCE(SUM(CASE WHEN status = 'applied' THEN 1 ELSE 0 END), 0) AS applied,
            COALESCE(SUM(CASE WHEN status = 'interviewed' THEN 1 ELSE 0 END), 0) AS interviewed,
            COALESCE(SUM(CASE WHEN status = 'rejected' THEN 1 ELSE 0 END), 0) AS rejected,
            COUNT(DISTINCT companyName) AS companies
        FROM jobs
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(stats)
}
