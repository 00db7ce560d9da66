//! Job and apply-link repository functions.
//!
//! Public functions take a `&DbPool`; the private helpers take a bare
//! `&mut SqliteConnection` so the same SQL runs inside or outside a
//! transaction.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::{debug, info};

use crate::{
    models::{
        ApplyLinkRow, BulkDeleteResult, InsertedJob, Job, JobFilter, JobRow, JobUpdate, NewJob,
        DEFAULT_STATUS,
    },
    DbError, DbPool,
};

const JOB_COLUMNS: &str = "id, title, companyName, location, via, description, logo, \
     postedAt, scheduleType, salary, status, notes, createdAt, updatedAt";

/// Upper bound on ids bound into one `IN (...)` list. SQLite caps host
/// parameters per statement.
const MAX_IDS_PER_STATEMENT: usize = 500;

/// Current UTC time as it is written to `createdAt`/`updatedAt`.
///
/// Naive values encode as `YYYY-MM-DD HH:MM:SS.fff`, the same text layout as
/// SQLite's `CURRENT_TIMESTAMP`, so rows written by either sort together.
fn stored_now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

// ---------------------------------------------------------------------------
// reads
// ---------------------------------------------------------------------------

/// Return every job matching `filter`, newest first, each with its links.
///
/// `status` matches exactly; `company` is a substring of `companyName`;
/// `search` is a substring of `title` or `description`. Substring matches go
/// through `LIKE`, so they ignore ASCII case, and wildcard characters in the
/// input match literally.
pub async fn list_jobs(pool: &DbPool, filter: &JobFilter) -> Result<Vec<Job>, DbError> {
    let mut qb: QueryBuilder<'_, Sqlite> =
        QueryBuilder::new(format!("SELECT {JOB_COLUMNS} FROM jobs WHERE 1=1"));

    if let Some(status) = non_empty(&filter.status) {
        qb.push(" AND status = ").push_bind(status.to_owned());
    }

    if let Some(company) = non_empty(&filter.company) {
        qb.push(" AND companyName LIKE ")
            .push_bind(like_pattern(company))
            .push(" ESCAPE '\\'");
    }

    if let Some(search) = non_empty(&filter.search) {
        let pattern = like_pattern(search);
        qb.push(" AND (title LIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR description LIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }

    qb.push(" ORDER BY createdAt DESC, id DESC");

    let mut conn = pool.acquire().await?;
    let rows = qb.build_query_as::<JobRow>().fetch_all(&mut *conn).await?;
    debug!("list_jobs matched {} rows", rows.len());

    attach_links(&mut conn, rows).await
}

/// Fetch a single job by its primary key.
pub async fn get_job(pool: &DbPool, id: i64) -> Result<Job, DbError> {
    let mut conn = pool.acquire().await?;
    fetch_job(&mut conn, id).await?.ok_or(DbError::NotFound)
}

// ---------------------------------------------------------------------------
// writes
// ---------------------------------------------------------------------------

/// Insert a batch of jobs and their links in one transaction.
///
/// Every job starts in the `new` status. Returns `{id, title}` per job in
/// input order. If any insert fails nothing from the batch is kept.
pub async fn create_jobs(pool: &DbPool, jobs: &[NewJob]) -> Result<Vec<InsertedJob>, DbError> {
    if jobs.is_empty() {
        return Err(DbError::InvalidInput("expected at least one job".into()));
    }

    let now = stored_now();
    let mut tx = pool.begin().await?;
    let mut inserted = Vec::with_capacity(jobs.len());

    for job in jobs {
        let id = insert_job(&mut tx, job, now).await?;
        inserted.push(InsertedJob {
            id,
            title: job.title.clone(),
        });
    }

    tx.commit().await?;
    info!("Inserted {} jobs", inserted.len());
    Ok(inserted)
}

/// Insert a single job (and its links) and return it as stored.
pub async fn create_job(pool: &DbPool, job: &NewJob) -> Result<Job, DbError> {
    let mut tx = pool.begin().await?;
    let id = insert_job(&mut tx, job, stored_now()).await?;
    let created = fetch_job(&mut tx, id).await?.ok_or(DbError::NotFound)?;
    tx.commit().await?;

    info!("Created job {id}");
    Ok(created)
}

/// Apply the fields present in `update` and refresh `updatedAt`.
///
/// An empty `status` leaves the current status in place. Returns
/// `DbError::NotFound` if no row has the given id.
pub async fn update_job(pool: &DbPool, id: i64, update: &JobUpdate) -> Result<Job, DbError> {
    let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new("UPDATE jobs SET updatedAt = ");
    qb.push_bind(stored_now());

    if let Some(status) = non_empty(&update.status) {
        qb.push(", status = ").push_bind(status.to_owned());
    }

    // `Some(None)` binds NULL and clears the note.
    if let Some(notes) = &update.notes {
        qb.push(", notes = ").push_bind(notes.clone());
    }

    qb.push(" WHERE id = ").push_bind(id);

    let mut tx = pool.begin().await?;
    let result = qb.build().execute(&mut *tx).await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    let updated = fetch_job(&mut tx, id).await?.ok_or(DbError::NotFound)?;
    tx.commit().await?;

    debug!("Updated job {id}");
    Ok(updated)
}

/// Permanently delete a job; its links go with it.
///
/// Returns `DbError::NotFound` if no row was deleted.
pub async fn delete_job(pool: &DbPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    info!("Deleted job {id}");
    Ok(())
}

/// Delete every job whose id is in `ids`.
///
/// Non-positive ids are dropped and duplicates collapsed before anything
/// runs; an empty remainder is `DbError::InvalidInput`. Ids that match no
/// row are not an error, they only make `deleted` smaller than `requested`.
pub async fn delete_jobs(pool: &DbPool, ids: &[i64]) -> Result<BulkDeleteResult, DbError> {
    let mut seen = HashSet::new();
    let unique: Vec<i64> = ids
        .iter()
        .copied()
        .filter(|id| *id > 0 && seen.insert(*id))
        .collect();

    if unique.is_empty() {
        return Err(DbError::InvalidInput("no valid ids provided".into()));
    }

    let mut tx = pool.begin().await?;
    let mut deleted = 0;

    for chunk in unique.chunks(MAX_IDS_PER_STATEMENT) {
        let mut qb: QueryBuilder<'_, Sqlite> = QueryBuilder::new("DELETE FROM jobs WHERE id IN (");
        {
            let mut list = qb.separated(", ");
            for id in chunk {
                list.push_bind(*id);
            }
        }
        qb.push(")");
        deleted += qb.build().execute(&mut *tx).await?.rows_affected();
    }

    tx.commit().await?;

    let outcome = BulkDeleteResult {
        requested: unique.len() as u64,
        deleted,
    };
    info!(
        "Bulk delete removed {} of {} requested jobs",
        outcome.deleted, outcome.requested
    );
    Ok(outcome)
}

// ---------------------------------------------------------------------------
// helpers
// ---------------------------------------------------------------------------

async fn insert_job(
    conn: &mut SqliteConnection,
    job: &NewJob,
    now: NaiveDateTime,
) -> Result<i64, DbError> {
    let result = sqlx::query(
        r#"
        INSERT INTO jobs
            (title, companyName, location, via, description, logo,
             postedAt, scheduleType, salary, status, createdAt, updatedAt)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(job.title.as_str())
    .bind(non_empty(&job.company_name))
    .bind(non_empty(&job.location))
    .bind(non_empty(&job.via))
    .bind(non_empty(&job.description))
    .bind(non_empty(&job.logo))
    .bind(non_empty(&job.posted_at))
    .bind(non_empty(&job.schedule_type))
    .bind(non_empty(&job.salary))
    .bind(DEFAULT_STATUS)
    .bind(now)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    let id = result.last_insert_rowid();

    for link in job.links() {
        sqlx::query("INSERT INTO apply_links (jobId, title, link) VALUES (?, ?, ?)")
            .bind(id)
            .bind(link.title.as_deref())
            .bind(link.link.as_deref())
            .execute(&mut *conn)
            .await?;
    }

    Ok(id)
}

async fn fetch_job(conn: &mut SqliteConnection, id: i64) -> Result<Option<Job>, DbError> {
    let row = sqlx::query_as::<_, JobRow>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    let Some(job) = row else {
        return Ok(None);
    };

    let apply_link = sqlx::query_as::<_, ApplyLinkRow>(
        "SELECT id, jobId, title, link FROM apply_links WHERE jobId = ? ORDER BY id",
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(Job { job, apply_link }))
}

/// Load the links of every row in `rows` and pair them up.
async fn attach_links(conn: &mut SqliteConnection, rows: Vec<JobRow>) -> Result<Vec<Job>, DbError> {
    let mut by_job: HashMap<i64, Vec<ApplyLinkRow>> = HashMap::new();

    for chunk in rows.chunks(MAX_IDS_PER_STATEMENT) {
        let mut qb: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new("SELECT id, jobId, title, link FROM apply_links WHERE jobId IN (");
        {
            let mut list = qb.separated(", ");
            for row in chunk {
                list.push_bind(row.id);
            }
        }
        qb.push(") ORDER BY id");

        let links = qb.build_query_as::<ApplyLinkRow>().fetch_all(&mut *conn).await?;
        for link in links {
            by_job.entry(link.job_id).or_default().push(link);
        }
    }

    Ok(rows
        .into_iter()
        .map(|job| {
            let apply_link = by_job.remove(&job.id).unwrap_or_default();
            Job { job, apply_link }
        })
        .collect())
}

/// Treat `None` and `""` alike.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Wrap `term` in `%...%`, escaping LIKE metacharacters with `\`.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
