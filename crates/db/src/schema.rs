//! SQL DDL for the job tracker store.
//!
//! Column names are camelCase so a `jobs.db` written by earlier deployments
//! opens unchanged. Every statement is a no-op when the object already exists.

pub const CREATE_JOBS: &str = r#"
CREATE TABLE IF NOT EXISTS jobs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    companyName TEXT,
    location TEXT,
    via TEXT,
    description TEXT,
    logo TEXT,
    postedAt TEXT,
    scheduleType TEXT,
    salary TEXT,
    status TEXT NOT NULL DEFAULT 'new',
    notes TEXT,
    createdAt DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updatedAt DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
)
"#;

pub const CREATE_APPLY_LINKS: &str = r#"
CREATE TABLE IF NOT EXISTS apply_links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    jobId INTEGER NOT NULL,
    title TEXT,
    link TEXT,
    FOREIGN KEY (jobId) REFERENCES jobs(id) ON DELETE CASCADE
)
"#;

pub const CREATE_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_jobs_status ON jobs(status)";

pub const CREATE_COMPANY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_jobs_company ON jobs(companyName)";

/// Applied in order by [`crate::pool::init_schema`].
pub const SCHEMA: &[&str] = &[
    CREATE_JOBS,
    CREATE_APPLY_LINKS,
    CREATE_STATUS_INDEX,
    CREATE_COMPANY_INDEX,
];
