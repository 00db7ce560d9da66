//! Row structs that map 1-to-1 onto database tables, plus the input and
//! output shapes of the repository functions.
//!
//! Field names serialise as camelCase, which is also the column naming of the
//! on-disk schema, so one struct serves both `FromRow` and the JSON surface.

use chrono::{DateTime, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// jobs
// ---------------------------------------------------------------------------

/// Status given to every newly created job.
pub const DEFAULT_STATUS: &str = "new";

/// A persisted job row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub via: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub posted_at: Option<String>,
    pub schedule_type: Option<String>,
    pub salary: Option<String>,
    /// Free-form pipeline label (`new`, `applied`, `interviewed`, ...).
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job together with the links it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(flatten)]
    pub job: JobRow,
    pub apply_link: Vec<ApplyLinkRow>,
}

// ---------------------------------------------------------------------------
// apply_links
// ---------------------------------------------------------------------------

/// A persisted apply-link row. Owned by exactly one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct ApplyLinkRow {
    pub id: i64,
    pub job_id: i64,
    pub title: Option<String>,
    pub link: Option<String>,
}

// ---------------------------------------------------------------------------
// inputs
// ---------------------------------------------------------------------------

/// One element of a create request. A `status` key, if present, is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    pub title: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub via: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(default)]
    pub posted_at: Option<String>,
    #[serde(default)]
    pub schedule_type: Option<String>,
    #[serde(default)]
    pub salary: Option<String>,
    /// Anything other than an array of links (a string, `null`, ...) is
    /// treated as no links.
    #[serde(default, deserialize_with = "links_if_array")]
    pub apply_link: Option<Vec<NewApplyLink>>,
}

impl NewJob {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company_name = Some(company.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_link(mut self, title: impl Into<String>, link: impl Into<String>) -> Self {
        self.apply_link.get_or_insert_with(Vec::new).push(NewApplyLink {
            title: Some(title.into()),
            link: Some(link.into()),
        });
        self
    }

    /// Links to insert alongside the job (none when the key was absent, null or
    /// not an array).
    pub fn links(&self) -> &[NewApplyLink] {
        self.apply_link.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewApplyLink {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

/// Partial update applied by `PATCH /jobs/{id}`. Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobUpdate {
    #[serde(default)]
    pub status: Option<String>,
    /// `None` leaves the note alone, `Some(None)` (a JSON `null`) clears it.
    #[serde(
        default,
        deserialize_with = "present_or_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
}

/// Distinguish an explicit `null` from a missing key. Only called when the
/// key is present; `#[serde(default)]` covers the missing case.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn links_if_array<'de, D>(deserializer: D) -> Result<Option<Vec<NewApplyLink>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Links {
        List(Vec<NewApplyLink>),
        Ignored(IgnoredAny),
    }

    Ok(match Links::deserialize(deserializer)? {
        Links::List(links) => Some(links),
        Links::Ignored(_) => None,
    })
}

/// Optional list filters. Empty strings count as "no filter".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobFilter {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

// ---------------------------------------------------------------------------
// outputs
// ---------------------------------------------------------------------------

/// Identity of a job inserted by a bulk create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertedJob {
    pub id: i64,
    pub title: String,
}

/// Outcome of a bulk delete. `deleted` may be lower than `requested`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkDeleteResult {
    pub requested: u64,
    pub deleted: u64,
}

/// Aggregate counts over the whole `jobs` table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct JobStats {
    pub total: i64,
    pub new: i64,
    pub applied: i64,
    pub interviewed: i64,
    pub rejected: i64,
    /// Distinct non-null company names.
    pub companies: i64,
}
