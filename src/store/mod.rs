//! Persistence boundary: tracked applications and their email audit log.
//!
//! The pipeline talks to storage exclusively through [`ApplicationStore`],
//! so the reconciliation engine can be exercised against an in-memory or
//! throwaway backend in tests. All fuzzy matching is parameterized — no SQL
//! is ever assembled from user-controlled strings.

pub mod sqlite;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sentinel stored when extraction was attempted and found nothing.
/// Distinguishes "attempted and failed" from "not yet attempted"; update
/// logic never overwrites a real value with this.
pub const UNKNOWN: &str = "(Unknown)";

/// Application lifecycle status, ordered by promotion weight.
///
/// Rejected and Withdrawn deliberately outrank Offer: a terminal
/// negative/neutral outcome must not be overwritten by a stale positive
/// signal arriving out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Applied,
    #[serde(rename = "Phone Screen")]
    PhoneScreen,
    Interview,
    Offer,
    Rejected,
    Withdrawn,
}

impl Status {
    /// Promotion weight in the status lattice.
    pub fn weight(self) -> u8 {
        match self {
            Status::Applied => 1,
            Status::PhoneScreen => 2,
            Status::Interview => 3,
            Status::Offer => 4,
            Status::Rejected => 5,
            Status::Withdrawn => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Applied => "Applied",
            Status::PhoneScreen => "Phone Screen",
            Status::Interview => "Interview",
            Status::Offer => "Offer",
            Status::Rejected => "Rejected",
            Status::Withdrawn => "Withdrawn",
        }
    }

    pub fn parse(s: &str) -> Option<Status> {
        match s {
            "Applied" => Some(Status::Applied),
            "Phone Screen" => Some(Status::PhoneScreen),
            "Interview" => Some(Status::Interview),
            "Offer" => Some(Status::Offer),
            "Rejected" => Some(Status::Rejected),
            "Withdrawn" => Some(Status::Withdrawn),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A storage failure, carrying a short machine-readable code so the
/// orchestrator can tag skip reasons (`insert_error_{code}`).
#[derive(Debug, Error)]
#[error("store error [{code}]: {message}")]
pub struct StoreError {
    pub code: String,
    pub message: String,
}

impl StoreError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        let code = match &e {
            rusqlite::Error::SqliteFailure(err, _) => format!("sqlite_{}", err.extended_code),
            _ => "sqlite".to_string(),
        };
        Self {
            code,
            message: e.to_string(),
        }
    }
}

/// A row from the `job_applications` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRow {
    pub id: i64,
    pub user_id: String,
    pub gmail_id: Option<String>,
    pub thread_id: String,
    pub company: String,
    pub role: String,
    pub source: String,
    pub status: Status,
    pub apply_date: Option<String>,
    pub job_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields for a fresh application insert.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub user_id: String,
    pub gmail_id: Option<String>,
    pub thread_id: String,
    pub company: String,
    pub role: String,
    pub source: String,
    pub status: Status,
    pub apply_date: Option<String>,
    pub notes: Option<String>,
    pub job_url: Option<String>,
}

/// Fields for updating an existing application. `status` and `apply_date`
/// are always written; the optional fields only when present, so a failed
/// extraction never erases previously-known good values.
#[derive(Debug, Clone)]
pub struct ApplicationUpdate {
    pub status: Status,
    pub apply_date: Option<String>,
    pub gmail_id: Option<String>,
    pub company: Option<String>,
    pub role: Option<String>,
    pub job_url: Option<String>,
}

/// One row of the append-only email audit trail.
#[derive(Debug, Clone)]
pub struct EmailLogEntry {
    pub user_id: String,
    pub application_id: i64,
    pub gmail_id: Option<String>,
    pub subject: String,
    pub sent_at: Option<String>,
    pub gmail_link: Option<String>,
}

/// Storage operations the pipeline depends on.
pub trait ApplicationStore {
    /// Exact match on (user, thread). A thread groups all correspondence
    /// for one application, so this is authoritative.
    fn find_by_thread(
        &self,
        user_id: &str,
        thread_id: &str,
    ) -> Result<Option<ApplicationRow>, StoreError>;

    /// Applications created since `since` whose company contains `company`
    /// (case-insensitively), most recent first, at most 10.
    fn find_by_company_window(
        &self,
        user_id: &str,
        company: &str,
        since: &str,
    ) -> Result<Vec<ApplicationRow>, StoreError>;

    /// Most recent application created since `since` whose role contains
    /// the subject root.
    fn find_by_role_subject_root(
        &self,
        user_id: &str,
        root: &str,
        since: &str,
    ) -> Result<Option<ApplicationRow>, StoreError>;

    fn insert_application(&self, app: &NewApplication) -> Result<i64, StoreError>;

    fn update_application(&self, id: i64, update: &ApplicationUpdate) -> Result<(), StoreError>;

    /// Append-only; existing rows are never touched.
    fn insert_email_log(&self, entry: &EmailLogEntry) -> Result<(), StoreError>;
}
