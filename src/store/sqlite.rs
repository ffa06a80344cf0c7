//! SQLite-backed application store.
//!
//! The database lives at `~/.jobtrail/jobtrail.db`. WAL mode is enabled for
//! read concurrency; the schema is applied idempotently at open. Tests open
//! an in-memory database via [`TrackerDb::open_in_memory`].

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use super::{
    ApplicationRow, ApplicationStore, ApplicationUpdate, EmailLogEntry, NewApplication, Status,
    StoreError,
};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS job_applications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    gmail_id TEXT,
    thread_id TEXT NOT NULL DEFAULT '',
    company TEXT NOT NULL,
    role TEXT NOT NULL,
    source TEXT NOT NULL,
    status TEXT NOT NULL,
    apply_date TEXT,
    job_url TEXT,
    notes TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_applications_user_thread
    ON job_applications(user_id, thread_id);
CREATE INDEX IF NOT EXISTS idx_applications_user_created
    ON job_applications(user_id, created_at);

CREATE TABLE IF NOT EXISTS job_application_emails (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    application_id INTEGER NOT NULL REFERENCES job_applications(id),
    gmail_id TEXT,
    subject TEXT NOT NULL,
    sent_at TEXT,
    gmail_link TEXT,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_application_emails_app
    ON job_application_emails(application_id);
";

const APP_COLUMNS: &str = "id, user_id, gmail_id, thread_id, company, role, source, status, \
                           apply_date, job_url, notes, created_at, updated_at";

pub struct TrackerDb {
    conn: Connection,
}

impl TrackerDb {
    /// Open (or create) the database at `~/.jobtrail/jobtrail.db`.
    pub fn open() -> Result<Self, DbError> {
        let path = Self::db_path()?;
        Self::open_at(&path)
    }

    /// Default database location.
    pub fn db_path() -> Result<PathBuf, DbError> {
        let home = dirs::home_dir().ok_or(DbError::HomeDirNotFound)?;
        Ok(home.join(".jobtrail").join("jobtrail.db"))
    }

    /// Open a database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// In-memory database for tests.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }
}

/// Row mapper for job_applications SELECTs (13 columns).
fn map_application_row(row: &rusqlite::Row) -> rusqlite::Result<ApplicationRow> {
    let status_raw: String = row.get(7)?;
    Ok(ApplicationRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        gmail_id: row.get(2)?,
        thread_id: row.get(3)?,
        company: row.get(4)?,
        role: row.get(5)?,
        source: row.get(6)?,
        status: Status::parse(&status_raw).unwrap_or(Status::Applied),
        apply_date: row.get(8)?,
        job_url: row.get(9)?,
        notes: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}

impl ApplicationStore for TrackerDb {
    fn find_by_thread(
        &self,
        user_id: &str,
        thread_id: &str,
    ) -> Result<Option<ApplicationRow>, StoreError> {
        let sql = format!(
            "SELECT {APP_COLUMNS} FROM job_applications
             WHERE user_id = ?1 AND thread_id = ?2
             LIMIT 1"
        );
        let row = self
            .conn
            .query_row(&sql, params![user_id, thread_id], map_application_row)
            .optional()?;
        Ok(row)
    }

    fn find_by_company_window(
        &self,
        user_id: &str,
        company: &str,
        since: &str,
    ) -> Result<Vec<ApplicationRow>, StoreError> {
        let sql = format!(
            "SELECT {APP_COLUMNS} FROM job_applications
             WHERE user_id = ?1 AND created_at >= ?2 AND company LIKE ?3
             ORDER BY created_at DESC
             LIMIT 10"
        );
        let pattern = format!("%{}%", company);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, since, pattern], map_application_row)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn find_by_role_subject_root(
        &self,
        user_id: &str,
        root: &str,
        since: &str,
    ) -> Result<Option<ApplicationRow>, StoreError> {
        let sql = format!(
            "SELECT {APP_COLUMNS} FROM job_applications
             WHERE user_id = ?1 AND created_at >= ?2 AND role LIKE ?3
             ORDER BY created_at DESC
             LIMIT 1"
        );
        let pattern = format!("%{}%", root);
        let row = self
            .conn
            .query_row(&sql, params![user_id, since, pattern], map_application_row)
            .optional()?;
        Ok(row)
    }

    fn insert_application(&self, app: &NewApplication) -> Result<i64, StoreError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO job_applications (
                user_id, gmail_id, thread_id, company, role, source, status,
                apply_date, notes, job_url, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                app.user_id,
                app.gmail_id,
                app.thread_id,
                app.company,
                app.role,
                app.source,
                app.status.as_str(),
                app.apply_date,
                app.notes,
                app.job_url,
                now,
                now,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_application(&self, id: i64, update: &ApplicationUpdate) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE job_applications SET
                status = ?1,
                apply_date = ?2,
                gmail_id = COALESCE(?3, gmail_id),
                company = COALESCE(?4, company),
                role = COALESCE(?5, role),
                job_url = COALESCE(?6, job_url),
                updated_at = ?7
             WHERE id = ?8",
            params![
                update.status.as_str(),
                update.apply_date,
                update.gmail_id,
                update.company,
                update.role,
                update.job_url,
                now,
                id,
            ],
        )?;
        Ok(())
    }

    fn insert_email_log(&self, entry: &EmailLogEntry) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO job_application_emails (
                user_id, application_id, gmail_id, subject, sent_at, gmail_link, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.user_id,
                entry.application_id,
                entry.gmail_id,
                entry.subject,
                entry.sent_at,
                entry.gmail_link,
                now,
            ],
        )?;
        Ok(())
    }
}
