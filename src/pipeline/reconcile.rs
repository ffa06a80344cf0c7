//! Reconciliation: match an incoming signal to an existing application and
//! promote its status monotonically.
//!
//! Lookup cascade, first hit wins:
//!   1. thread id — authoritative
//!   2. fuzzy company + loosely compatible role, within the last 60 days
//!   3. subject root against stored roles, only when no company was extracted

use chrono::{Duration, Utc};

use crate::store::{ApplicationRow, ApplicationStore, Status, StoreError};

use super::normalize::subject_root;

/// Days back that fuzzy company/role matching will consider.
const MATCH_WINDOW_DAYS: i64 = 60;

/// Promote a status along the lattice. Never regresses: the higher-weight
/// status wins, whatever order the signals arrive in.
pub fn promote(prev: Option<Status>, incoming: Option<Status>) -> Status {
    match (prev, incoming) {
        (None, incoming) => incoming.unwrap_or(Status::Applied),
        (Some(prev), None) => prev,
        (Some(prev), Some(incoming)) => {
            if incoming.weight() >= prev.weight() {
                incoming
            } else {
                prev
            }
        }
    }
}

/// Find the existing application this message belongs to, if any.
///
/// `company`/`role` are the normalized extracted values; pass `None` when
/// extraction failed (the sentinel never participates in matching).
pub fn find_existing<A: ApplicationStore + ?Sized>(
    store: &A,
    user_id: &str,
    thread_id: &str,
    company: Option<&str>,
    role: Option<&str>,
    subject: &str,
) -> Result<Option<ApplicationRow>, StoreError> {
    if !thread_id.is_empty() {
        if let Some(row) = store.find_by_thread(user_id, thread_id)? {
            return Ok(Some(row));
        }
    }

    let since = (Utc::now() - Duration::days(MATCH_WINDOW_DAYS)).to_rfc3339();

    if let Some(company) = company {
        let candidates = store.find_by_company_window(user_id, company, &since)?;
        let needle_company = company.to_lowercase();
        let needle_role = role.unwrap_or("").to_lowercase();

        let hit = candidates.into_iter().find(|row| {
            let row_company = row.company.to_lowercase();
            let row_role = row.role.to_lowercase();
            let company_close = row_company.contains(&needle_company)
                || needle_company.contains(&row_company);
            let role_close = needle_role.is_empty()
                || row_role.is_empty()
                || row_role.contains(&needle_role)
                || needle_role.contains(&row_role);
            company_close && role_close
        });
        // a known company that matches nothing is a new application, not a
        // candidate for the weaker subject-root fallback
        return Ok(hit);
    }

    let root = subject_root(subject);
    if !root.is_empty() {
        return store.find_by_role_subject_root(user_id, &root, &since);
    }

    Ok(None)
}
