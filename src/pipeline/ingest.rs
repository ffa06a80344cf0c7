//! Batch ingestion orchestrator.
//!
//! Drives the per-message pipeline across a fetched id list: body → signal
//! classification → field extraction → normalization → reconciliation →
//! upsert → email log. Messages are processed strictly in sequence — the
//! fuzzy matcher must see inserts from earlier messages in the same batch,
//! so an "Applied" mail followed by an "Interview" mail for the same role
//! lands on one record.
//!
//! Store failures are recovered at message granularity (skip reason tagged
//! with the error code); source failures abort the batch. Already-committed
//! upserts stay committed — no transaction wraps the batch, and re-running
//! is safe because reconciliation is idempotent via thread id.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::Serialize;

use crate::error::IngestError;
use crate::message::{FetchedMessage, MessageSource};
use crate::rules::RuleSet;
use crate::store::{
    ApplicationStore, ApplicationUpdate, EmailLogEntry, NewApplication, UNKNOWN,
};

use super::body::extract_body_text;
use super::classify::{self, SignalClassifier, Verdict};
use super::extract::{ExtractStrategy, FieldExtractor};
use super::normalize::{normalize_company, normalize_role};
use super::reconcile::{find_existing, promote};

/// Hard cap on messages per batch.
const MAX_MESSAGES: u32 = 600;
/// Hard cap on id-list pages per batch.
const MAX_PAGES: u32 = 10;

#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// Identity under which applications are stored.
    pub user_id: String,
    /// Recency window for the mailbox query, in days.
    pub days: u32,
    /// Requested batch size; capped at 600.
    pub limit: u32,
    pub strategy: ExtractStrategy,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            user_id: "local".to_string(),
            days: 180,
            limit: 300,
            strategy: ExtractStrategy::default(),
        }
    }
}

/// Batch result for the caller.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub imported: u32,
    pub scanned: u32,
    pub skipped_by: BTreeMap<String, u32>,
    pub used_query: String,
}

enum Outcome {
    Inserted,
    Updated,
    Skipped(String),
}

/// Run one ingestion batch.
pub async fn run_ingest<S, A>(
    source: &S,
    store: &A,
    rules: &RuleSet,
    opts: &IngestOptions,
) -> Result<IngestReport, IngestError>
where
    S: MessageSource + ?Sized,
    A: ApplicationStore + ?Sized,
{
    let query = format!(
        "newer_than:{}d in:inbox -category:social -category:promotions",
        opts.days
    );
    let max = opts.limit.min(MAX_MESSAGES) as usize;

    let mut ids: Vec<String> = Vec::new();
    let mut page_token: Option<String> = None;
    let mut pages = 0u32;
    while ids.len() < max && pages < MAX_PAGES {
        let page = source
            .list_message_ids(&query, page_token.as_deref())
            .await?;
        ids.extend(page.ids);
        pages += 1;
        page_token = page.next_page_token;
        if page_token.is_none() {
            break;
        }
    }
    ids.truncate(max);

    let mut report = IngestReport {
        used_query: query,
        ..Default::default()
    };
    if ids.is_empty() {
        report.skipped_by.insert("no_ids_from_gmail".to_string(), 1);
        return Ok(report);
    }

    let classifier = SignalClassifier::new(rules);
    let extractor = FieldExtractor::new(rules, opts.strategy)
        .map_err(|e| IngestError::Config(format!("invalid extraction rules: {e}")))?;

    report.scanned = ids.len() as u32;
    for id in &ids {
        let msg = source.get_message(id).await?;
        match process_message(&msg, store, rules, &classifier, &extractor, opts) {
            Outcome::Inserted => report.imported += 1,
            Outcome::Updated => {}
            Outcome::Skipped(reason) => {
                debug!("skipping message {}: {}", id, reason);
                *report.skipped_by.entry(reason).or_insert(0) += 1;
            }
        }
    }

    Ok(report)
}

fn process_message<A: ApplicationStore + ?Sized>(
    msg: &FetchedMessage,
    store: &A,
    rules: &RuleSet,
    classifier: &SignalClassifier<'_>,
    extractor: &FieldExtractor,
    opts: &IngestOptions,
) -> Outcome {
    let subject = msg.header("Subject");
    let from = msg.header("From");
    let return_path = msg.header("Return-Path");
    let reply_to = msg.header("Reply-To");
    let date_header = msg.header("Date");

    let body = extract_body_text(msg.payload.as_ref());
    let haystack = classify::to_haystack(&[&subject, &body, &from, &return_path, &reply_to]);
    let from_domain = classify::email_domain(&from);
    let sender_blob = format!("{} {} {}", from, return_path, reply_to).to_lowercase();

    let status = match classifier.classify(&from_domain, &haystack, &sender_blob) {
        Verdict::Excluded(reason) => return Outcome::Skipped(reason.to_string()),
        Verdict::NoSignal => return Outcome::Skipped(classify::SKIP_NO_SIGNAL.to_string()),
        Verdict::Signal(status) => status,
    };

    let source_tag = rules.source_for_domain(&from_domain);
    let fields = extractor.extract(&subject, &body, &from, &source_tag);

    let n_role = fields.role.as_deref().and_then(normalize_role);
    let n_company = fields.company.as_deref().and_then(|c| {
        normalize_company(
            c,
            fields.role.as_deref().unwrap_or(""),
            &rules.company_location_words,
        )
    });

    let sent = parse_mail_date(&date_header);
    let apply_date = sent.map(|d| d.format("%Y-%m-%d").to_string());
    let sent_at = sent.map(|d| d.to_rfc3339());

    let existing = match find_existing(
        store,
        &opts.user_id,
        &msg.thread_id,
        n_company.as_deref(),
        n_role.as_deref(),
        &subject,
    ) {
        Ok(existing) => existing,
        Err(e) => {
            warn!("reconciliation lookup failed for {}: {}", msg.id, e);
            return Outcome::Skipped(format!("match_error_{}", e.code));
        }
    };

    let prev_status = existing.as_ref().map(|row| row.status);
    let final_status = promote(prev_status, Some(status));

    let gmail_id = (!msg.id.is_empty()).then(|| msg.id.clone());
    let gmail_link = gmail_id
        .as_ref()
        .map(|id| format!("https://mail.google.com/mail/u/0/#all/{id}"));

    let (application_id, outcome) = match existing {
        None => {
            let app = NewApplication {
                user_id: opts.user_id.clone(),
                gmail_id: gmail_id.clone(),
                thread_id: msg.thread_id.clone(),
                company: n_company.clone().unwrap_or_else(|| UNKNOWN.to_string()),
                role: n_role.clone().unwrap_or_else(|| UNKNOWN.to_string()),
                source: source_tag,
                status: final_status,
                apply_date,
                notes: Some(format!("Imported from Gmail: {}", subject)),
                job_url: fields.job_url.clone(),
            };
            match store.insert_application(&app) {
                Ok(id) => (id, Outcome::Inserted),
                Err(e) => return Outcome::Skipped(format!("insert_error_{}", e.code)),
            }
        }
        Some(row) => {
            let update = ApplicationUpdate {
                status: final_status,
                apply_date,
                gmail_id: gmail_id.clone(),
                // never clobber a real company name with the platform name
                company: n_company
                    .clone()
                    .filter(|c| !c.eq_ignore_ascii_case("linkedin")),
                role: n_role.clone(),
                job_url: fields.job_url.clone(),
            };
            match store.update_application(row.id, &update) {
                Ok(()) => (row.id, Outcome::Updated),
                Err(e) => return Outcome::Skipped(format!("update_error_{}", e.code)),
            }
        }
    };

    let entry = EmailLogEntry {
        user_id: opts.user_id.clone(),
        application_id,
        gmail_id,
        subject,
        sent_at,
        gmail_link,
    };
    if let Err(e) = store.insert_email_log(&entry) {
        warn!("email log insert failed for {}: {}", msg.id, e);
    }

    outcome
}

/// Parse a Date header (RFC 2822, with RFC 3339 accepted as a fallback).
fn parse_mail_date(raw: &str) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    chrono::DateTime::parse_from_rfc2822(trimmed)
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(trimmed))
        .ok()
}
