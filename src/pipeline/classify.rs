//! Signal classification: exclusion filters, then lifecycle status.
//!
//! Exclusion short-circuits before lifecycle classification — a newsletter
//! that happens to mention an interview is still a newsletter. Lifecycle
//! checks run in strict priority order (rejection > interview > applied):
//! rejection and interview signals are rarer and higher-value than the
//! generic application boilerplate that co-occurs in templated footers.

use std::sync::OnceLock;

use regex::Regex;

use crate::rules::RuleSet;
use crate::store::Status;

pub const SKIP_NON_APPLICATION_DOMAIN: &str = "non_application_domain";
pub const SKIP_HEALTH: &str = "health_or_therapy_notice";
pub const SKIP_NEWSLETTER: &str = "newsletter";
pub const SKIP_SERVICE: &str = "service_notice";
pub const SKIP_JOB_ADVERT: &str = "job_advert_or_alert";
pub const SKIP_NO_SIGNAL: &str = "no_positive_signal";

/// Outcome of classifying one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Not application mail; the reason becomes a skip counter.
    Excluded(&'static str),
    /// A lifecycle signal worth tracking.
    Signal(Status),
    /// Survived exclusion but carries no positive signal.
    NoSignal,
}

/// Keyword classifier over an injected rule set.
pub struct SignalClassifier<'r> {
    rules: &'r RuleSet,
}

impl<'r> SignalClassifier<'r> {
    pub fn new(rules: &'r RuleSet) -> Self {
        Self { rules }
    }

    /// Full classification: exclusion first, then lifecycle.
    pub fn classify(&self, from_domain: &str, haystack: &str, sender_blob: &str) -> Verdict {
        if let Some(reason) = self.exclusion(from_domain, haystack) {
            return Verdict::Excluded(reason);
        }
        match self.lifecycle(haystack, sender_blob, from_domain) {
            Some(status) => Verdict::Signal(status),
            None => Verdict::NoSignal,
        }
    }

    /// Exclusion filter. First matching category wins; the reason is the
    /// skip counter key.
    pub fn exclusion(&self, from_domain: &str, haystack: &str) -> Option<&'static str> {
        if self.rules.is_excluded_sender(from_domain) {
            return Some(SKIP_NON_APPLICATION_DOMAIN);
        }
        if contains_any(haystack, &self.rules.health_keys) {
            return Some(SKIP_HEALTH);
        }
        if contains_any(haystack, &self.rules.newsletter_keys) {
            return Some(SKIP_NEWSLETTER);
        }
        if contains_any(haystack, &self.rules.service_keys) {
            return Some(SKIP_SERVICE);
        }
        if contains_any(haystack, &self.rules.alert_keys)
            || contains_any(haystack, &self.rules.job_advert_keys)
        {
            return Some(SKIP_JOB_ADVERT);
        }
        None
    }

    /// Lifecycle classification on a surviving haystack. Stops at the first
    /// matching tier; a known ATS sender counts as "Applied" even without
    /// positive phrasing.
    pub fn lifecycle(
        &self,
        haystack: &str,
        sender_blob: &str,
        from_domain: &str,
    ) -> Option<Status> {
        if contains_any(haystack, &self.rules.rejected_keys) {
            return Some(Status::Rejected);
        }
        if contains_any(haystack, &self.rules.interview_keys) {
            return Some(Status::Interview);
        }
        if contains_any(haystack, &self.rules.strong_applied_keys)
            || contains_any(haystack, &self.rules.medium_applied_keys)
        {
            return Some(Status::Applied);
        }
        if self.rules.is_known_ats(sender_blob, from_domain) {
            return Some(Status::Applied);
        }
        None
    }
}

/// Case-insensitive unanchored substring containment. Keys are stored
/// lowercase; the haystack is lowercased by the caller.
pub fn contains_any(haystack: &str, keys: &[String]) -> bool {
    keys.iter().any(|k| haystack.contains(k.as_str()))
}

/// Lowercased concatenation of the classification-relevant message parts.
pub fn to_haystack(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
}

fn re_domain_bracketed() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^@<>]+@([^>\s]+)>").unwrap())
}

fn re_domain_bare() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^@<\s]+@([^\s>]+)").unwrap())
}

/// Extract the sender domain from a "From" header like
/// `"Jane Doe" <jane@acme.com>` or a bare address. Missing → empty.
pub fn email_domain(from: &str) -> String {
    re_domain_bracketed()
        .captures(from)
        .or_else(|| re_domain_bare().captures(from))
        .map(|c| c[1].to_lowercase())
        .unwrap_or_default()
}
