//! Cleanup of extracted role/company strings.
//!
//! Extraction is noisy: card lines drag locations along, sentence captures
//! swallow role words into the company, templates repeat words. These
//! helpers prune the artifacts without touching the meaningful core.

use std::sync::OnceLock;

use regex::Regex;

use super::text::clean_line;

/// Hard ceiling on stored company length.
const MAX_COMPANY_CHARS: usize = 120;

fn re_role_qualifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // trailing "(IMAC)"-style acronym or short slash/dash qualifier
    RE.get_or_init(|| Regex::new(r"\s*\((?:[A-Z]{2,8}|[A-Za-z/\-]{2,12})\)\s*$").unwrap())
}

fn re_gender_qualifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*\((?:m/w/d|f/m/x)\)\s*$").unwrap())
}

fn re_view_job_sep_tail() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*[,·|]\s*view job.*$").unwrap())
}

fn re_view_job_tail() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\s*view job.*$").unwrap())
}

fn re_trailing_paren() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+\(.+?\)\s*$").unwrap())
}

/// Strip a trailing parenthetical qualifier — "(IMAC)", "(m/w/d)",
/// "(f/m/x)" — from a role string.
pub fn clean_role(role: &str) -> String {
    let r = re_role_qualifier().replace(role, "");
    let r = re_gender_qualifier().replace(&r, "");
    r.trim().to_string()
}

/// Clean and qualify a role; empty results become `None`.
pub fn normalize_role(role: &str) -> Option<String> {
    let cleaned = clean_role(&clean_line(role));
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Normalize an extracted company name.
///
/// Removes words shared with the role (avoids "Backend Engineer Engineer
/// Corp" artifacts), strips "view job…" boilerplate, prunes a trailing
/// city/country/remote token and everything after it, collapses
/// immediately repeated words, truncates to 120 characters.
pub fn normalize_company(
    company: &str,
    role: &str,
    location_words: &[String],
) -> Option<String> {
    if company.trim().is_empty() {
        return None;
    }
    let mut s = format!(" {} ", company);

    let role_tokens: Vec<String> = role
        .split_whitespace()
        .map(regex::escape)
        .collect();
    if !role_tokens.is_empty() {
        if let Ok(re) = Regex::new(&format!(r"(?i)\b(?:{})\b", role_tokens.join("|"))) {
            s = re.replace_all(&s, " ").into_owned();
        }
    }

    s = re_view_job_sep_tail().replace_all(&s, " ").into_owned();
    s = re_view_job_tail().replace_all(&s, " ").into_owned();

    if !location_words.is_empty() {
        let alternates: Vec<String> = location_words.iter().map(|w| regex::escape(w)).collect();
        let pattern = format!(
            r"(?i)(?:[,\s\-–—]+(?:{}))[\s\w()./,-]*$",
            alternates.join("|")
        );
        if let Ok(re) = Regex::new(&pattern) {
            s = re.replace_all(&s, " ").into_owned();
        }
    }

    // collapse immediately repeated words
    let mut deduped: Vec<&str> = Vec::new();
    for word in s.split_whitespace() {
        let repeated = deduped
            .last()
            .is_some_and(|prev| prev.to_lowercase() == word.to_lowercase());
        if !repeated {
            deduped.push(word);
        }
    }
    let mut out = deduped.join(" ");

    if out.chars().count() > MAX_COMPANY_CHARS {
        out = out.chars().take(MAX_COMPANY_CHARS).collect();
        out = out.trim().to_string();
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// The subject's "root": the subject with a trailing parenthetical removed,
/// cut at the first dash-like separator. Used as a last-resort match key.
pub fn subject_root(subject: &str) -> String {
    let trimmed = re_trailing_paren().replace(subject, "");
    let mut root = trimmed.as_ref();
    for separator in [" - ", " — ", " – "] {
        if let Some((left, _)) = root.split_once(separator) {
            root = left;
        }
    }
    root.trim().to_string()
}
