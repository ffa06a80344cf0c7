//! Classification rule tables.
//!
//! Everything the classifier and extractor match against lives here as plain
//! data: exclusion keyword sets, lifecycle keyword sets (English, German and
//! Turkish), the recruiting-platform domain map, and the location word lists
//! used for card parsing and company cleanup.
//!
//! The tables are injected into the classifier/extractor at construction
//! time rather than referenced as process-wide constants, so rule sets are
//! swappable and testable in isolation. A JSON file can override any subset
//! of tables; fields missing from the file keep the built-in defaults.
//!
//! Matching is case-insensitive unanchored substring containment. That is
//! deliberately permissive ("contract" trips the service filter, "auth"
//! matches inside unrelated words): the tables are the precision/recall
//! knob, not the matcher. Switching to word-boundary matching would change
//! classification outcomes.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// One entry of the sender-domain → source-name mapping. Order matters:
/// the first suffix match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainSource {
    pub domain: String,
    pub source: String,
}

/// The full rule configuration consumed by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSet {
    /// Sender domains that are never application mail (hard exclusion).
    pub excluded_sender_domains: Vec<String>,
    /// Health/therapy appointment notices.
    pub health_keys: Vec<String>,
    /// Newsletters and digests.
    pub newsletter_keys: Vec<String>,
    /// Authentication, billing and other service notices.
    pub service_keys: Vec<String>,
    /// Job advertisements and recommendation mails.
    pub job_advert_keys: Vec<String>,
    /// Job alert subscriptions.
    pub alert_keys: Vec<String>,
    /// Rejection phrasing.
    pub rejected_keys: Vec<String>,
    /// Interview/scheduling phrasing.
    pub interview_keys: Vec<String>,
    /// Strong application-confirmation phrasing.
    pub strong_applied_keys: Vec<String>,
    /// Generic application words (weaker positive evidence).
    pub medium_applied_keys: Vec<String>,
    /// Recruiting-platform domains, mapped to display names.
    pub source_by_domain: Vec<DomainSource>,
    /// ATS mailer domains that must not become the company name when
    /// deriving it from the sender address.
    pub ats_sender_domains: Vec<String>,
    /// Known newsletter/bulk-mailer domains (diagnose flags only).
    pub newsletter_domains: Vec<String>,
    /// Location words that mark a company/location line in card layouts.
    pub card_location_words: Vec<String>,
    /// Location words pruned from the tail of extracted company names.
    pub company_location_words: Vec<String>,
    /// Label alternates (regex fragments) announcing a role value.
    pub role_labels: Vec<String>,
    /// Label alternates (regex fragments) announcing a company value.
    pub company_labels: Vec<String>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::default_rules()
    }
}

fn strs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl RuleSet {
    /// The built-in rule tables, tuned for English, German and Turkish
    /// recruiting mail.
    pub fn default_rules() -> Self {
        Self {
            excluded_sender_domains: strs(&["hiwellapp.com", "x.com", "jobleads.com"]),
            health_keys: strs(&[
                "hiwellapp",
                "therapy",
                "therapist",
                "psychologist",
                "psychologie",
                "psikolog",
                "psikoloji",
                "terapi",
                "seans",
                "session started",
                "video session",
                "consultation",
                "danışmanlık",
            ]),
            newsletter_keys: strs(&[
                "newsletter",
                "daily digest",
                "weekly digest",
                "digest",
                "insights",
                "this week",
                "für diese woche",
                "mitarbeiterbewertungen",
                "community",
                "product hunt",
                "the frontier",
                "medium daily",
                "mark manson",
                "substack",
                "german career insights",
                "freunde der zeit",
            ]),
            service_keys: strs(&[
                "auth",
                "authentication",
                "login code",
                "magic link",
                "verify your email",
                "security alert",
                "password reset",
                "device sign-in",
                "kundenbetreuung",
                "rechnung",
                "fatura",
                "payment",
                "billing",
                "contract",
            ]),
            job_advert_keys: strs(&[
                "job advert",
                "job advertisement",
                "stellenanzeige",
                "recommended jobs",
                "jobs you might like",
                "top jobs",
                "monetization jobs",
                "new openings",
                "career opportunities",
                "job suggestions",
                "we found new jobs for you",
                "vacancies",
                "open positions",
                "neue stellen",
            ]),
            alert_keys: strs(&[
                "job alert",
                "stellenangebot",
                "neue jobs",
                "new jobs for you",
                "job digest",
                "angebote der woche",
                "gerade hereingekommen",
            ]),
            rejected_keys: strs(&[
                "we will not move forward",
                "not moving forward",
                "unfortunately we will not",
                "no longer under consideration",
                "regret to inform you",
                "decided not to move forward",
                "will not proceed",
                "leider",
                "absage",
                "nicht weiter",
                "olumsuz değerlendirildi",
                "üzgünüz",
            ]),
            interview_keys: strs(&[
                "interview",
                "phone screen",
                "technical interview",
                "onsite",
                "gespräch",
                "vorstellungsgespräch",
                "telefoninterview",
                "mülakat",
                "görüşme",
                "schedule a call",
                "book a call",
                "calendly",
            ]),
            strong_applied_keys: strs(&[
                "application received",
                "we received your application",
                "thank you for applying",
                "your application to",
                "ihre bewerbung",
                "bewerbung eingegangen",
                "wir haben deine bewerbung erhalten",
                "bestätigung ihrer bewerbung",
            ]),
            medium_applied_keys: strs(&[
                "application",
                "applied",
                "bewerbung",
                "postulation",
                "candidature",
                "confirm your email",
                "confirm your mail",
            ]),
            source_by_domain: [
                ("linkedin.com", "LinkedIn"),
                ("stepstone.de", "StepStone"),
                ("stepstone.com", "StepStone"),
                ("indeed.com", "Indeed"),
                ("indeedemail.com", "Indeed"),
                ("greenhouse.io", "Greenhouse"),
                ("mail.greenhouse.io", "Greenhouse"),
                ("lever.co", "Lever"),
                ("hire.lever.co", "Lever"),
                ("mg.lever.co", "Lever"),
                ("personio.de", "Personio"),
                ("personio.com", "Personio"),
                ("smartrecruiters.com", "SmartRecruiters"),
                ("teamtailor.com", "Teamtailor"),
                ("recruitee.com", "Recruitee"),
                ("workday.com", "Workday"),
                ("myworkday.com", "Workday"),
                ("bamboohr.com", "BambooHR"),
                ("oraclecloud.com", "Oracle Cloud"),
                ("join.com", "Join"),
                ("jobvite.com", "Jobvite"),
                ("icims.com", "iCIMS"),
                ("successfactors.com", "SuccessFactors"),
                ("eightfold.ai", "Eightfold"),
            ]
            .iter()
            .map(|(domain, source)| DomainSource {
                domain: domain.to_string(),
                source: source.to_string(),
            })
            .collect(),
            ats_sender_domains: strs(&[
                "workablemail.com",
                "workable.com",
                "greenhouse.io",
                "mail.greenhouse.io",
                "lever.co",
                "personio.de",
                "personio.com",
                "smartrecruiters.com",
                "recruitee.com",
                "teamtailor.com",
                "icims.com",
                "oraclecloud.com",
                "myworkday.com",
                "workday.com",
                "bamboohr.com",
            ]),
            newsletter_domains: strs(&[
                "talent.com",
                "stepstone.de",
                "stepstone.com",
                "indeedemail.com",
                "indeed.com",
                "monster.com",
                "glassdoor.com",
                "zeit.de",
                "newsletter.zeit.de",
                "substack.com",
                "mailchimp.com",
                "sendgrid.net",
                "sparkpostmail.com",
            ]),
            card_location_words: strs(&[
                "remote",
                "europe",
                "european union",
                "germany",
                "deutschland",
                "türkiye",
                "turkey",
                "france",
                "italy",
                "spain",
                "netherlands",
                "poland",
                "austria",
                "switzerland",
                "united kingdom",
                "uk",
                "berlin",
                "munich",
                "hamburg",
                "düsseldorf",
                "köln",
                "essen",
                "neuss",
                "cologne",
            ]),
            company_location_words: strs(&[
                "remote",
                "berlin",
                "munich",
                "münchen",
                "hamburg",
                "köln",
                "cologne",
                "düsseldorf",
                "essen",
                "neuss",
                "germany",
                "deutschland",
                "europe",
                "european union",
                "eu",
                "emea",
                "france",
                "italy",
                "spain",
                "poland",
                "switzerland",
                "austria",
                "netherlands",
                "uk",
                "united kingdom",
                "turkey",
                "türkiye",
                "hybrid",
            ]),
            role_labels: strs(&[
                r"job\s*title",
                r"job\s*role",
                "position",
                "role",
                "title",
                "stelle",
                "stellenbezeichnung",
                "positionstitel",
            ]),
            company_labels: strs(&["company", "unternehmen", "firma", "employer"]),
        }
    }

    /// Load a rule set from a JSON file. Fields absent from the file fall
    /// back to the built-in defaults.
    pub fn load(path: &Path) -> Result<RuleSet, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read rules file {}: {}", path.display(), e))?;
        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse rules file {}: {}", path.display(), e))
    }

    /// Map a sender domain to its source display name; unknown → "Other".
    pub fn source_for_domain(&self, from_domain: &str) -> String {
        if from_domain.is_empty() {
            return "Other".to_string();
        }
        self.source_by_domain
            .iter()
            .find(|e| from_domain.ends_with(&e.domain))
            .map(|e| e.source.clone())
            .unwrap_or_else(|| "Other".to_string())
    }

    /// Whether the sender looks like a known applicant-tracking system.
    /// Presence on a recruiting platform is itself a (weak) signal.
    pub fn is_known_ats(&self, sender_blob: &str, from_domain: &str) -> bool {
        self.source_by_domain.iter().any(|e| {
            sender_blob.contains(&e.domain)
                || (!from_domain.is_empty() && from_domain.ends_with(&e.domain))
        })
    }

    /// Whether the sender domain is hard-excluded.
    pub fn is_excluded_sender(&self, from_domain: &str) -> bool {
        !from_domain.is_empty()
            && self
                .excluded_sender_domains
                .iter()
                .any(|d| from_domain.ends_with(d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_populated() {
        let rules = RuleSet::default_rules();
        assert!(!rules.excluded_sender_domains.is_empty());
        assert!(!rules.newsletter_keys.is_empty());
        assert!(!rules.service_keys.is_empty());
        assert!(!rules.rejected_keys.is_empty());
        assert!(!rules.interview_keys.is_empty());
        assert!(!rules.strong_applied_keys.is_empty());
        assert!(!rules.medium_applied_keys.is_empty());
        assert!(!rules.source_by_domain.is_empty());
        assert!(!rules.card_location_words.is_empty());
        assert!(!rules.company_location_words.is_empty());
    }

    #[test]
    fn test_source_for_domain() {
        let rules = RuleSet::default_rules();
        assert_eq!(rules.source_for_domain("mail.greenhouse.io"), "Greenhouse");
        assert_eq!(rules.source_for_domain("linkedin.com"), "LinkedIn");
        assert_eq!(rules.source_for_domain("acme.com"), "Other");
        assert_eq!(rules.source_for_domain(""), "Other");
    }

    #[test]
    fn test_is_known_ats() {
        let rules = RuleSet::default_rules();
        assert!(rules.is_known_ats("noreply@hire.lever.co", "hire.lever.co"));
        assert!(rules.is_known_ats("jobs via greenhouse.io mailer", ""));
        assert!(!rules.is_known_ats("friend@example.com", "example.com"));
    }

    #[test]
    fn test_is_excluded_sender() {
        let rules = RuleSet::default_rules();
        assert!(rules.is_excluded_sender("hiwellapp.com"));
        assert!(rules.is_excluded_sender("mail.jobleads.com"));
        assert!(!rules.is_excluded_sender("acme.com"));
        assert!(!rules.is_excluded_sender(""));
    }

    #[test]
    fn test_partial_json_override_keeps_defaults() {
        let rules: RuleSet =
            serde_json::from_str(r#"{"newsletterKeys": ["weekly roundup"]}"#).unwrap();
        assert_eq!(rules.newsletter_keys, vec!["weekly roundup".to_string()]);
        // untouched tables keep the built-in defaults
        assert!(!rules.rejected_keys.is_empty());
        assert!(!rules.source_by_domain.is_empty());
    }
}
