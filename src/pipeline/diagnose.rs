//! Dry-run classification: scan recent mail and report the raw flags
//! without persisting anything.
//!
//! Useful when tuning rule tables — shows, per message, which keyword
//! categories would fire before committing to an ingest run.

use serde::Serialize;

use crate::error::IngestError;
use crate::message::MessageSource;
use crate::rules::RuleSet;

use super::body::extract_body_text;
use super::classify::{contains_any, email_domain, to_haystack};

/// Wider query than ingest: diagnose looks at everything recent, including
/// mail outside the inbox.
pub const DIAGNOSE_QUERY: &str = "newer_than:120d -category:promotions -category:social";

/// Diagnose is a sampling tool, not a sweep.
const DIAGNOSE_LIMIT: usize = 30;

/// Raw classification flags for one message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosisRow {
    pub id: String,
    pub from: String,
    pub subject: String,
    /// First 160 characters of the extracted body.
    pub preview: String,
    pub is_ats: bool,
    pub is_newsletter_domain: bool,
    pub has_list_unsubscribe: bool,
    pub has_newsletter_keys: bool,
    pub is_rejected: bool,
    pub is_interview: bool,
    pub strong_positive: bool,
    pub medium_positive: bool,
}

/// Scan up to 30 recent messages and report their classification flags.
pub async fn run_diagnose<S>(source: &S, rules: &RuleSet) -> Result<Vec<DiagnosisRow>, IngestError>
where
    S: MessageSource + ?Sized,
{
    let page = source.list_message_ids(DIAGNOSE_QUERY, None).await?;

    let mut rows = Vec::new();
    for id in page.ids.iter().take(DIAGNOSE_LIMIT) {
        let msg = source.get_message(id).await?;
        let subject = msg.header("Subject");
        let from = msg.header("From");
        let body = extract_body_text(msg.payload.as_ref());
        let haystack = to_haystack(&[&subject, &body, &from]);
        let from_lower = from.to_lowercase();
        let from_domain = email_domain(&from);

        rows.push(DiagnosisRow {
            id: id.clone(),
            preview: body.chars().take(160).collect(),
            is_ats: rules
                .source_by_domain
                .iter()
                .any(|e| from_lower.contains(&e.domain)),
            is_newsletter_domain: rules
                .newsletter_domains
                .iter()
                .any(|d| from_domain.ends_with(d)),
            has_list_unsubscribe: msg.has_header("List-Unsubscribe"),
            has_newsletter_keys: contains_any(&haystack, &rules.newsletter_keys)
                || contains_any(&haystack, &rules.alert_keys),
            is_rejected: contains_any(&haystack, &rules.rejected_keys),
            is_interview: contains_any(&haystack, &rules.interview_keys),
            strong_positive: contains_any(&haystack, &rules.strong_applied_keys),
            medium_positive: contains_any(&haystack, &rules.medium_applied_keys),
            from,
            subject,
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    use crate::message::{FetchedMessage, Header, MessagePage, MimePart, SourceError};

    struct FakeSource {
        messages: Vec<FetchedMessage>,
    }

    #[async_trait]
    impl MessageSource for FakeSource {
        async fn list_message_ids(
            &self,
            _query: &str,
            _page_token: Option<&str>,
        ) -> Result<MessagePage, SourceError> {
            Ok(MessagePage {
                ids: self.messages.iter().map(|m| m.id.clone()).collect(),
                next_page_token: None,
            })
        }

        async fn get_message(&self, id: &str) -> Result<FetchedMessage, SourceError> {
            self.messages
                .iter()
                .find(|m| m.id == id)
                .cloned()
                .ok_or_else(|| SourceError::Transport(format!("unknown message {id}")))
        }
    }

    fn message(id: &str, from: &str, subject: &str, body: &str, unsub: bool) -> FetchedMessage {
        let mut headers = vec![
            Header {
                name: "Subject".to_string(),
                value: subject.to_string(),
            },
            Header {
                name: "From".to_string(),
                value: from.to_string(),
            },
        ];
        if unsub {
            headers.push(Header {
                name: "List-Unsubscribe".to_string(),
                value: "<https://u.example>".to_string(),
            });
        }
        FetchedMessage {
            id: id.to_string(),
            thread_id: format!("thread-{id}"),
            headers,
            payload: Some(MimePart::Leaf {
                mime_type: "text/plain".to_string(),
                data: URL_SAFE_NO_PAD.encode(body),
            }),
        }
    }

    #[tokio::test]
    async fn test_diagnose_flags_without_persisting() {
        let source = FakeSource {
            messages: vec![
                message(
                    "m1",
                    "noreply@mail.greenhouse.io",
                    "Your application to Globex",
                    "Thank you for your application to Globex Inc.",
                    false,
                ),
                message(
                    "m2",
                    "digest@newsletter.zeit.de",
                    "Weekly digest",
                    "This week in careers",
                    true,
                ),
            ],
        };
        let rules = RuleSet::default_rules();

        let rows = run_diagnose(&source, &rules).await.unwrap();
        assert_eq!(rows.len(), 2);

        let ats = &rows[0];
        assert!(ats.is_ats);
        assert!(ats.strong_positive);
        assert!(ats.medium_positive);
        assert!(!ats.is_rejected);
        assert!(!ats.has_list_unsubscribe);
        assert!(ats.preview.starts_with("Thank you"));

        let newsletter = &rows[1];
        assert!(newsletter.is_newsletter_domain);
        assert!(newsletter.has_newsletter_keys);
        assert!(newsletter.has_list_unsubscribe);
        assert!(!newsletter.is_ats);
    }
}
