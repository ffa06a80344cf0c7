//! Transient message model shared by the Gmail client and the pipeline.
//!
//! A fetched message carries only what the pipeline consults: a handful of
//! headers and the MIME tree. The tree is a recursive tagged variant so the
//! body extractor can walk it without dynamic field probing.

use async_trait::async_trait;
use thiserror::Error;

/// A single message header as returned by the mail API.
#[derive(Debug, Clone)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Recursive MIME tree.
///
/// Gmail's `payload` maps onto this shape. A multipart node that carries
/// inline body data surfaces that data as a leading `Leaf` child, so the
/// traversal order matches what the API delivered.
#[derive(Debug, Clone)]
pub enum MimePart {
    Leaf { mime_type: String, data: String },
    Composite { parts: Vec<MimePart> },
}

/// A message fetched from the source, ready for classification.
#[derive(Debug, Clone)]
pub struct FetchedMessage {
    pub id: String,
    pub thread_id: String,
    pub headers: Vec<Header>,
    pub payload: Option<MimePart>,
}

impl FetchedMessage {
    /// Look up a header value by name, case-insensitively. Missing → empty.
    pub fn header(&self, name: &str) -> String {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.clone())
            .unwrap_or_default()
    }

    /// Whether a header is present at all (List-Unsubscribe carries meaning
    /// by mere presence).
    pub fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|h| h.name.eq_ignore_ascii_case(name))
    }
}

/// One page of message ids from the source.
#[derive(Debug, Clone, Default)]
pub struct MessagePage {
    pub ids: Vec<String>,
    pub next_page_token: Option<String>,
}

/// Errors surfaced by a message source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Credentials missing, expired, or revoked. Aborts before any processing.
    #[error("mail account not linked or token invalid")]
    Auth,

    #[error("source transport error: {0}")]
    Transport(String),
}

/// Read-only access to the user's mailbox.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// List message ids matching `query`, one page at a time.
    async fn list_message_ids(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<MessagePage, SourceError>;

    /// Fetch a single message with headers and the full MIME tree.
    async fn get_message(&self, id: &str) -> Result<FetchedMessage, SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_with_headers(headers: Vec<(&str, &str)>) -> FetchedMessage {
        FetchedMessage {
            id: "m1".to_string(),
            thread_id: "t1".to_string(),
            headers: headers
                .into_iter()
                .map(|(name, value)| Header {
                    name: name.to_string(),
                    value: value.to_string(),
                })
                .collect(),
            payload: None,
        }
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let msg = message_with_headers(vec![("Subject", "Hello"), ("From", "a@b.com")]);
        assert_eq!(msg.header("subject"), "Hello");
        assert_eq!(msg.header("FROM"), "a@b.com");
        assert_eq!(msg.header("Reply-To"), "");
    }

    #[test]
    fn test_has_header() {
        let msg = message_with_headers(vec![("List-Unsubscribe", "<https://u.example>")]);
        assert!(msg.has_header("list-unsubscribe"));
        assert!(!msg.has_header("Precedence"));
    }
}
