//! Gmail API v1 message source.
//!
//! Lists message ids (100 per page, spam/trash excluded) and fetches
//! messages with `format=full`, mapping the API's payload JSON onto the
//! pipeline's recursive `MimePart` tree.

use async_trait::async_trait;
use serde::Deserialize;

use crate::message::{FetchedMessage, Header, MessagePage, MessageSource, MimePart, SourceError};

use super::{send_with_retry, GoogleApiError, RetryPolicy};

const MESSAGES_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages";

// ============================================================================
// API response types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageListResponse {
    #[serde(default)]
    messages: Vec<MessageStub>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageStub {
    id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageDetail {
    #[serde(default)]
    id: String,
    #[serde(default)]
    thread_id: String,
    #[serde(default)]
    payload: Option<Payload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    headers: Vec<RawHeader>,
    #[serde(default)]
    body: Option<PayloadBody>,
    #[serde(default)]
    parts: Vec<Payload>,
}

#[derive(Debug, Deserialize)]
struct RawHeader {
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayloadBody {
    #[serde(default)]
    data: Option<String>,
}

// ============================================================================
// Source implementation
// ============================================================================

/// Gmail-backed [`MessageSource`].
pub struct GmailSource {
    client: reqwest::Client,
    access_token: String,
}

impl GmailSource {
    pub fn new(access_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            access_token,
        }
    }
}

#[async_trait]
impl MessageSource for GmailSource {
    async fn list_message_ids(
        &self,
        query: &str,
        page_token: Option<&str>,
    ) -> Result<MessagePage, SourceError> {
        let mut params: Vec<(&str, String)> = vec![
            ("q", query.to_string()),
            ("maxResults", "100".to_string()),
            ("includeSpamTrash", "false".to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        let resp = send_with_retry(
            self.client
                .get(MESSAGES_URL)
                .bearer_auth(&self.access_token)
                .query(&params),
            &RetryPolicy::default(),
        )
        .await
        .map_err(to_source_error)?;
        let resp = check_status(resp).await.map_err(to_source_error)?;

        let list: MessageListResponse = resp
            .json()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        Ok(MessagePage {
            ids: list.messages.into_iter().map(|m| m.id).collect(),
            next_page_token: list.next_page_token,
        })
    }

    async fn get_message(&self, id: &str) -> Result<FetchedMessage, SourceError> {
        let url = format!("{MESSAGES_URL}/{id}");
        let resp = send_with_retry(
            self.client
                .get(&url)
                .bearer_auth(&self.access_token)
                .query(&[("format", "full")]),
            &RetryPolicy::default(),
        )
        .await
        .map_err(to_source_error)?;
        let resp = check_status(resp).await.map_err(to_source_error)?;

        let detail: MessageDetail = resp
            .json()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))?;

        Ok(into_fetched(detail))
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, GoogleApiError> {
    let status = resp.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(GoogleApiError::AuthExpired);
    }
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(GoogleApiError::ApiError {
            status: status.as_u16(),
            message: body,
        });
    }
    Ok(resp)
}

fn to_source_error(e: GoogleApiError) -> SourceError {
    match e {
        GoogleApiError::AuthExpired | GoogleApiError::TokenNotFound(_) => SourceError::Auth,
        other => SourceError::Transport(other.to_string()),
    }
}

fn into_fetched(detail: MessageDetail) -> FetchedMessage {
    let (headers, payload) = match detail.payload {
        Some(payload) => {
            let Payload {
                mime_type,
                headers,
                body,
                parts,
            } = payload;
            let converted_headers = headers
                .into_iter()
                .map(|h| Header {
                    name: h.name,
                    value: h.value,
                })
                .collect();
            let tree = into_mime_tree(Payload {
                mime_type,
                headers: Vec::new(),
                body,
                parts,
            });
            (converted_headers, Some(tree))
        }
        None => (Vec::new(), None),
    };

    FetchedMessage {
        id: detail.id,
        thread_id: detail.thread_id,
        headers,
        payload,
    }
}

fn into_mime_tree(payload: Payload) -> MimePart {
    let data = payload.body.and_then(|b| b.data).unwrap_or_default();
    if payload.parts.is_empty() {
        MimePart::Leaf {
            mime_type: payload.mime_type,
            data,
        }
    } else {
        let mut parts = Vec::with_capacity(payload.parts.len() + 1);
        if !data.is_empty() {
            // inline data on a multipart node surfaces as a leading leaf so
            // the extractor sees it in delivery order
            parts.push(MimePart::Leaf {
                mime_type: payload.mime_type,
                data,
            });
        }
        parts.extend(payload.parts.into_iter().map(into_mime_tree));
        MimePart::Composite { parts }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_list_deserialization() {
        let json = r#"{
            "messages": [
                {"id": "msg1", "threadId": "thread1"},
                {"id": "msg2", "threadId": "thread2"}
            ],
            "nextPageToken": "token123"
        }"#;

        let resp: MessageListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.messages.len(), 2);
        assert_eq!(resp.messages[0].id, "msg1");
        assert_eq!(resp.next_page_token.as_deref(), Some("token123"));
    }

    #[test]
    fn test_message_list_empty() {
        let json = r#"{"resultSizeEstimate": 0}"#;
        let resp: MessageListResponse = serde_json::from_str(json).unwrap();
        assert!(resp.messages.is_empty());
        assert!(resp.next_page_token.is_none());
    }

    #[test]
    fn test_full_message_maps_headers_and_tree() {
        let json = r#"{
            "id": "msg123",
            "threadId": "thread456",
            "payload": {
                "mimeType": "multipart/alternative",
                "headers": [
                    {"name": "From", "value": "Acme <jobs@acme.com>"},
                    {"name": "Subject", "value": "Your application"}
                ],
                "parts": [
                    {"mimeType": "text/plain", "body": {"data": "aGVsbG8"}},
                    {"mimeType": "text/html", "body": {"data": "PGI-aGk8L2I-"}}
                ]
            }
        }"#;

        let detail: MessageDetail = serde_json::from_str(json).unwrap();
        let fetched = into_fetched(detail);

        assert_eq!(fetched.id, "msg123");
        assert_eq!(fetched.thread_id, "thread456");
        assert_eq!(fetched.header("subject"), "Your application");

        match fetched.payload.unwrap() {
            MimePart::Composite { parts } => {
                assert_eq!(parts.len(), 2);
                match &parts[0] {
                    MimePart::Leaf { mime_type, data } => {
                        assert_eq!(mime_type, "text/plain");
                        assert_eq!(data, "aGVsbG8");
                    }
                    other => panic!("expected leaf, got {:?}", other),
                }
            }
            other => panic!("expected composite, got {:?}", other),
        }
    }

    #[test]
    fn test_inline_data_on_multipart_becomes_leading_leaf() {
        let json = r#"{
            "id": "m",
            "threadId": "t",
            "payload": {
                "mimeType": "multipart/mixed",
                "body": {"data": "aW5saW5l"},
                "parts": [
                    {"mimeType": "text/plain", "body": {"data": "Y2hpbGQ"}}
                ]
            }
        }"#;

        let detail: MessageDetail = serde_json::from_str(json).unwrap();
        let fetched = into_fetched(detail);

        match fetched.payload.unwrap() {
            MimePart::Composite { parts } => {
                assert_eq!(parts.len(), 2);
                assert!(matches!(
                    &parts[0],
                    MimePart::Leaf { mime_type, .. } if mime_type == "multipart/mixed"
                ));
            }
            other => panic!("expected composite, got {:?}", other),
        }
    }

    #[test]
    fn test_single_part_message() {
        let json = r#"{
            "id": "m",
            "threadId": "t",
            "payload": {
                "mimeType": "text/plain",
                "headers": [{"name": "Subject", "value": "hi"}],
                "body": {"data": "Ym9keQ"}
            }
        }"#;

        let detail: MessageDetail = serde_json::from_str(json).unwrap();
        let fetched = into_fetched(detail);
        assert!(matches!(
            fetched.payload.unwrap(),
            MimePart::Leaf { mime_type, data } if mime_type == "text/plain" && data == "Ym9keQ"
        ));
    }

    #[test]
    fn test_message_without_payload() {
        let json = r#"{"id": "m", "threadId": "t"}"#;
        let detail: MessageDetail = serde_json::from_str(json).unwrap();
        let fetched = into_fetched(detail);
        assert!(fetched.payload.is_none());
        assert!(fetched.headers.is_empty());
    }
}
