//! Gmail API plumbing: token handling and HTTP with retries.
//!
//! The token format is compatible with what google-auth writes to
//! token.json (`access_token` is accepted as an alias for `token`), so a
//! token obtained through any standard OAuth tool can be dropped into
//! `~/.jobtrail/google/token.json`. The interactive consent flow is out of
//! scope; only load/refresh is handled here.

pub mod client;

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// OAuth2 scope used for ingestion. Read-only: the pipeline never mutates
/// the mailbox.
pub const SCOPES: &[&str] = &["https://www.googleapis.com/auth/gmail.readonly"];

// ============================================================================
// Token types
// ============================================================================

/// OAuth2 token payload persisted at `~/.jobtrail/google/token.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleToken {
    /// The access token (google-auth writes this as "token").
    #[serde(alias = "access_token")]
    pub token: String,
    /// The refresh token (long-lived, used to get new access tokens).
    pub refresh_token: Option<String>,
    /// Token endpoint URL.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    /// OAuth2 client ID.
    pub client_id: String,
    /// OAuth2 client secret (optional for PKCE clients).
    #[serde(default)]
    pub client_secret: Option<String>,
    /// Authorized scopes.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Token expiry time (ISO 8601).
    #[serde(default)]
    pub expiry: Option<String>,
    /// Authenticated account email.
    #[serde(default, alias = "email")]
    pub account: Option<String>,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

// ============================================================================
// Error type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GoogleApiError {
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Token expired or revoked")]
    AuthExpired,
    #[error("Token not found at {0}")]
    TokenNotFound(PathBuf),
    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Retry policy
// ============================================================================

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 250,
            max_backoff_ms: 2_000,
        }
    }
}

fn status_is_retryable(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS
        || status == reqwest::StatusCode::REQUEST_TIMEOUT
        || status.is_server_error()
}

fn retry_delay(
    attempt: u32,
    policy: &RetryPolicy,
    retry_after: Option<&reqwest::header::HeaderValue>,
) -> Duration {
    if let Some(value) = retry_after.and_then(|v| v.to_str().ok()) {
        if let Ok(secs) = value.parse::<u64>() {
            return Duration::from_secs(secs.min(30));
        }
    }

    let exponent = 2u64.saturating_pow(attempt.saturating_sub(1));
    let base = policy
        .initial_backoff_ms
        .saturating_mul(exponent)
        .min(policy.max_backoff_ms);
    let jitter = (std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64)
        .unwrap_or(0))
        % 150;
    Duration::from_millis(base.saturating_add(jitter))
}

/// Send a request, retrying transport errors and 429/408/5xx responses with
/// capped exponential backoff. `Retry-After` is honored when present.
pub async fn send_with_retry(
    request: reqwest::RequestBuilder,
    policy: &RetryPolicy,
) -> Result<reqwest::Response, GoogleApiError> {
    let attempts = policy.max_attempts.max(1);
    for attempt in 1..=attempts {
        let Some(cloned) = request.try_clone() else {
            return request.send().await.map_err(GoogleApiError::Http);
        };

        match cloned.send().await {
            Ok(response) => {
                let status = response.status();
                if status_is_retryable(status) && attempt < attempts {
                    let delay = retry_delay(
                        attempt,
                        policy,
                        response.headers().get(reqwest::header::RETRY_AFTER),
                    );
                    log::warn!(
                        "gmail retry {}/{} after status {} (sleep {:?})",
                        attempt,
                        attempts,
                        status,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                return Ok(response);
            }
            Err(err) => {
                if (err.is_timeout() || err.is_connect()) && attempt < attempts {
                    let delay = retry_delay(attempt, policy, None);
                    log::warn!(
                        "gmail retry {}/{} after transport error: {} (sleep {:?})",
                        attempt,
                        attempts,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    continue;
                }
                return Err(GoogleApiError::Http(err));
            }
        }
    }

    Err(GoogleApiError::RefreshFailed(
        "request exhausted retries".to_string(),
    ))
}

// ============================================================================
// Token I/O and refresh
// ============================================================================

/// Path of the token file.
pub fn token_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_default()
        .join(".jobtrail")
        .join("google")
        .join("token.json")
}

/// Load the token from disk.
pub fn load_token() -> Result<GoogleToken, GoogleApiError> {
    let path = token_path();
    if !path.exists() {
        return Err(GoogleApiError::TokenNotFound(path));
    }
    let content = std::fs::read_to_string(&path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Persist the token to disk.
pub fn save_token(token: &GoogleToken) -> Result<(), GoogleApiError> {
    let path = token_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, serde_json::to_string_pretty(token)?)?;
    Ok(())
}

/// Check whether a token is expired (60 seconds of skew allowed).
pub fn is_token_expired(token: &GoogleToken) -> bool {
    match &token.expiry {
        None => true, // no expiry = assume expired, try refresh
        Some(expiry_str) => {
            match chrono::DateTime::parse_from_rfc3339(&expiry_str.replace('Z', "+00:00"))
                .or_else(|_| chrono::DateTime::parse_from_rfc3339(expiry_str))
            {
                Ok(expiry) => expiry <= chrono::Utc::now() + chrono::Duration::seconds(60),
                Err(_) => true, // can't parse = assume expired
            }
        }
    }
}

/// Refresh the access token using the refresh token, persisting the result.
pub async fn refresh_access_token(token: &GoogleToken) -> Result<GoogleToken, GoogleApiError> {
    let refresh_token = token
        .refresh_token
        .as_ref()
        .ok_or(GoogleApiError::AuthExpired)?;

    let mut form = vec![
        ("client_id", token.client_id.as_str()),
        ("refresh_token", refresh_token.as_str()),
        ("grant_type", "refresh_token"),
    ];
    if let Some(secret) = token.client_secret.as_deref() {
        form.push(("client_secret", secret));
    }

    let client = reqwest::Client::new();
    let resp = client.post(&token.token_uri).form(&form).send().await?;
    let status = resp.status();
    let body_text = resp.text().await.unwrap_or_default();

    if !status.is_success() {
        let lowered = body_text.to_lowercase();
        if (status.as_u16() == 400 || status.as_u16() == 401)
            && (lowered.contains("invalid_grant") || lowered.contains("expired"))
        {
            return Err(GoogleApiError::AuthExpired);
        }
        return Err(GoogleApiError::RefreshFailed(format!(
            "HTTP {}: {}",
            status, body_text
        )));
    }

    let body: serde_json::Value = serde_json::from_str(&body_text)?;
    let access_token = body["access_token"]
        .as_str()
        .ok_or_else(|| GoogleApiError::RefreshFailed("No access_token in response".into()))?;
    let expires_in = body["expires_in"].as_u64().unwrap_or(3600);
    let expiry = chrono::Utc::now() + chrono::Duration::seconds(expires_in as i64);

    let mut new_token = token.clone();
    new_token.token = access_token.to_string();
    new_token.expiry = Some(expiry.to_rfc3339());

    save_token(&new_token)?;
    Ok(new_token)
}

/// Get a valid access token, refreshing if expired. The entry point for
/// all API calls.
pub async fn get_valid_access_token() -> Result<String, GoogleApiError> {
    let token = load_token()?;
    if is_token_expired(&token) {
        let refreshed = refresh_access_token(&token).await?;
        Ok(refreshed.token)
    } else {
        Ok(token.token)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expiry: Option<String>) -> GoogleToken {
        GoogleToken {
            token: "ya29.test".to_string(),
            refresh_token: Some("1//refresh".to_string()),
            token_uri: default_token_uri(),
            client_id: "client.apps.googleusercontent.com".to_string(),
            client_secret: None,
            scopes: vec![SCOPES[0].to_string()],
            expiry,
            account: Some("user@example.com".to_string()),
        }
    }

    #[test]
    fn test_token_roundtrip() {
        let json = serde_json::to_string_pretty(&token(Some("2026-02-08T12:00:00Z".into()))).unwrap();
        let parsed: GoogleToken = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.token, "ya29.test");
        assert_eq!(parsed.refresh_token.as_deref(), Some("1//refresh"));
        assert_eq!(parsed.account.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn test_token_access_token_alias() {
        let json = r#"{
            "access_token": "ya29.alias",
            "refresh_token": "1//refresh",
            "client_id": "client"
        }"#;
        let parsed: GoogleToken = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.token, "ya29.alias");
        assert_eq!(parsed.token_uri, default_token_uri());
    }

    #[test]
    fn test_is_token_expired_no_expiry() {
        assert!(is_token_expired(&token(None)));
    }

    #[test]
    fn test_is_token_expired_future() {
        let future = chrono::Utc::now() + chrono::Duration::hours(1);
        assert!(!is_token_expired(&token(Some(future.to_rfc3339()))));
    }

    #[test]
    fn test_is_token_expired_past() {
        let past = chrono::Utc::now() - chrono::Duration::hours(1);
        assert!(is_token_expired(&token(Some(past.to_rfc3339()))));
    }

    #[test]
    fn test_is_token_expired_zulu_suffix() {
        // google-auth writes "2026-02-08T12:00:00.000000Z"
        assert!(is_token_expired(&token(Some(
            "2020-01-01T00:00:00.000000Z".to_string()
        ))));
    }
}
