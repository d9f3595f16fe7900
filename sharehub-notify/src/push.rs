//! Push transports: Firebase Cloud Messaging (HTTP v1) and a log-only dry run.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use sharehub_core::Digest;

use crate::delivery::{DeliveryError, PushTransport};

pub const FCM_ENDPOINT: &str = "https://fcm.googleapis.com";

/// Error markers FCM and its admin SDKs use for dead tokens.
const INVALID_TOKEN_MARKERS: &[&str] = &[
    "UNREGISTERED",
    "registration-token-not-registered",
    "invalid-registration-token",
];

/// Map a non-2xx FCM response onto a delivery error.
///
/// Only a body that blames the token yields `InvalidToken`; a bare 404 from
/// a wrong endpoint or project is a transport failure.
pub fn classify_failure(status: u16, body: &str) -> DeliveryError {
    let reason = format!("HTTP {status}: {}", truncate(body.trim(), 200));

    if INVALID_TOKEN_MARKERS.iter().any(|m| body.contains(m)) {
        return DeliveryError::InvalidToken(reason);
    }
    let lower = body.to_lowercase();
    let names_token = lower.contains("registration token") || lower.contains("message.token");
    let token_not_found = status == 404 && body.contains("NOT_FOUND") && lower.contains("token");
    if token_not_found || (status == 400 && names_token) {
        return DeliveryError::InvalidToken(reason);
    }
    DeliveryError::Transport(reason)
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[derive(Serialize)]
struct Notification<'a> {
    title: &'a str,
    body: &'a str,
}

#[derive(Serialize)]
struct Message<'a> {
    token: &'a str,
    notification: Notification<'a>,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    message: Message<'a>,
}

pub struct FcmTransport {
    client: reqwest::Client,
    endpoint: String,
    project_id: String,
    access_token: String,
}

impl FcmTransport {
    pub fn new(project_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: FCM_ENDPOINT.to_string(),
            project_id: project_id.into(),
            access_token: access_token.into(),
        }
    }

    /// Point at a different host (emulators, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn send_url(&self) -> String {
        format!(
            "{}/v1/projects/{}/messages:send",
            self.endpoint.trim_end_matches('/'),
            self.project_id
        )
    }
}

#[async_trait]
impl PushTransport for FcmTransport {
    async fn send(&self, token: &str, digest: &Digest) -> Result<(), DeliveryError> {
        let body = SendRequest {
            message: Message {
                token,
                notification: Notification {
                    title: &digest.title,
                    body: &digest.body,
                },
            },
        };

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.access_token))
            .map_err(|e| DeliveryError::Transport(format!("bad access token header: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let resp = self
            .client
            .post(self.send_url())
            .headers(headers)
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let text = resp.text().await.unwrap_or_default();
        Err(classify_failure(status.as_u16(), &text))
    }
}

/// Logs the digest instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTransport;

#[async_trait]
impl PushTransport for LogTransport {
    async fn send(&self, token: &str, digest: &Digest) -> Result<(), DeliveryError> {
        let short: String = token.chars().take(8).collect();
        log::info!("[dry run] would push \"{}\" to token {short}…", digest.title);
        Ok(())
    }
}
