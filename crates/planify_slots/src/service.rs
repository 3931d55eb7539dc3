// --- File: crates/planify_slots/src/service.rs ---
//! Client side of the remote planning API.
//!
//! The planner only talks to the [`SlotApi`] trait; [`ReqwestSlotApi`] is the
//! HTTP implementation against `{base_url}/planning/creneaux`.

use async_trait::async_trait;
use planify_common::HTTP_CLIENT;
use reqwest::{header::RETRY_AFTER, Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::{ExistingSlot, SessionContext, SlotDto};

/// Errors returned by a [`SlotApi`] call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotApiError {
    #[error("Planning API responded with status {status}: {body}")]
    Http {
        status: u16,
        body: Value,
        retry_after: Option<Duration>,
    },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Failed to decode planning API response: {0}")]
    Decode(String),
}

impl SlotApiError {
    /// HTTP status of the failed call, `0` when no response was received.
    pub fn status_code(&self) -> u16 {
        match self {
            SlotApiError::Http { status, .. } => *status,
            SlotApiError::Network(_) | SlotApiError::Decode(_) => 0,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status_code() == StatusCode::TOO_MANY_REQUESTS.as_u16()
    }

    /// Server supplied `Retry-After` hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            SlotApiError::Http { retry_after, .. } => *retry_after,
            _ => None,
        }
    }

    /// Error payload as recorded in a submission failure.
    pub fn body(&self) -> Value {
        match self {
            SlotApiError::Http { body, .. } => body.clone(),
            other => json!({ "message": other.to_string() }),
        }
    }
}

impl From<reqwest::Error> for SlotApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SlotApiError::Decode(err.to_string())
        } else {
            SlotApiError::Network(err.to_string())
        }
    }
}

/// Operations of the remote slot store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SlotApi: Send + Sync {
    /// Every slot known to the store, all weeks included.
    async fn list_slots(&self) -> Result<Vec<ExistingSlot>, SlotApiError>;

    async fn create_slot(&self, dto: &SlotDto) -> Result<Value, SlotApiError>;

    async fn update_slot(&self, id: &str, dto: &SlotDto) -> Result<Value, SlotApiError>;

    async fn delete_slot(&self, id: &str) -> Result<(), SlotApiError>;
}

/// Builds a [`SlotApi`] bound to one caller's session.
pub trait SlotApiFactory: Send + Sync {
    fn for_session(&self, session: &SessionContext) -> Arc<dyn SlotApi>;
}

/// [`SlotApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct ReqwestSlotApi {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ReqwestSlotApi {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self::with_client(HTTP_CLIENT.clone(), base_url, token)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/planning/creneaux", self.base_url)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

/// Turns a non-2xx response into [`SlotApiError::Http`].
async fn check_status(response: Response) -> Result<Response, SlotApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_retry_after);
    let text = response.text().await.unwrap_or_default();
    let body = serde_json::from_str(&text).unwrap_or_else(|_| json!({ "message": text }));

    Err(SlotApiError::Http {
        status: status.as_u16(),
        body,
        retry_after,
    })
}

/// Delay-seconds form of `Retry-After`; HTTP dates and non-positive values are ignored.
pub fn parse_retry_after(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs > 0.0 && *secs <= f64::from(u32::MAX))
        .map(Duration::from_secs_f64)
}

#[async_trait]
impl SlotApi for ReqwestSlotApi {
    #[instrument(skip(self))]
    async fn list_slots(&self) -> Result<Vec<ExistingSlot>, SlotApiError> {
        let request = self.authorized(self.client.get(self.collection_url()));
        let response = check_status(request.send().await?).await?;
        let slots: Vec<ExistingSlot> = response.json().await?;
        debug!(count = slots.len(), "Listed remote slots");
        Ok(slots)
    }

    #[instrument(skip(self))]
    async fn create_slot(&self, dto: &SlotDto) -> Result<Value, SlotApiError> {
        let request = self.authorized(self.client.post(self.collection_url()).json(dto));
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await.unwrap_or(Value::Null))
    }

    #[instrument(skip(self))]
    async fn update_slot(&self, id: &str, dto: &SlotDto) -> Result<Value, SlotApiError> {
        let request = self.authorized(self.client.put(self.item_url(id)).json(dto));
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await.unwrap_or(Value::Null))
    }

    #[instrument(skip(self))]
    async fn delete_slot(&self, id: &str) -> Result<(), SlotApiError> {
        let request = self.authorized(self.client.delete(self.item_url(id)));
        check_status(request.send().await?).await?;
        Ok(())
    }
}

/// Creates one [`ReqwestSlotApi`] per request, carrying the caller's token.
#[derive(Debug, Clone)]
pub struct ReqwestSlotApiFactory {
    base_url: String,
}

impl ReqwestSlotApiFactory {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl SlotApiFactory for ReqwestSlotApiFactory {
    fn for_session(&self, session: &SessionContext) -> Arc<dyn SlotApi> {
        Arc::new(ReqwestSlotApi::new(
            self.base_url.clone(),
            session.token.clone(),
        ))
    }
}
