use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::config::BoardConfig;
use crate::models::disposition::{ApiEnvelope, DispositionRecord};

/// Where disposition records come from.
#[async_trait]
pub trait DispositionSource: Send + Sync {
    /// Fetch the full record list. One request per call, no retries.
    async fn fetch(&self) -> Result<Vec<DispositionRecord>, AppError>;

    /// Human-readable origin for logs.
    fn describe(&self) -> String;
}

/// The disposition REST endpoint.
pub struct HttpSource {
    client: reqwest::Client,
    url: String,
    timeout: Option<Duration>,
}

impl HttpSource {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.endpoint_url(),
            timeout: config.timeout(),
        }
    }
}

#[async_trait]
impl DispositionSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<DispositionRecord>, AppError> {
        let mut request = self.client.get(&self.url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!("GET {} -> {} ({} bytes)", self.url, status, body.len());

        interpret_response(status, &body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Only the `message` field matters on an error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Turn a status and body into records or the matching error.
///
/// Non-2xx bodies are searched for a server `message`, falling back to the
/// status line. 2xx bodies must be a well-formed envelope.
pub fn interpret_response(
    status: StatusCode,
    body: &str,
) -> Result<Vec<DispositionRecord>, AppError> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed with status code {}", status.as_u16()));
        return Err(AppError::Transport(message));
    }

    let envelope: ApiEnvelope =
        serde_json::from_str(body).map_err(|e| AppError::Decode(e.to_string()))?;
    envelope.into_records()
}

/// Identifies one fetch invocation. Only the newest ticket may apply its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Issues fetches and tracks which one is the newest.
pub struct FetchController {
    source: Arc<dyn DispositionSource>,
    generation: AtomicU64,
}

impl FetchController {
    pub fn new(source: Arc<dyn DispositionSource>) -> Self {
        Self {
            source,
            generation: AtomicU64::new(0),
        }
    }

    /// Start a new fetch generation. Older tickets become stale.
    pub fn issue(&self) -> FetchTicket {
        let id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        FetchTicket(id)
    }

    /// Number of tickets issued so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Run the request for `ticket`.
    pub async fn run(&self, ticket: FetchTicket) -> Result<Vec<DispositionRecord>, AppError> {
        info!(
            "Fetching dispositions from {} (generation {})",
            self.source.describe(),
            ticket.0
        );
        self.source.fetch().await
    }
}
