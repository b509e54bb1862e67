//! API Client Module
//! Fixed backend endpoints, a pluggable transport and the normalizing client.

use crate::data::{normalize, EnvelopeError, Payload};
use reqwest::blocking::Client;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// Backend endpoints the dashboard talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Cryptos,
    Stocks,
    TrainRlAgent,
    EvaluateRlAgent,
    TrendFollower,
    MeanReversion,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Cryptos => "/cryptos",
            Endpoint::Stocks => "/stocks",
            Endpoint::TrainRlAgent => "/train_rl_agent",
            Endpoint::EvaluateRlAgent => "/evaluate_rl_agent",
            Endpoint::TrendFollower => "/run_trend_follower",
            Endpoint::MeanReversion => "/run_mean_reversion",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Endpoint::Cryptos | Endpoint::Stocks => Method::Get,
            _ => Method::Post,
        }
    }
}

/// Raw HTTP response as seen by the client.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can carry a request to the backend.
pub trait Transport: Send + Sync {
    fn send(&self, method: Method, url: &str) -> Result<TransportResponse, ClientError>;
}

/// Blocking reqwest transport. Each call runs on the caller's thread.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("market_dash/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, method: Method, url: &str) -> Result<TransportResponse, ClientError> {
        let request = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
        };
        let response = request.header("Accept", "application/json").send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        Ok(TransportResponse { status, body })
    }
}

/// Normalizing client: every endpoint comes back as a [`Payload`].
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Client backed by a real HTTP transport.
    pub fn http(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self::new(base_url, Arc::new(HttpTransport::new(timeout)?)))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    /// Call an endpoint and normalize whatever shape it answers with.
    ///
    /// Non-2xx answers are still inspected: an `{"error": ...}` body becomes
    /// `Payload::Failed`, anything else is a `ClientError::Status`.
    pub fn fetch(&self, endpoint: Endpoint) -> Result<Payload, ClientError> {
        let url = self.url_for(endpoint);
        let method = endpoint.method();
        log::debug!("client.request method={} url={}", method, url);

        let response = self.transport.send(method, &url)?;
        log::debug!(
            "client.response url={} status={} bytes={}",
            url,
            response.status,
            response.body.len()
        );

        if !response.is_success() {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&response.body) {
                if let Ok(Payload::Failed(message)) = normalize(value) {
                    return Ok(Payload::Failed(message));
                }
            }
            return Err(ClientError::Status {
                status: response.status,
                body: truncate(&response.body, 200),
            });
        }

        let value: serde_json::Value = serde_json::from_str(&response.body)?;
        Ok(normalize(value)?)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
