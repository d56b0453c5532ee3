//! nsqd adapter using the HTTP stats endpoint.
//!
//! Each call to [`NsqdClient::fetch`] performs one `GET /stats?format=json`
//! against the node and decodes the body into a [`StatsSnapshot`]. The
//! request is read-only on the daemon side, nothing is cached between
//! calls, and no retry is attempted.
//!
//! ## Response formats
//!
//! Older nsqd releases wrap the document in an envelope:
//!
//! ```json
//! {"status_code": 200, "status_txt": "OK", "data": {"topics": [...]}}
//! ```
//!
//! Releases from 1.0 onwards return the document directly when the
//! `Accept: application/vnd.nsq; version=1.0` header is sent. Both are
//! accepted.
//!
//! ## Example
//!
//! ```rust,no_run
//! use nsqtop_adapters::nsqd::NsqdClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NsqdClient::builder().build()?;
//!     let snapshot = client.fetch("127.0.0.1:4151").await?;
//!
//!     for topic in &snapshot.topics {
//!         println!("{}: depth {}", topic.name, topic.counts.depth);
//!         for channel in &topic.channels {
//!             println!("  {}: depth {}", channel.name, channel.counts.depth);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use nsqtop_types::StatsSnapshot;

use crate::{FetchError, FetchErrorKind};

/// Path and query of the nsqd stats endpoint.
pub const STATS_PATH: &str = "/stats?format=json";

/// Media type that selects the un-enveloped v1 response format.
const NSQ_V1_ACCEPT: &str = "application/vnd.nsq; version=1.0";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the nsqd HTTP stats endpoint.
///
/// One client can poll any number of nodes; the address is passed per call.
#[derive(Debug, Clone)]
pub struct NsqdClient {
    client: Client,
    timeout: Duration,
}

impl NsqdClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> NsqdClientBuilder {
        NsqdClientBuilder::default()
    }

    /// The per-request timeout this client applies.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the current statistics of the node at `address`.
    pub async fn fetch(&self, address: &str) -> Result<StatsSnapshot, FetchError> {
        self.fetch_inner(address)
            .await
            .map_err(|kind| FetchError::new(address, kind))
    }

    async fn fetch_inner(&self, address: &str) -> Result<StatsSnapshot, FetchErrorKind> {
        let url = stats_url(address)?;
        debug!(%address, %url, "fetching nsqd stats");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static(NSQ_V1_ACCEPT))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchErrorKind::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        decode_stats(&body)
    }
}

/// Builder for NsqdClient.
#[derive(Debug, Default)]
pub struct NsqdClientBuilder {
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl NsqdClientBuilder {
    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the User-Agent header (default: `nsqtop/<version>`).
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<NsqdClient, reqwest::Error> {
        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("nsqtop/{}", env!("CARGO_PKG_VERSION")));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(NsqdClient { client, timeout })
    }
}

/// Build the stats URL for a node address.
///
/// `host:port` is taken as plain HTTP; an explicit `http://` or `https://`
/// prefix is kept as given.
pub fn stats_url(address: &str) -> Result<Url, FetchErrorKind> {
    let address = address.trim().trim_end_matches('/');
    if address.is_empty() {
        return Err(FetchErrorKind::InvalidAddress("empty address".to_string()));
    }

    let base = if address.starts_with("http://") || address.starts_with("https://") {
        address.to_string()
    } else {
        format!("http://{address}")
    };

    Url::parse(&format!("{base}{STATS_PATH}"))
        .map_err(|e| FetchErrorKind::InvalidAddress(format!("{address}: {e}")))
}

/// Decode a stats body in either the enveloped or the bare format.
pub fn decode_stats(body: &[u8]) -> Result<StatsSnapshot, FetchErrorKind> {
    let value: Value = serde_json::from_slice(body)?;

    let document = match value {
        Value::Object(mut map) if map.contains_key("status_code") && map.contains_key("data") => {
            let code = map.get("status_code").and_then(Value::as_u64).unwrap_or(0);
            if !(200..300).contains(&code) {
                return Err(FetchErrorKind::Status(code.min(u16::MAX as u64) as u16));
            }
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    if !document.is_object() {
        return Err(FetchErrorKind::Decode(
            "stats document is not a JSON object".into(),
        ));
    }

    Ok(serde_json::from_value(document)?)
}
