//! Error types for stats collection.

use std::error::Error as StdError;

use thiserror::Error;

/// Underlying cause carried by transport and decoding failures.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A failed attempt to fetch one node's statistics.
///
/// Always carries the address that was being polled; the cause is the
/// error's source.
#[derive(Debug, Error)]
#[error("failed to fetch stats from {address}")]
pub struct FetchError {
    /// The node address as configured.
    pub address: String,
    /// What went wrong.
    #[source]
    pub kind: FetchErrorKind,
}

impl FetchError {
    pub fn new(address: impl Into<String>, kind: FetchErrorKind) -> Self {
        Self {
            address: address.into(),
            kind,
        }
    }
}

/// The cause of a [`FetchError`].
#[derive(Debug, Error)]
pub enum FetchErrorKind {
    /// The address could not be turned into a stats URL.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Connection failed.
    #[error("connection failed")]
    Connection(#[source] BoxError),

    /// Timeout waiting for response.
    #[error("request timed out")]
    Timeout,

    /// The node answered with a non-success status.
    #[error("stats endpoint returned status {0}")]
    Status(u16),

    /// Failed to decode the response body.
    #[error("failed to decode response")]
    Decode(#[source] BoxError),

    /// Any other HTTP-level failure.
    #[error("HTTP request failed")]
    Http(#[source] BoxError),
}

impl FetchErrorKind {
    /// This cause and everything beneath it, joined with `": "`.
    pub fn describe(&self) -> String {
        let mut text = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            text.push_str(": ");
            text.push_str(&err.to_string());
            source = err.source();
        }
        text
    }
}

#[cfg(feature = "nsqd")]
impl From<reqwest::Error> for FetchErrorKind {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchErrorKind::Timeout
        } else if err.is_connect() {
            FetchErrorKind::Connection(Box::new(err))
        } else if err.is_decode() {
            FetchErrorKind::Decode(Box::new(err))
        } else {
            FetchErrorKind::Http(Box::new(err))
        }
    }
}

impl From<serde_json::Error> for FetchErrorKind {
    fn from(err: serde_json::Error) -> Self {
        FetchErrorKind::Decode(Box::new(err))
    }
}
