//! Startup configuration errors.

use thiserror::Error;

use crate::data::DurationError;

/// Errors raised while building the runtime [`Config`](crate::Config).
///
/// All of these are fatal: the process exits before any polling begins.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The refresh interval could not be parsed.
    #[error("invalid interval {value:?}")]
    InvalidInterval {
        value: String,
        #[source]
        source: DurationError,
    },

    /// The refresh interval parsed but is zero or negative.
    #[error("interval must be positive, got {0:?}")]
    NonPositiveInterval(String),

    /// The request timeout could not be parsed or is zero.
    #[error("invalid timeout {0:?}")]
    InvalidTimeout(String),

    /// No node addresses were configured.
    #[error("at least one nsqd HTTP address is required")]
    NoAddresses,

    /// A node address is not usable.
    #[error("invalid nsqd HTTP address {0:?}")]
    InvalidAddress(String),

    /// The settings file or environment could not be loaded.
    #[error("failed to load settings")]
    Load(#[from] config::ConfigError),
}
