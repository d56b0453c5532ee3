//! Runtime configuration.
//!
//! Settings are layered, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. an optional settings file (`--config nsqtop.toml`)
//! 3. `NSQTOP_*` environment variables
//! 4. command-line flags
//!
//! ```toml
//! nsqd_http_addresses = ["10.0.0.1:4151", "10.0.0.2:4151"]
//! interval = "2s"
//! timeout = "5s"
//! keep_going = true
//! ```
//!
//! The layered [`Settings`] are validated once into an immutable [`Config`]
//! that is handed to the scheduler.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use config::{Environment, File};
use serde::Deserialize;

use crate::cli::Args;
use crate::data::{parse_duration, DurationError};
use crate::error::ConfigError;

/// Address polled when none is configured.
pub const DEFAULT_ADDRESS: &str = "0.0.0.0:4151";

/// Default refresh interval.
pub const DEFAULT_INTERVAL: &str = "1s";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: &str = "10s";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "NSQTOP";

/// What the scheduler does when fetching a node's stats fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop polling every node on the first failure.
    #[default]
    Abort,
    /// Show the failure for that node and keep polling the others.
    Isolate,
}

/// Unvalidated settings as read from file, environment and flags.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub nsqd_http_addresses: Vec<String>,
    pub interval: String,
    pub timeout: String,
    pub keep_going: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            nsqd_http_addresses: vec![DEFAULT_ADDRESS.to_string()],
            interval: DEFAULT_INTERVAL.to_string(),
            timeout: DEFAULT_TIMEOUT.to_string(),
            keep_going: false,
        }
    }
}

impl Settings {
    /// Load settings from an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Load settings, reading environment variables from `env` instead of
    /// the process environment when given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("nsqd_http_addresses")
                .source(env),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Apply command-line flags on top of these settings.
    pub fn merge_args(mut self, args: &Args) -> Self {
        if !args.nsqd_http_address.is_empty() {
            self.nsqd_http_addresses = args.nsqd_http_address.clone();
        }
        if let Some(interval) = &args.interval {
            self.interval = interval.clone();
        }
        if let Some(timeout) = &args.timeout {
            self.timeout = timeout.clone();
        }
        if args.keep_going {
            self.keep_going = true;
        } else if args.no_keep_going {
            self.keep_going = false;
        }
        self
    }

    /// Validate into a runtime [`Config`].
    pub fn validate(self) -> Result<Config, ConfigError> {
        let interval = parse_interval(&self.interval)?;
        let timeout = parse_duration(&self.timeout)
            .ok()
            .filter(|d| !d.is_zero())
            .ok_or_else(|| ConfigError::InvalidTimeout(self.timeout.clone()))?;

        let policy = if self.keep_going {
            FailurePolicy::Isolate
        } else {
            FailurePolicy::Abort
        };

        Ok(Config::new(self.nsqd_http_addresses, interval)?
            .with_request_timeout(timeout)
            .with_failure_policy(policy))
    }
}

/// Parse a refresh interval, which must be strictly positive.
pub fn parse_interval(value: &str) -> Result<Duration, ConfigError> {
    match parse_duration(value) {
        Ok(d) if d.is_zero() => Err(ConfigError::NonPositiveInterval(value.to_string())),
        Ok(d) => Ok(d),
        Err(DurationError::Negative(_)) => {
            Err(ConfigError::NonPositiveInterval(value.to_string()))
        }
        Err(source) => Err(ConfigError::InvalidInterval {
            value: value.to_string(),
            source,
        }),
    }
}

/// Validated, immutable configuration for one nsqtop run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    addresses: Vec<String>,
    interval: Duration,
    request_timeout: Duration,
    failure_policy: FailurePolicy,
}

impl Config {
    /// Create a configuration polling `addresses` every `interval`.
    pub fn new(addresses: Vec<String>, interval: Duration) -> Result<Self, ConfigError> {
        if addresses.is_empty() {
            return Err(ConfigError::NoAddresses);
        }
        let addresses = addresses
            .into_iter()
            .map(|addr| {
                let trimmed = addr.trim();
                match nsqtop_adapters::nsqd::stats_url(trimmed) {
                    Ok(_) => Ok(trimmed.to_string()),
                    Err(_) => Err(ConfigError::InvalidAddress(addr)),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if interval.is_zero() {
            return Err(ConfigError::NonPositiveInterval("0s".to_string()));
        }

        Ok(Self {
            addresses,
            interval,
            request_timeout: nsqtop_adapters::nsqd::DEFAULT_TIMEOUT,
            failure_policy: FailurePolicy::default(),
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Node addresses in polling order.
    pub fn addresses(&self) -> &[String] {
        &self.addresses
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }
}
