//! # nsqtop-adapters
//!
//! Collects topic and channel statistics from nsqd nodes.
//!
//! ## Supported Systems
//!
//! - **nsqd** (`nsqd` feature) - Queue depth, in-flight, deferred and
//!   timeout counters per topic and channel, via the `/stats` HTTP endpoint
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nsqtop_adapters::nsqd::NsqdClient;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = NsqdClient::builder()
//!         .timeout(Duration::from_secs(5))
//!         .build()?;
//!
//!     let snapshot = client.fetch("127.0.0.1:4151").await?;
//!
//!     println!("Collected {} topics", snapshot.topics.len());
//!     Ok(())
//! }
//! ```

pub mod error;

#[cfg(feature = "nsqd")]
pub mod nsqd;

pub use error::{FetchError, FetchErrorKind};

// Re-export types for convenience
pub use nsqtop_types::{ChannelStats, QueueCounts, StatsSnapshot, TopicStats};
