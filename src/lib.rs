//! # nsqtop
//!
//! A live terminal dashboard for one or more nsqd nodes. Every interval it
//! fetches each node's topic and channel statistics over HTTP and redraws
//! a table of queue depth, in-flight, deferred and timeout counts.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  Scheduler (one pass per tick, nodes in order)               │
//! │                                                              │
//! │   address ──▶ StatsSource ──▶ StatsSnapshot ──▶ ui::table ──▶ stdout
//! │               (NsqdClient)                                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`config`]**: Layered settings (file, environment, flags) validated
//!   into an immutable [`Config`]
//! - **[`source`]**: The [`StatsSource`] seam over the nsqd HTTP client
//! - **[`scheduler`]**: The fixed-interval poll loop and its
//!   [`FailurePolicy`] handling
//! - **[`ui`]**: Full-screen table rendering
//! - **[`data`]**: Duration parsing and number formatting
//!
//! Nothing is retained between ticks; each table is drawn from the latest
//! response only.
//!
//! ## Usage
//!
//! ```bash
//! # Watch the local node, refreshing every second
//! nsqtop
//!
//! # Watch two nodes every 500ms, tolerating failures of either
//! nsqtop -a 10.0.0.1:4151 -a 10.0.0.2:4151 --interval 500ms --keep-going
//! ```
//!
//! ### As a library
//!
//! ```no_run
//! use std::time::Duration;
//! use nsqtop::{Config, NsqdClient, Scheduler};
//!
//! # tokio_test::block_on(async {
//! let config = Config::new(vec!["127.0.0.1:4151".to_string()], Duration::from_secs(1))?;
//! let client = NsqdClient::builder().timeout(config.request_timeout()).build()?;
//!
//! let mut scheduler = Scheduler::new(config, client, std::io::stdout());
//! let report = scheduler.pass().await?;
//! println!("all nodes ok: {}", report.is_success());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # }).unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod scheduler;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use cli::Args;
pub use crate::config::{Config, FailurePolicy, Settings};
pub use error::ConfigError;
pub use nsqtop_adapters::nsqd::NsqdClient;
pub use nsqtop_adapters::{FetchError, FetchErrorKind};
pub use nsqtop_types::{ChannelStats, QueueCounts, StatsSnapshot, TopicStats};
pub use scheduler::{NodeOutcome, PassReport, PollError, Scheduler};
pub use source::StatsSource;
