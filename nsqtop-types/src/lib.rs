//! # nsqtop-types
//!
//! Point-in-time statistics for one nsqd node: its topics, and the
//! consumer channels attached to each topic.
//!
//! The types mirror the `/stats?format=json` document served by nsqd's
//! HTTP interface. Every counter is unsigned, so a snapshot can never
//! carry a negative depth or count.
//!
//! ## Features
//!
//! - `serde`: (de)serialization using nsqd's JSON field names
//!   (`topic_name`, `channel_name`, `in_flight_count`, ...).
//!
//! ## Example
//!
//! ```rust
//! use nsqtop_types::StatsSnapshot;
//!
//! let snapshot = StatsSnapshot::builder()
//!     .topic("orders", |t| {
//!         t.depth(42)
//!             .in_flight(3)
//!             .timeouts(1)
//!             .channel("billing", |c| c.depth(10).in_flight(1))
//!     })
//!     .topic("audit", |t| t)
//!     .build();
//!
//! assert_eq!(snapshot.topics.len(), 2);
//! assert_eq!(snapshot.row_count(), 3);
//! ```

mod counts;
mod snapshot;

pub use counts::*;
pub use snapshot::*;
