//! Snapshot - one node's topics and channels at one point in time.

use crate::{QueueCounts, QueueCountsBuilder};

/// Statistics for one nsqd node, as returned by a single stats request.
///
/// A snapshot is built fresh on every poll and never mutated afterwards.
/// Topic order is the order the daemon reported them in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatsSnapshot {
    /// Daemon version string, when reported.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub version: Option<String>,

    /// Daemon health string (`"OK"` on a healthy node), when reported.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub health: Option<String>,

    /// Topics in the order the daemon reported them.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "null_as_empty"))]
    pub topics: Vec<TopicStats>,
}

impl StatsSnapshot {
    /// Create a builder for constructing snapshots.
    pub fn builder() -> StatsSnapshotBuilder {
        StatsSnapshotBuilder::new()
    }

    /// Check if the node has no topics.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Look up a topic by name.
    pub fn topic(&self, name: &str) -> Option<&TopicStats> {
        self.topics.iter().find(|t| t.name == name)
    }

    /// Number of table rows this snapshot renders to: one per topic plus
    /// one per channel.
    pub fn row_count(&self) -> usize {
        self.topics.iter().map(|t| 1 + t.channels.len()).sum()
    }
}

/// One topic and its consumer channels.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopicStats {
    #[cfg_attr(feature = "serde", serde(rename = "topic_name"))]
    pub name: String,

    /// Topic-level counters.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub counts: QueueCounts,

    /// Channels in the order the daemon reported them. May be empty.
    #[cfg_attr(feature = "serde", serde(default, deserialize_with = "null_as_empty"))]
    pub channels: Vec<ChannelStats>,
}

impl TopicStats {
    /// Look up a channel by name.
    pub fn channel(&self, name: &str) -> Option<&ChannelStats> {
        self.channels.iter().find(|c| c.name == name)
    }
}

/// One consumer channel under a topic.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelStats {
    #[cfg_attr(feature = "serde", serde(rename = "channel_name"))]
    pub name: String,

    #[cfg_attr(feature = "serde", serde(flatten))]
    pub counts: QueueCounts,
}

impl ChannelStats {
    pub fn new(name: impl Into<String>, counts: QueueCounts) -> Self {
        Self {
            name: name.into(),
            counts,
        }
    }
}

// nsqd encodes an empty list as `null`.
#[cfg(feature = "serde")]
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    use serde::Deserialize;
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Builder for constructing `StatsSnapshot` instances.
#[derive(Debug, Default)]
pub struct StatsSnapshotBuilder {
    topics: Vec<TopicStats>,
}

impl StatsSnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a topic built using a closure.
    pub fn topic<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(TopicStatsBuilder) -> TopicStatsBuilder,
    {
        self.topics.push(f(TopicStatsBuilder::new(name)).build());
        self
    }

    pub fn build(self) -> StatsSnapshot {
        StatsSnapshot {
            topics: self.topics,
            ..Default::default()
        }
    }
}

/// Builder for a single topic.
#[derive(Debug)]
pub struct TopicStatsBuilder {
    name: String,
    counts: QueueCountsBuilder,
    channels: Vec<ChannelStats>,
}

impl TopicStatsBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            counts: QueueCountsBuilder::new(),
            channels: Vec::new(),
        }
    }

    pub fn depth(mut self, depth: u64) -> Self {
        self.counts = self.counts.depth(depth);
        self
    }

    pub fn in_flight(mut self, in_flight: u64) -> Self {
        self.counts = self.counts.in_flight(in_flight);
        self
    }

    pub fn deferred(mut self, deferred: u64) -> Self {
        self.counts = self.counts.deferred(deferred);
        self
    }

    pub fn timeouts(mut self, timeouts: u64) -> Self {
        self.counts = self.counts.timeouts(timeouts);
        self
    }

    /// Append a channel whose counters are built using a closure.
    pub fn channel<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: FnOnce(QueueCountsBuilder) -> QueueCountsBuilder,
    {
        let counts = f(QueueCountsBuilder::new()).build();
        self.channels.push(ChannelStats::new(name, counts));
        self
    }

    pub fn build(self) -> TopicStats {
        TopicStats {
            name: self.name,
            counts: self.counts.build(),
            channels: self.channels,
        }
    }
}
