//! Queue counters shared by topics and channels.

/// The four counters nsqd reports for a topic or a channel.
///
/// nsqd only reports `depth` at topic level on most versions; missing
/// counters decode as zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueCounts {
    /// Messages queued and not yet delivered.
    #[cfg_attr(feature = "serde", serde(default))]
    pub depth: u64,

    /// Messages delivered to a consumer but not yet acknowledged.
    #[cfg_attr(feature = "serde", serde(default, rename = "in_flight_count"))]
    pub in_flight: u64,

    /// Messages scheduled for delayed delivery.
    #[cfg_attr(feature = "serde", serde(default, rename = "deferred_count"))]
    pub deferred: u64,

    /// Messages whose acknowledgment window expired.
    ///
    /// Never decreases over the lifetime of the daemon.
    #[cfg_attr(feature = "serde", serde(default, rename = "timeout_count"))]
    pub timeouts: u64,
}

impl QueueCounts {
    /// Create counters from explicit values.
    pub fn new(depth: u64, in_flight: u64, deferred: u64, timeouts: u64) -> Self {
        Self {
            depth,
            in_flight,
            deferred,
            timeouts,
        }
    }

    /// The counters in display order: depth, in-flight, deferred, timeouts.
    pub fn as_array(&self) -> [u64; 4] {
        [self.depth, self.in_flight, self.deferred, self.timeouts]
    }
}

/// Builder shared by topic and channel builders for the counter fields.
#[derive(Debug, Default)]
pub struct QueueCountsBuilder {
    counts: QueueCounts,
}

impl QueueCountsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(mut self, depth: u64) -> Self {
        self.counts.depth = depth;
        self
    }

    pub fn in_flight(mut self, in_flight: u64) -> Self {
        self.counts.in_flight = in_flight;
        self
    }

    pub fn deferred(mut self, deferred: u64) -> Self {
        self.counts.deferred = deferred;
        self
    }

    pub fn timeouts(mut self, timeouts: u64) -> Self {
        self.counts.timeouts = timeouts;
        self
    }

    pub fn build(self) -> QueueCounts {
        self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_display_order() {
        let counts = QueueCounts::new(42, 3, 0, 1);
        assert_eq!(counts.as_array(), [42, 3, 0, 1]);
    }

    #[test]
    fn test_builder() {
        let counts = QueueCountsBuilder::new().depth(5).deferred(2).build();
        assert_eq!(counts, QueueCounts::new(5, 0, 2, 0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_missing_counters_default_to_zero() {
        let counts: QueueCounts = serde_json::from_str(r#"{"depth": 7}"#).unwrap();
        assert_eq!(counts, QueueCounts::new(7, 0, 0, 0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_negative_counter_is_rejected() {
        let result: Result<QueueCounts, _> = serde_json::from_str(r#"{"depth": -1}"#);
        assert!(result.is_err());
    }
}
