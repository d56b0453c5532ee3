//! Stats source abstraction.
//!
//! The scheduler asks a [`StatsSource`] for one node's snapshot at a time.
//! [`NsqdClient`] is the production source; tests substitute scripted
//! ones.

use async_trait::async_trait;

use nsqtop_adapters::nsqd::NsqdClient;
use nsqtop_adapters::FetchError;
use nsqtop_types::StatsSnapshot;

/// Trait for fetching statistics from a node.
///
/// Implementations must perform a fresh retrieval on every call and must
/// not retry; retry policy belongs to the caller.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetch the current snapshot of the node at `address`.
    async fn fetch(&self, address: &str) -> Result<StatsSnapshot, FetchError>;
}

#[async_trait]
impl StatsSource for NsqdClient {
    async fn fetch(&self, address: &str) -> Result<StatsSnapshot, FetchError> {
        NsqdClient::fetch(self, address).await
    }
}
