//! The poll-aggregate-render loop.
//!
//! On every tick the scheduler walks the configured addresses in order,
//! fetching and rendering one node at a time. A pass never overlaps the
//! next one: if a pass outlasts the interval, the following tick is
//! delayed rather than doubled up.

use std::io::{self, Write};

use thiserror::Error;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error};

use nsqtop_adapters::FetchError;

use crate::config::{Config, FailurePolicy};
use crate::source::StatsSource;
use crate::ui::table;

/// Errors that stop the poll loop.
#[derive(Debug, Error)]
pub enum PollError {
    /// A node's stats could not be fetched (only under [`FailurePolicy::Abort`]).
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The terminal could not be written to.
    #[error("failed to render")]
    Render(#[from] io::Error),
}

/// Result of polling one node during a pass.
#[derive(Debug)]
pub enum NodeOutcome {
    /// The node's table was rendered with this many data rows.
    Rendered { address: String, rows: usize },
    /// The fetch failed and an error panel was rendered instead.
    Failed(FetchError),
}

impl NodeOutcome {
    pub fn address(&self) -> &str {
        match self {
            NodeOutcome::Rendered { address, .. } => address,
            NodeOutcome::Failed(err) => &err.address,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, NodeOutcome::Rendered { .. })
    }
}

/// Per-node outcomes of one pass, in address order.
#[derive(Debug, Default)]
pub struct PassReport {
    pub outcomes: Vec<NodeOutcome>,
}

impl PassReport {
    /// True when every node was fetched and rendered.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(NodeOutcome::is_success)
    }

    /// The failures of this pass.
    pub fn failures(&self) -> impl Iterator<Item = &FetchError> {
        self.outcomes.iter().filter_map(|o| match o {
            NodeOutcome::Failed(err) => Some(err),
            NodeOutcome::Rendered { .. } => None,
        })
    }
}

/// Drives fixed-interval polling of every configured node.
pub struct Scheduler<S, W> {
    config: Config,
    source: S,
    out: W,
}

impl<S, W> Scheduler<S, W>
where
    S: StatsSource,
    W: Write + Send,
{
    pub fn new(config: Config, source: S, out: W) -> Self {
        Self {
            config,
            source,
            out,
        }
    }

    /// The sink tables are written to.
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Poll until a pass fails.
    ///
    /// The first pass starts one interval after the call. Under
    /// [`FailurePolicy::Isolate`] fetch failures never end the loop; only
    /// a render failure does.
    pub async fn run(&mut self) -> Result<(), PollError> {
        let period = self.config.interval();
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.pass().await?;
        }
    }

    /// Fetch and render every node once, in order.
    pub async fn pass(&mut self) -> Result<PassReport, PollError> {
        let started = Instant::now();
        let mut report = PassReport::default();
        debug!(nodes = self.config.addresses().len(), "pass started");

        for address in self.config.addresses() {
            match self.source.fetch(address).await {
                Ok(snapshot) => {
                    table::render(&mut self.out, address, &snapshot)?;
                    report.outcomes.push(NodeOutcome::Rendered {
                        address: address.clone(),
                        rows: snapshot.row_count(),
                    });
                }
                Err(err) => match self.config.failure_policy() {
                    // Reported once, by whoever ends the process.
                    FailurePolicy::Abort => return Err(err.into()),
                    FailurePolicy::Isolate => {
                        let cause = err.kind.describe();
                        error!(%address, error = %cause, "failed to fetch stats");
                        table::render_error(&mut self.out, address, &cause)?;
                        report.outcomes.push(NodeOutcome::Failed(err));
                    }
                },
            }
        }

        debug!(elapsed = ?started.elapsed(), ok = report.is_success(), "pass finished");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use nsqtop_adapters::FetchErrorKind;
    use nsqtop_types::StatsSnapshot;

    /// A fetch as seen by the scripted source: address plus start and end
    /// instants.
    type Call = (String, Instant, Instant);

    /// Serves canned snapshots; addresses listed in `failing` return a
    /// 500 status error.
    #[derive(Clone, Default)]
    struct ScriptedSource {
        snapshots: HashMap<String, StatsSnapshot>,
        failing: Vec<String>,
        delay: Duration,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl ScriptedSource {
        fn with_node(mut self, address: &str, topic: &str) -> Self {
            let snapshot = StatsSnapshot::builder()
                .topic(topic, |t| t.depth(1).channel("c", |c| c.depth(1)))
                .build();
            self.snapshots.insert(address.to_string(), snapshot);
            self
        }

        fn with_failing(mut self, address: &str) -> Self {
            self.failing.push(address.to_string());
            self
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        fn fetched(&self) -> Vec<String> {
            let calls = self.calls.lock().unwrap();
            calls.iter().map(|(a, _, _)| a.clone()).collect()
        }
    }

    #[async_trait]
    impl StatsSource for ScriptedSource {
        async fn fetch(&self, address: &str) -> Result<StatsSnapshot, FetchError> {
            let start = Instant::now();
            if !self.delay.is_zero() {
                time::sleep(self.delay).await;
            }
            self.calls
                .lock()
                .unwrap()
                .push((address.to_string(), start, Instant::now()));

            if self.failing.iter().any(|a| a == address) {
                return Err(FetchError::new(address, FetchErrorKind::Status(500)));
            }
            Ok(self.snapshots.get(address).cloned().unwrap_or_default())
        }
    }

    fn config(addresses: &[&str], policy: FailurePolicy) -> Config {
        Config::new(
            addresses.iter().map(|a| a.to_string()).collect(),
            Duration::from_secs(1),
        )
        .unwrap()
        .with_failure_policy(policy)
    }

    fn output_of<S: StatsSource>(scheduler: &Scheduler<S, Vec<u8>>) -> String {
        String::from_utf8(scheduler.output().clone()).unwrap()
    }

    #[tokio::test]
    async fn test_pass_renders_nodes_in_order() {
        let source = ScriptedSource::default()
            .with_node("n1:4151", "alpha")
            .with_node("n2:4151", "beta");
        let mut scheduler = Scheduler::new(
            config(&["n1:4151", "n2:4151"], FailurePolicy::Abort),
            source.clone(),
            Vec::new(),
        );

        let report = scheduler.pass().await.unwrap();

        assert!(report.is_success());
        assert_eq!(source.fetched(), ["n1:4151", "n2:4151"]);
        let addresses: Vec<&str> = report.outcomes.iter().map(|o| o.address()).collect();
        assert_eq!(addresses, ["n1:4151", "n2:4151"]);

        let output = output_of(&scheduler);
        let alpha = output.find("alpha").unwrap();
        let beta = output.find("beta").unwrap();
        assert!(alpha < beta);
        assert!(matches!(
            report.outcomes[0],
            NodeOutcome::Rendered { rows: 2, .. }
        ));
    }

    #[tokio::test]
    async fn test_abort_stops_at_first_failure() {
        let source = ScriptedSource::default()
            .with_node("n1:4151", "alpha")
            .with_failing("n2:4151")
            .with_node("n3:4151", "gamma");
        let mut scheduler = Scheduler::new(
            config(&["n1:4151", "n2:4151", "n3:4151"], FailurePolicy::Abort),
            source.clone(),
            Vec::new(),
        );

        let err = scheduler.pass().await.unwrap_err();

        match err {
            PollError::Fetch(e) => assert_eq!(e.address, "n2:4151"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(source.fetched(), ["n1:4151", "n2:4151"]);

        let output = output_of(&scheduler);
        assert!(output.contains("alpha"));
        assert!(!output.contains("gamma"));
    }

    #[test]
    fn test_poll_error_chain_names_each_layer_once() {
        let json_err = serde_json::from_str::<u64>("{").unwrap_err();
        let cause = json_err.to_string();
        let err = PollError::from(FetchError::new("n1:4151", json_err.into()));

        let chain: Vec<String> = std::iter::successors(
            Some(&err as &(dyn std::error::Error + 'static)),
            |e| e.source(),
        )
        .map(ToString::to_string)
        .collect();

        assert_eq!(
            chain,
            [
                "failed to fetch stats from n1:4151".to_string(),
                "failed to decode response".to_string(),
                cause,
            ]
        );
    }

    #[test]
    fn test_render_error_does_not_repeat_io_cause() {
        let err = PollError::from(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        assert_eq!(err.to_string(), "failed to render");
        assert_eq!(
            std::error::Error::source(&err).unwrap().to_string(),
            "pipe closed"
        );
    }

    #[tokio::test]
    async fn test_isolate_continues_past_failure() {
        let source = ScriptedSource::default()
            .with_failing("n1:4151")
            .with_node("n2:4151", "beta");
        let mut scheduler = Scheduler::new(
            config(&["n1:4151", "n2:4151"], FailurePolicy::Isolate),
            source.clone(),
            Vec::new(),
        );

        let report = scheduler.pass().await.unwrap();

        assert!(!report.is_success());
        assert_eq!(report.failures().count(), 1);
        assert!(!report.outcomes[0].is_success());
        assert!(report.outcomes[1].is_success());

        let output = output_of(&scheduler);
        assert!(output.contains("error: stats endpoint returned status 500"));
        assert!(output.contains("beta"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ticks_at_interval() {
        let source = ScriptedSource::default().with_node("n1:4151", "alpha");
        let mut scheduler = Scheduler::new(
            config(&["n1:4151"], FailurePolicy::Abort),
            source.clone(),
            Vec::new(),
        );

        let start = Instant::now();
        let result = time::timeout(Duration::from_millis(3500), scheduler.run()).await;
        assert!(result.is_err(), "run should still be polling");

        let calls = source.calls.lock().unwrap();
        let offsets: Vec<Duration> = calls.iter().map(|(_, s, _)| *s - start).collect();
        assert_eq!(
            offsets,
            [
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(3)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ends_on_fetch_failure() {
        let source = ScriptedSource::default()
            .with_node("n1:4151", "alpha")
            .with_failing("n2:4151")
            .with_node("n3:4151", "gamma");
        let mut scheduler = Scheduler::new(
            config(&["n1:4151", "n2:4151", "n3:4151"], FailurePolicy::Abort),
            source.clone(),
            Vec::new(),
        );

        let result = time::timeout(Duration::from_secs(10), scheduler.run()).await;
        assert!(matches!(result, Ok(Err(PollError::Fetch(_)))));

        // One pass, cut short at the failing node; no further ticks.
        assert_eq!(source.fetched(), ["n1:4151", "n2:4151"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_passes_never_overlap() {
        let source = ScriptedSource::default()
            .with_node("n1:4151", "alpha")
            .with_node("n2:4151", "beta")
            .with_delay(Duration::from_millis(1500));
        let mut scheduler = Scheduler::new(
            config(&["n1:4151", "n2:4151"], FailurePolicy::Isolate),
            source.clone(),
            Vec::new(),
        );

        let _ = time::timeout(Duration::from_secs(12), scheduler.run()).await;

        let calls = source.calls.lock().unwrap();
        assert!(calls.len() >= 4);
        for pair in calls.windows(2) {
            let (_, _, prev_end) = &pair[0];
            let (_, next_start, _) = &pair[1];
            assert!(next_start >= prev_end, "fetches overlapped");
        }
    }
}
