// ── Flow metric aggregation ──
//
// One independent fetch per switch row. Results land in the shared
// `FlowSummaryStore`; failures are folded into a zero summary so every row
// in the current generation ends up with an entry.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::CoreError;
use crate::model::{FlowRecord, FlowSummary, SwitchRow};
use crate::store::FlowSummaryStore;

/// Anything that can list the flows of a switch.
pub trait FlowSource: Send + Sync + 'static {
    fn switch_flows(
        &self,
        switch_id: &str,
    ) -> impl Future<Output = Result<Vec<FlowRecord>, CoreError>> + Send;
}

/// Fans out flow fetches and writes per-switch summaries.
pub struct FlowAggregator<S> {
    source: Arc<S>,
    store: Arc<FlowSummaryStore>,
}

impl<S> Clone for FlowAggregator<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: FlowSource> FlowAggregator<S> {
    pub fn new(source: Arc<S>, store: Arc<FlowSummaryStore>) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &Arc<FlowSummaryStore> {
        &self.store
    }

    /// Replace every summary with fresh fetches for `rows`.
    ///
    /// Must be called inside a tokio runtime. Returned handles may be
    /// dropped; the tasks run detached either way.
    pub fn refresh(&self, rows: &[SwitchRow]) -> Vec<JoinHandle<()>> {
        let generation = self.store.begin_generation();
        debug!(generation, rows = rows.len(), "refreshing flow summaries");

        rows.iter()
            .map(|row| {
                let source = Arc::clone(&self.source);
                let store = Arc::clone(&self.store);
                let switch_id = row.switch_id.clone();
                tokio::spawn(async move {
                    let summary = fetch_summary(source.as_ref(), &switch_id).await;
                    store.record(generation, &switch_id, summary);
                })
            })
            .collect()
    }

    /// Fetch and summarize a single switch without touching the store.
    /// Errors propagate.
    pub async fn summarize_switch(&self, switch_id: &str) -> Result<FlowSummary, CoreError> {
        let records = self.source.switch_flows(switch_id).await?;
        Ok(FlowSummary::from_records(&records))
    }
}

async fn fetch_summary<S: FlowSource>(source: &S, switch_id: &str) -> FlowSummary {
    match source.switch_flows(switch_id).await {
        Ok(records) => FlowSummary::from_records(&records),
        Err(_) => FlowSummary::default(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use tokio::sync::Notify;

    use super::*;
    use crate::model::BandwidthSum;

    struct FakeSource {
        flows: HashMap<String, Vec<u64>>,
        gate: Option<(String, Arc<Notify>)>,
    }

    impl FakeSource {
        fn new(flows: &[(&str, &[u64])]) -> Self {
            Self {
                flows: flows
                    .iter()
                    .map(|(id, bws)| ((*id).to_owned(), bws.to_vec()))
                    .collect(),
                gate: None,
            }
        }
    }

    impl FlowSource for FakeSource {
        async fn switch_flows(&self, switch_id: &str) -> Result<Vec<FlowRecord>, CoreError> {
            if let Some((gated, notify)) = &self.gate {
                if gated == switch_id {
                    notify.notified().await;
                }
            }
            self.flows
                .get(switch_id)
                .map(|bws| {
                    bws.iter()
                        .map(|bw| FlowRecord {
                            flow_id: None,
                            maximum_bandwidth: *bw,
                        })
                        .collect()
                })
                .ok_or_else(|| CoreError::SwitchNotFound {
                    identifier: switch_id.to_owned(),
                })
        }
    }

    fn rows(ids: &[&str]) -> Vec<SwitchRow> {
        ids.iter().map(|id| SwitchRow::new(*id)).collect()
    }

    async fn join(handles: Vec<JoinHandle<()>>) {
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn every_row_gets_a_summary() {
        let source = FakeSource::new(&[("sw1", &[1000, 2000]), ("sw2", &[])]);
        let store = Arc::new(FlowSummaryStore::new());
        let aggregator = FlowAggregator::new(Arc::new(source), Arc::clone(&store));

        join(aggregator.refresh(&rows(&["sw1", "sw2", "missing"]))).await;

        let sw1 = store.get("sw1").unwrap();
        assert_eq!(sw1.sum_of_bandwidth.to_string(), "3.000");
        assert_eq!(sw1.no_of_flows, 2);
        assert_eq!(store.get("sw2"), Some(FlowSummary::default()));
        // fetch failure is a zero summary, never unset
        assert_eq!(store.get("missing"), Some(FlowSummary::default()));
    }

    #[tokio::test]
    async fn refresh_replaces_previous_scope() {
        let source = FakeSource::new(&[("sw1", &[1000]), ("sw2", &[500])]);
        let store = Arc::new(FlowSummaryStore::new());
        let aggregator = FlowAggregator::new(Arc::new(source), Arc::clone(&store));

        join(aggregator.refresh(&rows(&["sw1"]))).await;
        join(aggregator.refresh(&rows(&["sw2"]))).await;

        assert!(store.get("sw1").is_none());
        assert_eq!(
            store.get("sw2").unwrap().sum_of_bandwidth,
            BandwidthSum::Total(0.5)
        );
    }

    #[tokio::test]
    async fn stale_completion_is_not_recorded() {
        let notify = Arc::new(Notify::new());
        let mut source = FakeSource::new(&[("slow", &[9000]), ("fast", &[1000])]);
        source.gate = Some(("slow".into(), Arc::clone(&notify)));
        let store = Arc::new(FlowSummaryStore::new());
        let aggregator = FlowAggregator::new(Arc::new(source), Arc::clone(&store));

        let stale = aggregator.refresh(&rows(&["slow"]));
        tokio::task::yield_now().await;
        join(aggregator.refresh(&rows(&["fast"]))).await;

        notify.notify_one();
        join(stale).await;

        assert!(store.get("slow").is_none());
        assert_eq!(store.get("fast").unwrap().no_of_flows, 1);
    }

    #[tokio::test]
    async fn summarize_switch_propagates_errors() {
        let source = FakeSource::new(&[("sw1", &[1500, 250])]);
        let aggregator =
            FlowAggregator::new(Arc::new(source), Arc::new(FlowSummaryStore::new()));

        let summary = aggregator.summarize_switch("sw1").await.unwrap();
        assert_eq!(summary.sum_of_bandwidth.to_string(), "1.750");
        assert!(matches!(
            aggregator.summarize_switch("nope").await,
            Err(CoreError::SwitchNotFound { .. })
        ));
    }
}
