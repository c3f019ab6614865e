// ── Switch table lifecycle ──
//
// Glues the aggregator and the view-state controller to mount, external
// data changes and teardown. The bind trigger is the channel through which
// rows reach the grid widget.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::aggregate::{FlowAggregator, FlowSource};
use crate::grid::{GridConfig, GridHandle};
use crate::model::SwitchRow;
use crate::preference::{PreferenceStore, discrepancy_visible};
use crate::store::FlowSummaryStore;
use crate::view_state::{GridPhase, ViewStateController};

pub type RowsReceiver = watch::Receiver<Arc<Vec<SwitchRow>>>;

/// Pushes row sets to the grid widget until released.
pub struct BindTrigger {
    tx: Option<watch::Sender<Arc<Vec<SwitchRow>>>>,
}

impl BindTrigger {
    pub fn new() -> (Self, RowsReceiver) {
        let (tx, rx) = watch::channel(Arc::new(Vec::new()));
        (Self { tx: Some(tx) }, rx)
    }

    /// Publish `rows`. No-op once released.
    pub fn fire(&self, rows: Arc<Vec<SwitchRow>>) -> bool {
        match &self.tx {
            Some(tx) => {
                tx.send_replace(rows);
                true
            }
            None => false,
        }
    }

    /// Close the channel. Only the first call releases.
    pub fn release(&mut self) -> bool {
        self.tx.take().is_some()
    }

    pub fn is_released(&self) -> bool {
        self.tx.is_none()
    }
}

/// An external change to the table's inputs.
#[derive(Debug, Default)]
pub struct TableChanges {
    pub rows: Option<Vec<SwitchRow>>,
    pub search: Option<String>,
}

/// A mounted switch table: rows, summaries and grid state.
pub struct SwitchTable<S, G> {
    view: ViewStateController<G>,
    aggregator: FlowAggregator<S>,
    trigger: BindTrigger,
    mounted: bool,
}

impl<S: FlowSource, G: GridHandle> SwitchTable<S, G> {
    pub fn new(source: Arc<S>, filter_flag: impl Into<String>) -> (Self, RowsReceiver) {
        let store = Arc::new(FlowSummaryStore::new());
        let (trigger, rx) = BindTrigger::new();
        let table = Self {
            view: ViewStateController::new(Arc::clone(&store), filter_flag),
            aggregator: FlowAggregator::new(source, store),
            trigger,
            mounted: false,
        };
        (table, rx)
    }

    pub fn view(&self) -> &ViewStateController<G> {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewStateController<G> {
        &mut self.view
    }

    pub fn summaries(&self) -> &Arc<FlowSummaryStore> {
        self.aggregator.store()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Configure the grid, start aggregation and publish the rows.
    /// Must run inside a tokio runtime.
    pub fn mount(&mut self, rows: Vec<SwitchRow>) {
        if self.mounted {
            return;
        }
        self.view.configure(GridConfig::switch_table());
        self.view.replace_rows(rows);
        self.aggregator.refresh(self.view.rows());
        self.trigger.fire(Arc::clone(self.view.rows()));
        self.view.bind();
        self.mounted = true;
        info!(rows = self.view.rows().len(), "switch table mounted");
    }

    /// First readiness signal from the widget. Reads the visibility
    /// preference and hands the widget to the controller.
    pub fn on_grid_ready(
        &mut self,
        grid: G,
        preferences: &(impl PreferenceStore + ?Sized),
    ) -> bool {
        if !self.mounted || self.view.phase() != GridPhase::Bound {
            return false;
        }
        let show = discrepancy_visible(preferences);
        self.view.ready(grid, show)
    }

    /// React to new rows and/or a new search term.
    pub fn apply_changes(&mut self, changes: TableChanges) {
        if let Some(rows) = changes.rows {
            self.view.replace_rows(rows);
            if self.mounted {
                debug!(rows = self.view.rows().len(), "row set changed; rebinding");
                self.aggregator.refresh(self.view.rows());
                self.trigger.fire(Arc::clone(self.view.rows()));
            }
        }
        if let Some(term) = changes.search.filter(|t| !t.is_empty()) {
            if self.mounted {
                self.view.global_search(&term);
            }
        }
    }

    /// Release the bind trigger. Returns `false` if already torn down.
    pub fn teardown(&mut self) -> bool {
        self.mounted = false;
        let released = self.trigger.release();
        if released {
            info!("switch table torn down");
        }
        released
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::error::CoreError;
    use crate::grid::fake::FakeGrid;
    use crate::model::FlowRecord;
    use crate::preference::DISCREPANCY_VISIBLE_KEY;

    struct OneFlowEach;

    impl FlowSource for OneFlowEach {
        async fn switch_flows(&self, _switch_id: &str) -> Result<Vec<FlowRecord>, CoreError> {
            Ok(vec![FlowRecord {
                flow_id: None,
                maximum_bandwidth: 1000,
            }])
        }
    }

    type Table = SwitchTable<OneFlowEach, FakeGrid>;

    fn prefs(value: &str) -> HashMap<String, String> {
        HashMap::from([(DISCREPANCY_VISIBLE_KEY.to_owned(), value.to_owned())])
    }

    fn rows(ids: &[&str]) -> Vec<SwitchRow> {
        ids.iter().map(|id| SwitchRow::new(*id)).collect()
    }

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn fire_after_release_is_a_no_op() {
        let (mut trigger, rx) = BindTrigger::new();
        assert!(trigger.fire(Arc::new(rows(&["a"]))));
        assert_eq!(rx.borrow().len(), 1);

        assert!(trigger.release());
        assert!(!trigger.release());
        assert!(!trigger.fire(Arc::new(rows(&["a", "b"]))));
        assert_eq!(rx.borrow().len(), 1);
    }

    #[tokio::test]
    async fn mount_publishes_rows_and_aggregates() {
        let (mut table, rx) = Table::new(Arc::new(OneFlowEach), "controller");
        table.mount(rows(&["sw1", "sw2"]));
        settle().await;

        assert_eq!(rx.borrow().len(), 2);
        assert_eq!(table.view().phase(), GridPhase::Bound);
        assert_eq!(table.summaries().len(), 2);
        assert_eq!(
            table.summaries().get("sw1").unwrap().sum_of_bandwidth.to_string(),
            "1.000"
        );
    }

    #[tokio::test]
    async fn preference_is_read_once_per_mount() {
        let (mut table, _rx) = Table::new(Arc::new(OneFlowEach), "controller");
        table.mount(rows(&["sw1"]));

        assert!(table.on_grid_ready(FakeGrid::default(), &prefs("1")));
        assert!(!table.on_grid_ready(FakeGrid::default(), &prefs("0")));
        let grid = table.view().grid().unwrap();
        assert_eq!(grid.visibility.get(&4), Some(&true));
    }

    #[tokio::test]
    async fn readiness_before_mount_is_ignored() {
        let (mut table, _rx) = Table::new(Arc::new(OneFlowEach), "controller");
        assert!(!table.on_grid_ready(FakeGrid::default(), &prefs("1")));
        assert!(table.view().grid().is_none());
    }

    #[tokio::test]
    async fn changes_before_mount_only_replace_rows() {
        let (mut table, rx) = Table::new(Arc::new(OneFlowEach), "controller");
        table.apply_changes(TableChanges {
            rows: Some(rows(&["sw1"])),
            search: Some("ams".into()),
        });
        settle().await;

        assert_eq!(table.view().rows().len(), 1);
        assert!(rx.borrow().is_empty());
        assert!(table.summaries().is_empty());
    }

    #[tokio::test]
    async fn changes_after_mount_refresh_rebind_and_search() {
        let (mut table, rx) = Table::new(Arc::new(OneFlowEach), "controller");
        table.mount(rows(&["sw1"]));
        table.on_grid_ready(FakeGrid::default(), &prefs("0"));
        settle().await;
        let generation = table.summaries().current_generation();

        table.apply_changes(TableChanges {
            rows: Some(rows(&["sw2", "sw3"])),
            search: Some("lab".into()),
        });
        settle().await;

        assert_eq!(rx.borrow().len(), 2);
        assert_eq!(table.summaries().current_generation(), generation + 1);
        assert!(table.summaries().get("sw1").is_none());
        assert_eq!(table.summaries().len(), 2);
        assert_eq!(table.view().grid().unwrap().search.as_deref(), Some("lab"));
    }

    #[tokio::test]
    async fn empty_search_term_does_not_clear() {
        let (mut table, _rx) = Table::new(Arc::new(OneFlowEach), "controller");
        table.mount(rows(&["sw1"]));
        table.on_grid_ready(FakeGrid::default(), &prefs("0"));
        table.apply_changes(TableChanges {
            rows: None,
            search: Some("ams".into()),
        });
        table.apply_changes(TableChanges {
            rows: None,
            search: Some(String::new()),
        });
        assert_eq!(table.view().grid().unwrap().search.as_deref(), Some("ams"));
    }

    #[tokio::test]
    async fn teardown_releases_once() {
        let (mut table, rx) = Table::new(Arc::new(OneFlowEach), "controller");
        table.mount(rows(&["sw1"]));
        assert!(table.teardown());
        assert!(!table.teardown());
        assert!(!table.is_mounted());
        assert!(rx.has_changed().is_err());
    }
}
