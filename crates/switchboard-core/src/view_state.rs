// ── View-state controller ──
//
// Drives the grid widget through its lifecycle:
//
//   Uninitialized → Configuring → Bound → Ready
//
// Configuration is applied once. Column visibility from the persisted
// preference is applied on the `Bound → Ready` transition and nowhere
// else. Search operations before `Ready` are no-ops.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::clipboard::{ClipboardSink, export_value};
use crate::error::CoreError;
use crate::grid::{GridConfig, GridHandle};
use crate::handoff::{Navigator, Route, SWITCH_DETAILS_KEY, SWITCH_FILTER_FLAG_KEY, SessionStore};
use crate::model::{SwitchDetails, SwitchField, SwitchRow};
use crate::store::FlowSummaryStore;

/// Search flag handed to the detail view when none is set.
pub const DEFAULT_FILTER_FLAG: &str = "controller";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridPhase {
    Uninitialized,
    Configuring,
    Bound,
    Ready,
}

/// Owns the row copy, column filter toggles and the live grid handle.
pub struct ViewStateController<G> {
    phase: GridPhase,
    config: Option<GridConfig>,
    grid: Option<G>,
    rows: Arc<Vec<SwitchRow>>,
    summaries: Arc<FlowSummaryStore>,
    search_inputs: IndexMap<SwitchField, bool>,
    filter_flag: String,
}

impl<G: GridHandle> ViewStateController<G> {
    pub fn new(summaries: Arc<FlowSummaryStore>, filter_flag: impl Into<String>) -> Self {
        Self {
            phase: GridPhase::Uninitialized,
            config: None,
            grid: None,
            rows: Arc::new(Vec::new()),
            summaries,
            search_inputs: SwitchField::ALL.iter().map(|f| (*f, false)).collect(),
            filter_flag: filter_flag.into(),
        }
    }

    pub fn phase(&self) -> GridPhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase == GridPhase::Ready
    }

    pub fn config(&self) -> Option<&GridConfig> {
        self.config.as_ref()
    }

    pub fn filter_flag(&self) -> &str {
        &self.filter_flag
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Apply the widget configuration. Only the first call has effect.
    pub fn configure(&mut self, config: GridConfig) -> bool {
        if self.phase != GridPhase::Uninitialized {
            debug!(phase = ?self.phase, "grid already configured");
            return false;
        }
        self.config = Some(config);
        self.phase = GridPhase::Configuring;
        true
    }

    /// Mark the rows as pushed to the widget.
    pub fn bind(&mut self) -> bool {
        if self.phase != GridPhase::Configuring {
            return false;
        }
        self.phase = GridPhase::Bound;
        true
    }

    /// Take ownership of the ready widget, apply discrepancy visibility and
    /// open the column filters. Happens at most once.
    pub fn ready(&mut self, mut grid: G, show_discrepancy: bool) -> bool {
        if self.phase != GridPhase::Bound {
            debug!(phase = ?self.phase, "ignoring readiness signal");
            return false;
        }
        grid.set_column_visible(SwitchField::Discrepancy.index(), show_discrepancy);
        grid.draw();
        self.grid = Some(grid);
        self.phase = GridPhase::Ready;
        debug!(show_discrepancy, "grid ready");
        true
    }

    pub fn grid(&self) -> Option<&G> {
        self.grid.as_ref()
    }

    pub fn grid_mut(&mut self) -> Option<&mut G> {
        self.grid.as_mut()
    }

    // ── Rows ─────────────────────────────────────────────────────────

    /// Swap in a new row set. Never merges.
    pub fn replace_rows(&mut self, rows: Vec<SwitchRow>) {
        self.rows = Arc::new(rows);
    }

    pub fn rows(&self) -> &Arc<Vec<SwitchRow>> {
        &self.rows
    }

    // ── Search ───────────────────────────────────────────────────────

    /// Apply a column filter value if it differs from the active one.
    /// Returns whether the grid was touched.
    pub fn column_input(&mut self, field: SwitchField, value: &str) -> bool {
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        let column = field.index();
        if grid.column_search(column) == value {
            return false;
        }
        grid.set_column_search(column, value);
        grid.draw();
        true
    }

    /// Apply the full-text filter. Silently ignored before readiness.
    pub fn global_search(&mut self, value: &str) -> bool {
        let Some(grid) = self.grid.as_mut() else {
            return false;
        };
        grid.set_search(value);
        grid.draw();
        true
    }

    pub fn is_search_input_open(&self, field: SwitchField) -> bool {
        self.search_inputs.get(&field).copied().unwrap_or(false)
    }

    /// Open or close a column's filter input. Closing clears its filter.
    /// Returns the new open state.
    pub fn toggle_search_input(&mut self, field: SwitchField) -> bool {
        let open = !self.is_search_input_open(field);
        self.search_inputs.insert(field, open);
        if !open {
            self.column_input(field, "");
        }
        open
    }

    /// Columns whose filter input is open, in column order.
    pub fn open_search_inputs(&self) -> impl Iterator<Item = SwitchField> + '_ {
        self.search_inputs
            .iter()
            .filter(|(_, open)| **open)
            .map(|(field, _)| *field)
    }

    // ── Row actions ──────────────────────────────────────────────────

    /// Hand the row at `index` to the detail view and navigate there.
    /// Returns `Ok(false)` when `index` is out of range.
    pub fn open_details(
        &self,
        index: usize,
        session: &impl SessionStore,
        navigator: &impl Navigator,
    ) -> Result<bool, CoreError> {
        let Some(row) = self.rows.get(index) else {
            return Ok(false);
        };
        let payload = serde_json::to_string(&SwitchDetails::from(row))?;
        session.set_item(SWITCH_DETAILS_KEY, payload);
        session.set_item(SWITCH_FILTER_FLAG_KEY, self.filter_flag.clone());
        navigator.navigate(Route::SwitchDetails {
            switch_id: row.switch_id.clone(),
        });
        Ok(true)
    }

    /// Copy a cell to `sink`. Returns `Ok(false)` when `index` is out of
    /// range; sink failures propagate.
    pub fn copy(
        &self,
        field: SwitchField,
        index: usize,
        sink: &mut (impl ClipboardSink + ?Sized),
    ) -> Result<bool, CoreError> {
        let Some(value) = export_value(&self.rows, &self.summaries, field, index) else {
            return Ok(false);
        };
        sink.copy_text(&value)?;
        Ok(true)
    }
}
