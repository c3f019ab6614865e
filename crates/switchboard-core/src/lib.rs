// switchboard-core: Switch table enrichment and view state
//
// Sits between `switchboard-api` and the frontends. Rows come in from the
// switch inventory; the aggregator fans out one flow fetch per row into a
// shared summary store; the view-state controller drives the grid widget
// through trait seams so the TUI and tests can plug in their own.

pub mod aggregate;
pub mod clipboard;
pub mod config;
pub mod convert;
pub mod error;
pub mod grid;
pub mod handoff;
pub mod lifecycle;
pub mod model;
pub mod preference;
pub mod resolve;
pub mod service;
pub mod store;
pub mod view_state;

// ── Primary re-exports ──────────────────────────────────────────────
pub use aggregate::{FlowAggregator, FlowSource};
pub use clipboard::{ClipboardSink, export_value};
pub use config::{ClientConfig, Credentials, TlsVerification};
pub use error::CoreError;
pub use grid::{GridConfig, GridHandle, PageLength};
pub use handoff::{Navigator, Route, SWITCH_DETAILS_KEY, SWITCH_FILTER_FLAG_KEY, SessionStore};
pub use lifecycle::{BindTrigger, RowsReceiver, SwitchTable, TableChanges};
pub use preference::{DISCREPANCY_VISIBLE_KEY, PreferenceStore, discrepancy_visible};
pub use resolve::{PLACEHOLDER, discrepancy_label, display_name, resolve, resolve_display};
pub use service::SwitchService;
pub use store::FlowSummaryStore;
pub use view_state::{DEFAULT_FILTER_FLAG, GridPhase, ViewStateController};

// ── Model re-exports ────────────────────────────────────────────────
pub use model::{BandwidthSum, FlowRecord, FlowSummary, SwitchDetails, SwitchField, SwitchRow};
