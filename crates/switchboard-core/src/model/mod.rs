// ── Domain model ──
//
// Canonical switch and flow types consumed by the table, the CLI and the
// detail hand-off.

pub mod flow;
pub mod switch;

pub use flow::{BandwidthSum, FlowRecord, FlowSummary};
pub use switch::{SwitchDetails, SwitchField, SwitchRow};
