// ── Reactive stores ──

mod flow_summaries;

pub use flow_summaries::FlowSummaryStore;
