// ── Flow summary side-table ──
//
// Per-switch flow summaries keyed by switch id. Each row-set replacement
// opens a new generation; completions carry the generation they were
// started under and are dropped once it has been superseded. Entries keep
// their generation tag, so one that lands after a concurrent
// `begin_generation` is never read back.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::watch;

use crate::model::FlowSummary;

/// Reactive side-table of flow summaries.
pub struct FlowSummaryStore {
    entries: DashMap<String, (u64, FlowSummary)>,
    generation: AtomicU64,
    version: watch::Sender<u64>,
}

impl FlowSummaryStore {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0);
        Self {
            entries: DashMap::new(),
            generation: AtomicU64::new(0),
            version,
        }
    }

    /// Drop every entry and start a new generation. Returns the new
    /// generation tag.
    pub fn begin_generation(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.entries.clear();
        self.bump();
        generation
    }

    /// Record a summary produced under `generation`. Returns `false` and
    /// leaves the store untouched when that generation is stale.
    pub fn record(&self, generation: u64, switch_id: &str, summary: FlowSummary) -> bool {
        if generation != self.current_generation() {
            tracing::debug!(switch_id, generation, "dropping stale flow summary");
            return false;
        }
        self.entries
            .insert(switch_id.to_owned(), (generation, summary));
        self.bump();
        true
    }

    pub fn get(&self, switch_id: &str) -> Option<FlowSummary> {
        let current = self.current_generation();
        self.entries
            .get(switch_id)
            .and_then(|entry| (entry.0 == current).then_some(entry.1))
    }

    pub fn len(&self) -> usize {
        let current = self.current_generation();
        self.entries.iter().filter(|entry| entry.0 == current).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Subscribe to change notifications. The value is a monotonically
    /// increasing version counter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version.subscribe()
    }

    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }

    fn bump(&self) {
        self.version.send_modify(|v| *v += 1);
    }
}

impl Default for FlowSummaryStore {
    fn default() -> Self {
        Self::new()
    }
}
