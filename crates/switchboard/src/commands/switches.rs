//! Switch command handlers.

use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use switchboard_core::{
    FlowAggregator, FlowSummary, FlowSummaryStore, SwitchField, SwitchRow, SwitchService,
    export_value,
};

use crate::cli::{GlobalOpts, SwitchesArgs, SwitchesCommand};
use crate::error::CliError;
use crate::output;

// ── Output shapes ───────────────────────────────────────────────────

/// A switch with its flow summary, as emitted by structured formats.
#[derive(Debug, Serialize)]
struct EnrichedSwitch {
    #[serde(skip)]
    index: usize,
    #[serde(flatten)]
    row: SwitchRow,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    summary: Option<FlowSummary>,
}

#[derive(Tabled)]
struct SwitchTableRow {
    #[tabled(rename = "Switch ID")]
    switch_id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Hostname")]
    hostname: String,
    #[tabled(rename = "PoP")]
    pop: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Bandwidth (Mbps)")]
    bandwidth: String,
    #[tabled(rename = "Flows")]
    flows: String,
}

/// Rows plus the summaries fetched for them, rendered with the same rules
/// the TUI grid and clipboard use.
struct Listing {
    rows: Vec<SwitchRow>,
    summaries: Arc<FlowSummaryStore>,
}

impl Listing {
    fn cell(&self, field: SwitchField, index: usize) -> String {
        export_value(&self.rows, &self.summaries, field, index).unwrap_or_default()
    }

    fn matches(&self, index: usize, term: &str) -> bool {
        let term = term.to_lowercase();
        SwitchField::ALL
            .iter()
            .any(|field| self.cell(*field, index).to_lowercase().contains(&term))
    }

    fn table_row(&self, index: usize) -> SwitchTableRow {
        SwitchTableRow {
            switch_id: self.cell(SwitchField::SwitchId, index),
            name: self.cell(SwitchField::Name, index),
            address: self.cell(SwitchField::Address, index),
            hostname: self.cell(SwitchField::Hostname, index),
            pop: self.cell(SwitchField::PopLocation, index),
            state: self.cell(SwitchField::State, index),
            bandwidth: self.cell(SwitchField::SumOfBandwidth, index),
            flows: self.cell(SwitchField::NoOfFlows, index),
        }
    }
}

fn detail_text(switch_id: &str, summary: &FlowSummary) -> String {
    format!(
        "Switch:     {switch_id}\nFlows:      {}\nBandwidth:  {} Mbps",
        summary.no_of_flows, summary.sum_of_bandwidth
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    service: SwitchService,
    args: SwitchesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SwitchesCommand::List { search, no_flows } => {
            let rows = service.switches().await?;
            let summaries = Arc::new(FlowSummaryStore::new());

            if !no_flows {
                let aggregator = FlowAggregator::new(Arc::new(service), Arc::clone(&summaries));
                for handle in aggregator.refresh(&rows) {
                    // A panicked fetch leaves that switch without a summary.
                    let _ = handle.await;
                }
                debug!(summaries = summaries.len(), "flow summaries collected");
            }

            let listing = Listing { rows, summaries };
            let indices: Vec<usize> = (0..listing.rows.len())
                .filter(|i| {
                    search
                        .as_deref()
                        .is_none_or(|term| term.is_empty() || listing.matches(*i, term))
                })
                .collect();

            let data: Vec<EnrichedSwitch> = indices
                .into_iter()
                .filter_map(|index| {
                    let row = listing.rows.get(index)?.clone();
                    let summary = listing.summaries.get(&row.switch_id);
                    Some(EnrichedSwitch {
                        index,
                        row,
                        summary,
                    })
                })
                .collect();

            let out = output::render_list(
                global.output,
                &data,
                |s| listing.table_row(s.index),
                |s| s.row.switch_id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SwitchesCommand::Flows { switch_id } => {
            let row = service.switch(&switch_id).await?;
            let aggregator =
                FlowAggregator::new(Arc::new(service), Arc::new(FlowSummaryStore::new()));
            let summary = aggregator.summarize_switch(&row.switch_id).await?;

            let out = output::render_single(
                global.output,
                &summary,
                |s| detail_text(&row.switch_id, s),
                |s| s.no_of_flows.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
