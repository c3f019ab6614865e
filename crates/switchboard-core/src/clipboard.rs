// ── Clipboard export ──

use crate::error::CoreError;
use crate::model::{SwitchField, SwitchRow};
use crate::resolve::{discrepancy_label, display_name, resolve, resolve_display};
use crate::store::FlowSummaryStore;

/// Destination of copied cell values.
pub trait ClipboardSink {
    fn copy_text(&mut self, text: &str) -> Result<(), CoreError>;
}

/// The text a copy of (`field`, `index`) puts on the clipboard, or `None`
/// when `index` is past the end of `rows`.
pub fn export_value(
    rows: &[SwitchRow],
    summaries: &FlowSummaryStore,
    field: SwitchField,
    index: usize,
) -> Option<String> {
    let row = rows.get(index)?;
    let value = match field {
        SwitchField::Name => display_name(row).to_owned(),
        SwitchField::Discrepancy => discrepancy_label(row),
        SwitchField::SumOfBandwidth => {
            resolve_display(summaries.get(&row.switch_id).map(|s| s.sum_of_bandwidth))
        }
        SwitchField::NoOfFlows => {
            resolve_display(summaries.get(&row.switch_id).map(|s| s.no_of_flows))
        }
        other => resolve(row.text(other)).to_owned(),
    };
    Some(value)
}

#[cfg(test)]
pub(crate) mod fake {
    use super::ClipboardSink;
    use crate::error::CoreError;

    #[derive(Debug, Default)]
    pub struct FakeClipboard {
        pub copied: Vec<String>,
        pub fail: bool,
    }

    impl ClipboardSink for FakeClipboard {
        fn copy_text(&mut self, text: &str) -> Result<(), CoreError> {
            if self.fail {
                return Err(CoreError::Clipboard {
                    message: "no display".into(),
                });
            }
            self.copied.push(text.to_owned());
            Ok(())
        }
    }
}
