// ── Row field resolution ──
//
// Display-safe values for table cells and clipboard export. Missing or empty
// values collapse to a single placeholder; everything else passes through.

use std::fmt::Display;

use crate::model::SwitchRow;

/// Shown in place of a missing or empty value.
pub const PLACEHOLDER: &str = "-";

/// Resolve an optional string field.
pub fn resolve(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => PLACEHOLDER,
    }
}

/// Resolve any displayable value. `0` and `false` are real values and are
/// returned as-is; only absence or an empty rendering becomes the placeholder.
pub fn resolve_display<T: Display>(value: Option<T>) -> String {
    value.map_or_else(
        || PLACEHOLDER.to_owned(),
        |v| {
            let text = v.to_string();
            if text.is_empty() {
                PLACEHOLDER.to_owned()
            } else {
                text
            }
        },
    )
}

/// Composite label for the controller/inventory membership flags.
pub fn discrepancy_label(row: &SwitchRow) -> String {
    format!(
        "controller:{}, inventory:{}",
        row.controller_switch.unwrap_or(false),
        row.inventory_switch.unwrap_or(false)
    )
}

/// The alias when set, otherwise the primary name.
pub fn display_name(row: &SwitchRow) -> &str {
    match row.common_name.as_deref() {
        Some(alias) if !alias.is_empty() => alias,
        _ => resolve(row.name.as_deref()),
    }
}
