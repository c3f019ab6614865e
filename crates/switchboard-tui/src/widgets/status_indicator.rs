//! Switch state indicator: ●/○ with color mapping.

use ratatui::style::Style;
use ratatui::text::Span;

use crate::theme;

/// Returns a styled `Span` with the status dot for a switch `state`.
pub fn state_span(state: Option<&str>) -> Span<'static> {
    let color = match state_char(state) {
        "●" => theme::SUCCESS_GREEN,
        "○" => theme::ERROR_RED,
        _ => theme::DIM_WHITE,
    };
    Span::styled(state_char(state), Style::default().fg(color))
}

/// The status dot without styling.
pub fn state_char(state: Option<&str>) -> &'static str {
    match state.map(str::to_ascii_uppercase).as_deref() {
        Some("ACTIVATED" | "ACTIVE") => "●",
        Some("DEACTIVATED" | "INACTIVE") => "○",
        _ => "?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_states() {
        assert_eq!(state_char(Some("ACTIVATED")), "●");
        assert_eq!(state_char(Some("deactivated")), "○");
        assert_eq!(state_char(Some("UNKNOWN")), "?");
        assert_eq!(state_char(None), "?");
    }
}
