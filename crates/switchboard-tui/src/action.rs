//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use switchboard_core::{FlowSummary, Route, SwitchRow};

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

/// Every state change in the TUI flows through one of these.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ───────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ──────────────────────────────────────────────────
    Navigate(Route),
    GoBack,

    // ── Global search overlay ───────────────────────────────────────
    OpenSearch,
    CloseSearch,
    SearchInput(String),
    SearchSubmit,
    /// Search term pushed from outside the overlay: the startup flag or a
    /// re-send after the switch table is remounted.
    SearchTermChanged(String),

    // ── Data ────────────────────────────────────────────────────────
    /// Ask the data bridge to refetch the switch inventory.
    Refresh,
    Loading,
    SwitchesUpdated(Arc<Vec<SwitchRow>>),
    LoadFailed(String),
    SwitchSummaryLoaded {
        switch_id: String,
        summary: Result<FlowSummary, String>,
    },

    // ── Notifications ───────────────────────────────────────────────
    Notify(Notification),
    DismissNotification,
    ToggleHelp,
}
