// ── Grid widget seam ──
//
// The table widget is configured once with a `GridConfig` and, once it
// reports readiness, driven through a `GridHandle`.

use crate::model::SwitchField;

/// Entries of the page-length menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLength {
    Rows(usize),
    All,
}

impl std::fmt::Display for PageLength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rows(n) => write!(f, "{n}"),
            Self::All => f.write_str("All"),
        }
    }
}

/// Fixed widget configuration applied at initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    pub page_size: usize,
    pub page_lengths: Vec<PageLength>,
    /// Percent of the table width per column, in column order.
    pub column_widths: Vec<u16>,
    pub hidden_columns: Vec<usize>,
    /// Collapse low-priority columns on narrow terminals.
    pub responsive: bool,
    pub search_placeholder: String,
}

impl GridConfig {
    /// Configuration of the switch table.
    pub fn switch_table() -> Self {
        Self {
            page_size: 10,
            page_lengths: vec![
                PageLength::Rows(10),
                PageLength::Rows(20),
                PageLength::Rows(35),
                PageLength::Rows(50),
                PageLength::All,
            ],
            column_widths: vec![10, 12, 10, 10, 10, 8, 20, 8, 6, 6],
            hidden_columns: vec![
                SwitchField::Discrepancy.index(),
                SwitchField::State.index(),
            ],
            responsive: true,
            search_placeholder: "Search".into(),
        }
    }

    pub fn is_hidden_by_default(&self, column: usize) -> bool {
        self.hidden_columns.contains(&column)
    }
}

/// Live handle to a ready grid widget.
pub trait GridHandle {
    fn set_column_visible(&mut self, column: usize, visible: bool);

    /// The column's active filter text, empty when unfiltered.
    fn column_search(&self, column: usize) -> &str;

    fn set_column_search(&mut self, column: usize, value: &str);

    /// Set the full-text filter across all columns.
    fn set_search(&mut self, value: &str);

    fn draw(&mut self);
}
