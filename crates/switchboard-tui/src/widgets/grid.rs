//! Paged, filterable switch grid.
//!
//! `DataGrid` receives its rows through the table's bind channel and reads
//! flow summaries straight from the shared store, so summary cells fill in
//! as fetches complete. Once bound it is handed to the view-state
//! controller, which drives it through `GridHandle`.

use std::ops::Range;
use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState};

use switchboard_core::{
    FlowSummaryStore, GridConfig, GridHandle, PageLength, RowsReceiver, SwitchField, SwitchRow,
    export_value,
};

use crate::theme;
use crate::widgets::status_indicator;

/// Below this width the responsive layout drops low-priority columns.
const NARROW_WIDTH: u16 = 120;

pub struct DataGrid {
    config: GridConfig,
    bind: RowsReceiver,
    rows: Arc<Vec<SwitchRow>>,
    summaries: Arc<FlowSummaryStore>,
    seen_summary_version: u64,
    bound: bool,
    visible: Vec<bool>,
    column_filters: Vec<String>,
    search: String,
    /// Indices into `rows` that pass the active filters, in row order.
    filtered: Vec<usize>,
    page: usize,
    page_length: PageLength,
    /// Selection within the current page.
    selected: usize,
    column_cursor: usize,
    dirty: bool,
}

impl DataGrid {
    pub fn new(bind: RowsReceiver, summaries: Arc<FlowSummaryStore>, config: GridConfig) -> Self {
        let visible = SwitchField::ALL
            .iter()
            .map(|f| !config.is_hidden_by_default(f.index()))
            .collect();
        let page_length = PageLength::Rows(config.page_size);
        Self {
            config,
            bind,
            rows: Arc::new(Vec::new()),
            summaries,
            seen_summary_version: 0,
            bound: false,
            visible,
            column_filters: vec![String::new(); SwitchField::ALL.len()],
            search: String::new(),
            filtered: Vec::new(),
            page: 0,
            page_length,
            selected: 0,
            column_cursor: 0,
            dirty: false,
        }
    }

    // ── Binding ──────────────────────────────────────────────────────

    /// Pick up a newly published row set. Returns `true` when rows changed.
    pub fn poll_bind(&mut self) -> bool {
        if !matches!(self.bind.has_changed(), Ok(true)) {
            return false;
        }
        self.rows = Arc::clone(&self.bind.borrow_and_update());
        self.bound = true;
        self.refilter();
        true
    }

    /// Whether at least one row set has arrived.
    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// Re-apply filters when flow summaries have changed.
    pub fn poll_summaries(&mut self) -> bool {
        let version = self.summaries.version();
        if version == self.seen_summary_version {
            return false;
        }
        self.seen_summary_version = version;
        self.refilter();
        true
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn total_len(&self) -> usize {
        self.rows.len()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn page_length(&self) -> PageLength {
        self.page_length
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn is_visible(&self, field: SwitchField) -> bool {
        self.visible.get(field.index()).copied().unwrap_or(false)
    }

    fn cell_text(&self, index: usize, field: SwitchField) -> String {
        export_value(&self.rows, &self.summaries, field, index).unwrap_or_default()
    }

    fn matches(&self, index: usize) -> bool {
        let search = self.search.to_lowercase();
        if !search.is_empty()
            && !SwitchField::ALL
                .iter()
                .any(|f| self.cell_text(index, *f).to_lowercase().contains(&search))
        {
            return false;
        }
        SwitchField::ALL.iter().all(|field| {
            let filter = self.column_search(field.index());
            filter.is_empty()
                || self
                    .cell_text(index, *field)
                    .to_lowercase()
                    .contains(&filter.to_lowercase())
        })
    }

    fn refilter(&mut self) {
        self.filtered = (0..self.rows.len()).filter(|i| self.matches(*i)).collect();
        let pages = self.page_count();
        if self.page >= pages {
            self.page = pages - 1;
        }
        let on_page = self.page_range().len();
        if self.selected >= on_page {
            self.selected = on_page.saturating_sub(1);
        }
    }

    fn page_size(&self) -> usize {
        match self.page_length {
            PageLength::Rows(n) => n.max(1),
            PageLength::All => self.filtered.len().max(1),
        }
    }

    pub fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size()).max(1)
    }

    /// Positions in `filtered` shown on the current page.
    fn page_range(&self) -> Range<usize> {
        let size = self.page_size();
        let start = (self.page * size).min(self.filtered.len());
        let end = (start + size).min(self.filtered.len());
        start..end
    }

    /// Index into the bound row set of the selected row.
    pub fn selected_index(&self) -> Option<usize> {
        self.filtered
            .get(self.page_range().start + self.selected)
            .copied()
    }

    pub fn cursor_field(&self) -> SwitchField {
        SwitchField::from_index(self.column_cursor).unwrap_or(SwitchField::SwitchId)
    }

    /// Columns rendered at `width`.
    pub fn visible_fields(&self, width: u16) -> Vec<SwitchField> {
        let narrow = self.config.responsive && width < NARROW_WIDTH;
        SwitchField::ALL
            .iter()
            .copied()
            .filter(|f| self.is_visible(*f))
            .filter(|f| {
                !(narrow && matches!(f, SwitchField::Description | SwitchField::PopLocation))
            })
            .collect()
    }

    /// "Showing 1 to 10 of 42 entries" footer text.
    pub fn info_text(&self) -> String {
        let range = self.page_range();
        let mut text = if range.is_empty() {
            "Showing 0 to 0 of 0 entries".to_owned()
        } else {
            format!(
                "Showing {} to {} of {} entries",
                range.start + 1,
                range.end,
                self.filtered.len()
            )
        };
        if self.filtered.len() != self.rows.len() {
            text.push_str(&format!(" (filtered from {} total entries)", self.rows.len()));
        }
        text
    }

    // ── Navigation ───────────────────────────────────────────────────

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss, clippy::as_conversions)]
    pub fn move_selection(&mut self, delta: isize) {
        if self.filtered.is_empty() {
            return;
        }
        let size = self.page_size();
        let position = (self.page * size + self.selected) as isize;
        let last = (self.filtered.len() - 1) as isize;
        let target = (position + delta).clamp(0, last) as usize;
        self.page = target / size;
        self.selected = target % size;
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.selected = 0;
        }
    }

    /// Advance to the next entry of the page-length menu.
    pub fn cycle_page_length(&mut self) {
        let menu = &self.config.page_lengths;
        let next = menu
            .iter()
            .position(|l| *l == self.page_length)
            .map_or(0, |i| (i + 1) % menu.len().max(1));
        if let Some(length) = menu.get(next) {
            self.page_length = *length;
        }
        self.page = 0;
        self.selected = 0;
    }

    /// Move the column cursor to the next/previous visible column.
    pub fn move_column(&mut self, forward: bool) {
        let visible: Vec<usize> = SwitchField::ALL
            .iter()
            .filter(|f| self.is_visible(**f))
            .map(|f| f.index())
            .collect();
        let Some(pos) = visible.iter().position(|c| *c == self.column_cursor) else {
            self.column_cursor = visible.first().copied().unwrap_or(0);
            return;
        };
        let next = if forward {
            (pos + 1).min(visible.len() - 1)
        } else {
            pos.saturating_sub(1)
        };
        if let Some(column) = visible.get(next) {
            self.column_cursor = *column;
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn cell(&self, index: usize, field: SwitchField) -> Cell<'static> {
        let text = self.cell_text(index, field);
        match field {
            SwitchField::State => {
                let state = self.rows.get(index).and_then(|r| r.state.as_deref());
                Cell::from(Line::from(vec![
                    status_indicator::state_span(state),
                    Span::raw(" "),
                    Span::raw(text),
                ]))
            }
            SwitchField::SumOfBandwidth | SwitchField::NoOfFlows => {
                Cell::from(text).style(ratatui::style::Style::default().fg(theme::CORAL))
            }
            SwitchField::Name => {
                Cell::from(text).style(ratatui::style::Style::default().fg(theme::NEON_CYAN))
            }
            _ => Cell::from(text),
        }
    }

    fn header_cell(&self, field: SwitchField, filter_row: bool, editing: Option<SwitchField>) -> Cell<'static> {
        let style = if field.index() == self.column_cursor {
            theme::table_header_cursor()
        } else {
            theme::table_header()
        };
        let mut lines = vec![Line::from(Span::styled(field.label(), style))];
        if filter_row {
            let filter = self.column_search(field.index());
            let marker = if editing == Some(field) { "▏" } else { "" };
            lines.push(Line::from(Span::styled(
                format!("{filter}{marker}"),
                theme::filter_text(),
            )));
        }
        Cell::from(Text::from(lines))
    }

    /// Render the table plus its footer. `open_inputs` adds a filter line
    /// under the header; `editing` marks the input with the caret.
    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        open_inputs: bool,
        editing: Option<SwitchField>,
    ) {
        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
        let fields = self.visible_fields(area.width);

        let header = Row::new(
            fields
                .iter()
                .map(|f| self.header_cell(*f, open_inputs, editing))
                .collect::<Vec<_>>(),
        )
        .height(if open_inputs { 2 } else { 1 });

        let rows: Vec<Row> = self
            .filtered
            .get(self.page_range())
            .unwrap_or_default()
            .iter()
            .map(|index| {
                Row::new(fields.iter().map(|f| self.cell(*index, *f)).collect::<Vec<_>>())
                    .style(theme::table_row())
            })
            .collect();

        let widths: Vec<Constraint> = fields
            .iter()
            .map(|f| {
                Constraint::Fill(
                    self.config
                        .column_widths
                        .get(f.index())
                        .copied()
                        .unwrap_or(1),
                )
            })
            .collect();

        let table = Table::new(rows, widths)
            .header(header)
            .row_highlight_style(theme::table_selected());

        let mut state = TableState::default();
        if !self.filtered.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(table, layout[0], &mut state);

        let footer = Line::from(vec![
            Span::styled(format!(" {}", self.info_text()), theme::key_hint()),
            Span::styled(
                format!(
                    "  │ page {}/{}  │ {} per page",
                    self.page + 1,
                    self.page_count(),
                    self.page_length
                ),
                theme::key_hint(),
            ),
        ]);
        frame.render_widget(Paragraph::new(footer), layout[1]);
    }

    /// Placeholder shown in the search prompt.
    pub fn search_placeholder(&self) -> &str {
        &self.config.search_placeholder
    }
}

impl GridHandle for DataGrid {
    fn set_column_visible(&mut self, column: usize, visible: bool) {
        if let Some(slot) = self.visible.get_mut(column) {
            *slot = visible;
        }
        if !visible && column == self.column_cursor {
            self.move_column(false);
        }
    }

    fn column_search(&self, column: usize) -> &str {
        self.column_filters.get(column).map_or("", String::as_str)
    }

    fn set_column_search(&mut self, column: usize, value: &str) {
        if let Some(filter) = self.column_filters.get_mut(column) {
            value.clone_into(filter);
            self.dirty = true;
        }
    }

    fn set_search(&mut self, value: &str) {
        value.clone_into(&mut self.search);
        self.dirty = true;
    }

    fn draw(&mut self) {
        if self.dirty {
            self.dirty = false;
            self.page = 0;
            self.selected = 0;
            self.refilter();
        }
    }
}
