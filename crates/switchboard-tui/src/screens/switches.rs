//! Switches screen: the enriched switch table.
//!
//! Owns a `SwitchTable` for as long as the screen is mounted. The grid is
//! created on mount, fed through the bind channel, and handed over to the
//! view-state controller on the first tick after rows have arrived.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};
use tui_input::{Input, InputRequest};

use switchboard_core::{
    ClipboardSink, FlowSource, GridConfig, GridHandle, Navigator, PreferenceStore, Route,
    RowsReceiver, SwitchField, SwitchTable, TableChanges,
};

use crate::action::{Action, Notification};
use crate::component::Component;
use crate::session::MemorySessionStore;
use crate::theme;
use crate::widgets::grid::DataGrid;

/// Routes navigation requests through the action channel.
pub struct ActionNavigator {
    tx: UnboundedSender<Action>,
}

impl ActionNavigator {
    pub fn new(tx: UnboundedSender<Action>) -> Self {
        Self { tx }
    }
}

impl Navigator for ActionNavigator {
    fn navigate(&self, route: Route) {
        debug!(path = %route.path(), "navigating");
        let _ = self.tx.send(Action::Navigate(route));
    }
}

pub struct SwitchesScreen<S> {
    source: Arc<S>,
    preferences: Box<dyn PreferenceStore + Send>,
    session: MemorySessionStore,
    clipboard: Box<dyn ClipboardSink + Send>,
    filter_flag: String,
    action_tx: Option<UnboundedSender<Action>>,
    table: SwitchTable<S, DataGrid>,
    bind_rx: Option<RowsReceiver>,
    /// Grid waiting for its first row set.
    pending: Option<DataGrid>,
    /// Column filter currently being edited.
    editing: Option<(SwitchField, Input)>,
    /// Search term received before the grid was ready.
    pending_search: Option<String>,
    loading: bool,
    load_error: Option<String>,
    throbber_state: throbber_widgets_tui::ThrobberState,
}

impl<S: FlowSource> SwitchesScreen<S> {
    pub fn new(
        source: Arc<S>,
        preferences: Box<dyn PreferenceStore + Send>,
        session: MemorySessionStore,
        clipboard: Box<dyn ClipboardSink + Send>,
        filter_flag: impl Into<String>,
    ) -> Self {
        let filter_flag = filter_flag.into();
        let (table, bind_rx) = SwitchTable::new(Arc::clone(&source), filter_flag.clone());
        Self {
            source,
            preferences,
            session,
            clipboard,
            filter_flag,
            action_tx: None,
            table,
            bind_rx: Some(bind_rx),
            pending: None,
            editing: None,
            pending_search: None,
            loading: true,
            load_error: None,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    fn is_ready(&self) -> bool {
        self.table.view().is_ready()
    }

    fn grid(&self) -> Option<&DataGrid> {
        self.table.view().grid()
    }

    fn grid_mut(&mut self) -> Option<&mut DataGrid> {
        self.table.view_mut().grid_mut()
    }

    fn with_grid(&mut self, f: impl FnOnce(&mut DataGrid)) {
        if let Some(grid) = self.grid_mut() {
            f(grid);
        }
    }

    /// Replace the torn-down table with a fresh, unmounted one that keeps
    /// the current rows.
    fn reset_table(&mut self) {
        let rows = self.table.view().rows().to_vec();
        let (mut table, bind_rx) =
            SwitchTable::new(Arc::clone(&self.source), self.filter_flag.clone());
        table.apply_changes(TableChanges {
            rows: Some(rows),
            search: None,
        });
        self.table = table;
        self.bind_rx = Some(bind_rx);
    }

    /// Hand the pending grid to the controller once it has rows and the
    /// first load has finished.
    fn try_ready(&mut self) {
        let Some(grid) = self.pending.as_mut() else {
            return;
        };
        grid.poll_bind();
        if !grid.is_bound() || self.loading {
            return;
        }
        let Some(grid) = self.pending.take() else {
            return;
        };
        if self.table.on_grid_ready(grid, self.preferences.as_ref()) {
            if let Some(term) = self.pending_search.take() {
                self.table.apply_changes(TableChanges {
                    rows: None,
                    search: Some(term),
                });
            }
        }
    }

    fn open_details(&mut self) -> Option<Action> {
        let index = self.grid()?.selected_index()?;
        let tx = self.action_tx.clone()?;
        match self
            .table
            .view()
            .open_details(index, &self.session, &ActionNavigator::new(tx))
        {
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "failed to open switch details");
                Some(Action::Notify(Notification::error(e.to_string())))
            }
        }
    }

    fn copy_cell(&mut self) -> Option<Action> {
        let grid = self.grid()?;
        let (field, index) = (grid.cursor_field(), grid.selected_index()?);
        match self.table.view().copy(field, index, self.clipboard.as_mut()) {
            Ok(true) => Some(Action::Notify(Notification::success(format!(
                "Copied {}",
                field.label()
            )))),
            Ok(false) => None,
            Err(e) => {
                warn!(error = %e, field = %field, "copy failed");
                Some(Action::Notify(Notification::warning(e.to_string())))
            }
        }
    }

    fn toggle_filter_input(&mut self) {
        let Some(field) = self.grid().map(DataGrid::cursor_field) else {
            return;
        };
        let open = self.table.view_mut().toggle_search_input(field);
        self.editing = if open {
            let current = self
                .grid()
                .map(|g| g.column_search(field.index()).to_owned())
                .unwrap_or_default();
            Some((field, Input::new(current)))
        } else {
            None
        };
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        let Some((field, input)) = self.editing.as_mut() else {
            return;
        };
        let request = match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.editing = None;
                return;
            }
            KeyCode::Backspace => InputRequest::DeletePrevChar,
            KeyCode::Delete => InputRequest::DeleteNextChar,
            KeyCode::Left => InputRequest::GoToPrevChar,
            KeyCode::Right => InputRequest::GoToNextChar,
            KeyCode::Home => InputRequest::GoToStart,
            KeyCode::End => InputRequest::GoToEnd,
            KeyCode::Char(c) => InputRequest::InsertChar(c),
            _ => return,
        };
        if input.handle(request).is_some_and(|change| change.value) {
            let (field, value) = (*field, input.value().to_owned());
            self.table.view_mut().column_input(field, &value);
        }
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let layout = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

        if let Some(error) = &self.load_error {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("  Failed to load switches: {error}  (r to retry)"),
                    Style::default().fg(theme::ERROR_RED),
                )),
                layout[1],
            );
            return;
        }

        let throbber = throbber_widgets_tui::Throbber::default()
            .label("  Loading switches...")
            .style(Style::default().fg(theme::NEON_CYAN))
            .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        frame.render_stateful_widget(throbber, layout[1], &mut self.throbber_state.clone());
    }
}

impl<S: FlowSource> Component for SwitchesScreen<S> {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn mount(&mut self) -> Result<()> {
        if self.table.is_mounted() {
            return Ok(());
        }
        let Some(bind_rx) = self.bind_rx.take() else {
            return Ok(());
        };
        let rows = self.table.view().rows().to_vec();
        self.table.mount(rows);
        let config = self
            .table
            .view()
            .config()
            .cloned()
            .unwrap_or_else(GridConfig::switch_table);
        self.pending = Some(DataGrid::new(
            bind_rx,
            Arc::clone(self.table.summaries()),
            config,
        ));
        Ok(())
    }

    fn unmount(&mut self) {
        self.table.teardown();
        self.pending = None;
        self.editing = None;
        self.reset_table();
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if self.editing.is_some() {
            self.handle_filter_key(key);
            return Ok(None);
        }
        if key.code == KeyCode::Char('r') {
            return Ok(Some(Action::Refresh));
        }
        if !self.is_ready() {
            return Ok(None);
        }

        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.with_grid(|g| g.move_selection(1));
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.with_grid(|g| g.move_selection(-1));
                None
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.with_grid(|g| g.move_column(true));
                None
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.with_grid(|g| g.move_column(false));
                None
            }
            KeyCode::Char(']') | KeyCode::PageDown => {
                self.with_grid(DataGrid::next_page);
                None
            }
            KeyCode::Char('[') | KeyCode::PageUp => {
                self.with_grid(DataGrid::prev_page);
                None
            }
            KeyCode::Char('p') => {
                self.with_grid(DataGrid::cycle_page_length);
                None
            }
            KeyCode::Char('f') => {
                self.toggle_filter_input();
                None
            }
            KeyCode::Char('y') => self.copy_cell(),
            KeyCode::Enter => self.open_details(),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Loading => {
                self.load_error = None;
            }
            Action::SwitchesUpdated(rows) => {
                self.loading = false;
                self.load_error = None;
                self.table.apply_changes(TableChanges {
                    rows: Some(rows.as_ref().clone()),
                    search: None,
                });
            }
            Action::LoadFailed(error) => {
                self.load_error = Some(error.clone());
            }
            Action::Tick => {
                self.throbber_state.calc_next();
                if self.is_ready() {
                    if let Some(grid) = self.grid_mut() {
                        grid.poll_bind();
                        grid.poll_summaries();
                    }
                } else {
                    self.try_ready();
                }
            }
            Action::SearchInput(term) => {
                if self.is_ready() {
                    self.table.view_mut().global_search(term);
                } else {
                    self.pending_search = Some(term.clone()).filter(|t| !t.is_empty());
                }
            }
            Action::SearchTermChanged(term) => {
                if self.is_ready() {
                    self.table.apply_changes(TableChanges {
                        rows: None,
                        search: Some(term.clone()),
                    });
                } else if !term.is_empty() {
                    self.pending_search = Some(term.clone());
                }
            }
            Action::CloseSearch => {
                self.pending_search = None;
                self.table.view_mut().global_search("");
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = match self.grid() {
            Some(grid) if !grid.search().is_empty() => format!(
                " Switches ({}/{}) [\"{}\"] ",
                grid.filtered_len(),
                grid.total_len(),
                grid.search()
            ),
            Some(grid) => format!(" Switches ({}) ", grid.total_len()),
            None => " Switches ".to_owned(),
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        match self.grid() {
            Some(grid) => {
                let open_inputs = self.table.view().open_search_inputs().next().is_some();
                let editing = self.editing.as_ref().map(|(field, _)| *field);
                grid.render(frame, inner, open_inputs, editing);
            }
            None => self.render_loading(frame, inner),
        }
    }

    fn captures_input(&self) -> bool {
        self.editing.is_some()
    }

    fn key_hints(&self) -> &'static str {
        if self.editing.is_some() {
            "type to filter  Enter/Esc done"
        } else {
            "j/k row  h/l column  [/] page  p length  f filter  y copy  Enter details  r refresh"
        }
    }

    fn id(&self) -> &'static str {
        "Switches"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use switchboard_core::{CoreError, DISCREPANCY_VISIBLE_KEY, FlowRecord, SwitchRow};
    use tokio::sync::mpsc;

    use super::*;

    struct NoFlows;

    impl FlowSource for NoFlows {
        async fn switch_flows(&self, _switch_id: &str) -> Result<Vec<FlowRecord>, CoreError> {
            Ok(Vec::new())
        }
    }

    /// Preferences the test can change between mounts.
    #[derive(Clone, Default)]
    struct SharedPreferences(Arc<Mutex<HashMap<String, String>>>);

    impl SharedPreferences {
        fn set(&self, key: &str, value: &str) {
            self.0.lock().unwrap().insert(key.into(), value.into());
        }
    }

    impl PreferenceStore for SharedPreferences {
        fn get_item(&self, key: &str) -> Option<String> {
            self.0.lock().unwrap().get(key).cloned()
        }
    }

    struct NullClipboard;

    impl ClipboardSink for NullClipboard {
        fn copy_text(&mut self, _text: &str) -> Result<(), CoreError> {
            Ok(())
        }
    }

    fn rows() -> Arc<Vec<SwitchRow>> {
        Arc::new(vec![
            SwitchRow {
                name: Some("edge-east".into()),
                ..SwitchRow::new("sw1")
            },
            SwitchRow {
                name: Some("core-west".into()),
                ..SwitchRow::new("sw2")
            },
        ])
    }

    fn mounted_screen(preferences: &SharedPreferences) -> SwitchesScreen<NoFlows> {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut screen = SwitchesScreen::new(
            Arc::new(NoFlows),
            Box::new(preferences.clone()),
            MemorySessionStore::default(),
            Box::new(NullClipboard),
            "controller",
        );
        screen.init(tx).unwrap();
        screen.mount().unwrap();
        screen
    }

    fn send(screen: &mut SwitchesScreen<NoFlows>, action: Action) {
        screen.update(&action).unwrap();
    }

    fn ready_screen(preferences: &SharedPreferences) -> SwitchesScreen<NoFlows> {
        let mut screen = mounted_screen(preferences);
        send(&mut screen, Action::SwitchesUpdated(rows()));
        send(&mut screen, Action::Tick);
        assert!(screen.is_ready());
        screen
    }

    fn search(screen: &SwitchesScreen<NoFlows>) -> (&str, usize) {
        let grid = screen.grid().unwrap();
        (grid.search(), grid.filtered_len())
    }

    #[tokio::test]
    async fn grid_waits_for_first_load() {
        let mut screen = mounted_screen(&SharedPreferences::default());

        send(&mut screen, Action::Tick);
        send(&mut screen, Action::Tick);
        assert!(!screen.is_ready());
        assert!(screen.grid().is_none());

        send(&mut screen, Action::SwitchesUpdated(rows()));
        send(&mut screen, Action::Tick);
        assert!(screen.is_ready());
        assert_eq!(screen.grid().unwrap().total_len(), 2);
    }

    #[tokio::test]
    async fn deleting_typed_search_clears_filter() {
        let mut screen = ready_screen(&SharedPreferences::default());

        send(&mut screen, Action::SearchInput("edge".into()));
        assert_eq!(search(&screen), ("edge", 1));

        send(&mut screen, Action::SearchInput(String::new()));
        assert_eq!(search(&screen), ("", 2));
    }

    #[tokio::test]
    async fn external_empty_term_keeps_filter() {
        let mut screen = ready_screen(&SharedPreferences::default());

        send(&mut screen, Action::SearchTermChanged("core".into()));
        assert_eq!(search(&screen), ("core", 1));

        send(&mut screen, Action::SearchTermChanged(String::new()));
        assert_eq!(search(&screen), ("core", 1));

        send(&mut screen, Action::CloseSearch);
        assert_eq!(search(&screen), ("", 2));
    }

    #[tokio::test]
    async fn search_before_ready_applies_once() {
        let mut screen = mounted_screen(&SharedPreferences::default());
        send(&mut screen, Action::SearchTermChanged("core".into()));
        send(&mut screen, Action::SwitchesUpdated(rows()));
        send(&mut screen, Action::Tick);

        assert_eq!(search(&screen), ("core", 1));
        assert!(screen.pending_search.is_none());
    }

    #[tokio::test]
    async fn search_cleared_before_ready_is_dropped() {
        let mut screen = mounted_screen(&SharedPreferences::default());
        send(&mut screen, Action::SearchInput("edge".into()));
        send(&mut screen, Action::SearchInput(String::new()));
        assert!(screen.pending_search.is_none());

        send(&mut screen, Action::SwitchesUpdated(rows()));
        send(&mut screen, Action::Tick);
        assert_eq!(search(&screen), ("", 2));
    }

    #[tokio::test]
    async fn remount_rebinds_and_rereads_visibility() {
        let preferences = SharedPreferences::default();
        preferences.set(DISCREPANCY_VISIBLE_KEY, "0");
        let mut screen = ready_screen(&preferences);
        assert!(!screen.grid().unwrap().is_visible(SwitchField::Discrepancy));

        preferences.set(DISCREPANCY_VISIBLE_KEY, "1");
        send(&mut screen, Action::Tick);
        assert!(!screen.grid().unwrap().is_visible(SwitchField::Discrepancy));

        screen.unmount();
        assert!(screen.grid().is_none());
        assert!(!screen.table.is_mounted());

        screen.mount().unwrap();
        send(&mut screen, Action::Tick);
        assert!(screen.is_ready());
        let grid = screen.grid().unwrap();
        assert_eq!(grid.total_len(), 2);
        assert!(grid.is_visible(SwitchField::Discrepancy));
    }
}
