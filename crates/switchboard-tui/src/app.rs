//! Application core: event loop, screen management, action dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::{Notify, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tui_input::{Input, InputRequest};

use switchboard_core::{PreferenceStore, SwitchService};

use crate::action::{Action, Notification, NotificationLevel};
use crate::clipboard::SystemClipboard;
use crate::component::Component;
use crate::data_bridge::spawn_data_bridge;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::switch_detail::SwitchDetailScreen;
use crate::screens::switches::SwitchesScreen;
use crate::session::MemorySessionStore;
use crate::theme;
use crate::tui::Tui;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Top-level application state and event loop.
pub struct App {
    active_screen: ScreenId,
    /// Screens to return to on GoBack, most recent last.
    history: Vec<ScreenId>,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    search_active: bool,
    search: Input,
    loading: bool,
    notification: Option<(Notification, Instant)>,
    service: SwitchService,
    refresh: Arc<Notify>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(
        service: SwitchService,
        preferences: Box<dyn PreferenceStore + Send>,
        filter_flag: String,
        initial_search: Option<String>,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let source = Arc::new(service.clone());
        let session = MemorySessionStore::default();

        let mut screens: HashMap<ScreenId, Box<dyn Component>> = HashMap::new();
        screens.insert(
            ScreenId::Switches,
            Box::new(SwitchesScreen::new(
                Arc::clone(&source),
                preferences,
                session.clone(),
                Box::new(SystemClipboard),
                filter_flag,
            )),
        );
        screens.insert(
            ScreenId::SwitchDetail,
            Box::new(SwitchDetailScreen::new(source, session)),
        );

        let search = match initial_search.filter(|t| !t.is_empty()) {
            Some(term) => {
                let _ = action_tx.send(Action::SearchTermChanged(term.clone()));
                Input::new(term)
            }
            None => Input::default(),
        };

        Self {
            active_screen: ScreenId::Switches,
            history: Vec::new(),
            screens,
            running: true,
            help_visible: false,
            search_active: false,
            search,
            loading: true,
            notification: None,
            service,
            refresh: Arc::new(Notify::new()),
            action_tx,
            action_rx,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.mount()?;
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::enter()?;
        self.init_screens()?;

        let cancel = CancellationToken::new();
        tokio::spawn(spawn_data_bridge(
            self.service.clone(),
            self.action_tx.clone(),
            Arc::clone(&self.refresh),
            cancel.clone(),
        ));

        let mut events = EventReader::spawn(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
            cancel.child_token(),
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        cancel.cancel();
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.unmount();
        }
        info!("TUI event loop ended");
        Ok(())
    }

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.search_active {
            return Ok(self.handle_search_key(key));
        }

        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        let capturing = self
            .screens
            .get(&self.active_screen)
            .is_some_and(|s| s.captures_input());

        if !capturing {
            match (key.modifiers, key.code) {
                (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
                (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('?')) => {
                    return Ok(Some(Action::ToggleHelp));
                }
                (KeyModifiers::NONE, KeyCode::Char('/'))
                    if self.active_screen == ScreenId::Switches =>
                {
                    return Ok(Some(Action::OpenSearch));
                }
                _ => {}
            }
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Action> {
        let request = match key.code {
            KeyCode::Esc => {
                self.search.reset();
                return Some(Action::CloseSearch);
            }
            KeyCode::Enter => return Some(Action::SearchSubmit),
            KeyCode::Backspace => InputRequest::DeletePrevChar,
            KeyCode::Delete => InputRequest::DeleteNextChar,
            KeyCode::Left => InputRequest::GoToPrevChar,
            KeyCode::Right => InputRequest::GoToNextChar,
            KeyCode::Home => InputRequest::GoToStart,
            KeyCode::End => InputRequest::GoToEnd,
            KeyCode::Char(c) => InputRequest::InsertChar(c),
            _ => return None,
        };
        self.search
            .handle(request)
            .filter(|change| change.value)
            .map(|_| Action::SearchInput(self.search.value().to_owned()))
    }

    fn switch_to(&mut self, target: ScreenId) -> Result<()> {
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.unmount();
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.mount()?;
        }
        // A remounted table starts unfiltered.
        if target == ScreenId::Switches && !self.search.value().is_empty() {
            self.action_tx
                .send(Action::SearchTermChanged(self.search.value().to_owned()))?;
        }
        Ok(())
    }

    /// Forward an action to one screen and queue any follow-up.
    fn dispatch(&mut self, id: ScreenId, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&id) {
            if let Some(follow_up) = screen.update(action)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    /// Data updates reach every screen so inactive ones stay current.
    fn broadcast(&mut self, action: &Action) -> Result<()> {
        let ids: Vec<ScreenId> = self.screens.keys().copied().collect();
        for id in ids {
            self.dispatch(id, action)?;
        }
        Ok(())
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Resize(..) | Action::Render => {}

            Action::Navigate(route) => {
                let target = ScreenId::from(route);
                if target != self.active_screen {
                    self.history.push(self.active_screen);
                    self.switch_to(target)?;
                }
            }

            Action::GoBack => {
                if let Some(prev) = self.history.pop() {
                    self.switch_to(prev)?;
                }
            }

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::OpenSearch => self.search_active = true,

            Action::SearchSubmit => self.search_active = false,

            Action::CloseSearch => {
                self.search_active = false;
                self.dispatch(ScreenId::Switches, action)?;
            }

            Action::SearchInput(_) | Action::SearchTermChanged(_) => {
                self.dispatch(ScreenId::Switches, action)?;
            }

            Action::Refresh => {
                debug!("refresh requested");
                self.refresh.notify_one();
                self.notification = Some((Notification::info("Reloading switches"), Instant::now()));
            }

            Action::Notify(n) => self.notification = Some((n.clone(), Instant::now())),

            Action::DismissNotification => self.notification = None,

            Action::Tick => {
                if self
                    .notification
                    .as_ref()
                    .is_some_and(|(_, created)| created.elapsed() > NOTIFICATION_TTL)
                {
                    self.notification = None;
                }
                self.dispatch(self.active_screen, action)?;
            }

            Action::Loading => {
                self.loading = true;
                self.broadcast(action)?;
            }

            Action::SwitchesUpdated(_) => {
                self.loading = false;
                self.broadcast(action)?;
            }

            Action::LoadFailed(e) => {
                self.loading = false;
                self.notification = Some((Notification::error(e.clone()), Instant::now()));
                self.broadcast(action)?;
            }

            Action::SwitchSummaryLoaded { .. } => self.broadcast(action)?,
        }

        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let show_search = self.search_active || !self.search.value().is_empty();
        let layout = Layout::vertical([
            Constraint::Length(u16::from(show_search) * 3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

        if show_search {
            self.render_search_bar(frame, layout[0]);
        }

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[1]);
        }

        self.render_status_bar(frame, layout[2]);

        if let Some((notif, _)) = &self.notification {
            render_notification(frame, area, notif);
        }

        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_search_bar(&self, frame: &mut Frame, area: Rect) {
        let border = if self.search_active {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(" Search ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let line = Line::from(vec![
            Span::styled(" / ", theme::key_hint_key()),
            Span::styled(self.search.value(), Style::default().fg(theme::NEON_CYAN)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);

        if self.search_active {
            let offset = u16::try_from(self.search.visual_cursor()).unwrap_or(u16::MAX);
            frame.set_cursor_position((inner.x.saturating_add(3).saturating_add(offset), inner.y));
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let indicator = if self.loading {
            Span::styled("◐ loading", Style::default().fg(theme::ELECTRIC_YELLOW))
        } else {
            Span::styled("● ready", Style::default().fg(theme::SUCCESS_GREEN))
        };

        let hints = if self.search_active {
            "type to search  Enter keep  Esc clear"
        } else {
            self.screens
                .get(&self.active_screen)
                .map_or("", |s| s.key_hints())
        };

        let line = Line::from(vec![
            Span::raw(" "),
            indicator,
            Span::styled(format!(" │ {} │ ", self.active_screen), theme::key_hint()),
            Span::styled(hints, theme::key_hint()),
            Span::styled("  / search  ? help  q quit", theme::key_hint()),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    )
}

/// Toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, notif: &Notification) {
    let msg_len = u16::try_from(notif.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len.saturating_add(6).clamp(20, 60);
    let height = 3u16;

    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 2);
    let toast_area = Rect::new(area.x + x, area.y + y, width.min(area.width), height);

    let (border_color, icon) = match notif.level {
        NotificationLevel::Success => (theme::SUCCESS_GREEN, "✓"),
        NotificationLevel::Error => (theme::ERROR_RED, "✗"),
        NotificationLevel::Warning => (theme::ELECTRIC_YELLOW, "!"),
        NotificationLevel::Info => (theme::NEON_CYAN, "·"),
    };

    frame.render_widget(Clear, toast_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(toast_area);
    frame.render_widget(block, toast_area);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
        Span::styled(notif.message.as_str(), Style::default().fg(theme::DIM_WHITE)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let help_area = centered(area, 60, 22);
    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let entry = |key: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {key:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };
    let heading = |title: &'static str| {
        Line::from(Span::styled(
            format!("  {title}"),
            Style::default().fg(theme::NEON_CYAN),
        ))
    };

    let help_text = vec![
        Line::from(""),
        heading("Switch table"),
        entry("j/k ↑/↓", "Move selection"),
        entry("h/l ←/→", "Move column cursor"),
        entry("[ / ]", "Previous / next page"),
        entry("p", "Cycle page length"),
        entry("f", "Toggle column filter"),
        entry("y", "Copy cell"),
        entry("Enter", "Open switch details"),
        entry("r", "Reload"),
        Line::from(""),
        heading("Global"),
        entry("/", "Search all columns"),
        entry("Esc", "Back / close"),
        entry("?", "This help"),
        entry("q", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "                         Esc or ? to close",
            theme::key_hint(),
        )),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}
