//! Switch detail screen: renders the row handed over through the session
//! store and fetches a fresh flow summary for it.

use std::sync::Arc;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use switchboard_core::{
    FlowSource, FlowSummary, SWITCH_DETAILS_KEY, SWITCH_FILTER_FLAG_KEY, SessionStore,
    SwitchDetails, resolve,
};

use crate::action::Action;
use crate::component::Component;
use crate::session::MemorySessionStore;
use crate::theme;
use crate::widgets::status_indicator;

#[derive(Debug, Clone, PartialEq)]
enum SummaryState {
    Idle,
    Loading,
    Loaded(FlowSummary),
    Failed(String),
}

pub struct SwitchDetailScreen<S> {
    source: Arc<S>,
    session: MemorySessionStore,
    action_tx: Option<UnboundedSender<Action>>,
    details: Option<SwitchDetails>,
    filter_flag: Option<String>,
    summary: SummaryState,
}

impl<S: FlowSource> SwitchDetailScreen<S> {
    pub fn new(source: Arc<S>, session: MemorySessionStore) -> Self {
        Self {
            source,
            session,
            action_tx: None,
            details: None,
            filter_flag: None,
            summary: SummaryState::Idle,
        }
    }

    fn load_handoff(&mut self) {
        self.filter_flag = self.session.get_item(SWITCH_FILTER_FLAG_KEY);
        self.details = self
            .session
            .get_item(SWITCH_DETAILS_KEY)
            .and_then(|json| match serde_json::from_str::<SwitchDetails>(&json) {
                Ok(details) => Some(details),
                Err(e) => {
                    warn!(error = %e, "malformed switch details payload");
                    None
                }
            });
    }

    fn fetch_summary(&mut self) {
        let (Some(details), Some(tx)) = (self.details.as_ref(), self.action_tx.clone()) else {
            return;
        };
        let switch_id = details.switch_id.clone();
        let source = Arc::clone(&self.source);
        self.summary = SummaryState::Loading;
        debug!(switch_id = %switch_id, "fetching flow summary");

        tokio::spawn(async move {
            let summary = source
                .switch_flows(&switch_id)
                .await
                .map(|records| FlowSummary::from_records(&records))
                .map_err(|e| e.to_string());
            let _ = tx.send(Action::SwitchSummaryLoaded { switch_id, summary });
        });
    }

    fn field_line(label: &str, value: Option<&str>) -> Line<'static> {
        Line::from(vec![
            Span::styled(format!("  {label:<14}"), theme::table_header()),
            Span::styled(resolve(value).to_owned(), theme::table_row()),
        ])
    }

    fn summary_lines(&self) -> Vec<Line<'static>> {
        match &self.summary {
            SummaryState::Idle => Vec::new(),
            SummaryState::Loading => vec![Line::from(Span::styled(
                "  Loading flows...",
                Style::default().fg(theme::NEON_CYAN),
            ))],
            SummaryState::Loaded(summary) => vec![
                Line::from(vec![
                    Span::styled(format!("  {:<14}", "Flows"), theme::table_header()),
                    Span::styled(summary.no_of_flows.to_string(), theme::table_row()),
                ]),
                Line::from(vec![
                    Span::styled(format!("  {:<14}", "Bandwidth"), theme::table_header()),
                    Span::styled(
                        format!("{} Mbps", summary.sum_of_bandwidth),
                        theme::table_row(),
                    ),
                ]),
            ],
            SummaryState::Failed(error) => vec![Line::from(Span::styled(
                format!("  Failed to load flows: {error}"),
                Style::default().fg(theme::ERROR_RED),
            ))],
        }
    }
}

impl<S: FlowSource> Component for SwitchDetailScreen<S> {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn mount(&mut self) -> Result<()> {
        self.load_handoff();
        self.fetch_summary();
        Ok(())
    }

    fn unmount(&mut self) {
        self.summary = SummaryState::Idle;
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => Ok(Some(Action::GoBack)),
            KeyCode::Char('r') => {
                self.fetch_summary();
                Ok(None)
            }
            _ => Ok(None),
        }
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::SwitchSummaryLoaded { switch_id, summary } = action {
            let current = self.details.as_ref().map(|d| d.switch_id.as_str());
            if current != Some(switch_id.as_str()) {
                return Ok(None);
            }
            self.summary = match summary {
                Ok(summary) => SummaryState::Loaded(*summary),
                Err(e) => SummaryState::Failed(e.clone()),
            };
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = self.details.as_ref().map_or_else(
            || " Switch Details ".to_owned(),
            |d| format!(" {} ", d.switch_id),
        );
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let Some(details) = &self.details else {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "  No switch selected. Press Esc to return to the switch list.",
                    theme::key_hint(),
                )),
                inner,
            );
            return;
        };

        let mut lines = vec![
            Line::from(""),
            Self::field_line("Switch ID", Some(&details.switch_id)),
            Self::field_line("Name", details.name.as_deref()),
            Self::field_line("Common Name", details.common_name.as_deref()),
            Self::field_line("Address", details.address.as_deref()),
            Self::field_line("Hostname", details.hostname.as_deref()),
            Self::field_line("Description", details.description.as_deref()),
            Line::from(vec![
                Span::styled(format!("  {:<14}", "State"), theme::table_header()),
                status_indicator::state_span(details.state.as_deref()),
            ]),
            Self::field_line("Search Flag", self.filter_flag.as_deref()),
            Line::from(""),
        ];
        lines.extend(self.summary_lines());

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn key_hints(&self) -> &'static str {
        "Esc back  r reload flows"
    }

    fn id(&self) -> &'static str {
        "SwitchDetail"
    }
}
