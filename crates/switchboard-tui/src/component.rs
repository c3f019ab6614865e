//! Component trait: the building block for every UI element.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;

/// Every screen implements Component.
///
/// Lifecycle: `init` → (`mount` → (`handle_key_event` | `update` | `render`)* → `unmount`)*
pub trait Component: Send {
    /// Called once at startup with the action sender.
    fn init(&mut self, _action_tx: UnboundedSender<Action>) -> Result<()> {
        Ok(())
    }

    /// Called each time the component becomes the active screen.
    fn mount(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called when the component stops being the active screen.
    fn unmount(&mut self) {}

    /// Handle a keyboard event. Return an Action to dispatch, or None.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Process a dispatched action. May return a follow-up action.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Render into the provided frame area.
    fn render(&self, frame: &mut Frame, area: Rect);

    /// Whether the component is capturing raw text input, in which case
    /// global keys are not interpreted.
    fn captures_input(&self) -> bool {
        false
    }

    /// Short key hints for the status bar.
    fn key_hints(&self) -> &'static str {
        ""
    }

    /// Unique identifier for this component.
    #[allow(dead_code)]
    fn id(&self) -> &'static str;
}
