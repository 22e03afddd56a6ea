pub mod chart_panel;
pub mod chat_log;
pub mod dataset_list;
pub mod prompt;
pub mod upload_dialog;

pub use chart_panel::{ChartPanel, ChartSpec};
pub use chat_log::ChatLog;
pub use dataset_list::DatasetList;
pub use prompt::Prompt;
pub use upload_dialog::UploadDialog;

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};
use tokio::sync::mpsc::UnboundedSender;

use crate::action::Action;
use crate::chat::ChatSession;
use crate::config::Config;
use crate::tui::Event;

/// Base trait for all TUI panes.
///
/// Session state is owned by the top-level controller and passed down
/// read-only; components keep only presentation state (cursors, scroll
/// offsets) and communicate through `Action`s.
pub trait Component {
    /// Receive the action channel for emitting actions outside the
    /// event-handling path. Optional.
    fn register_action_handler(&mut self, tx: UnboundedSender<Action>) -> Result<()> {
        let _ = tx;
        Ok(())
    }

    /// Receive the application config (keybindings, base url). Optional.
    fn register_config_handler(&mut self, config: Config) -> Result<()> {
        let _ = config;
        Ok(())
    }

    /// Handle a raw terminal event, possibly emitting a follow-up action.
    fn handle_events(
        &mut self,
        event: Option<Event>,
        session: &ChatSession,
    ) -> Result<Option<Action>> {
        match event {
            Some(Event::Key(key_event)) => self.handle_key_event(key_event, session),
            _ => Ok(None),
        }
    }

    /// Handle a key event. Only called while this component has focus.
    fn handle_key_event(
        &mut self,
        key: KeyEvent,
        session: &ChatSession,
    ) -> Result<Option<Action>> {
        let _ = (key, session);
        Ok(None)
    }

    /// React to a dispatched action, possibly emitting a follow-up.
    fn update(&mut self, action: &Action, session: &ChatSession) -> Result<Option<Action>> {
        let _ = (action, session);
        Ok(None)
    }

    /// Render into the given area.
    fn draw(&mut self, frame: &mut Frame, area: Rect, session: &ChatSession) -> Result<()>;

    /// Component name for logging.
    fn name(&self) -> &str;
}

/// Components that can receive keyboard focus.
pub trait Focusable: Component {
    fn is_focused(&self) -> bool;

    fn set_focused(&mut self, focused: bool);
}
