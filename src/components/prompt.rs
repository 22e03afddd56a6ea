//! Single-line query input. Sealed while a query is pending so only one
//! request is ever in flight from the user's perspective.

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders},
    Frame,
};
use tui_textarea::TextArea;

use crate::chat::ChatSession;
use crate::components::{Component, Focusable};

pub struct Prompt {
    textarea: TextArea<'static>,
    focused: bool,
}

impl Prompt {
    pub fn new() -> Self {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default());
        Self {
            textarea,
            focused: true,
        }
    }

    pub fn input(&self) -> String {
        self.textarea.lines().join(" ")
    }

    /// Clear the field and return what it held.
    pub fn take_input(&mut self) -> String {
        let text = self.input();
        self.textarea = TextArea::default();
        self.textarea.set_cursor_line_style(Style::default());
        text
    }
}

impl Default for Prompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Prompt {
    fn handle_key_event(
        &mut self,
        key: KeyEvent,
        session: &ChatSession,
    ) -> Result<Option<crate::action::Action>> {
        // The send control is hidden while awaiting a response; typing is
        // ignored entirely rather than queued.
        if session.awaiting_response() {
            return Ok(None);
        }
        self.textarea.input(key);
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, session: &ChatSession) -> Result<()> {
        let (title, border) = if session.awaiting_response() {
            (
                "Waiting for response...".to_string(),
                Style::default().fg(Color::DarkGray),
            )
        } else {
            let dataset = session.selected_dataset().unwrap_or("no dataset");
            (
                format!("Ask about '{dataset}' (Enter to send)"),
                if self.focused {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::DarkGray)
                },
            )
        };
        self.textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title),
        );
        frame.render_widget(&self.textarea, area);
        Ok(())
    }

    fn name(&self) -> &str {
        "Prompt"
    }
}

impl Focusable for Prompt {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use pretty_assertions::assert_eq;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty())
    }

    #[test]
    fn typing_fills_the_field() {
        let session = ChatSession::new();
        let mut prompt = Prompt::new();
        for c in "hi".chars() {
            prompt.handle_key_event(key(c), &session).unwrap();
        }
        assert_eq!(prompt.input(), "hi");
    }

    #[test]
    fn take_input_clears_the_field() {
        let session = ChatSession::new();
        let mut prompt = Prompt::new();
        prompt.handle_key_event(key('x'), &session).unwrap();
        assert_eq!(prompt.take_input(), "x");
        assert_eq!(prompt.input(), "");
    }

    #[test]
    fn input_is_sealed_while_pending() {
        let mut session = ChatSession::new();
        session.datasets_loaded(vec!["csgo".to_string()]);
        session.begin_query("q").unwrap();

        let mut prompt = Prompt::new();
        prompt.handle_key_event(key('a'), &session).unwrap();
        assert_eq!(prompt.input(), "");
    }
}
