//! Scrollable transcript view.

use color_eyre::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::action::Action;
use crate::chat::{ChatSession, Origin};
use crate::components::{Component, Focusable};

pub struct ChatLog {
    /// Lines scrolled up from the tail; 0 follows the newest message.
    scroll_from_bottom: usize,
    focused: bool,
}

impl ChatLog {
    pub fn new() -> Self {
        Self {
            scroll_from_bottom: 0,
            focused: false,
        }
    }

    fn build_lines(session: &ChatSession, width: usize) -> Vec<Line<'static>> {
        let wrap_width = width.max(16);
        let mut lines = Vec::new();
        for msg in session.transcript() {
            let (label, style) = match msg.origin {
                Origin::User => ("You", Style::default().fg(Color::Yellow)),
                Origin::Chat => ("Chat", Style::default().fg(Color::Cyan)),
            };
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{label} [{}]", msg.timestamp),
                    style.add_modifier(Modifier::BOLD),
                ),
            ]));
            for piece in msg.content.split('\n') {
                if piece.is_empty() {
                    lines.push(Line::raw(""));
                    continue;
                }
                for wrapped in textwrap::wrap(piece, wrap_width) {
                    lines.push(Line::raw(format!("  {wrapped}")));
                }
            }
            lines.push(Line::raw(""));
        }
        lines
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ChatLog {
    fn update(&mut self, action: &Action, session: &ChatSession) -> Result<Option<Action>> {
        match action {
            Action::ScrollUp => {
                // Bounded when drawing; transcript length is a safe cap here.
                let cap = session.transcript().len().saturating_mul(4);
                self.scroll_from_bottom = (self.scroll_from_bottom + 3).min(cap);
            }
            Action::ScrollDown => {
                self.scroll_from_bottom = self.scroll_from_bottom.saturating_sub(3);
            }
            // New output snaps the view back to the tail.
            Action::QueryCompleted(_) | Action::QueryFailed(_) | Action::SummaryLoaded { .. } => {
                self.scroll_from_bottom = 0;
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, session: &ChatSession) -> Result<()> {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Transcript")
            .border_style(if self.focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            });
        let inner = block.inner(area);

        let lines = Self::build_lines(session, inner.width.saturating_sub(2) as usize);
        let total = lines.len();
        let height = inner.height as usize;
        let max_from_bottom = total.saturating_sub(height);
        self.scroll_from_bottom = self.scroll_from_bottom.min(max_from_bottom);
        let scroll = max_from_bottom.saturating_sub(self.scroll_from_bottom);

        let paragraph = Paragraph::new(lines)
            .block(block)
            .scroll((scroll as u16, 0));
        frame.render_widget(paragraph, area);
        Ok(())
    }

    fn name(&self) -> &str {
        "ChatLog"
    }
}

impl Focusable for ChatLog {
    fn is_focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}
