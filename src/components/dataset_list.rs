//! Dataset sidebar. Keeps only the cursor; the registry itself lives in the
//! session.

use color_eyre::Result;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use crate::action::Action;
use crate::chat::ChatSession;
use crate::components::{Component, Focusable};

pub struct DatasetList {
    cursor: usize,
    focused: bool,
}

impl DatasetList {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            focused: false,
        }
    }

    fn clamp_cursor(&mut self, len: usize) {
        if len == 0 {
            self.cursor = 0;
        } else if self.cursor >= len {
            self.cursor = len - 1;
        }
    }
}

impl Default for DatasetList {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for DatasetList {
    fn update(&mut self, action: &Action, session: &ChatSession) -> Result<Option<Action>> {
        let len = session.datasets().len();
        match action {
            Action::DatasetsLoaded(_) => {
                self.cursor = 0;
            }
            Action::SelectPrevDataset => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            Action::SelectNextDataset => {
                self.cursor += 1;
                self.clamp_cursor(len);
            }
            Action::ConfirmDatasetSelection => {
                if let Some(name) = session.datasets().get(self.cursor) {
                    return Ok(Some(Action::DatasetSelected(name.clone())));
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, session: &ChatSession) -> Result<()> {
        self.clamp_cursor(session.datasets().len());
        let items: Vec<ListItem> = session
            .datasets()
            .iter()
            .map(|name| {
                let marker = if session.selected_dataset() == Some(name.as_str()) {
                    "● "
                } else {
                    "  "
                };
                ListItem::new(format!("{marker}{name}"))
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Datasets")
            .border_style(if self.focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            });

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(Color::Cyan)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );

        let mut state = ListState::default();
        if !session.datasets().is_empty() {
            state.select(Some(self.cursor));
        }
        frame.render_stateful_widget(list, area, &mut state);
        Ok(())
    }

    fn name(&self) -> &str {
        "DatasetList"
    }
}

impl Focusable for DatasetList {
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
    use pretty_assertions::assert_eq;

    fn session() -> ChatSession {
        let mut s = ChatSession::new();
        s.datasets_loaded(vec!["csgo".to_string(), "twitch".to_string()]);
        s
    }

    #[test]
    fn cursor_moves_within_bounds() {
        let s = session();
        let mut list = DatasetList::new();
        list.update(&Action::SelectNextDataset, &s).unwrap();
        assert_eq!(list.cursor, 1);
        list.update(&Action::SelectNextDataset, &s).unwrap();
        assert_eq!(list.cursor, 1);
        list.update(&Action::SelectPrevDataset, &s).unwrap();
        list.update(&Action::SelectPrevDataset, &s).unwrap();
        assert_eq!(list.cursor, 0);
    }

    #[test]
    fn confirm_emits_selection_under_cursor() {
        let s = session();
        let mut list = DatasetList::new();
        list.update(&Action::SelectNextDataset, &s).unwrap();
        let out = list.update(&Action::ConfirmDatasetSelection, &s).unwrap();
        assert_eq!(out, Some(Action::DatasetSelected("twitch".to_string())));
    }

    #[test]
    fn confirm_with_empty_registry_is_noop() {
        let s = ChatSession::new();
        let mut list = DatasetList::new();
        let out = list.update(&Action::ConfirmDatasetSelection, &s).unwrap();
        assert_eq!(out, None);
    }
}
