//! Dataset upload dialog: a file-path field plus a blocking alert overlay.
//!
//! Mirrors the single-action uploader contract: Enter submits the chosen
//! file, an empty path raises an alert instead, and success/failure both
//! surface through the same alert mechanism.

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use tui_textarea::TextArea;

use crate::action::Action;
use crate::chat::ChatSession;
use crate::components::Component;

pub const NO_FILE_ALERT: &str = "Please choose a file to upload.";
pub const UPLOAD_FAILED_ALERT: &str = "Failed to upload dataset. Please try again.";
pub const UPLOAD_OK_FALLBACK: &str = "Dataset uploaded successfully.";

pub struct UploadDialog {
    path_input: TextArea<'static>,
    /// Blocking alert; while set, only dismissal keys are accepted.
    alert: Option<String>,
    /// True while the upload request is in flight.
    busy: bool,
}

impl UploadDialog {
    pub fn new() -> Self {
        let mut path_input = TextArea::default();
        path_input.set_cursor_line_style(Style::default());
        path_input.set_placeholder_text("path to a .csv file");
        Self {
            path_input,
            alert: None,
            busy: false,
        }
    }

    pub fn path(&self) -> String {
        self.path_input.lines().join("").trim().to_string()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    fn submit(&mut self) -> Option<Action> {
        let path = self.path();
        if path.is_empty() {
            self.alert = Some(NO_FILE_ALERT.to_string());
            return None;
        }
        self.busy = true;
        Some(Action::UploadRequested(path))
    }

    fn centered(area: Rect, percent_w: u16, height: u16) -> Rect {
        let width = (area.width * percent_w) / 100;
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        Rect {
            x,
            y,
            width,
            height: height.min(area.height),
        }
    }
}

impl Default for UploadDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for UploadDialog {
    fn handle_key_event(
        &mut self,
        key: KeyEvent,
        _session: &ChatSession,
    ) -> Result<Option<Action>> {
        if self.busy {
            return Ok(None);
        }
        if self.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.alert = None;
            }
            return Ok(None);
        }
        match key.code {
            KeyCode::Enter => Ok(self.submit()),
            _ => {
                self.path_input.input(key);
                Ok(None)
            }
        }
    }

    fn update(&mut self, action: &Action, _session: &ChatSession) -> Result<Option<Action>> {
        match action {
            Action::UploadFinished(message) => {
                self.busy = false;
                let message = if message.is_empty() {
                    UPLOAD_OK_FALLBACK.to_string()
                } else {
                    message.clone()
                };
                self.alert = Some(message);
            }
            Action::UploadFailed(_) => {
                self.busy = false;
                self.alert = Some(UPLOAD_FAILED_ALERT.to_string());
            }
            _ => {}
        }
        Ok(None)
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _session: &ChatSession) -> Result<()> {
        let dialog_area = Self::centered(area, 60, 7);
        frame.render_widget(Clear, dialog_area);

        let title = if self.busy {
            "Upload dataset (uploading...)"
        } else {
            "Upload dataset"
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title);
        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        self.path_input.set_block(
            Block::default()
                .borders(Borders::ALL)
                .title("File (.csv)"),
        );
        frame.render_widget(&self.path_input, chunks[0]);
        frame.render_widget(
            Paragraph::new("enter: upload  esc: close").style(Style::default().fg(Color::DarkGray)),
            chunks[1],
        );

        // Alert overlays the dialog until dismissed.
        if let Some(alert) = &self.alert {
            let alert_area = Self::centered(area, 50, 5);
            frame.render_widget(Clear, alert_area);
            let paragraph = Paragraph::new(alert.as_str())
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow))
                        .title("Notice (enter to dismiss)"),
                );
            frame.render_widget(paragraph, alert_area);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "UploadDialog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn type_str(dialog: &mut UploadDialog, s: &str) {
        let session = ChatSession::new();
        for c in s.chars() {
            dialog
                .handle_key_event(key(KeyCode::Char(c)), &session)
                .unwrap();
        }
    }

    #[test]
    fn empty_path_raises_alert_and_no_request() {
        let session = ChatSession::new();
        let mut dialog = UploadDialog::new();
        let out = dialog.handle_key_event(key(KeyCode::Enter), &session).unwrap();
        assert_eq!(out, None);
        assert_eq!(dialog.alert(), Some(NO_FILE_ALERT));
        assert!(!dialog.is_busy());
    }

    #[test]
    fn non_empty_path_requests_upload() {
        let session = ChatSession::new();
        let mut dialog = UploadDialog::new();
        type_str(&mut dialog, "data.csv");
        let out = dialog.handle_key_event(key(KeyCode::Enter), &session).unwrap();
        assert_eq!(out, Some(Action::UploadRequested("data.csv".to_string())));
        assert!(dialog.is_busy());
    }

    #[test]
    fn alert_blocks_input_until_dismissed() {
        let session = ChatSession::new();
        let mut dialog = UploadDialog::new();
        dialog.handle_key_event(key(KeyCode::Enter), &session).unwrap();
        assert!(dialog.alert().is_some());

        // Typing is swallowed while the alert is up.
        dialog
            .handle_key_event(key(KeyCode::Char('a')), &session)
            .unwrap();
        assert_eq!(dialog.path(), "");

        dialog.handle_key_event(key(KeyCode::Enter), &session).unwrap();
        assert_eq!(dialog.alert(), None);
    }

    #[test]
    fn finished_upload_shows_backend_message_or_fallback() {
        let session = ChatSession::new();
        let mut dialog = UploadDialog::new();
        dialog
            .update(&Action::UploadFinished("Dataset 'x' uploaded.".to_string()), &session)
            .unwrap();
        assert_eq!(dialog.alert(), Some("Dataset 'x' uploaded."));

        let mut dialog = UploadDialog::new();
        dialog
            .update(&Action::UploadFinished(String::new()), &session)
            .unwrap();
        assert_eq!(dialog.alert(), Some(UPLOAD_OK_FALLBACK));
    }

    #[test]
    fn failed_upload_shows_generic_alert() {
        let session = ChatSession::new();
        let mut dialog = UploadDialog::new();
        type_str(&mut dialog, "data.csv");
        dialog.handle_key_event(key(KeyCode::Enter), &session).unwrap();
        dialog
            .update(&Action::UploadFailed("boom".to_string()), &session)
            .unwrap();
        assert!(!dialog.is_busy());
        assert_eq!(dialog.alert(), Some(UPLOAD_FAILED_ALERT));
    }
}
