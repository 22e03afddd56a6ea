//! Top-level controller: owns the session state and components, routes
//! terminal events and actions, and spawns the network tasks.

use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Direction, Layout};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use crate::action::Action;
use crate::api::ApiClient;
use crate::chat::ChatSession;
use crate::components::{
    chart_panel, ChartPanel, ChatLog, Component, DatasetList, Focusable, Prompt, UploadDialog,
};
use crate::config::{Config, Mode};
use crate::tui::{Event, Tui};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Prompt,
    DatasetList,
}

pub struct App {
    config: Config,
    api: ApiClient,
    session: ChatSession,

    chat_log: ChatLog,
    dataset_list: DatasetList,
    prompt: Prompt,
    chart_panel: ChartPanel,
    upload_dialog: Option<UploadDialog>,

    focus: Focus,
    /// Cancels the in-flight column-summary fetch when the user switches
    /// datasets before it settles.
    summary_cancel: Option<CancellationToken>,

    should_quit: bool,
    should_suspend: bool,
    action_tx: UnboundedSender<Action>,
    action_rx: UnboundedReceiver<Action>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::new(config.config.base_url.clone())?;
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let mut prompt = Prompt::new();
        prompt.set_focused(true);
        Ok(Self {
            config,
            api,
            session: ChatSession::new(),
            chat_log: ChatLog::new(),
            dataset_list: DatasetList::new(),
            prompt,
            chart_panel: ChartPanel::new(),
            upload_dialog: None,
            focus: Focus::Prompt,
            summary_cancel: None,
            should_quit: false,
            should_suspend: false,
            action_tx,
            action_rx,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?.tick_rate(4.0).frame_rate(30.0);
        tui.enter()?;

        // On mount: fetch the dataset list.
        self.spawn_dataset_fetch();

        loop {
            if let Some(event) = tui.next().await {
                self.handle_event(event)?;
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.handle_action(action, &mut tui)?;
            }

            if self.should_suspend {
                self.should_suspend = false;
                tui.suspend()?;
                self.action_tx.send(Action::Resume)?;
                tui = Tui::new()?.tick_rate(4.0).frame_rate(30.0);
                tui.enter()?;
            } else if self.should_quit {
                tui.cancel();
                break;
            }
        }
        tui.exit()?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        let action = match event {
            Event::Quit => Some(Action::Quit),
            Event::Tick => Some(Action::Tick),
            Event::Render => Some(Action::Render),
            Event::Resize(x, y) => Some(Action::Resize(x, y)),
            Event::Key(key) => {
                self.handle_key_event(key)?;
                None
            }
            Event::Paste(text) => {
                self.handle_paste(&text);
                None
            }
            _ => None,
        };
        if let Some(action) = action {
            self.action_tx.send(action)?;
        }
        Ok(())
    }

    fn handle_paste(&mut self, text: &str) {
        if self.upload_dialog.is_none()
            && self.focus == Focus::Prompt
            && !self.session.awaiting_response()
        {
            let mut key_events = Vec::new();
            for c in text.chars() {
                key_events.push(KeyEvent::new(
                    crossterm::event::KeyCode::Char(c),
                    crossterm::event::KeyModifiers::empty(),
                ));
            }
            for key in key_events {
                let _ = self.prompt.handle_key_event(key, &self.session);
            }
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Global bindings win everywhere.
        if let Some(action) = self.config.action_for_key(Mode::Global, key) {
            debug!("global action: {action}");
            self.action_tx.send(action)?;
            return Ok(());
        }

        // Modal upload dialog consumes everything else while open.
        if let Some(dialog) = &mut self.upload_dialog {
            if let Some(action) = self.config.action_for_key(Mode::Upload, key) {
                self.action_tx.send(action)?;
                return Ok(());
            }
            if let Some(action) = dialog.handle_key_event(key, &self.session)? {
                self.action_tx.send(action)?;
            }
            return Ok(());
        }

        let mode = match self.focus {
            Focus::Prompt => Mode::Prompt,
            Focus::DatasetList => Mode::DatasetList,
        };
        if let Some(action) = self.config.action_for_key(mode, key) {
            self.action_tx.send(action)?;
            return Ok(());
        }

        // Unbound keys go to the focused component.
        let maybe_action = match self.focus {
            Focus::Prompt => self.prompt.handle_key_event(key, &self.session)?,
            Focus::DatasetList => self.dataset_list.handle_key_event(key, &self.session)?,
        };
        if let Some(action) = maybe_action {
            self.action_tx.send(action)?;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: Action, tui: &mut Tui) -> Result<()> {
        if action != Action::Tick && action != Action::Render {
            debug!("{action:?}");
        }
        match &action {
            Action::Tick => {}
            Action::Quit => self.should_quit = true,
            Action::Suspend => self.should_suspend = true,
            Action::Resume => {}
            Action::ClearScreen => tui.terminal.clear()?,
            // The draw call autoresizes the fullscreen viewport.
            Action::Resize(_, _) => self.draw(tui)?,
            Action::Render => self.draw(tui)?,
            Action::Error(msg) => error!("{msg}"),
            Action::FocusNext => self.cycle_focus(),
            Action::SubmitQuery => self.submit_query(),
            Action::DatasetsLoaded(datasets) => {
                if let Some(first) = self.session.datasets_loaded(datasets.clone()) {
                    self.spawn_summary_fetch(first);
                }
            }
            Action::RefreshDatasets => self.spawn_dataset_fetch(),
            Action::DatasetSelected(name) => {
                if self.session.switch_dataset(name) {
                    self.spawn_summary_fetch(name.clone());
                }
            }
            Action::SummaryLoaded { dataset, summary } => {
                self.session.summary_loaded(dataset, summary);
            }
            Action::QueryCompleted(response) => {
                self.session.complete_query(*response.clone());
            }
            Action::QueryFailed(err) => {
                error!("query failed: {err}");
                self.session.fail_query();
            }
            Action::OpenUploadDialog => {
                if self.upload_dialog.is_none() {
                    self.upload_dialog = Some(UploadDialog::new());
                }
            }
            Action::CloseUploadDialog => {
                // Dropping the dialog does not cancel an in-flight upload;
                // a completed upload still refreshes the dataset list.
                self.upload_dialog = None;
            }
            Action::UploadRequested(path) => self.spawn_upload(path.clone()),
            Action::UploadFinished(_) => {
                self.action_tx.send(Action::RefreshDatasets)?;
            }
            Action::UploadFailed(err) => error!("upload failed: {err}"),
            _ => {}
        }

        // Fan the action out to components for presentation-state updates.
        self.dispatch_to_components(&action)?;
        Ok(())
    }

    fn dispatch_to_components(&mut self, action: &Action) -> Result<()> {
        let mut follow_ups = Vec::new();
        if let Some(a) = self.chat_log.update(action, &self.session)? {
            follow_ups.push(a);
        }
        if let Some(a) = self.dataset_list.update(action, &self.session)? {
            follow_ups.push(a);
        }
        if let Some(a) = self.prompt.update(action, &self.session)? {
            follow_ups.push(a);
        }
        if let Some(a) = self.chart_panel.update(action, &self.session)? {
            follow_ups.push(a);
        }
        if let Some(dialog) = &mut self.upload_dialog {
            if let Some(a) = dialog.update(action, &self.session)? {
                follow_ups.push(a);
            }
        }
        for a in follow_ups {
            self.action_tx.send(a)?;
        }
        Ok(())
    }

    fn cycle_focus(&mut self) {
        if self.upload_dialog.is_some() {
            return;
        }
        self.focus = match self.focus {
            Focus::Prompt => Focus::DatasetList,
            Focus::DatasetList => Focus::Prompt,
        };
        self.prompt.set_focused(self.focus == Focus::Prompt);
        self.dataset_list.set_focused(self.focus == Focus::DatasetList);
    }

    fn submit_query(&mut self) {
        let text = self.prompt.input();
        let Some(dataset) = self.session.begin_query(&text) else {
            // Empty input, no dataset, or a query already pending.
            return;
        };
        self.prompt.take_input();
        self.spawn_query(dataset, text.trim().to_string());
    }

    fn spawn_dataset_fetch(&self) {
        let api = self.api.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match api.list_datasets().await {
                Ok(datasets) => {
                    let _ = tx.send(Action::DatasetsLoaded(datasets));
                }
                // Logged only; the registry stays empty.
                Err(e) => error!("failed to fetch dataset list: {e}"),
            }
        });
    }

    fn spawn_summary_fetch(&mut self, dataset: String) {
        if let Some(token) = self.summary_cancel.take() {
            token.cancel();
        }
        let token = CancellationToken::new();
        self.summary_cancel = Some(token.clone());

        let api = self.api.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("summary fetch for {dataset:?} cancelled by dataset switch");
                }
                result = api.preview(&dataset) => match result {
                    Ok(summary) => {
                        let _ = tx.send(Action::SummaryLoaded { dataset, summary });
                    }
                    // Logged only; no transcript message.
                    Err(e) => error!("failed to fetch column summary for {dataset:?}: {e}"),
                }
            }
        });
    }

    fn spawn_query(&self, dataset: String, user_query: String) {
        let api = self.api.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match api.query(&dataset, &user_query).await {
                Ok(response) => {
                    let _ = tx.send(Action::QueryCompleted(Box::new(response)));
                }
                Err(e) => {
                    let _ = tx.send(Action::QueryFailed(e.to_string()));
                }
            }
        });
    }

    fn spawn_upload(&self, path: String) {
        let api = self.api.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match api.upload_dataset(std::path::Path::new(&path)).await {
                Ok(message) => {
                    let _ = tx.send(Action::UploadFinished(message.unwrap_or_default()));
                }
                Err(e) => {
                    let _ = tx.send(Action::UploadFailed(e.to_string()));
                }
            }
        });
    }

    fn draw(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| {
            let area = frame.area();
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Min(0),
                    Constraint::Length(3),
                    Constraint::Length(1),
                ])
                .split(area);

            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(26), Constraint::Min(0)])
                .split(rows[0]);

            if let Err(e) = self.dataset_list.draw(frame, columns[0], &self.session) {
                error!("failed to draw DatasetList: {e}");
            }

            if chart_panel::has_chart(&self.session) {
                let chat_rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                    .split(columns[1]);
                if let Err(e) = self.chat_log.draw(frame, chat_rows[0], &self.session) {
                    error!("failed to draw ChatLog: {e}");
                }
                if let Err(e) = self.chart_panel.draw(frame, chat_rows[1], &self.session) {
                    error!("failed to draw ChartPanel: {e}");
                }
            } else if let Err(e) = self.chat_log.draw(frame, columns[1], &self.session) {
                error!("failed to draw ChatLog: {e}");
            }

            if let Err(e) = self.prompt.draw(frame, rows[1], &self.session) {
                error!("failed to draw Prompt: {e}");
            }

            let hints = self.config.actions_to_instructions(&[
                (Mode::Global, Action::FocusNext, "switch pane"),
                (Mode::Global, Action::OpenUploadDialog, "upload"),
                (Mode::Global, Action::RefreshDatasets, "refresh"),
                (Mode::Global, Action::Quit, "quit"),
            ]);
            frame.render_widget(
                ratatui::widgets::Paragraph::new(hints)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::DarkGray)),
                rows[2],
            );

            if let Some(dialog) = &mut self.upload_dialog {
                if let Err(e) = dialog.draw(frame, area, &self.session) {
                    error!("failed to draw UploadDialog: {e}");
                }
            }
        })?;
        Ok(())
    }
}
