//! Session state for the chat/dataset controller.
//!
//! All mutable state lives here and is only changed through the named
//! transition functions below; components get read-only references when
//! drawing. The transcript is append-only and dies with the process.

use tracing::debug;

use crate::api::QueryResponse;
use crate::chat::message::ChatMessage;

/// Fixed message appended when a query fails, regardless of cause.
pub const APOLOGY: &str =
    "Sorry, something went wrong while answering that. Please try again.";

#[derive(Debug, Default)]
pub struct ChatSession {
    transcript: Vec<ChatMessage>,
    datasets: Vec<String>,
    selected: Option<String>,
    awaiting_response: bool,
    last_response: Option<QueryResponse>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn datasets(&self) -> &[String] {
        &self.datasets
    }

    pub fn selected_dataset(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// True while a query is in flight. The prompt is sealed while set.
    pub fn awaiting_response(&self) -> bool {
        self.awaiting_response
    }

    pub fn last_response(&self) -> Option<&QueryResponse> {
        self.last_response.as_ref()
    }

    /// The dataset list fetch completed. Selects the first entry and returns
    /// it so the caller can kick off the column-summary fetch.
    pub fn datasets_loaded(&mut self, datasets: Vec<String>) -> Option<String> {
        self.datasets = datasets;
        self.selected = self.datasets.first().cloned();
        self.selected.clone()
    }

    /// Switch the selected dataset. Appends exactly one announcement message
    /// and returns true when the caller should fetch the new summary. A
    /// no-op for unknown names or re-selecting the current dataset.
    pub fn switch_dataset(&mut self, name: &str) -> bool {
        if self.selected.as_deref() == Some(name) {
            return false;
        }
        if !self.datasets.iter().any(|d| d == name) {
            debug!("ignoring switch to unknown dataset {name:?}");
            return false;
        }
        self.selected = Some(name.to_string());
        self.transcript
            .push(ChatMessage::chat(format!("Switched to dataset: {name}")));
        true
    }

    /// A column summary arrived. Dropped if it raced another fetch that
    /// already appended the identical message (content + timestamp), or if
    /// the user has since switched away from that dataset.
    pub fn summary_loaded(&mut self, dataset: &str, summary: &str) {
        if self.selected.as_deref() != Some(dataset) {
            debug!("dropping stale summary for {dataset:?}");
            return;
        }
        self.push_unique(ChatMessage::chat(summary));
    }

    /// Begin a query. Guarded by non-empty input, a selected dataset, and no
    /// query already pending; violating a guard is a silent no-op. On entry
    /// the user message is appended optimistically and the pending flag set.
    /// Returns the dataset to query against.
    pub fn begin_query(&mut self, input: &str) -> Option<String> {
        let input = input.trim();
        if input.is_empty() || self.awaiting_response {
            return None;
        }
        let dataset = self.selected.clone()?;
        self.transcript.push(ChatMessage::user(input));
        self.awaiting_response = true;
        Some(dataset)
    }

    /// The pending query settled successfully.
    pub fn complete_query(&mut self, response: QueryResponse) {
        self.transcript
            .push(ChatMessage::chat(response.humanized_response.clone()));
        self.last_response = Some(response);
        self.awaiting_response = false;
    }

    /// The pending query settled with an error. One fixed apology message;
    /// the last structured response is left untouched.
    pub fn fail_query(&mut self) {
        self.transcript.push(ChatMessage::chat(APOLOGY));
        self.awaiting_response = false;
    }

    fn push_unique(&mut self, msg: ChatMessage) {
        if self.transcript.iter().any(|m| m.is_duplicate_of(&msg)) {
            debug!("suppressing duplicate transcript entry");
            return;
        }
        self.transcript.push(msg);
    }
}
