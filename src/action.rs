use serde::{Deserialize, Serialize};
use strum::Display;

use crate::api::QueryResponse;

/// High-level actions that can be triggered by UI events or completed
/// network tasks.
#[derive(Debug, Clone, PartialEq, Display, Serialize, Deserialize)]
pub enum Action {
    Tick,
    Render,
    Resize(u16, u16),
    Suspend,
    Resume,
    Quit,
    ClearScreen,
    Error(String),
    Help,
    /// Move keyboard focus to the next pane
    FocusNext,
    /// Submit the current prompt contents as a query
    SubmitQuery,
    /// The dataset list fetch completed
    DatasetsLoaded(Vec<String>),
    /// Re-fetch the dataset list (e.g. after an upload)
    RefreshDatasets,
    /// Move the dataset cursor up
    SelectPrevDataset,
    /// Move the dataset cursor down
    SelectNextDataset,
    /// Confirm the dataset under the cursor
    ConfirmDatasetSelection,
    /// User confirmed a dataset selection
    DatasetSelected(String),
    /// A column-summary fetch completed for the named dataset
    SummaryLoaded { dataset: String, summary: String },
    /// The pending query settled successfully
    QueryCompleted(Box<QueryResponse>),
    /// The pending query settled with an error
    QueryFailed(String),
    /// Open the dataset upload dialog
    OpenUploadDialog,
    /// Close the dataset upload dialog
    CloseUploadDialog,
    /// Upload the file at the given path
    UploadRequested(String),
    /// An upload finished; carries the backend's message
    UploadFinished(String),
    /// An upload failed
    UploadFailed(String),
    /// Scroll the transcript up
    ScrollUp,
    /// Scroll the transcript down
    ScrollDown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_display_is_nonempty() {
        let a = Action::DatasetSelected("csgo".to_string());
        assert!(!format!("{a}").is_empty());
    }

    #[test]
    fn unit_variants_roundtrip_through_json5() {
        // Keybinding values in the config file are bare variant names.
        let a: Action = json5::from_str("\"SubmitQuery\"").unwrap();
        assert_eq!(a, Action::SubmitQuery);
    }
}
