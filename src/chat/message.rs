/// Who produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    User,
    Chat,
}

/// One transcript entry. Immutable once created; the transcript itself is
/// append-only for the session lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub origin: Origin,
    pub content: String,
    pub timestamp: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            origin: Origin::User,
            content: content.into(),
            timestamp: now_hh_mm(),
        }
    }

    pub fn chat(content: impl Into<String>) -> Self {
        Self {
            origin: Origin::Chat,
            content: content.into(),
            timestamp: now_hh_mm(),
        }
    }

    /// Duplicate check used by the summary-fetch safeguard: both fields must
    /// match. Not content-addressed; identical text a minute apart differs.
    pub fn is_duplicate_of(&self, other: &ChatMessage) -> bool {
        self.content == other.content && self.timestamp == other.timestamp
    }
}

fn now_hh_mm() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}
