#![allow(clippy::collapsible_if)]
#![allow(clippy::collapsible_else_if)]

pub mod action;
pub mod api;
pub mod app;
pub mod chat;
pub mod components;
pub mod config;
pub mod errors;
pub mod logging;
pub mod tui;

// Re-export commonly used types
pub use action::Action;
pub use api::{ApiClient, ChartKind, QueryResponse};
pub use app::App;
pub use chat::{ChatMessage, ChatSession, Origin};
pub use config::Config;
