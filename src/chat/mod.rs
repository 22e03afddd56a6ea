pub mod message;
pub mod session;

pub use message::{ChatMessage, Origin};
pub use session::ChatSession;
