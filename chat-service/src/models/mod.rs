//! Domain models for the chat service.

pub mod chat;
pub mod session;

pub use chat::{ChatReply, ChatRequest};
pub use session::{ChatMessage, ChatTurn, Role, SessionProfile, UserSession};
