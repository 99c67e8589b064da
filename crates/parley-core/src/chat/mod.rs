//! Conversation state and the chat turn built on it.
//!
//! - `window`: bounded per-agent history over a `HistoryRepository`
//! - `service`: `ChatService`, the user-turn / completion / reply cycle

pub mod service;
pub mod window;
