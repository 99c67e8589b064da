//! Infrastructure layer for Parley.
//!
//! Contains implementations of the ports defined in `parley-core`: SQLite
//! history and agent storage, the OpenAI-compatible completion client, and
//! the file-backed persona store, plus configuration loading.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod sqlite;
