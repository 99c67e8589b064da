//! Completion client abstractions for Parley.
//!
//! - `CompletionClient`: RPITIT trait implemented by concrete endpoint clients
//! - `assemble_messages` / `converse`: build the final message list and call the client

pub mod assemble;
pub mod client;
