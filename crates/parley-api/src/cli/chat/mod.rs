//! Interactive console chat for Parley.
//!
//! Reads lines with an async readline, runs each through the chat service,
//! and prints the reply. Entry point: `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;
