//! Completion client implementations.
//!
//! Contains the concrete implementation of the [`CompletionClient`] trait
//! defined in `parley-core` for OpenAI-compatible chat-completion endpoints.
//!
//! [`CompletionClient`]: parley_core::llm::client::CompletionClient

pub mod openai;
