//! Conversation-state and prompt-assembly engine for Parley.
//!
//! This crate defines the "ports" (repository, persona, and completion-client
//! traits) that the infrastructure layer implements, plus the engine built on
//! them: the bounded history window, the persona template renderer, and the
//! completion message assembly. It depends only on `parley-types` -- never on
//! `parley-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod prompt;
pub mod repository;

#[cfg(test)]
pub(crate) mod testing;
