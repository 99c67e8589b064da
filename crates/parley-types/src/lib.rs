//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the Parley workspace:
//! Agent, Persona, chat history messages, completion wire types, configuration,
//! and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod message;
pub mod persona;
