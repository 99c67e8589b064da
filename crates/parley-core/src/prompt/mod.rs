//! Persona prompt rendering.
//!
//! A [`PromptTemplate`](template::PromptTemplate) turns a persona and the
//! formatted conversation window into the instruction text sent as the
//! leading context message of every completion call.

pub mod template;
