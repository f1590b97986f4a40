//! Application-facing entry points.
//!
//! [`GenAi`] wires configuration, credentials, catalog discovery, the
//! resolution cache and the generation client together behind two calls:
//! [`GenAi::model`] and [`GenAi::extract`].

mod genai;
pub mod prelude;

pub use genai::{GenAi, GenAiBuilder};
