//! Generation client adapter.
//!
//! Wraps a [`ResolvedEndpoint`](crate::resolver::ResolvedEndpoint) into a
//! callable [`GenerativeModel`]: single-shot generation from a prompt or parts,
//! and multi-turn [`Conversation`]s seeded with prior history. Every transport
//! or provider failure becomes [`Error::GenerationFailed`](crate::Error); the
//! adapter never retries.

pub mod conversation;
pub mod model;
pub mod options;
mod wire;

pub use conversation::Conversation;
pub use model::GenerativeModel;
pub use options::{GenerationConfig, GenerationOptions, ResponseMimeType};
