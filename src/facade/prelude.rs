//! Minimal prelude for application code.
//!
//! Goal: reduce import noise without hiding important concepts.

pub use crate::client::{Conversation, GenerationOptions, GenerativeModel, ResponseMimeType};
pub use crate::facade::{GenAi, GenAiBuilder};
pub use crate::resolver::ResolvedEndpoint;
pub use crate::structured::{extract, extract_as, FieldKind, Shape};
pub use crate::types::{Part, Turn};
pub use crate::{Error, Result};
