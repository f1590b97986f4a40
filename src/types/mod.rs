//! # Types Module
//!
//! Request content types shared by the generation client and the clinical
//! drafting layer.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Part`] | Text segment or inline binary data with a media type |
//! | [`Turn`] | One conversation turn (user or model) |
//! | [`Prompt`] | Single-shot input: plain text or ordered parts |
//! | [`GenerationRequest`] | Prompt, parts, or history-seeded conversation message |
//!
//! ## Example
//!
//! ```rust
//! use clinic_genai::types::{Part, Prompt, Turn};
//!
//! let audio = Part::inline_bytes("audio/webm", vec![0u8, 1, 2]);
//! let prompt = Prompt::from(vec![Part::text("Write a SOAP note."), audio]);
//! let history = vec![Turn::user("Report: TSH < 0.005"), Turn::model("Understood.")];
//! # let _ = (prompt, history);
//! ```

pub mod message;

pub use message::{Blob, GenerationRequest, Part, Prompt, Role, Turn};
