//! Structured response extraction.
//!
//! One extractor for every call site that expects a JSON record back from a
//! generation call; each call site only declares its [`Shape`].
//!
//! # Examples
//!
//! ```
//! use clinic_genai::structured::{extract, FieldKind, Shape};
//!
//! let shape = Shape::new()
//!     .required("a", FieldKind::number())
//!     .required("b", FieldKind::Array);
//!
//! let raw = "Sure! Here's the result:\n```json\n{\"a\":1,\"b\":[1,2]}\n```";
//! let record = extract(raw, &shape).unwrap();
//! assert_eq!(record.as_value(), &serde_json::json!({"a": 1, "b": [1, 2]}));
//! ```

pub mod extractor;
pub mod shape;

pub use extractor::{extract, extract_as, locate_json, ExtractedRecord};
pub use shape::{FieldKind, FieldSpec, Shape};
