//! # clinic-genai
//!
//! Generative model endpoint resolution, a thin generation client, and
//! structured response extraction for clinical drafting features.
//!
//! ## Overview
//!
//! A host application only needs two things from this crate: a ready-to-call
//! model, and a way to pull a validated record out of whatever text that model
//! returns. Everything else (catalog discovery across API versions, ranking,
//! the pinned override, the process-level endpoint memo) happens behind those
//! two calls.
//!
//! ## Key Features
//!
//! - **Endpoint resolution**: [`resolver::ModelSelector`] ranks the combined
//!   catalog of every configured API version by substring preference, always
//!   preferring `generateContent` over `generateMessage` within a tier
//! - **Single-flight cache**: [`cache::ResolutionCache`] resolves once and
//!   shares the result, with explicit invalidation and optional per-credential
//!   keying
//! - **Generation client**: [`GenerativeModel`] for single-shot and
//!   multi-part prompts, [`client::Conversation`] for history-seeded chats
//! - **Structured extraction**: [`structured::extract`] finds a JSON object in
//!   free-form text and validates it against a declarative [`structured::Shape`]
//! - **Drafting flows**: [`flows::ClinicalAssistant`] (coding, diagnosis,
//!   prescriptions, notes, invoices, reports, SOAP notes, reception)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clinic_genai::structured::{FieldKind, Shape};
//! use clinic_genai::{GenAi, GenerationOptions};
//!
//! #[tokio::main]
//! async fn main() -> clinic_genai::Result<()> {
//!     let genai = GenAi::builder().api_key("your-api-key").build()?;
//!
//!     let model = genai.model(GenerationOptions::new().json()).await?;
//!     let text = model
//!         .generate("Return {\"code\": <ICD-10 for essential hypertension>} as JSON")
//!         .await?;
//!
//!     let shape = Shape::new().required("code", FieldKind::NonEmptyString);
//!     let record = genai.extract(&text, &shape)?;
//!     println!("{}", record.as_value());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Model discovery and by-id probes per API version |
//! | [`resolver`] | Preference ranking and the pinned override |
//! | [`cache`] | Single-slot, single-flight endpoint memo |
//! | [`client`] | Generation calls against a resolved endpoint |
//! | [`structured`] | JSON location and shape validation |
//! | [`facade`] | [`GenAi`]: the application entry point |
//! | [`flows`] | Clinical drafting call sites |
//! | [`config`] | Resolver configuration (defaults, env, YAML) |
//! | [`credentials`] | Credential lookup chain |

pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod credentials;
pub mod facade;
pub mod flows;
pub mod resolver;
pub mod structured;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use cache::{CacheKeying, ResolutionCache};
pub use client::{Conversation, GenerationOptions, GenerativeModel};
pub use config::ResolverConfig;
pub use credentials::CredentialSource;
pub use facade::{GenAi, GenAiBuilder};
pub use resolver::ResolvedEndpoint;
pub use structured::{ExtractedRecord, Shape};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
