//! Resolution cache.
//!
//! # Endpoint Resolution Cache
//!
//! Holds the one [`ResolvedEndpoint`](crate::resolver::ResolvedEndpoint) a
//! process uses for generation, so catalog discovery runs once rather than on
//! every call.
//!
//! ## Behaviour
//!
//! - **Single slot**: the cache remembers one endpoint. There is no TTL.
//! - **Single flight**: concurrent first callers share one resolution; the
//!   others wait for it and then read the stored value.
//! - **Failures are not cached**: the next caller resolves again.
//! - **Keying**: [`CacheKeying::Process`] ignores the credential entirely, so a
//!   rotated key keeps the endpoint picked with the old one. Hosts that rotate
//!   keys should either call [`ResolutionCache::invalidate`] or use
//!   [`CacheKeying::PerCredential`], which re-resolves when the credential's
//!   fingerprint changes.
//!
//! ## Example
//!
//! ```rust
//! use clinic_genai::cache::{CacheKeying, ResolutionCache};
//! use clinic_genai::catalog::{ApiVersion, GenerationMethod};
//! use clinic_genai::resolver::ResolvedEndpoint;
//!
//! # tokio_test::block_on(async {
//! let cache = ResolutionCache::new(CacheKeying::Process);
//! let endpoint = cache
//!     .get_or_resolve("key", || async {
//!         Ok(ResolvedEndpoint::new(
//!             "models/gemini-2.5-flash",
//!             GenerationMethod::GenerateContent,
//!             ApiVersion::V1Beta,
//!         ))
//!     })
//!     .await
//!     .unwrap();
//! assert_eq!(endpoint.model_id, "gemini-2.5-flash");
//! assert_eq!(cache.stats().resolutions, 1);
//! # });
//! ```

mod keying;
mod slot;

pub use keying::{credential_fingerprint, CacheKeying};
pub use slot::{CacheStats, ResolutionCache};
