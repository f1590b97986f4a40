//! Model catalog discovery.
//!
//! Lists the models a credential can see on each API version and probes single
//! model ids directly. Nothing here retries or caches; a failed listing is a
//! value, not an error, so the selector can move on to the next version.

mod fetcher;
mod types;

pub use fetcher::CatalogFetcher;
pub use types::{ApiVersion, CatalogListing, GenerationMethod, ListingOutcome, ModelDescriptor};

use async_trait::async_trait;

/// A source of model descriptors.
///
/// The HTTP [`CatalogFetcher`] is the production implementation; the selector
/// only depends on this trait.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    /// One discovery call for `version`. Never fails: network problems are
    /// reported as a listing with status 0.
    async fn list_models(&self, version: ApiVersion, credential: &str) -> CatalogListing;

    /// Direct by-id lookup. `None` when the model is unknown to `version` or
    /// the call failed.
    async fn probe_model(
        &self,
        version: ApiVersion,
        credential: &str,
        model_id: &str,
    ) -> Option<ModelDescriptor>;
}
