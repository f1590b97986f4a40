//! Model selection.
//!
//! Picks exactly one (model id, method, API version) triple from a pinned
//! override or the combined catalog of every configured API version.
//!
//! Ranking, in order:
//! 1. A pinned override that some version knows and that supports a known
//!    method. An override that exists but supports no known method is ignored
//!    and the catalog scan runs instead.
//! 2. For each preference substring (most preferred first), the first
//!    descriptor containing it that supports `generateContent`; failing that,
//!    the first one supporting `generateMessage`.
//! 3. The first descriptor supporting `generateContent`, then the first
//!    supporting `generateMessage`, in fetch order.
//!
//! Within a tier, fetch order decides: listings are scanned in the configured
//! API version order and entries in catalog order.

mod preferences;

pub use preferences::PreferenceList;

use crate::catalog::{ApiVersion, CatalogListing, GenerationMethod, ModelCatalog, ModelDescriptor};
use crate::error::{Error, ErrorContext};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Catalog entries shown per version in a `NoUsableEndpoint` diagnostic.
pub const DIAGNOSTIC_MODELS_PER_VERSION: usize = 6;

/// The endpoint chosen for subsequent generation calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedEndpoint {
    /// Model id without the `models/` namespace.
    pub model_id: String,
    pub method: GenerationMethod,
    pub api_version: ApiVersion,
}

impl ResolvedEndpoint {
    pub fn new(model_id: &str, method: GenerationMethod, api_version: ApiVersion) -> Self {
        Self {
            model_id: strip_namespace(model_id).to_string(),
            method,
            api_version,
        }
    }

    fn from_descriptor(descriptor: &ModelDescriptor, method: GenerationMethod) -> Self {
        Self::new(&descriptor.id, method, descriptor.source_api_version)
    }
}

impl fmt::Display for ResolvedEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/models/{}:{}", self.api_version, self.model_id, self.method)
    }
}

/// Drop a leading `models/` namespace and any leading slash.
pub fn strip_namespace(id: &str) -> &str {
    let id = id.strip_prefix("models/").unwrap_or(id);
    id.strip_prefix('/').unwrap_or(id)
}

/// Rank the combined catalog. Pure; listings must already be in fetch order.
pub fn select_endpoint(
    listings: &[CatalogListing],
    preferences: &PreferenceList,
) -> Option<ResolvedEndpoint> {
    let all = || listings.iter().flat_map(|l| l.descriptors().iter());

    for preferred in preferences.iter() {
        for method in GenerationMethod::RANKED {
            if let Some(d) = all().find(|d| d.id.contains(preferred) && d.supports(method)) {
                return Some(ResolvedEndpoint::from_descriptor(d, method));
            }
        }
    }

    for method in GenerationMethod::RANKED {
        if let Some(d) = all().find(|d| d.supports(method)) {
            return Some(ResolvedEndpoint::from_descriptor(d, method));
        }
    }

    None
}

/// Resolves endpoints against a [`ModelCatalog`].
#[derive(Clone)]
pub struct ModelSelector {
    catalog: Arc<dyn ModelCatalog>,
    preferences: PreferenceList,
    api_versions: Vec<ApiVersion>,
    pinned_model: Option<String>,
}

impl ModelSelector {
    pub fn new(catalog: Arc<dyn ModelCatalog>) -> Self {
        Self {
            catalog,
            preferences: PreferenceList::default(),
            api_versions: ApiVersion::DEFAULT_ORDER.to_vec(),
            pinned_model: None,
        }
    }

    pub fn with_preferences(mut self, preferences: PreferenceList) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_api_versions(mut self, versions: Vec<ApiVersion>) -> Self {
        if !versions.is_empty() {
            self.api_versions = versions;
        }
        self
    }

    pub fn with_pinned_model(mut self, model: Option<String>) -> Self {
        self.pinned_model = model.filter(|m| !m.trim().is_empty());
        self
    }

    pub fn preferences(&self) -> &PreferenceList {
        &self.preferences
    }

    pub fn pinned_model(&self) -> Option<&str> {
        self.pinned_model.as_deref()
    }

    /// Resolve using the configured pinned override, if any.
    pub async fn resolve(&self, credential: &str) -> Result<ResolvedEndpoint> {
        self.resolve_with_override(credential, self.pinned_model.as_deref())
            .await
    }

    pub async fn resolve_with_override(
        &self,
        credential: &str,
        pinned_model: Option<&str>,
    ) -> Result<ResolvedEndpoint> {
        if credential.trim().is_empty() {
            return Err(Error::configuration_with_context(
                "endpoint resolution requires an API credential",
                ErrorContext::new().with_source("model_selector"),
            ));
        }

        if let Some(pinned) = pinned_model.map(str::trim).filter(|m| !m.is_empty()) {
            if let Some(endpoint) = self.probe_override(credential, pinned).await {
                info!(endpoint = %endpoint, "using pinned model override");
                return Ok(endpoint);
            }
        }

        let listings = self.fetch_catalogs(credential).await;
        for listing in &listings {
            if let Some(err) = listing.unavailable() {
                warn!(error = %err, "discovery unavailable, continuing with remaining versions");
            }
        }

        match select_endpoint(&listings, &self.preferences) {
            Some(endpoint) => {
                info!(endpoint = %endpoint, "resolved generative model endpoint");
                Ok(endpoint)
            }
            None => Err(Error::NoUsableEndpoint {
                catalog: diagnostic_summary(&listings),
            }),
        }
    }

    /// Probe the override on each version in order. `None` means "fall back to
    /// the catalog scan", whether the model was missing or unusable.
    async fn probe_override(&self, credential: &str, pinned: &str) -> Option<ResolvedEndpoint> {
        for &version in &self.api_versions {
            let Some(descriptor) = self.catalog.probe_model(version, credential, pinned).await else {
                continue;
            };
            match descriptor.preferred_method() {
                Some(method) => return Some(ResolvedEndpoint::new(pinned, method, version)),
                None => {
                    warn!(
                        model = pinned,
                        api_version = %version,
                        methods = ?descriptor.supported_methods,
                        "pinned model supports no known generation method, scanning catalog"
                    );
                    return None;
                }
            }
        }
        debug!(model = pinned, "pinned model not found on any API version");
        None
    }

    /// All versions concurrently; results kept in configured order.
    async fn fetch_catalogs(&self, credential: &str) -> Vec<CatalogListing> {
        let fetches = self
            .api_versions
            .iter()
            .map(|&version| self.catalog.list_models(version, credential));
        futures::future::join_all(fetches).await
    }
}

fn diagnostic_summary(listings: &[CatalogListing]) -> String {
    let summary: Vec<_> = listings
        .iter()
        .map(|l| l.summary(DIAGNOSTIC_MODELS_PER_VERSION))
        .collect();
    serde_json::Value::Array(summary).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModelDescriptor;

    fn d(id: &str, methods: &[&str], v: ApiVersion) -> ModelDescriptor {
        ModelDescriptor::new(id, methods.iter().copied(), v)
    }

    #[test]
    fn strips_namespace() {
        assert_eq!(strip_namespace("models/gemini-2.5-flash"), "gemini-2.5-flash");
        assert_eq!(strip_namespace("/gemini-pro"), "gemini-pro");
        assert_eq!(strip_namespace("gemini-pro"), "gemini-pro");
    }

    #[test]
    fn higher_preference_wins_across_versions() {
        let listings = vec![
            CatalogListing::models(
                ApiVersion::V1Beta,
                200,
                vec![d("models/gemini-1.5-pro", &["generateContent"], ApiVersion::V1Beta)],
            ),
            CatalogListing::models(
                ApiVersion::V1,
                200,
                vec![d("models/gemini-2.5-flash", &["generateContent"], ApiVersion::V1)],
            ),
        ];
        let endpoint = select_endpoint(&listings, &PreferenceList::default()).unwrap();
        assert_eq!(endpoint.model_id, "gemini-2.5-flash");
        assert_eq!(endpoint.api_version, ApiVersion::V1);
    }

    #[test]
    fn content_beats_message_in_same_tier() {
        let listings = vec![CatalogListing::models(
            ApiVersion::V1Beta,
            200,
            vec![
                d("models/gemini-2-chat", &["generateMessage"], ApiVersion::V1Beta),
                d("models/gemini-2-pro", &["generateContent"], ApiVersion::V1Beta),
            ],
        )];
        let endpoint = select_endpoint(&listings, &PreferenceList::default()).unwrap();
        assert_eq!(endpoint.model_id, "gemini-2-pro");
        assert_eq!(endpoint.method, GenerationMethod::GenerateContent);
    }

    #[test]
    fn message_only_tier_still_beats_lower_tier() {
        let listings = vec![CatalogListing::models(
            ApiVersion::V1Beta,
            200,
            vec![
                d("models/gemini-1.5-flash", &["generateContent"], ApiVersion::V1Beta),
                d("models/gemini-2.5-chat", &["generateMessage"], ApiVersion::V1Beta),
            ],
        )];
        let endpoint = select_endpoint(&listings, &PreferenceList::default()).unwrap();
        assert_eq!(endpoint.model_id, "gemini-2.5-chat");
        assert_eq!(endpoint.method, GenerationMethod::GenerateMessage);
    }

    #[test]
    fn first_fetched_version_wins_ties() {
        let listings = vec![
            CatalogListing::models(
                ApiVersion::V1Beta,
                200,
                vec![d("models/gemini-2.5-flash-001", &["generateContent"], ApiVersion::V1Beta)],
            ),
            CatalogListing::models(
                ApiVersion::V1,
                200,
                vec![d("models/gemini-2.5-flash", &["generateContent"], ApiVersion::V1)],
            ),
        ];
        let endpoint = select_endpoint(&listings, &PreferenceList::default()).unwrap();
        assert_eq!(endpoint.api_version, ApiVersion::V1Beta);
        assert_eq!(endpoint.model_id, "gemini-2.5-flash-001");
    }

    #[test]
    fn falls_back_to_any_capable_model() {
        let listings = vec![CatalogListing::models(
            ApiVersion::V1,
            200,
            vec![
                d("models/embedding-001", &["embedContent"], ApiVersion::V1),
                d("models/text-bison", &["generateMessage"], ApiVersion::V1),
                d("models/learnlm", &["generateContent"], ApiVersion::V1),
            ],
        )];
        let endpoint = select_endpoint(&listings, &PreferenceList::default()).unwrap();
        assert_eq!(endpoint.model_id, "learnlm");
    }

    #[test]
    fn nothing_capable_selects_nothing() {
        let listings = vec![
            CatalogListing::failed(ApiVersion::V1Beta, 0, serde_json::json!({"error": "offline"})),
            CatalogListing::models(
                ApiVersion::V1,
                200,
                vec![d("models/embedding-001", &["embedContent"], ApiVersion::V1)],
            ),
        ];
        assert!(select_endpoint(&listings, &PreferenceList::default()).is_none());
        let summary = diagnostic_summary(&listings);
        assert!(summary.contains("offline"));
        assert!(summary.contains("models/embedding-001"));
    }
}
