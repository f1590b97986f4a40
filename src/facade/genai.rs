use crate::cache::{CacheStats, ResolutionCache};
use crate::catalog::{ApiVersion, CatalogFetcher, ModelCatalog};
use crate::client::{GenerationOptions, GenerativeModel};
use crate::config::ResolverConfig;
use crate::credentials::CredentialSource;
use crate::resolver::{ModelSelector, PreferenceList, ResolvedEndpoint};
use crate::structured::{self, ExtractedRecord, Shape};
use crate::transport::HttpTransport;
use crate::Result;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Builder for [`GenAi`].
///
/// Without an explicit config, [`ResolverConfig::from_env`] is used. Builder
/// overrides are applied on top of whichever config is in effect.
pub struct GenAiBuilder {
    config: Option<ResolverConfig>,
    credentials: Option<CredentialSource>,
    /// Override base URL (primarily for testing with mock servers)
    base_url_override: Option<String>,
    pinned_model: Option<String>,
    preferences: Option<PreferenceList>,
    api_versions: Option<Vec<ApiVersion>>,
    cache: Option<Arc<ResolutionCache>>,
    catalog: Option<Arc<dyn ModelCatalog>>,
}

impl GenAiBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            credentials: None,
            base_url_override: None,
            pinned_model: None,
            preferences: None,
            api_versions: None,
            cache: None,
            catalog: None,
        }
    }

    pub fn config(mut self, config: ResolverConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn credentials(mut self, source: CredentialSource) -> Self {
        self.credentials = Some(source);
        self
    }

    pub fn api_key(self, key: impl Into<String>) -> Self {
        self.credentials(CredentialSource::fixed(key))
    }

    pub fn base_url_override(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    pub fn pinned_model(mut self, model: impl Into<String>) -> Self {
        self.pinned_model = Some(model.into());
        self
    }

    pub fn preferences(mut self, preferences: PreferenceList) -> Self {
        self.preferences = Some(preferences);
        self
    }

    pub fn api_versions(mut self, versions: Vec<ApiVersion>) -> Self {
        self.api_versions = Some(versions);
        self
    }

    /// Share a cache between several `GenAi` instances, e.g.
    /// [`ResolutionCache::process_wide`].
    pub fn cache(mut self, cache: Arc<ResolutionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Resolve against a custom catalog source instead of the HTTP fetcher.
    pub fn catalog(mut self, catalog: Arc<dyn ModelCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn build(self) -> Result<GenAi> {
        let mut config = self.config.unwrap_or_else(ResolverConfig::from_env);
        if let Some(url) = self.base_url_override {
            config.base_url = url;
        }
        if let Some(model) = self.pinned_model {
            config.pinned_model = Some(model);
        }
        if let Some(preferences) = self.preferences {
            config.preferences = preferences.into_inner();
        }
        if let Some(versions) = self.api_versions {
            config.api_versions = versions;
        }

        let transport = Arc::new(HttpTransport::new(&config)?);
        let catalog = self
            .catalog
            .unwrap_or_else(|| Arc::new(CatalogFetcher::new(Arc::clone(&transport))) as Arc<dyn ModelCatalog>);
        let selector = ModelSelector::new(catalog)
            .with_preferences(config.preference_list())
            .with_api_versions(config.api_versions.clone())
            .with_pinned_model(config.pinned_model.clone());
        let cache = self
            .cache
            .unwrap_or_else(|| Arc::new(ResolutionCache::new(config.cache_keying)));

        debug!(
            base_url = %config.base_url,
            pinned_model = ?config.pinned_model,
            keying = ?cache.keying(),
            "generative AI facade ready"
        );

        Ok(GenAi {
            transport,
            selector,
            cache,
            credentials: self.credentials.unwrap_or_default(),
            config,
        })
    }
}

impl Default for GenAiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The two things the rest of an application needs: a ready-to-call model and
/// structured extraction from its output.
///
/// ```rust,no_run
/// use clinic_genai::{GenAi, GenerationOptions};
///
/// # async fn run() -> clinic_genai::Result<()> {
/// let genai = GenAi::builder().api_key("AIza...").build()?;
/// let model = genai.model(GenerationOptions::new().with_temperature(0.2)).await?;
/// let text = model.generate("Summarize: BP 150/95, HR 88").await?;
/// # let _ = text;
/// # Ok(())
/// # }
/// ```
pub struct GenAi {
    transport: Arc<HttpTransport>,
    selector: ModelSelector,
    cache: Arc<ResolutionCache>,
    credentials: CredentialSource,
    config: ResolverConfig,
}

impl GenAi {
    pub fn builder() -> GenAiBuilder {
        GenAiBuilder::new()
    }

    /// Environment configuration and the default credential chain.
    pub fn from_env() -> Result<Self> {
        GenAiBuilder::new().build()
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ResolutionCache> {
        &self.cache
    }

    /// The endpoint for the configured credential, resolving on first use.
    pub async fn endpoint(&self) -> Result<ResolvedEndpoint> {
        let credential = self.credentials.resolve()?;
        self.endpoint_for(&credential).await
    }

    pub async fn endpoint_for(&self, credential: &str) -> Result<ResolvedEndpoint> {
        self.cache
            .get_or_resolve(credential, || self.selector.resolve(credential))
            .await
    }

    /// A model handle for the resolved endpoint.
    ///
    /// `options.api_key`, when set, is used both to resolve (if the cache is
    /// empty) and to call the model.
    pub async fn model(&self, options: GenerationOptions) -> Result<GenerativeModel> {
        let credential = match options
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
        {
            Some(key) => key.to_string(),
            None => self.credentials.resolve()?,
        };
        let endpoint = self.endpoint_for(&credential).await?;
        Ok(GenerativeModel::new(
            Arc::clone(&self.transport),
            endpoint,
            credential,
            options,
        ))
    }

    pub fn extract(&self, raw: &str, shape: &Shape) -> Result<ExtractedRecord> {
        structured::extract(raw, shape)
    }

    pub fn extract_as<T: DeserializeOwned>(&self, raw: &str, shape: &Shape) -> Result<T> {
        structured::extract_as(raw, shape)
    }

    /// Forget the cached endpoint; the next call resolves again.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
