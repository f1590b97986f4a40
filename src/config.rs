//! Resolver configuration.
//!
//! Defaults mirror the public generative-language service. Every knob can be
//! overridden from the environment or loaded from a YAML file; the builder on
//! [`crate::GenAiBuilder`] applies programmatic overrides on top.

use crate::cache::CacheKeying;
use crate::catalog::ApiVersion;
use crate::error::{Error, ErrorContext};
use crate::resolver::PreferenceList;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variable holding the pinned model override.
pub const PINNED_MODEL_ENV: &str = "GENAI_MODEL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub base_url: String,
    /// Query order for discovery and override probes. First entry wins ties.
    pub api_versions: Vec<ApiVersion>,
    /// Model id substrings, most preferred first.
    pub preferences: Vec<String>,
    /// Consulted before any catalog scan.
    pub pinned_model: Option<String>,
    pub timeout_secs: u64,
    pub pool_max_idle_per_host: usize,
    pub proxy_url: Option<String>,
    pub cache_keying: CacheKeying,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_versions: ApiVersion::DEFAULT_ORDER.to_vec(),
            preferences: PreferenceList::default().into_inner(),
            pinned_model: None,
            timeout_secs: 30,
            pool_max_idle_per_host: 32,
            proxy_url: None,
            cache_keying: CacheKeying::Process,
        }
    }
}

impl ResolverConfig {
    /// Defaults overlaid with `GENAI_*` environment variables.
    ///
    /// The pinned override is read here once; later changes to `GENAI_MODEL`
    /// do not affect a config that was already built.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load from a YAML file, then apply environment overrides.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_yaml_str(&text)?;
        Ok(config.with_env_overrides())
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: ResolverConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_env_overrides(mut self) -> Self {
        if let Some(model) = non_empty_env(PINNED_MODEL_ENV) {
            self.pinned_model = Some(model);
        }
        if let Some(base) = non_empty_env("GENAI_BASE_URL") {
            self.base_url = base;
        }
        if let Some(secs) = env::var("GENAI_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.timeout_secs = secs;
        }
        if let Some(n) = env::var("GENAI_HTTP_POOL_MAX_IDLE_PER_HOST")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
        {
            self.pool_max_idle_per_host = n;
        }
        if let Some(proxy) = non_empty_env("GENAI_PROXY_URL") {
            self.proxy_url = Some(proxy);
        }
        if let Some(keying) = env::var("GENAI_CACHE_KEYING")
            .ok()
            .and_then(|s| s.parse::<CacheKeying>().ok())
        {
            self.cache_keying = keying;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url).map_err(|e| {
            Error::configuration_with_context(
                "base URL is not a valid absolute URL",
                ErrorContext::new()
                    .with_field_path("base_url")
                    .with_details(format!("{}: {}", self.base_url, e))
                    .with_source("resolver_config"),
            )
        })?;
        if self.api_versions.is_empty() {
            return Err(Error::configuration_with_context(
                "at least one API version must be configured",
                ErrorContext::new()
                    .with_field_path("api_versions")
                    .with_source("resolver_config"),
            ));
        }
        if self.preferences.iter().any(|p| p.trim().is_empty()) {
            return Err(Error::configuration_with_context(
                "preference substrings must not be empty",
                ErrorContext::new()
                    .with_field_path("preferences")
                    .with_source("resolver_config"),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(Error::configuration_with_context(
                "timeout must be at least one second",
                ErrorContext::new()
                    .with_field_path("timeout_secs")
                    .with_source("resolver_config"),
            ));
        }
        Ok(())
    }

    pub fn preference_list(&self) -> PreferenceList {
        PreferenceList::new(self.preferences.clone())
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ResolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_versions, vec![ApiVersion::V1Beta, ApiVersion::V1]);
        assert_eq!(config.preferences[0], "gemini-2.5-flash");
        assert_eq!(config.cache_keying, CacheKeying::Process);
    }

    #[test]
    fn yaml_partial_config_keeps_defaults() {
        let yaml = r#"
base_url: "http://localhost:9000"
api_versions: [v1]
pinned_model: "gemini-1.5-pro"
cache_keying: per_credential
"#;
        let config = ResolverConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.api_versions, vec![ApiVersion::V1]);
        assert_eq!(config.pinned_model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(config.cache_keying, CacheKeying::PerCredential);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let config = ResolverConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.context().and_then(|c| c.field_path.as_deref()),
            Some("base_url")
        );
    }

    #[test]
    fn empty_versions_are_rejected() {
        let config = ResolverConfig {
            api_versions: vec![],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::Configuration { .. })
        ));
    }
}
