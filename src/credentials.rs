//! Provider credential lookup.
//!
//! The resolver never stores secrets itself; it asks a [`CredentialSource`]
//! each time a model is requested.

use crate::error::{Error, ErrorContext};
use crate::Result;
use std::env;

pub const DEFAULT_CREDENTIAL_ENV: &str = "GOOGLE_API_KEY";

#[cfg(feature = "os-keyring")]
pub const KEYRING_SERVICE: &str = "clinic-genai";
#[cfg(feature = "os-keyring")]
pub const KEYRING_USER: &str = "google";

/// Where the access credential comes from, checked in order.
#[derive(Debug, Clone)]
pub enum CredentialSource {
    Static(String),
    Environment(String),
    #[cfg(feature = "os-keyring")]
    Keyring { service: String, user: String },
    Chain(Vec<CredentialSource>),
}

impl Default for CredentialSource {
    /// Keyring entry (when the `os-keyring` feature is on), then `GOOGLE_API_KEY`.
    fn default() -> Self {
        let mut chain = Vec::new();
        #[cfg(feature = "os-keyring")]
        chain.push(CredentialSource::Keyring {
            service: KEYRING_SERVICE.to_string(),
            user: KEYRING_USER.to_string(),
        });
        chain.push(CredentialSource::Environment(DEFAULT_CREDENTIAL_ENV.to_string()));
        CredentialSource::Chain(chain)
    }
}

impl CredentialSource {
    pub fn fixed(key: impl Into<String>) -> Self {
        CredentialSource::Static(key.into())
    }

    /// First non-empty credential, if any.
    pub fn lookup(&self) -> Option<String> {
        match self {
            CredentialSource::Static(key) => non_empty(key.clone()),
            CredentialSource::Environment(var) => env::var(var).ok().and_then(non_empty),
            #[cfg(feature = "os-keyring")]
            CredentialSource::Keyring { service, user } => keyring::Entry::new(service, user)
                .ok()
                .and_then(|entry| entry.get_password().ok())
                .and_then(non_empty),
            CredentialSource::Chain(sources) => sources.iter().find_map(|s| s.lookup()),
        }
    }

    pub fn resolve(&self) -> Result<String> {
        self.lookup().ok_or_else(|| {
            Error::configuration_with_context(
                "no API credential configured",
                ErrorContext::new()
                    .with_details(format!("set {} or supply a key explicitly", DEFAULT_CREDENTIAL_ENV))
                    .with_source("credential_source"),
            )
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
