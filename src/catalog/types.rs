use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// API base version of the generative-language service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiVersion {
    #[serde(rename = "v1beta")]
    V1Beta,
    #[serde(rename = "v1")]
    V1,
}

impl ApiVersion {
    /// Beta first: newer models usually appear there before the stable surface.
    pub const DEFAULT_ORDER: [ApiVersion; 2] = [ApiVersion::V1Beta, ApiVersion::V1];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1Beta => "v1beta",
            ApiVersion::V1 => "v1",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "v1beta" => Ok(ApiVersion::V1Beta),
            "v1" => Ok(ApiVersion::V1),
            _ => Err(format!("Unknown API version: {}", s)),
        }
    }
}

/// Generation protocols this crate knows how to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationMethod {
    #[serde(rename = "generateContent")]
    GenerateContent,
    #[serde(rename = "generateMessage")]
    GenerateMessage,
}

impl GenerationMethod {
    /// Most favoured first.
    pub const RANKED: [GenerationMethod; 2] = [
        GenerationMethod::GenerateContent,
        GenerationMethod::GenerateMessage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationMethod::GenerateContent => "generateContent",
            GenerationMethod::GenerateMessage => "generateMessage",
        }
    }
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generateContent" => Ok(GenerationMethod::GenerateContent),
            "generateMessage" => Ok(GenerationMethod::GenerateMessage),
            _ => Err(format!("Unknown generation method: {}", s)),
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Provider identifier, possibly namespaced (`models/gemini-2.5-flash`).
    pub id: String,
    /// Capability tags as reported by the provider, known or not.
    pub supported_methods: BTreeSet<String>,
    pub source_api_version: ApiVersion,
}

impl ModelDescriptor {
    pub fn new<I, S>(id: impl Into<String>, methods: I, source_api_version: ApiVersion) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            supported_methods: methods.into_iter().map(Into::into).collect(),
            source_api_version,
        }
    }

    /// Parse a catalog entry. The id comes from `name`, `model` or `id`; the
    /// capability tags from `supportedGenerationMethods` or `supportedMethods`.
    pub fn from_entry(entry: &Value, source_api_version: ApiVersion) -> Option<Self> {
        let id = ["name", "model", "id"]
            .iter()
            .filter_map(|k| entry.get(*k).and_then(|v| v.as_str()))
            .find(|s| !s.is_empty())?;

        let methods = entry
            .get("supportedGenerationMethods")
            .or_else(|| entry.get("supportedMethods"))
            .and_then(|m| m.as_array())
            .map(|arr| {
                arr.iter()
                    .filter_map(|m| m.as_str().map(String::from))
                    .collect::<BTreeSet<_>>()
            })
            .unwrap_or_default();

        Some(Self {
            id: id.to_string(),
            supported_methods: methods,
            source_api_version,
        })
    }

    pub fn supports(&self, method: GenerationMethod) -> bool {
        self.supported_methods.contains(method.as_str())
    }

    /// Best known method: `generateContent` over `generateMessage`.
    pub fn preferred_method(&self) -> Option<GenerationMethod> {
        GenerationMethod::RANKED
            .into_iter()
            .find(|m| self.supports(*m))
    }
}

/// What one version's discovery call yielded.
#[derive(Debug, Clone, PartialEq)]
pub enum ListingOutcome {
    Models(Vec<ModelDescriptor>),
    /// Raw error body (or a synthesized one for network failures).
    Failed(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogListing {
    pub api_version: ApiVersion,
    /// HTTP status; 0 when the request never got a response.
    pub status: u16,
    pub outcome: ListingOutcome,
}

impl CatalogListing {
    pub fn models(api_version: ApiVersion, status: u16, models: Vec<ModelDescriptor>) -> Self {
        Self {
            api_version,
            status,
            outcome: ListingOutcome::Models(models),
        }
    }

    pub fn failed(api_version: ApiVersion, status: u16, body: Value) -> Self {
        Self {
            api_version,
            status,
            outcome: ListingOutcome::Failed(body),
        }
    }

    /// Build a listing from an HTTP reply. Non-2xx or an unrecognizable payload
    /// is a failed listing carrying the body.
    pub fn from_reply(api_version: ApiVersion, status: u16, body: Value) -> Self {
        if !(200..300).contains(&status) {
            return Self::failed(api_version, status, body);
        }
        let list = match body.get("models").and_then(|m| m.as_array()) {
            Some(models) => Some(models),
            None => body
                .get("model")
                .and_then(|m| m.as_array())
                .or_else(|| body.as_array()),
        };
        match list {
            Some(entries) => {
                let models = entries
                    .iter()
                    .filter_map(|e| ModelDescriptor::from_entry(e, api_version))
                    .collect();
                Self::models(api_version, status, models)
            }
            // An empty account legitimately returns `{}`.
            None if body.as_object().map_or(false, |o| o.is_empty()) => {
                Self::models(api_version, status, Vec::new())
            }
            None => Self::failed(api_version, status, body),
        }
    }

    pub fn descriptors(&self) -> &[ModelDescriptor] {
        match &self.outcome {
            ListingOutcome::Models(models) => models,
            ListingOutcome::Failed(_) => &[],
        }
    }

    pub fn is_usable(&self) -> bool {
        matches!(self.outcome, ListingOutcome::Models(_)) && (200..300).contains(&self.status)
    }

    /// The `DiscoveryUnavailable` record for a failed listing.
    pub fn unavailable(&self) -> Option<Error> {
        match &self.outcome {
            ListingOutcome::Failed(body) => Some(Error::DiscoveryUnavailable {
                api_version: self.api_version,
                status: self.status,
                body: truncate(&body.to_string(), 300),
            }),
            ListingOutcome::Models(_) => None,
        }
    }

    /// Diagnostic summary: the first `limit` model ids, or the error body.
    pub fn summary(&self, limit: usize) -> Value {
        match &self.outcome {
            ListingOutcome::Models(models) => serde_json::json!({
                "apiVersion": self.api_version.as_str(),
                "status": self.status,
                "models": models.iter().take(limit).map(|m| m.id.as_str()).collect::<Vec<_>>(),
            }),
            ListingOutcome::Failed(body) => serde_json::json!({
                "apiVersion": self.api_version.as_str(),
                "status": self.status,
                "error": body,
            }),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn descriptor_from_standard_entry() {
        let entry = json!({
            "name": "models/gemini-2.5-flash",
            "supportedGenerationMethods": ["generateContent", "countTokens"]
        });
        let d = ModelDescriptor::from_entry(&entry, ApiVersion::V1Beta).unwrap();
        assert_eq!(d.id, "models/gemini-2.5-flash");
        assert!(d.supports(GenerationMethod::GenerateContent));
        assert!(!d.supports(GenerationMethod::GenerateMessage));
        assert_eq!(d.preferred_method(), Some(GenerationMethod::GenerateContent));
    }

    #[test]
    fn descriptor_from_alternate_keys() {
        let entry = json!({"id": "chat-bison", "supportedMethods": ["generateMessage"]});
        let d = ModelDescriptor::from_entry(&entry, ApiVersion::V1).unwrap();
        assert_eq!(d.id, "chat-bison");
        assert_eq!(d.preferred_method(), Some(GenerationMethod::GenerateMessage));
    }

    #[test]
    fn descriptor_without_id_is_skipped() {
        assert!(ModelDescriptor::from_entry(&json!({"supportedMethods": []}), ApiVersion::V1).is_none());
    }

    #[test]
    fn listing_from_error_status() {
        let listing = CatalogListing::from_reply(
            ApiVersion::V1,
            403,
            json!({"error": {"message": "denied"}}),
        );
        assert!(!listing.is_usable());
        assert!(listing.descriptors().is_empty());
        assert!(matches!(
            listing.unavailable(),
            Some(Error::DiscoveryUnavailable { status: 403, .. })
        ));
    }

    #[test]
    fn listing_accepts_bare_array_payload() {
        let listing = CatalogListing::from_reply(
            ApiVersion::V1Beta,
            200,
            json!([{"name": "models/gemini-pro", "supportedGenerationMethods": ["generateContent"]}]),
        );
        assert!(listing.is_usable());
        assert_eq!(listing.descriptors().len(), 1);
    }

    #[test]
    fn summary_is_truncated() {
        let models = (0..10)
            .map(|i| ModelDescriptor::new(format!("models/m{}", i), ["embedContent"], ApiVersion::V1))
            .collect();
        let listing = CatalogListing::models(ApiVersion::V1, 200, models);
        let summary = listing.summary(6);
        assert_eq!(summary["models"].as_array().unwrap().len(), 6);
        assert_eq!(summary["apiVersion"], "v1");
    }
}
