//! Generation options.

use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseMimeType {
    #[serde(rename = "text/plain", alias = "text")]
    Text,
    #[serde(rename = "application/json", alias = "json")]
    Json,
}

/// Caller-facing options for a generation call.
///
/// Recognized keys (camelCase when read from JSON): `temperature`,
/// `maxOutputTokens`, `responseMimeType`, and the transport-level `apiKey`
/// override. Unknown keys are ignored. `apiKey` is stripped before anything is
/// forwarded to the provider.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationOptions {
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub response_mime_type: Option<ResponseMimeType>,
    pub api_key: Option<String>,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a loosely-typed options object, e.g. one received from a host UI.
    pub fn from_json(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_output_tokens(mut self, tokens: u32) -> Self {
        self.max_output_tokens = Some(tokens);
        self
    }

    pub fn with_response_mime_type(mut self, mime: ResponseMimeType) -> Self {
        self.response_mime_type = Some(mime);
        self
    }

    /// Ask for `application/json` output.
    pub fn json(self) -> Self {
        self.with_response_mime_type(ResponseMimeType::Json)
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Separate the credential override from what goes on the wire.
    pub fn split(self) -> (Option<String>, GenerationConfig) {
        let config = GenerationConfig {
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            response_mime_type: self.response_mime_type,
        };
        (self.api_key.filter(|k| !k.trim().is_empty()), config)
    }
}

/// The provider-bound part of [`GenerationOptions`] (`generationConfig`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<ResponseMimeType>,
}

impl GenerationConfig {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none()
            && self.max_output_tokens.is_none()
            && self.response_mime_type.is_none()
    }
}
