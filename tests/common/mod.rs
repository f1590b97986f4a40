//! Mock HTTP server setup for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use clinic_genai::catalog::{ApiVersion, CatalogListing, ModelCatalog, ModelDescriptor};
use clinic_genai::{GenAi, GenAiBuilder, ResolverConfig};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::{json, Value};

pub const TEST_KEY: &str = "test-key";

/// Test fixture that manages a mock provider
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Builder pointed at the mock server, with defaults that ignore the
    /// process environment.
    pub fn builder(&self) -> GenAiBuilder {
        GenAi::builder()
            .config(ResolverConfig::default())
            .base_url_override(&self.base_url)
            .api_key(TEST_KEY)
    }

    pub fn genai(&self) -> GenAi {
        self.builder().build().expect("build GenAi")
    }

    /// `GET /{version}/models` for the test key.
    pub async fn mock_catalog(&mut self, version: &str, status: usize, body: Value) -> Mock {
        self.catalog_mock(version, key_query(), status, body)
            .create_async()
            .await
    }

    /// Uncreated discovery mock, for tests that set hit expectations.
    pub fn catalog_mock(&mut self, version: &str, query: Matcher, status: usize, body: Value) -> Mock {
        self.server
            .mock("GET", format!("/{}/models", version).as_str())
            .match_query(query)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
    }

    /// `GET /{version}/models/{id}`.
    pub async fn mock_probe(&mut self, version: &str, model: &str, status: usize, body: Value) -> Mock {
        self.server
            .mock("GET", format!("/{}/models/{}", version, model).as_str())
            .match_query(Matcher::Any)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .create_async()
            .await
    }

    /// `POST /{version}/models/{id}:{method}` whose body satisfies `body_matcher`.
    pub async fn mock_generate(
        &mut self,
        version: &str,
        model_call: &str,
        body_matcher: Matcher,
        status: usize,
        reply: Value,
    ) -> Mock {
        self.server
            .mock("POST", format!("/{}/models/{}", version, model_call).as_str())
            .match_query(Matcher::Any)
            .match_body(body_matcher)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(reply.to_string())
            .create_async()
            .await
    }

    /// Both versions list `gemini-2.5-flash` (beta) and `gemini-1.5-pro` (stable).
    pub async fn standard_catalog(&mut self) -> (Mock, Mock) {
        let beta = self
            .mock_catalog(
                "v1beta",
                200,
                catalog(&[("models/gemini-2.5-flash", &["generateContent", "countTokens"])]),
            )
            .await;
        let stable = self
            .mock_catalog(
                "v1",
                200,
                catalog(&[("models/gemini-1.5-pro", &["generateContent"])]),
            )
            .await;
        (beta, stable)
    }
}

/// Query matcher for the fixture credential.
pub fn key_query() -> Matcher {
    Matcher::UrlEncoded("key".into(), TEST_KEY.into())
}

/// Discovery payload listing `(name, methods)` entries.
pub fn catalog(entries: &[(&str, &[&str])]) -> Value {
    let models: Vec<Value> = entries
        .iter()
        .map(|(name, methods)| json!({"name": name, "supportedGenerationMethods": methods}))
        .collect();
    json!({ "models": models })
}

/// `generateContent` reply with one text part.
pub fn content_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }]
    })
}

/// In-memory catalog: fixed listings per version, no probes.
pub struct StaticCatalog {
    pub listings: Vec<CatalogListing>,
}

#[async_trait]
impl ModelCatalog for StaticCatalog {
    async fn list_models(&self, version: ApiVersion, _credential: &str) -> CatalogListing {
        self.listings
            .iter()
            .find(|l| l.api_version == version)
            .cloned()
            .unwrap_or_else(|| CatalogListing::models(version, 200, Vec::new()))
    }

    async fn probe_model(
        &self,
        _version: ApiVersion,
        _credential: &str,
        _model_id: &str,
    ) -> Option<ModelDescriptor> {
        None
    }
}
