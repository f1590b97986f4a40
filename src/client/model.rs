use super::conversation::Conversation;
use super::options::{GenerationConfig, GenerationOptions};
use super::wire;
use crate::error::Error;
use crate::resolver::ResolvedEndpoint;
use crate::transport::HttpTransport;
use crate::types::{GenerationRequest, Prompt, Turn};
use crate::Result;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// A generation handle bound to one resolved endpoint.
///
/// Cheap to clone; clones share the underlying HTTP client.
#[derive(Clone)]
pub struct GenerativeModel {
    transport: Arc<HttpTransport>,
    endpoint: ResolvedEndpoint,
    credential: String,
    config: GenerationConfig,
}

impl GenerativeModel {
    /// `options.api_key`, when set, replaces `credential` for calls made
    /// through this handle. It never appears in a request body.
    pub fn new(
        transport: Arc<HttpTransport>,
        endpoint: ResolvedEndpoint,
        credential: impl Into<String>,
        options: GenerationOptions,
    ) -> Self {
        let (key_override, config) = options.split();
        Self {
            transport,
            endpoint,
            credential: key_override.unwrap_or_else(|| credential.into()),
            config,
        }
    }

    pub fn endpoint(&self) -> &ResolvedEndpoint {
        &self.endpoint
    }

    pub fn model_id(&self) -> &str {
        &self.endpoint.model_id
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Single-shot generation from a prompt or a list of parts.
    pub async fn generate(&self, prompt: impl Into<Prompt>) -> Result<String> {
        self.execute(GenerationRequest::from(prompt.into())).await
    }

    pub fn start_conversation(&self, history: Vec<Turn>) -> Conversation {
        Conversation::new(self.clone(), history)
    }

    /// Send one request to the bound endpoint and return the reply text.
    pub async fn execute(&self, request: GenerationRequest) -> Result<String> {
        let method = self.endpoint.method;
        let body = wire::build_body(method, request, &self.config)?;
        let request_id = uuid::Uuid::new_v4().to_string();
        let call = format!("{}:{}", self.endpoint.model_id, method);
        let segments = [self.endpoint.api_version.as_str(), "models", call.as_str()];

        let started = Instant::now();
        let reply = self
            .transport
            .post_json(&segments, &self.credential, &body, &request_id)
            .await
            .map_err(|e| {
                warn!(request_id = %request_id, error = %e, "generation request failed");
                Error::generation_failed(e.to_string())
            })?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if !reply.is_success() {
            let message = reply
                .error_message()
                .map(str::to_string)
                .unwrap_or_else(|| reply.body.to_string());
            warn!(
                request_id = %request_id,
                status = reply.status,
                endpoint = %self.endpoint,
                "provider rejected generation request"
            );
            return Err(Error::GenerationFailed {
                reason: format!("HTTP {}: {}", reply.status, message),
                status: Some(reply.status),
            });
        }

        let text = wire::parse_reply(method, &reply.body)?;
        info!(
            request_id = %request_id,
            endpoint = %self.endpoint,
            elapsed_ms,
            chars = text.len(),
            "generation complete"
        );
        debug!(request_id = %request_id, "reply text received");
        Ok(text)
    }
}

impl fmt::Debug for GenerativeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerativeModel")
            .field("endpoint", &self.endpoint)
            .field("config", &self.config)
            .field("credential", &"<redacted>")
            .finish()
    }
}
