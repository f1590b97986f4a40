use crate::config::ResolverConfig;
use crate::Result;
use reqwest::Proxy;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Status plus decoded body of one provider call.
///
/// Non-2xx replies are returned as values; callers decide what a failure means.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Value,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Provider error message if the body has the usual `{error: {message}}` form.
    pub fn error_message(&self) -> Option<&str> {
        self.body
            .pointer("/error/message")
            .and_then(|m| m.as_str())
            .or_else(|| self.body.get("error").and_then(|e| e.as_str()))
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        config.validate()?;
        let base_url = Url::parse(&config.base_url).map_err(|e| TransportError::Other(e.to_string()))?;

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(TransportError::Http)?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(TransportError::Http)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with the given path segments appended. Each segment is
    /// percent-encoded on its own, so a model id cannot escape its segment.
    pub fn url_for(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn get_json(
        &self,
        segments: &[&str],
        credential: &str,
    ) -> std::result::Result<HttpReply, TransportError> {
        let url = self.url_for(segments);
        debug!(%url, "GET");
        let request = self.client.get(url).query(&[("key", credential)]);
        Self::send(request).await
    }

    pub async fn post_json(
        &self,
        segments: &[&str],
        credential: &str,
        body: &Value,
        request_id: &str,
    ) -> std::result::Result<HttpReply, TransportError> {
        let url = self.url_for(segments);
        debug!(%url, request_id, "POST");
        let request = self
            .client
            .post(url)
            .query(&[("key", credential)])
            .header("x-request-id", request_id)
            .json(body);
        Self::send(request).await
    }

    /// The credential rides in the query string, so reqwest errors are
    /// stripped of their URL before they leave this module.
    async fn send(request: reqwest::RequestBuilder) -> std::result::Result<HttpReply, TransportError> {
        let response = request.send().await.map_err(TransportError::redacted)?;
        let status = response.status().as_u16();
        let text = response.text().await.map_err(TransportError::redacted)?;
        let body = serde_json::from_str(&text)
            .unwrap_or_else(|_| serde_json::json!({ "error": "invalid-json-response" }));
        Ok(HttpReply { status, body })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    fn redacted(e: reqwest::Error) -> Self {
        TransportError::Http(e.without_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(base: &str) -> HttpTransport {
        let config = ResolverConfig {
            base_url: base.to_string(),
            ..Default::default()
        };
        HttpTransport::new(&config).unwrap()
    }

    #[test]
    fn url_segments_are_appended() {
        let t = transport("https://generativelanguage.googleapis.com");
        let url = t.url_for(&["v1beta", "models"]);
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models"
        );
    }

    #[test]
    fn model_segment_is_encoded() {
        let t = transport("http://localhost:8080/");
        let url = t.url_for(&["v1", "models", "odd/name"]);
        assert_eq!(url.path(), "/v1/models/odd%2Fname");
    }

    #[tokio::test]
    async fn connection_error_omits_credential() {
        let t = transport("http://127.0.0.1:1");
        let err = t
            .get_json(&["v1beta", "models"], "AIzaSECRET123")
            .await
            .unwrap_err();
        let text = err.to_string();
        assert!(!text.contains("AIzaSECRET123"), "{}", text);
        assert!(!text.contains("key="), "{}", text);

        let err = t
            .post_json(&["v1", "models", "gemini:generateContent"], "AIzaSECRET123", &serde_json::json!({}), "req-1")
            .await
            .unwrap_err();
        assert!(!err.to_string().contains("AIzaSECRET123"));
    }

    #[test]
    fn reply_error_message() {
        let reply = HttpReply {
            status: 403,
            body: serde_json::json!({"error": {"message": "API key not valid"}}),
        };
        assert!(!reply.is_success());
        assert_eq!(reply.error_message(), Some("API key not valid"));
    }
}
