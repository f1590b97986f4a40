use super::{ApiVersion, CatalogListing, ModelCatalog, ModelDescriptor};
use crate::transport::HttpTransport;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

/// HTTP implementation of [`ModelCatalog`].
#[derive(Clone)]
pub struct CatalogFetcher {
    transport: Arc<HttpTransport>,
}

impl CatalogFetcher {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl ModelCatalog for CatalogFetcher {
    async fn list_models(&self, version: ApiVersion, credential: &str) -> CatalogListing {
        match self
            .transport
            .get_json(&[version.as_str(), "models"], credential)
            .await
        {
            Ok(reply) => {
                let listing = CatalogListing::from_reply(version, reply.status, reply.body);
                debug!(
                    api_version = %version,
                    status = listing.status,
                    models = listing.descriptors().len(),
                    "model catalog fetched"
                );
                listing
            }
            Err(e) => {
                warn!(api_version = %version, error = %e, "model catalog request failed");
                CatalogListing::failed(version, 0, serde_json::json!({ "error": e.to_string() }))
            }
        }
    }

    async fn probe_model(
        &self,
        version: ApiVersion,
        credential: &str,
        model_id: &str,
    ) -> Option<ModelDescriptor> {
        let short_id = model_id.strip_prefix("models/").unwrap_or(model_id);
        match self
            .transport
            .get_json(&[version.as_str(), "models", short_id], credential)
            .await
        {
            Ok(reply) if reply.is_success() => ModelDescriptor::from_entry(&reply.body, version)
                .or_else(|| Some(ModelDescriptor::new(model_id, Vec::<String>::new(), version))),
            Ok(reply) => {
                debug!(api_version = %version, model = model_id, status = reply.status, "model probe miss");
                None
            }
            Err(e) => {
                debug!(api_version = %version, model = model_id, error = %e, "model probe failed");
                None
            }
        }
    }
}
