//! Catalog service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use stratus::catalog::{Addon, OsTemplate, Product};
use tracing::warn;

use crate::{
    api::{Transport, envelope},
    domain::catalog::errors::CatalogServiceError,
};

/// Read-only access to the public product catalog.
///
/// OS templates and addons are optional page data: when their fetch fails
/// the caller continues with an empty list rather than failing the whole
/// flow. A missing product, by contrast, is fatal to the requesting command.
#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieve every sellable product.
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product_id: i64) -> Result<Product, CatalogServiceError>;

    /// Retrieve the selectable OS templates; empty on failure.
    async fn list_os_templates(&self) -> Result<Vec<OsTemplate>, CatalogServiceError>;

    /// Retrieve the available addons; empty on failure.
    async fn list_addons(&self) -> Result<Vec<Addon>, CatalogServiceError>;
}

#[derive(Clone)]
pub struct RemoteCatalogService {
    transport: Arc<dyn Transport>,
}

impl RemoteCatalogService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl CatalogService for RemoteCatalogService {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError> {
        let payload = self.transport.get("/public/products").await?;

        Ok(envelope::decode(payload)?)
    }

    async fn get_product(&self, product_id: i64) -> Result<Product, CatalogServiceError> {
        let payload = self
            .transport
            .get(&format!("/public/products/{product_id}"))
            .await
            .map_err(|error| {
                if error.is_not_found() {
                    CatalogServiceError::ProductNotFound(product_id)
                } else {
                    error.into()
                }
            })?;

        Ok(envelope::decode(payload)?)
    }

    async fn list_os_templates(&self) -> Result<Vec<OsTemplate>, CatalogServiceError> {
        let payload = match self.transport.get("/public/os-templates").await {
            Ok(payload) => payload,
            Err(error) => {
                warn!("os template fetch failed, continuing without: {error}");

                return Ok(Vec::new());
            }
        };

        Ok(envelope::decode(payload)?)
    }

    async fn list_addons(&self) -> Result<Vec<Addon>, CatalogServiceError> {
        let payload = match self.transport.get("/public/addons").await {
            Ok(payload) => payload,
            Err(error) => {
                warn!("addon fetch failed, continuing without: {error}");

                return Ok(Vec::new());
            }
        };

        Ok(envelope::decode(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use crate::api::{ApiError, MockTransport};

    use super::*;

    #[tokio::test]
    async fn products_are_decoded_through_the_envelope() -> TestResult {
        let mut transport = MockTransport::new();

        transport
            .expect_get()
            .withf(|path| path == "/public/products")
            .returning(|_| {
                Ok(json!({
                    "data": [
                        { "id": 7, "name": "VPS Basic", "monthly_price": 120_000, "yearly_price": 1_200_000 },
                    ],
                }))
            });

        let service = RemoteCatalogService::new(Arc::new(transport));
        let products = service.list_products().await?;

        assert_eq!(products.len(), 1);
        assert_eq!(products.first().map(|product| product.id), Some(7));

        Ok(())
    }

    #[tokio::test]
    async fn missing_product_is_fatal() {
        let mut transport = MockTransport::new();

        transport
            .expect_get()
            .returning(|_| Err(ApiError::server(404, "Not Found", "{}")));

        let service = RemoteCatalogService::new(Arc::new(transport));
        let result = service.get_product(99).await;

        assert!(matches!(
            result,
            Err(CatalogServiceError::ProductNotFound(99))
        ));
    }

    #[tokio::test]
    async fn optional_addon_data_degrades_to_empty() -> TestResult {
        let mut transport = MockTransport::new();

        transport
            .expect_get()
            .returning(|_| Err(ApiError::server(500, "Internal Server Error", "{}")));

        let service = RemoteCatalogService::new(Arc::new(transport));

        assert!(service.list_addons().await?.is_empty());
        assert!(service.list_os_templates().await?.is_empty());

        Ok(())
    }
}
