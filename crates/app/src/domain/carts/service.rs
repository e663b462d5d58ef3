//! Carts service.
//!
//! Two implementations share one trait: [`RemoteCartsService`] for
//! authenticated sessions, backed by the cart endpoints, and
//! [`LocalCartsService`] for anonymous sessions, pricing configurations
//! locally and persisting them in the [`LocalCartStore`]. Reads fall back
//! to the saved cart when the API is unreachable; writes against the API
//! surface their failure to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use serde_json::json;
use stratus::{
    cart::{Cart, CartItem, Quantity},
    normalize::{self, RawCart, RawCartItem},
    quote::{AddonSelection, QuoteRequest, quote},
};
use tracing::warn;

use crate::{
    api::{Transport, envelope},
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{AddItemRequest, CheckoutReceipt},
            store::LocalCartStore,
        },
        catalog::CatalogService,
    },
};

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve the cart in display-ready form.
    async fn fetch_cart(&self) -> Result<Cart, CartsServiceError>;

    /// Add a configured product and return the created line.
    async fn add_item(&self, request: AddItemRequest) -> Result<CartItem, CartsServiceError>;

    /// Change a line's quantity and return the updated line.
    async fn update_item_quantity(
        &self,
        item_id: &str,
        quantity: Quantity,
    ) -> Result<CartItem, CartsServiceError>;

    /// Remove a line from the cart.
    async fn remove_item(&self, item_id: &str) -> Result<(), CartsServiceError>;

    /// Empty the cart.
    async fn clear(&self) -> Result<(), CartsServiceError>;

    /// Turn the cart into an order.
    async fn checkout(&self) -> Result<CheckoutReceipt, CartsServiceError>;
}

/// Cart operations against the authenticated cart endpoints.
pub struct RemoteCartsService {
    transport: Arc<dyn Transport>,
    store: Arc<LocalCartStore>,
}

impl RemoteCartsService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, store: Arc<LocalCartStore>) -> Self {
        Self { transport, store }
    }
}

#[async_trait]
impl CartsService for RemoteCartsService {
    async fn fetch_cart(&self) -> Result<Cart, CartsServiceError> {
        let payload = match self.transport.get("/user/cart").await {
            Ok(payload) => payload,
            Err(error) => {
                warn!("cart fetch failed, falling back to the saved cart: {error}");

                return Ok(self.store.snapshot());
            }
        };

        let raw: RawCart = envelope::decode(payload)?;

        Ok(normalize::normalize_cart(raw)?)
    }

    async fn add_item(&self, request: AddItemRequest) -> Result<CartItem, CartsServiceError> {
        let body = json!({
            "product_id": request.product_id,
            "billing_cycle": request.billing_cycle.months().to_string(),
            "quantity": request.quantity.get(),
            "addons": request.addons,
            "discount_code": request.discount_code,
        });

        let payload = self.transport.post("/user/cart/items", body).await?;
        let raw: RawCartItem = envelope::decode(payload)?;

        Ok(normalize::normalize_item(raw)?)
    }

    async fn update_item_quantity(
        &self,
        item_id: &str,
        quantity: Quantity,
    ) -> Result<CartItem, CartsServiceError> {
        let body = json!({ "quantity": quantity.get() });

        let payload = self
            .transport
            .put(&format!("/user/cart/items/{item_id}"), body)
            .await?;

        let raw: RawCartItem = envelope::decode(payload)?;

        Ok(normalize::normalize_item(raw)?)
    }

    async fn remove_item(&self, item_id: &str) -> Result<(), CartsServiceError> {
        self.transport
            .delete(&format!("/user/cart/items/{item_id}"))
            .await?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), CartsServiceError> {
        self.transport.delete("/user/cart").await?;

        Ok(())
    }

    async fn checkout(&self) -> Result<CheckoutReceipt, CartsServiceError> {
        let payload = self
            .transport
            .post("/user/cart/checkout", json!({}))
            .await?;

        Ok(envelope::decode(payload)?)
    }
}

/// Cart operations for anonymous sessions, priced locally.
pub struct LocalCartsService {
    catalog: Arc<dyn CatalogService>,
    store: Arc<LocalCartStore>,
}

impl LocalCartsService {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogService>, store: Arc<LocalCartStore>) -> Self {
        Self { catalog, store }
    }
}

#[async_trait]
impl CartsService for LocalCartsService {
    async fn fetch_cart(&self) -> Result<Cart, CartsServiceError> {
        Ok(self.store.snapshot())
    }

    async fn add_item(&self, request: AddItemRequest) -> Result<CartItem, CartsServiceError> {
        let product = self.catalog.get_product(request.product_id).await?;
        let available = self.catalog.list_addons().await?;

        let mut selections = Vec::with_capacity(request.addons.len());

        for requested in &request.addons {
            let addon = available
                .iter()
                .find(|addon| {
                    addon
                        .addon_type
                        .as_str()
                        .eq_ignore_ascii_case(&requested.addon_type)
                })
                .ok_or_else(|| CartsServiceError::UnknownAddon(requested.addon_type.clone()))?;

            selections.push(AddonSelection {
                addon,
                quantity: requested.quantity,
            });
        }

        let quoted = quote(&QuoteRequest {
            product: &product,
            cycle: request.billing_cycle,
            quantity: request.quantity,
            addons: &selections,
            discount_code: request.discount_code.as_deref(),
        })?;

        let item = quoted.into_cart_item(
            &product,
            request.billing_cycle,
            request.quantity,
            Timestamp::now(),
        );

        let stored = item.clone();

        self.store.mutate(move |cart| {
            cart.push_item(stored);

            Ok(())
        })??;

        Ok(item)
    }

    async fn update_item_quantity(
        &self,
        item_id: &str,
        quantity: Quantity,
    ) -> Result<CartItem, CartsServiceError> {
        let updated = self.store.mutate(|cart| {
            let item = cart.get_item_mut(item_id)?;

            item.rescale_quantity(quantity)?;

            Ok(item.clone())
        })??;

        Ok(updated)
    }

    async fn remove_item(&self, item_id: &str) -> Result<(), CartsServiceError> {
        self.store
            .mutate(|cart| cart.remove_item(item_id).map(|_| ()))??;

        Ok(())
    }

    async fn clear(&self) -> Result<(), CartsServiceError> {
        self.store.clear()?;

        Ok(())
    }

    async fn checkout(&self) -> Result<CheckoutReceipt, CartsServiceError> {
        Err(CartsServiceError::AuthenticationRequired)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use stratus::{
        billing::BillingCycle,
        catalog::{Addon, AddonKind, Discount, Product},
    };
    use testresult::TestResult;

    use crate::{
        api::{ApiError, MockTransport},
        domain::catalog::MockCatalogService,
    };

    use super::*;

    fn store() -> (tempfile::TempDir, Arc<LocalCartStore>) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store =
            LocalCartStore::open(dir.path().join("cart.json")).expect("store should open");

        (dir, Arc::new(store))
    }

    fn vps_basic() -> Product {
        Product {
            id: 7,
            name: "VPS Basic".to_string(),
            description: None,
            monthly_price: 100_000,
            yearly_price: 1_000_000,
            attributes: BTreeMap::new(),
            discount: Some(Discount {
                code: "SUMMER10".to_string(),
                discount_percent: 10.0,
            }),
            requires_os_template: true,
        }
    }

    fn ram_addon() -> Addon {
        Addon {
            id: 1,
            addon_type: AddonKind::Ram,
            name: "Extra RAM".to_string(),
            unit: "GB".to_string(),
            unit_price: 50_000,
            max_quantity: 16,
        }
    }

    #[tokio::test]
    async fn remote_fetch_normalizes_the_server_cart() -> TestResult {
        let (_dir, store) = store();
        let mut transport = MockTransport::new();

        transport.expect_get().returning(|_| {
            Ok(serde_json::json!({
                "data": {
                    "cart_id": 5,
                    "items": [
                        {
                            "cart_item_id": 31,
                            "product_id": 7,
                            "product_name": "VPS Basic",
                            "billing_cycle": "12",
                            "quantity": 1,
                            "unit_price": 100_000,
                            "total_price": 1_320_000,
                        },
                    ],
                },
            }))
        });

        let service = RemoteCartsService::new(Arc::new(transport), store);
        let cart = service.fetch_cart().await?;

        assert_eq!(cart.cart_id, Some(5));
        assert_eq!(cart.item_count(), 1);

        let item = cart.get_item("31")?;

        assert_eq!(item.vat, 120_000);
        assert_eq!(item.total, item.subtotal + item.vat);

        Ok(())
    }

    #[tokio::test]
    async fn remote_fetch_falls_back_to_the_saved_cart() -> TestResult {
        let (_dir, store) = store();

        let catalog_store = Arc::clone(&store);

        catalog_store.mutate(|cart| {
            cart.push_item(CartItem {
                id: "local-7-1m-0".to_string(),
                product_id: 7,
                product_name: "VPS Basic".to_string(),
                quantity: Quantity::ONE,
                billing_cycle: BillingCycle::MONTHLY,
                unit_price: 100_000,
                total_price: 110_000,
                subtotal: 100_000,
                vat: 10_000,
                total: 110_000,
                addons_applied: smallvec::smallvec![],
                discount_applied: None,
            });

            Ok(())
        })??;

        let mut transport = MockTransport::new();

        transport
            .expect_get()
            .returning(|_| Err(ApiError::server(503, "Service Unavailable", "{}")));

        let service = RemoteCartsService::new(Arc::new(transport), store);
        let cart = service.fetch_cart().await?;

        assert_eq!(cart.item_count(), 1);
        assert!(cart.contains_product(7));

        Ok(())
    }

    #[tokio::test]
    async fn remote_write_failures_propagate() {
        let (_dir, store) = store();
        let mut transport = MockTransport::new();

        transport
            .expect_delete()
            .returning(|_| Err(ApiError::server(500, "Internal Server Error", "{}")));

        let service = RemoteCartsService::new(Arc::new(transport), store);
        let result = service.remove_item("31").await;

        assert!(matches!(result, Err(CartsServiceError::Api(_))));
    }

    #[tokio::test]
    async fn remote_add_sends_the_wire_cycle_and_normalizes() -> TestResult {
        let (_dir, store) = store();
        let mut transport = MockTransport::new();

        transport
            .expect_post()
            .withf(|path, body| {
                path == "/user/cart/items"
                    && body.get("billing_cycle") == Some(&serde_json::json!("12"))
                    && body.get("quantity") == Some(&serde_json::json!(1))
            })
            .returning(|_, _| {
                Ok(serde_json::json!({
                    "data": {
                        "cart_item_id": 44,
                        "product_id": 7,
                        "product_name": "VPS Basic",
                        "billing_cycle": "12",
                        "quantity": 1,
                        "unit_price": 100_000,
                        "total_price": 1_320_000,
                    },
                }))
            });

        let service = RemoteCartsService::new(Arc::new(transport), store);

        let item = service
            .add_item(AddItemRequest {
                product_id: 7,
                billing_cycle: BillingCycle::ANNUAL,
                quantity: Quantity::ONE,
                addons: Vec::new(),
                discount_code: None,
            })
            .await?;

        assert_eq!(item.id, "44");
        assert_eq!(item.vat, 120_000);

        Ok(())
    }

    #[tokio::test]
    async fn local_add_prices_the_configuration() -> TestResult {
        let (_dir, store) = store();
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_get_product()
            .returning(|_| Ok(vps_basic()));
        catalog
            .expect_list_addons()
            .returning(|| Ok(vec![ram_addon()]));

        let service = LocalCartsService::new(Arc::new(catalog), store);

        let item = service
            .add_item(AddItemRequest {
                product_id: 7,
                billing_cycle: BillingCycle::MONTHLY,
                quantity: Quantity::ONE,
                addons: vec![crate::domain::carts::models::AddonRequest {
                    addon_type: "RAM".to_string(),
                    quantity: 2,
                }],
                discount_code: Some("SUMMER10".to_string()),
            })
            .await?;

        // 100,000 - 10% = 90,000; VAT 9,000; addons 2 x 50,000 undiscounted.
        assert_eq!(item.total, 99_000 + 100_000);
        assert_eq!(item.total, item.subtotal + item.vat);
        assert!(item.id.starts_with("local-7-1m-"));

        let cart = service.fetch_cart().await?;

        assert_eq!(cart.item_count(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn local_add_rejects_unknown_addons() {
        let (_dir, store) = store();
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_get_product()
            .returning(|_| Ok(vps_basic()));
        catalog.expect_list_addons().returning(|| Ok(Vec::new()));

        let service = LocalCartsService::new(Arc::new(catalog), store);

        let result = service
            .add_item(AddItemRequest {
                product_id: 7,
                billing_cycle: BillingCycle::MONTHLY,
                quantity: Quantity::ONE,
                addons: vec![crate::domain::carts::models::AddonRequest {
                    addon_type: "GPU".to_string(),
                    quantity: 1,
                }],
                discount_code: None,
            })
            .await;

        assert!(matches!(
            result,
            Err(CartsServiceError::UnknownAddon(kind)) if kind == "GPU"
        ));
    }

    #[tokio::test]
    async fn local_quantity_update_rescales_without_repricing() -> TestResult {
        let (_dir, store) = store();
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_get_product()
            .returning(|_| Ok(vps_basic()));
        catalog.expect_list_addons().returning(|| Ok(Vec::new()));

        let service = LocalCartsService::new(Arc::new(catalog), store);

        let item = service
            .add_item(AddItemRequest {
                product_id: 7,
                billing_cycle: BillingCycle::MONTHLY,
                quantity: Quantity::new(2)?,
                addons: Vec::new(),
                discount_code: None,
            })
            .await?;

        assert_eq!(item.total, 220_000);

        let updated = service
            .update_item_quantity(&item.id, Quantity::new(3)?)
            .await?;

        assert_eq!(updated.total, 330_000);
        assert_eq!(updated.total, updated.subtotal + updated.vat);

        Ok(())
    }

    #[tokio::test]
    async fn local_checkout_requires_authentication() {
        let (_dir, store) = store();
        let catalog = MockCatalogService::new();

        let service = LocalCartsService::new(Arc::new(catalog), store);

        assert!(matches!(
            service.checkout().await,
            Err(CartsServiceError::AuthenticationRequired)
        ));
    }
}
