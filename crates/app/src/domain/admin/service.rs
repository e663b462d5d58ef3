//! Admin service.
//!
//! CRUD over the back-office collections. Payloads are typed drafts and
//! patches; mutation failures carry the server message through unchanged.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use serde_json::json;
use stratus::catalog::{Addon, Product};

use crate::{
    api::{Transport, envelope},
    domain::{
        admin::{
            errors::AdminServiceError,
            models::{
                AddonDraft, AdminDiscount, AdminOrder, Banner, BannerDraft, DiscountDraft,
                ProductDraft, ProductPatch,
            },
        },
        orders::models::OrderStatus,
    },
};

#[automock]
#[async_trait]
pub trait AdminService: Send + Sync {
    /// List every product, including unpublished ones.
    async fn list_products(&self) -> Result<Vec<Product>, AdminServiceError>;

    /// Create a product.
    async fn create_product(&self, draft: ProductDraft) -> Result<Product, AdminServiceError>;

    /// Apply a partial update to a product.
    async fn update_product(
        &self,
        product_id: i64,
        patch: ProductPatch,
    ) -> Result<Product, AdminServiceError>;

    /// Delete a product.
    async fn delete_product(&self, product_id: i64) -> Result<(), AdminServiceError>;

    /// List configured discounts.
    async fn list_discounts(&self) -> Result<Vec<AdminDiscount>, AdminServiceError>;

    /// Attach a discount to a product.
    async fn create_discount(
        &self,
        draft: DiscountDraft,
    ) -> Result<AdminDiscount, AdminServiceError>;

    /// Remove a discount.
    async fn delete_discount(&self, discount_id: i64) -> Result<(), AdminServiceError>;

    /// Create an addon.
    async fn create_addon(&self, draft: AddonDraft) -> Result<Addon, AdminServiceError>;

    /// Remove an addon.
    async fn delete_addon(&self, addon_id: i64) -> Result<(), AdminServiceError>;

    /// List every customer order.
    async fn list_orders(&self) -> Result<Vec<AdminOrder>, AdminServiceError>;

    /// Override an order's status.
    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<AdminOrder, AdminServiceError>;

    /// List homepage banners.
    async fn list_banners(&self) -> Result<Vec<Banner>, AdminServiceError>;

    /// Create a homepage banner.
    async fn create_banner(&self, draft: BannerDraft) -> Result<Banner, AdminServiceError>;

    /// Remove a homepage banner.
    async fn delete_banner(&self, banner_id: i64) -> Result<(), AdminServiceError>;

    /// The products currently featured on the homepage.
    async fn featured_products(&self) -> Result<Vec<Product>, AdminServiceError>;

    /// Replace the featured-product curation.
    async fn set_featured_products(&self, product_ids: Vec<i64>)
    -> Result<(), AdminServiceError>;
}

#[derive(Clone)]
pub struct RemoteAdminService {
    transport: Arc<dyn Transport>,
}

impl RemoteAdminService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl AdminService for RemoteAdminService {
    async fn list_products(&self) -> Result<Vec<Product>, AdminServiceError> {
        let payload = self.transport.get("/admin/products").await?;

        Ok(envelope::decode(payload)?)
    }

    async fn create_product(&self, draft: ProductDraft) -> Result<Product, AdminServiceError> {
        let body = serde_json::to_value(draft).map_err(crate::api::ApiError::Encode)?;
        let payload = self.transport.post("/admin/products", body).await?;

        Ok(envelope::decode(payload)?)
    }

    async fn update_product(
        &self,
        product_id: i64,
        patch: ProductPatch,
    ) -> Result<Product, AdminServiceError> {
        let body = serde_json::to_value(patch).map_err(crate::api::ApiError::Encode)?;

        let payload = self
            .transport
            .put(&format!("/admin/products/{product_id}"), body)
            .await
            .map_err(|error| {
                AdminServiceError::map_not_found(error, format!("product {product_id}"))
            })?;

        Ok(envelope::decode(payload)?)
    }

    async fn delete_product(&self, product_id: i64) -> Result<(), AdminServiceError> {
        self.transport
            .delete(&format!("/admin/products/{product_id}"))
            .await
            .map_err(|error| {
                AdminServiceError::map_not_found(error, format!("product {product_id}"))
            })?;

        Ok(())
    }

    async fn list_discounts(&self) -> Result<Vec<AdminDiscount>, AdminServiceError> {
        let payload = self.transport.get("/admin/discounts").await?;

        Ok(envelope::decode(payload)?)
    }

    async fn create_discount(
        &self,
        draft: DiscountDraft,
    ) -> Result<AdminDiscount, AdminServiceError> {
        let body = serde_json::to_value(draft).map_err(crate::api::ApiError::Encode)?;
        let payload = self.transport.post("/admin/discounts", body).await?;

        Ok(envelope::decode(payload)?)
    }

    async fn delete_discount(&self, discount_id: i64) -> Result<(), AdminServiceError> {
        self.transport
            .delete(&format!("/admin/discounts/{discount_id}"))
            .await
            .map_err(|error| {
                AdminServiceError::map_not_found(error, format!("discount {discount_id}"))
            })?;

        Ok(())
    }

    async fn create_addon(&self, draft: AddonDraft) -> Result<Addon, AdminServiceError> {
        let body = serde_json::to_value(draft).map_err(crate::api::ApiError::Encode)?;
        let payload = self.transport.post("/admin/addons", body).await?;

        Ok(envelope::decode(payload)?)
    }

    async fn delete_addon(&self, addon_id: i64) -> Result<(), AdminServiceError> {
        self.transport
            .delete(&format!("/admin/addons/{addon_id}"))
            .await
            .map_err(|error| AdminServiceError::map_not_found(error, format!("addon {addon_id}")))?;

        Ok(())
    }

    async fn list_orders(&self) -> Result<Vec<AdminOrder>, AdminServiceError> {
        let payload = self.transport.get("/admin/orders").await?;

        Ok(envelope::decode(payload)?)
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<AdminOrder, AdminServiceError> {
        let body = json!({ "status": status });

        let payload = self
            .transport
            .put(&format!("/admin/orders/{order_id}"), body)
            .await
            .map_err(|error| AdminServiceError::map_not_found(error, format!("order {order_id}")))?;

        Ok(envelope::decode(payload)?)
    }

    async fn list_banners(&self) -> Result<Vec<Banner>, AdminServiceError> {
        let payload = self.transport.get("/admin/homepage/banners").await?;

        Ok(envelope::decode(payload)?)
    }

    async fn create_banner(&self, draft: BannerDraft) -> Result<Banner, AdminServiceError> {
        let body = serde_json::to_value(draft).map_err(crate::api::ApiError::Encode)?;
        let payload = self.transport.post("/admin/homepage/banners", body).await?;

        Ok(envelope::decode(payload)?)
    }

    async fn delete_banner(&self, banner_id: i64) -> Result<(), AdminServiceError> {
        self.transport
            .delete(&format!("/admin/homepage/banners/{banner_id}"))
            .await
            .map_err(|error| {
                AdminServiceError::map_not_found(error, format!("banner {banner_id}"))
            })?;

        Ok(())
    }

    async fn featured_products(&self) -> Result<Vec<Product>, AdminServiceError> {
        let payload = self.transport.get("/admin/homepage/featured").await?;

        Ok(envelope::decode(payload)?)
    }

    async fn set_featured_products(
        &self,
        product_ids: Vec<i64>,
    ) -> Result<(), AdminServiceError> {
        self.transport
            .put(
                "/admin/homepage/featured",
                json!({ "product_ids": product_ids }),
            )
            .await?;

        Ok(())
    }
}
