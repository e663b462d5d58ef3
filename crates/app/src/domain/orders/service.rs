//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;

use crate::{
    api::{Transport, envelope},
    domain::orders::{errors::OrdersServiceError, models::Order},
};

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Retrieve the customer's orders.
    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError>;

    /// Retrieve a single order. A missing order is fatal to the caller.
    async fn get_order(&self, order_id: i64) -> Result<Order, OrdersServiceError>;
}

#[derive(Clone)]
pub struct RemoteOrdersService {
    transport: Arc<dyn Transport>,
}

impl RemoteOrdersService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl OrdersService for RemoteOrdersService {
    async fn list_orders(&self) -> Result<Vec<Order>, OrdersServiceError> {
        let payload = self.transport.get("/user/orders").await?;

        Ok(envelope::decode(payload)?)
    }

    async fn get_order(&self, order_id: i64) -> Result<Order, OrdersServiceError> {
        let payload = self
            .transport
            .get(&format!("/user/orders/{order_id}"))
            .await
            .map_err(|error| {
                if error.is_not_found() {
                    OrdersServiceError::OrderNotFound(order_id)
                } else {
                    error.into()
                }
            })?;

        Ok(envelope::decode(payload)?)
    }
}
