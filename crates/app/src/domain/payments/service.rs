//! Payments service.

use std::{ops::ControlFlow, sync::Arc, time::Duration};

use async_trait::async_trait;
use mockall::automock;
use serde_json::json;
use tracing::debug;

use crate::{
    api::{Transport, envelope},
    domain::payments::{errors::PaymentsServiceError, models::Payment},
    poll::spawn_poller,
};

/// How often payment confirmation is polled.
pub const STATUS_POLL_PERIOD: Duration = Duration::from_secs(5);

#[automock]
#[async_trait]
pub trait PaymentsService: Send + Sync {
    /// Create a payment for an order; the response carries the QR payload.
    async fn create(&self, order_id: i64) -> Result<Payment, PaymentsServiceError>;

    /// Retrieve the current gateway status.
    async fn status(&self, payment_id: i64) -> Result<Payment, PaymentsServiceError>;

    /// Ask the backend to re-check the gateway immediately.
    async fn check(&self, payment_id: i64) -> Result<Payment, PaymentsServiceError>;

    /// Cancel a pending payment.
    async fn cancel(&self, payment_id: i64) -> Result<(), PaymentsServiceError>;
}

#[derive(Clone)]
pub struct RemotePaymentsService {
    transport: Arc<dyn Transport>,
}

impl RemotePaymentsService {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl PaymentsService for RemotePaymentsService {
    async fn create(&self, order_id: i64) -> Result<Payment, PaymentsServiceError> {
        let payload = self
            .transport
            .post("/user/payment/create", json!({ "order_id": order_id }))
            .await?;

        Ok(envelope::decode(payload)?)
    }

    async fn status(&self, payment_id: i64) -> Result<Payment, PaymentsServiceError> {
        let payload = self
            .transport
            .get(&format!("/user/payment/status/{payment_id}"))
            .await
            .map_err(|error| {
                if error.is_not_found() {
                    PaymentsServiceError::PaymentNotFound(payment_id)
                } else {
                    error.into()
                }
            })?;

        Ok(envelope::decode(payload)?)
    }

    async fn check(&self, payment_id: i64) -> Result<Payment, PaymentsServiceError> {
        let payload = self
            .transport
            .post(&format!("/user/payment/check/{payment_id}"), json!({}))
            .await?;

        Ok(envelope::decode(payload)?)
    }

    async fn cancel(&self, payment_id: i64) -> Result<(), PaymentsServiceError> {
        self.transport
            .delete(&format!("/user/payment/{payment_id}"))
            .await?;

        Ok(())
    }
}

/// Poll a payment until the gateway reports a terminal status.
///
/// Fetch failures do not end the watch; the next tick retries. A response
/// arriving after confirmation is harmless because each tick replaces the
/// observed status wholesale only with fresher data.
///
/// # Errors
///
/// Returns [`PaymentsServiceError::WatchInterrupted`] when the poll task is
/// stopped before a terminal status, or [`PaymentsServiceError::PaymentNotFound`]
/// when the payment disappears server-side.
pub async fn watch_until_terminal(
    payments: Arc<dyn PaymentsService>,
    payment_id: i64,
    period: Duration,
) -> Result<Payment, PaymentsServiceError> {
    let handle = spawn_poller(period, move || {
        let payments = Arc::clone(&payments);

        async move {
            match payments.status(payment_id).await {
                Ok(payment) if payment.status.is_terminal() => ControlFlow::Break(Ok(payment)),
                Ok(payment) => {
                    debug!(payment_id, status = ?payment.status, "payment not settled yet");

                    ControlFlow::Continue(())
                }
                Err(PaymentsServiceError::PaymentNotFound(id)) => {
                    ControlFlow::Break(Err(PaymentsServiceError::PaymentNotFound(id)))
                }
                Err(error) => {
                    debug!(payment_id, "payment status poll failed, retrying: {error}");

                    ControlFlow::Continue(())
                }
            }
        }
    });

    handle
        .join()
        .await
        .ok_or(PaymentsServiceError::WatchInterrupted)?
}
