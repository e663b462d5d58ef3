//! Payments service errors.

use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum PaymentsServiceError {
    #[error("payment {0} not found")]
    PaymentNotFound(i64),

    #[error("payment watch ended before a terminal status")]
    WatchInterrupted,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl PaymentsServiceError {
    /// The message to show the user, preferring server-provided text.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Api(error) => error.display_message(),
            other => other.to_string(),
        }
    }
}
