//! Orders service errors.

use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order {0} not found")]
    OrderNotFound(i64),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl OrdersServiceError {
    /// The message to show the user, preferring server-provided text.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Api(error) => error.display_message(),
            other => other.to_string(),
        }
    }
}
