//! Catalog service errors.

use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    #[error("product {0} not found")]
    ProductNotFound(i64),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl CatalogServiceError {
    /// The message to show the user, preferring server-provided text.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Api(error) => error.display_message(),
            other => other.to_string(),
        }
    }
}
