//! Carts service errors.

use stratus::{cart::CartError, normalize::NormalizeError, quote::QuoteError};
use thiserror::Error;

use crate::{
    api::ApiError,
    domain::{carts::store::LocalStoreError, catalog::errors::CatalogServiceError},
};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("sign in before checking out")]
    AuthenticationRequired,

    #[error("no addon of type {0} is available")]
    UnknownAddon(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Catalog(#[from] CatalogServiceError),

    #[error("failed to read or write the saved cart")]
    Store(#[from] LocalStoreError),
}

impl CartsServiceError {
    /// The message to show the user, preferring server-provided text.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Api(error) => error.display_message(),
            other => other.to_string(),
        }
    }
}
