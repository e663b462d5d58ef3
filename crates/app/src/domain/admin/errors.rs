//! Admin service errors.

use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum AdminServiceError {
    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl AdminServiceError {
    /// The message to show the user, preferring server-provided text.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Api(error) => error.display_message(),
            other => other.to_string(),
        }
    }

    pub(crate) fn map_not_found(error: ApiError, entity: impl Into<String>) -> Self {
        if error.is_not_found() {
            Self::NotFound(entity.into())
        } else {
            Self::Api(error)
        }
    }
}
