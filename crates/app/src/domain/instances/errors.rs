//! Instances service errors.

use stratus::instance::{InstanceAction, InstanceStatus};
use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum InstancesServiceError {
    #[error("instance {0} not found")]
    InstanceNotFound(i64),

    #[error("cannot {} an instance that is {status:?}", action.as_str())]
    ActionNotAvailable {
        action: InstanceAction,
        status: InstanceStatus,
    },

    #[error("instance watch ended before the instance settled")]
    WatchInterrupted,

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl InstancesServiceError {
    /// The message to show the user, preferring server-provided text.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Api(error) => error.display_message(),
            other => other.to_string(),
        }
    }
}
