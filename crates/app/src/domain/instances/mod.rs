//! Instances

pub mod errors;
pub mod models;
pub mod service;

pub use errors::InstancesServiceError;
pub use service::*;
