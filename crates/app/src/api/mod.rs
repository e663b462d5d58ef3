//! Storefront API client

pub mod client;
pub mod config;
pub mod envelope;
pub mod errors;

pub use client::*;
pub use config::{ApiConfig, ApiToken};
pub use errors::ApiError;
