//! HTTP transport over the storefront API.

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::Value;

use super::{config::ApiConfig, errors::ApiError};

/// The raw request surface every service is built against.
///
/// Production traffic goes through [`ApiClient`]; tests substitute
/// `MockTransport`. Bodies and responses stay as [`Value`] here so the
/// envelope unwrapping in [`super::envelope`] remains the single
/// deserialization step.
#[automock]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET request.
    async fn get(&self, path: &str) -> Result<Value, ApiError>;

    /// Issue a POST request with a JSON body.
    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError>;

    /// Issue a PUT request with a JSON body.
    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError>;

    /// Issue a DELETE request.
    async fn delete(&self, path: &str) -> Result<Value, ApiError>;
}

/// Reqwest-backed [`Transport`] with base URL and bearer injection.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );

        let request = self.http.request(method, url);

        match &self.config.token {
            Some(token) => request.bearer_auth(token.expose()),
            None => request,
        }
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(ApiError::server(
                status.as_u16(),
                status.canonical_reason().unwrap_or_default(),
                &body,
            ));
        }

        let body = response.text().await?;

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(ApiError::Decode)
    }
}

#[async_trait]
impl Transport for ApiClient {
    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.execute(self.request(Method::GET, path)).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.execute(self.request(Method::POST, path).json(&body))
            .await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value, ApiError> {
        self.execute(self.request(Method::PUT, path).json(&body))
            .await
    }

    async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.execute(self.request(Method::DELETE, path)).await
    }
}
