//! API client configuration.

use std::fmt;

use zeroize::Zeroize;

/// Configuration for connecting to the storefront API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API base URL, e.g. `"https://portal.example.vn/api"`.
    pub base_url: String,

    /// Bearer token for authenticated endpoints. Unauthenticated sessions
    /// keep the cart in the local store instead.
    pub token: Option<ApiToken>,
}

impl ApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, token: Option<ApiToken>) -> Self {
        Self {
            base_url: base_url.into(),
            token,
        }
    }

    /// Whether requests carry an `Authorization` header.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// A bearer token; the secret is wiped from memory on drop.
#[derive(Clone)]
pub struct ApiToken {
    secret: String,
}

impl ApiToken {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// The raw token, for building the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.secret
    }
}

impl Drop for ApiToken {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(redacted)")
    }
}
