//! API client errors.

use serde::Deserialize;
use thiserror::Error;

/// Fallback shown when the server did not provide a usable message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// An HTTP transport error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("failed to decode response body")]
    Decode(#[source] serde_json::Error),

    /// A request body could not be serialized.
    #[error("failed to encode request body")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl ApiError {
    /// Build a [`ApiError::Server`] from a non-2xx response body, preferring
    /// the server-provided `message` field over the bare status text.
    pub(crate) fn server(status: u16, reason: &str, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .map(|parsed| parsed.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("request failed with status {status} {reason}"));

        Self::Server { status, message }
    }

    /// Whether the server reported the resource as missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Server { status: 404, .. })
    }

    /// The message to show the user: the server-provided one when present,
    /// the generic fallback otherwise.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            Self::Server { message, .. } if !message.is_empty() => message.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_field_is_preferred() {
        let error = ApiError::server(422, "Unprocessable Entity", r#"{"message":"cart is empty"}"#);

        assert!(matches!(
            &error,
            ApiError::Server { status: 422, message } if message == "cart is empty"
        ));
        assert_eq!(error.display_message(), "cart is empty");
    }

    #[test]
    fn unparseable_body_falls_back_to_status_text() {
        let error = ApiError::server(502, "Bad Gateway", "<html>oops</html>");

        assert!(matches!(
            &error,
            ApiError::Server { status: 502, message } if message.contains("502 Bad Gateway")
        ));
    }

    #[test]
    fn blank_message_field_is_ignored() {
        let error = ApiError::server(500, "Internal Server Error", r#"{"message":"  "}"#);

        assert!(matches!(
            &error,
            ApiError::Server { message, .. } if message.contains("500")
        ));
    }

    #[test]
    fn not_found_detection() {
        let missing = ApiError::server(404, "Not Found", "{}");
        let broken = ApiError::server(500, "Internal Server Error", "{}");

        assert!(missing.is_not_found());
        assert!(!broken.is_not_found());
    }

    #[test]
    fn decode_errors_display_the_generic_message() {
        let decode_error =
            serde_json::from_str::<ErrorBody>("[]").expect_err("should fail to parse");

        let error = ApiError::Decode(decode_error);

        assert_eq!(error.display_message(), GENERIC_ERROR_MESSAGE);
    }
}
