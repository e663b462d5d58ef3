//! Stratus application services.
//!
//! The async half of the storefront client: a typed HTTP client over the
//! provider's REST API, one service object per domain area, cancellable
//! polling tasks, and the notification center. The pure pricing and domain
//! types live in the `stratus` core crate.

pub mod api;
pub mod context;
pub mod domain;
pub mod notify;
pub mod poll;
