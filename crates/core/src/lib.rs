//! Stratus
//!
//! Core pricing and domain types for the Stratus hosting storefront: cart
//! pricing and normalization, billing cycles, instance action gating, and
//! monitoring rate derivation. Everything here is pure and synchronous; the
//! HTTP services and CLI live in the `stratus-app` crate.

pub mod billing;
pub mod cart;
pub mod catalog;
pub mod instance;
pub mod money;
pub mod monitoring;
pub mod normalize;
pub mod quote;
