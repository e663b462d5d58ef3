//! Local persistence for the unauthenticated cart.
//!
//! The whole cart lives in a single JSON file, read once when the store is
//! opened and rewritten on every mutation. An empty cart removes the file
//! instead of leaving an empty document behind.

use std::{
    fs, io,
    path::PathBuf,
    sync::{Mutex, MutexGuard, PoisonError},
};

use stratus::cart::{Cart, CartError};
use thiserror::Error;
use tracing::debug;

/// Errors raised by the local cart store.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("cart file i/o failed")]
    Io(#[from] io::Error),

    #[error("cart file holds invalid JSON")]
    Serialization(#[from] serde_json::Error),
}

/// A file-backed cart for sessions without an API token.
#[derive(Debug)]
pub struct LocalCartStore {
    path: PathBuf,
    cart: Mutex<Cart>,
}

impl LocalCartStore {
    /// Open the store, loading the saved cart if the file exists.
    ///
    /// # Errors
    ///
    /// Returns [`LocalStoreError`] when the file exists but cannot be read
    /// or parsed.
    pub fn open(path: PathBuf) -> Result<Self, LocalStoreError> {
        let cart = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => Cart::new(),
            Err(error) => return Err(error.into()),
        };

        Ok(Self {
            path,
            cart: Mutex::new(cart),
        })
    }

    /// A copy of the current cart.
    #[must_use]
    pub fn snapshot(&self) -> Cart {
        self.lock().clone()
    }

    /// Apply a mutation and persist the result.
    ///
    /// # Errors
    ///
    /// Propagates the mutation's [`CartError`], or a [`LocalStoreError`] via
    /// the outer `Result` when rewriting the file fails. The in-memory cart
    /// keeps the mutation either way.
    pub fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut Cart) -> Result<T, CartError>,
    ) -> Result<Result<T, CartError>, LocalStoreError> {
        let mut cart = self.lock();

        let outcome = apply(&mut cart);

        if outcome.is_ok() {
            self.persist(&cart)?;
        }

        Ok(outcome)
    }

    /// Forget every item and remove the file.
    ///
    /// # Errors
    ///
    /// Returns [`LocalStoreError`] when removing the file fails.
    pub fn clear(&self) -> Result<(), LocalStoreError> {
        let mut cart = self.lock();

        cart.clear();

        self.persist(&cart)
    }

    fn persist(&self, cart: &Cart) -> Result<(), LocalStoreError> {
        if cart.is_empty() {
            debug!(path = %self.path.display(), "cart empty, removing saved file");

            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(error) => Err(error.into()),
            };
        }

        let bytes = serde_json::to_vec_pretty(cart)?;

        fs::write(&self.path, bytes)?;

        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
