//! Tracks the single cart that is open for modification.
//!
//! At most one cart is active at a time. The registry owns that rule at
//! the service level: callers ask it for the open cart instead of
//! scanning the cart list themselves.

use common::CartId;
use domain::{Cart, CartError};

use crate::error::{Result, StoreError};
use crate::store::ShopStore;

/// Hands out the active cart and moves carts between states.
#[derive(Debug, Clone)]
pub struct ActiveCartRegistry<S> {
    store: S,
}

impl<S: ShopStore> ActiveCartRegistry<S> {
    /// Creates a registry backed by the given store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the cart that is currently open, if any.
    pub async fn active(&self) -> Result<Option<Cart>> {
        self.store.active_cart().await
    }

    /// Opens a new cart.
    ///
    /// Fails with `CartInProgress` if another cart is still open.
    pub async fn open(&self) -> Result<Cart> {
        self.store.create_cart().await
    }

    /// Returns the open cart, creating one if none exists.
    pub async fn get_or_create(&self) -> Result<Cart> {
        if let Some(cart) = self.store.active_cart().await? {
            return Ok(cart);
        }
        match self.store.create_cart().await {
            Ok(cart) => Ok(cart),
            Err(StoreError::Cart(CartError::CartInProgress { .. })) => {
                // Another caller opened a cart between our check and the
                // create; hand out theirs.
                match self.store.active_cart().await? {
                    Some(cart) => Ok(cart),
                    None => self.store.create_cart().await,
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Marks the cart completed, freeing the active slot.
    pub async fn complete(&self, cart_id: CartId) -> Result<Cart> {
        self.store.set_cart_completed(cart_id, true).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;

    #[tokio::test]
    async fn get_or_create_reuses_the_open_cart() {
        let registry = ActiveCartRegistry::new(InMemoryStore::new());

        let first = registry.get_or_create().await.unwrap();
        let second = registry.get_or_create().await.unwrap();

        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn open_refuses_a_second_cart() {
        let registry = ActiveCartRegistry::new(InMemoryStore::new());

        let cart = registry.open().await.unwrap();
        let err = registry.open().await.unwrap_err();

        assert_eq!(
            err.to_string(),
            format!("One cart still in progress: {}", cart.id)
        );
    }

    #[tokio::test]
    async fn completing_frees_the_slot() {
        let registry = ActiveCartRegistry::new(InMemoryStore::new());

        let first = registry.open().await.unwrap();
        registry.complete(first.id).await.unwrap();
        assert!(registry.active().await.unwrap().is_none());

        let second = registry.get_or_create().await.unwrap();
        assert_ne!(first.id, second.id);
    }
}
