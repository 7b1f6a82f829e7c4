//! The cart aggregate and its line items.

use chrono::{DateTime, Utc};
use common::{CartId, CartItemId, ProductId};
use serde::{Deserialize, Serialize};

use crate::cart::CartError;
use crate::cart::state::CartState;
use crate::price::Price;

/// A shopping cart.
///
/// The `completed` flag is the whole lifecycle: it starts false and may
/// only ever flip to true. Line items live in the store, keyed by cart id,
/// not inside this struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Unique identifier.
    pub id: CartId,

    /// When the cart was opened.
    pub created_at: DateTime<Utc>,

    /// Whether checkout has happened.
    pub completed: bool,
}

impl Cart {
    /// Opens a new active cart.
    pub fn new() -> Self {
        Self {
            id: CartId::new(),
            created_at: Utc::now(),
            completed: false,
        }
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> CartState {
        if self.completed {
            CartState::Completed
        } else {
            CartState::Active
        }
    }

    /// Returns true if items can still be added.
    pub fn can_modify_items(&self) -> bool {
        self.state().can_modify_items()
    }

    /// Sets the completed flag, enforcing the one-way transition.
    ///
    /// Re-asserting the current value is an idempotent re-save. Flipping a
    /// completed cart back to active fails with [`CartError::CartClosed`].
    pub fn set_completed(&mut self, completed: bool) -> Result<(), CartError> {
        if self.completed && !completed {
            return Err(CartError::CartClosed { cart_id: self.id });
        }
        self.completed = completed;
        Ok(())
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

/// A line item: one product within one cart.
///
/// At most one line item exists per (cart, product) pair; repeated adds
/// merge into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Unique identifier.
    pub id: CartItemId,

    /// Owning cart.
    pub cart_id: CartId,

    /// Referenced product.
    pub product_id: ProductId,

    /// Units of the product in the cart, always positive.
    pub quantity: i32,
}

impl CartItem {
    /// Creates a line item with a fresh identifier.
    pub fn new(cart_id: CartId, product_id: ProductId, quantity: i32) -> Self {
        Self {
            id: CartItemId::new(),
            cart_id,
            product_id,
            quantity,
        }
    }

    /// Returns the line sub-total at the given unit price.
    pub fn sub_total(&self, unit_price: Price) -> Price {
        unit_price.times(self.quantity)
    }
}
