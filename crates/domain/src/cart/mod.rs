//! Cart aggregate, stock ledger, and line reconciliation.

mod aggregate;
mod ledger;
mod reconcile;
mod state;
mod total;

pub use aggregate::{Cart, CartItem};
pub use ledger::{StockReservation, reserve};
pub use reconcile::{LineChange, ReconciledAdd, reconcile_add};
pub use state::CartState;
pub use total::cart_total;

use common::{CartId, ProductId};
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    /// Quantity must be a positive number of units.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: i32 },

    /// The cart has been completed and can no longer change.
    #[error("Cart {cart_id} is completed and can no longer be modified")]
    CartClosed { cart_id: CartId },

    /// Another cart is still active; only one may be open at a time.
    #[error("One cart still in progress: {cart_id}")]
    CartInProgress { cart_id: CartId },

    /// The product has no stock left at all.
    #[error("Product {product_id} is out of stock")]
    OutOfStock { product_id: ProductId },

    /// The product has stock, but fewer units than requested.
    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: i32,
        available: i32,
    },
}
