//! Stock reservation decisions.

use common::ProductId;

use crate::cart::CartError;
use crate::catalog::Product;

/// Outcome of a successful reservation.
///
/// The store is responsible for persisting `stock_after` in the same
/// atomic unit as the line-item write that motivated the reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockReservation {
    /// Product the stock was reserved from.
    pub product_id: ProductId,

    /// Units reserved.
    pub quantity: i32,

    /// Stock remaining once the reservation is applied.
    pub stock_after: i32,
}

/// Decides whether `quantity` units can be taken from the product's stock.
///
/// Check order matters: a product with zero stock reports
/// [`CartError::OutOfStock`] even for absurd quantities, and a product with
/// some stock but not enough reports [`CartError::InsufficientStock`] with
/// what was requested versus what was available.
pub fn reserve(product: &Product, quantity: i32) -> Result<StockReservation, CartError> {
    if quantity <= 0 {
        return Err(CartError::InvalidQuantity { quantity });
    }
    if product.current_stock == 0 {
        return Err(CartError::OutOfStock {
            product_id: product.id,
        });
    }
    if quantity > product.current_stock {
        return Err(CartError::InsufficientStock {
            product_id: product.id,
            requested: quantity,
            available: product.current_stock,
        });
    }

    Ok(StockReservation {
        product_id: product.id,
        quantity,
        stock_after: product.current_stock - quantity,
    })
}
