//! Merge-or-create decisions for adding a product to a cart.

use crate::cart::CartError;
use crate::cart::aggregate::{Cart, CartItem};
use crate::cart::ledger::{self, StockReservation};
use crate::catalog::Product;

/// How the cart's line items change after an add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineChange {
    /// No line existed for the product; insert this one.
    Create(CartItem),

    /// A line existed; replace its quantity with the merged value.
    Merge {
        /// The existing line to update.
        item: CartItem,

        /// The merged quantity (existing plus requested).
        quantity: i32,
    },
}

impl LineChange {
    /// Returns the line item as it will exist after the change is applied.
    pub fn applied(&self) -> CartItem {
        match self {
            LineChange::Create(item) => item.clone(),
            LineChange::Merge { item, quantity } => {
                let mut merged = item.clone();
                merged.quantity = *quantity;
                merged
            }
        }
    }
}

/// The full outcome of an add decision.
///
/// Both halves must be persisted together: the reservation decrements the
/// product's stock, the change inserts or updates the line item. Persisting
/// one without the other corrupts the books.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledAdd {
    /// Stock movement to apply to the product.
    pub reservation: StockReservation,

    /// Line-item write to apply to the cart.
    pub change: LineChange,
}

/// Decides what adding `quantity` units of `product` to `cart` means.
///
/// `existing` is the cart's current line item for this product, if any.
/// Only the requested quantity is reserved, never the merged total; the
/// units already in the cart were reserved when they were added.
///
/// Rejections, in order: a non-positive quantity, a completed cart, and
/// finally the stock checks of [`ledger::reserve`].
pub fn reconcile_add(
    cart: &Cart,
    product: &Product,
    existing: Option<&CartItem>,
    quantity: i32,
) -> Result<ReconciledAdd, CartError> {
    if quantity <= 0 {
        return Err(CartError::InvalidQuantity { quantity });
    }
    if !cart.can_modify_items() {
        return Err(CartError::CartClosed { cart_id: cart.id });
    }

    let reservation = ledger::reserve(product, quantity)?;

    let change = match existing {
        Some(item) => LineChange::Merge {
            item: item.clone(),
            quantity: item.quantity + quantity,
        },
        None => LineChange::Create(CartItem::new(cart.id, product.id, quantity)),
    };

    Ok(ReconciledAdd {
        reservation,
        change,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NewProduct;
    use common::CategoryId;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn product_with_stock(stock: i32) -> Product {
        Product::create(NewProduct {
            category_id: CategoryId::new(),
            main_colour: "blue".to_string(),
            second_colour: "white".to_string(),
            logo_colour: None,
            brand: "Nike".to_string(),
            url_img: "https://example.com/p.png".to_string(),
            price: Decimal::from_str("2.35").unwrap(),
            initial_stock: stock,
            description: "A product".to_string(),
            size: None,
            sizing: None,
            fabric: None,
            sleeve: None,
        })
        .unwrap()
    }

    fn apply(product: &mut Product, outcome: &ReconciledAdd) -> CartItem {
        product.current_stock = outcome.reservation.stock_after;
        outcome.change.applied()
    }

    #[test]
    fn test_first_add_creates_line() {
        let cart = Cart::new();
        let product = product_with_stock(8);

        let outcome = reconcile_add(&cart, &product, None, 2).unwrap();

        assert_eq!(outcome.reservation.stock_after, 6);
        match &outcome.change {
            LineChange::Create(item) => {
                assert_eq!(item.cart_id, cart.id);
                assert_eq!(item.product_id, product.id);
                assert_eq!(item.quantity, 2);
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn test_second_add_merges_line() {
        let cart = Cart::new();
        let mut product = product_with_stock(8);

        let first = reconcile_add(&cart, &product, None, 2).unwrap();
        let item = apply(&mut product, &first);

        let second = reconcile_add(&cart, &product, Some(&item), 3).unwrap();
        assert_eq!(second.reservation.quantity, 3);
        assert_eq!(second.reservation.stock_after, 3);
        match &second.change {
            LineChange::Merge { item: line, quantity } => {
                assert_eq!(line.id, item.id);
                assert_eq!(*quantity, 5);
            }
            other => panic!("expected merge, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_reserves_only_the_delta() {
        // Stock 8: add 2, then 3, then 10 must fail with what actually
        // remains, not a figure polluted by the merged line quantity.
        let cart = Cart::new();
        let mut product = product_with_stock(8);

        let first = reconcile_add(&cart, &product, None, 2).unwrap();
        let item = apply(&mut product, &first);

        let second = reconcile_add(&cart, &product, Some(&item), 3).unwrap();
        let item = apply(&mut product, &second);
        assert_eq!(item.quantity, 5);
        assert_eq!(product.current_stock, 3);

        let err = reconcile_add(&cart, &product, Some(&item), 10).unwrap_err();
        match err {
            CartError::InsufficientStock {
                requested,
                available,
                ..
            } => {
                assert_eq!(requested, 10);
                assert_eq!(available, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_completed_cart_rejects_adds_regardless_of_stock() {
        let mut cart = Cart::new();
        cart.set_completed(true).unwrap();
        let product = product_with_stock(100);

        let err = reconcile_add(&cart, &product, None, 1).unwrap_err();
        assert!(matches!(err, CartError::CartClosed { cart_id } if cart_id == cart.id));
    }

    #[test]
    fn test_invalid_quantity_wins_over_closed_cart() {
        let mut cart = Cart::new();
        cart.set_completed(true).unwrap();
        let product = product_with_stock(0);

        let err = reconcile_add(&cart, &product, None, 0).unwrap_err();
        assert!(matches!(err, CartError::InvalidQuantity { quantity: 0 }));
    }

    #[test]
    fn test_draining_stock_exactly() {
        let cart = Cart::new();
        let mut product = product_with_stock(5);

        let outcome = reconcile_add(&cart, &product, None, 5).unwrap();
        let item = apply(&mut product, &outcome);
        assert_eq!(product.current_stock, 0);
        assert!(!product.is_available());

        let err = reconcile_add(&cart, &product, Some(&item), 1).unwrap_err();
        assert!(matches!(err, CartError::OutOfStock { .. }));
    }

    #[test]
    fn test_applied_line_for_create_and_merge() {
        let cart = Cart::new();
        let product = product_with_stock(10);

        let create = reconcile_add(&cart, &product, None, 4).unwrap();
        assert_eq!(create.change.applied().quantity, 4);

        let item = create.change.applied();
        let merge = reconcile_add(&cart, &product, Some(&item), 1).unwrap();
        let applied = merge.change.applied();
        assert_eq!(applied.id, item.id);
        assert_eq!(applied.quantity, 5);
    }
}
