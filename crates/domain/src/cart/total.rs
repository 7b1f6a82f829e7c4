//! Cart totals, computed fresh on every read.

use crate::cart::aggregate::CartItem;
use crate::catalog::Product;
use crate::price::Price;

/// Sums line sub-totals at current prices.
///
/// Nothing is persisted; a price change between reads changes the total on
/// the next read.
pub fn cart_total(items: &[(CartItem, Product)]) -> Price {
    items
        .iter()
        .fold(Price::zero(), |total, (item, product)| {
            total + item.sub_total(product.price)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NewProduct;
    use common::{CartId, CategoryId};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn product_priced(price: &str) -> Product {
        Product::create(NewProduct {
            category_id: CategoryId::new(),
            main_colour: "red".to_string(),
            second_colour: "white".to_string(),
            logo_colour: None,
            brand: "Nike".to_string(),
            url_img: "https://example.com/p.png".to_string(),
            price: Decimal::from_str(price).unwrap(),
            initial_stock: 50,
            description: "A product".to_string(),
            size: None,
            sizing: None,
            fabric: None,
            sleeve: None,
        })
        .unwrap()
    }

    #[test]
    fn test_empty_cart_totals_zero() {
        assert_eq!(cart_total(&[]), Price::zero());
    }

    #[test]
    fn test_total_sums_lines() {
        let cart_id = CartId::new();
        let shirt = product_priced("12.50");
        let cap = product_priced("7.25");

        let items = vec![
            (CartItem::new(cart_id, shirt.id, 2), shirt),
            (CartItem::new(cart_id, cap.id, 3), cap),
        ];

        assert_eq!(cart_total(&items).to_string(), "46.75");
    }

    #[test]
    fn test_total_reflects_current_price() {
        let cart_id = CartId::new();
        let mut product = product_priced("10.00");
        let item = CartItem::new(cart_id, product.id, 2);

        let before = cart_total(&[(item.clone(), product.clone())]);
        assert_eq!(before.to_string(), "20.00");

        product.price = Price::new(Decimal::from_str("15.00").unwrap());
        let after = cart_total(&[(item, product)]);
        assert_eq!(after.to_string(), "30.00");
    }
}
