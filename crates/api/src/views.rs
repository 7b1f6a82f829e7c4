//! JSON views shaped per resource.
//!
//! Products render differently depending on the owning category: caps
//! carry the colour detail and no garment fields, tshirts the reverse.
//! Both omit `initial_stock` and expose a derived `product_available`
//! flag. Cart views embed a reduced product and quote sub-totals and
//! totals computed from current prices at read time.

use chrono::{DateTime, Utc};
use common::{CartId, CartItemId, ProductId};
use domain::{Cart, CartItem, CategoryName, Colour, Fabric, Price, Product, Size, Sizing};
use serde::Serialize;

/// Product view for the `caps` category.
#[derive(Debug, Serialize)]
pub struct CapView {
    pub id: ProductId,
    pub category_name: CategoryName,
    pub main_colour: Colour,
    pub second_colour: Colour,
    pub logo_colour: Option<Colour>,
    pub brand: String,
    pub inclusion_date: DateTime<Utc>,
    pub url_img: String,
    pub price: Price,
    pub current_stock: i32,
    pub description: String,
    pub product_available: bool,
}

/// Product view for the `tshirts` category.
#[derive(Debug, Serialize)]
pub struct TshirtView {
    pub id: ProductId,
    pub category_name: CategoryName,
    pub main_colour: Colour,
    pub second_colour: Colour,
    pub brand: String,
    pub inclusion_date: DateTime<Utc>,
    pub url_img: String,
    pub price: Price,
    pub current_stock: i32,
    pub description: String,
    pub size: Option<Size>,
    pub sizing: Option<Sizing>,
    pub fabric: Option<Fabric>,
    pub sleeve: Option<bool>,
    pub product_available: bool,
}

/// A product rendered in the shape of its owning category.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProductView {
    Cap(CapView),
    Tshirt(TshirtView),
}

impl ProductView {
    /// Selects the view shape from the owning category.
    pub fn new(product: &Product, category_name: CategoryName) -> Self {
        match category_name {
            CategoryName::Caps => ProductView::Cap(CapView {
                id: product.id,
                category_name,
                main_colour: product.main_colour,
                second_colour: product.second_colour,
                logo_colour: product.logo_colour,
                brand: product.brand.clone(),
                inclusion_date: product.inclusion_date,
                url_img: product.url_img.clone(),
                price: product.price,
                current_stock: product.current_stock,
                description: product.description.clone(),
                product_available: product.is_available(),
            }),
            CategoryName::Tshirts => ProductView::Tshirt(TshirtView {
                id: product.id,
                category_name,
                main_colour: product.main_colour,
                second_colour: product.second_colour,
                brand: product.brand.clone(),
                inclusion_date: product.inclusion_date,
                url_img: product.url_img.clone(),
                price: product.price,
                current_stock: product.current_stock,
                description: product.description.clone(),
                size: product.size,
                sizing: product.sizing,
                fabric: product.fabric,
                sleeve: product.sleeve,
                product_available: product.is_available(),
            }),
        }
    }
}

/// The reduced product embedded in a cart line.
#[derive(Debug, Serialize)]
pub struct SimpleProductView {
    pub id: ProductId,
    pub category_name: CategoryName,
    pub price: Price,
    pub description: String,
    pub product_available: bool,
}

impl SimpleProductView {
    pub fn new(product: &Product, category_name: CategoryName) -> Self {
        Self {
            id: product.id,
            category_name,
            price: product.price,
            description: product.description.clone(),
            product_available: product.is_available(),
        }
    }
}

/// A cart line with its embedded product and computed sub-total.
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub id: CartItemId,
    pub cart: CartId,
    pub product: SimpleProductView,
    pub quantity: i32,
    pub sub_total: Price,
}

impl CartItemView {
    pub fn new(item: &CartItem, product: &Product, category_name: CategoryName) -> Self {
        Self {
            id: item.id,
            cart: item.cart_id,
            product: SimpleProductView::new(product, category_name),
            quantity: item.quantity,
            sub_total: item.sub_total(product.price),
        }
    }
}

/// A cart with its lines and the freshly computed total.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub id: CartId,
    pub items: Vec<CartItemView>,
    pub total: Price,
    pub created: DateTime<Utc>,
    pub completed: bool,
}

impl CartView {
    pub fn new(cart: &Cart, items: Vec<CartItemView>, total: Price) -> Self {
        Self {
            id: cart.id,
            items,
            total,
            created: cart.created_at,
            completed: cart.completed,
        }
    }
}

/// The line item returned by a successful add.
#[derive(Debug, Serialize)]
pub struct AddedCartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub quantity: i32,
}

impl From<CartItem> for AddedCartItem {
    fn from(item: CartItem) -> Self {
        Self {
            id: item.id,
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use common::CategoryId;
    use domain::NewProduct;
    use rust_decimal::Decimal;

    fn product(initial_stock: i32) -> Product {
        Product::create(NewProduct {
            category_id: CategoryId::new(),
            main_colour: "black".to_string(),
            second_colour: "white".to_string(),
            logo_colour: Some("red".to_string()),
            brand: "Nike".to_string(),
            url_img: "https://example.com/cap.png".to_string(),
            price: Decimal::from_str("18.80").unwrap(),
            initial_stock,
            description: "Black cap with a red logo".to_string(),
            size: Some("medium".to_string()),
            sizing: Some("unisex".to_string()),
            fabric: Some("cotton".to_string()),
            sleeve: Some(false),
        })
        .unwrap()
    }

    #[test]
    fn test_cap_view_shape() {
        let view = ProductView::new(&product(5), CategoryName::Caps);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["category_name"], "caps");
        assert_eq!(json["logo_colour"], "red");
        assert_eq!(json["price"], "18.80");
        assert_eq!(json["product_available"], true);
        assert!(json.get("size").is_none());
        assert!(json.get("sizing").is_none());
        assert!(json.get("fabric").is_none());
        assert!(json.get("sleeve").is_none());
        assert!(json.get("initial_stock").is_none());
    }

    #[test]
    fn test_tshirt_view_shape() {
        let view = ProductView::new(&product(5), CategoryName::Tshirts);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["category_name"], "tshirts");
        assert_eq!(json["size"], "medium");
        assert_eq!(json["sizing"], "unisex");
        assert_eq!(json["fabric"], "cotton");
        assert_eq!(json["sleeve"], false);
        assert!(json.get("logo_colour").is_none());
        assert!(json.get("initial_stock").is_none());
    }

    #[test]
    fn test_sold_out_product_is_flagged() {
        let mut sold_out = product(5);
        sold_out.current_stock = 0;

        let view = ProductView::new(&sold_out, CategoryName::Caps);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["product_available"], false);
    }

    #[test]
    fn test_cart_item_view_computes_sub_total() {
        let cart = Cart::new();
        let product = product(5);
        let item = CartItem::new(cart.id, product.id, 3);

        let view = CartItemView::new(&item, &product, CategoryName::Caps);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["sub_total"], "56.40");
        assert_eq!(json["product"]["price"], "18.80");
        assert_eq!(json["product"]["category_name"], "caps");
        assert!(json["product"].get("brand").is_none());
    }
}
