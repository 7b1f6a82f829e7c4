//! Products and their validated inputs.

use chrono::{DateTime, Utc};
use common::{CategoryId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::vocab::{self, Colour, Fabric, Size, Sizing};
use crate::error::{ValidationError, require_text};
use crate::price::Price;

/// A sellable product.
///
/// `initial_stock` is fixed at creation; `current_stock` only ever moves
/// inside `[0, initial_stock]`. Reservations decrement it and updates may
/// reposition it, but nothing may push it outside the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,

    /// Owning category.
    pub category_id: CategoryId,

    /// Main garment colour.
    pub main_colour: Colour,

    /// Secondary garment colour.
    pub second_colour: Colour,

    /// Logo colour, where the product has a logo.
    pub logo_colour: Option<Colour>,

    /// Brand name.
    pub brand: String,

    /// When the product first entered the catalog.
    pub inclusion_date: DateTime<Utc>,

    /// Product image URL.
    pub url_img: String,

    /// Unit price.
    pub price: Price,

    /// Stock level the product entered the catalog with.
    pub initial_stock: i32,

    /// Stock currently available for reservation.
    pub current_stock: i32,

    /// Free-form description.
    pub description: String,

    /// Garment size, where applicable.
    pub size: Option<Size>,

    /// Intended fit, where applicable.
    pub sizing: Option<Sizing>,

    /// Fabric, where applicable.
    pub fabric: Option<Fabric>,

    /// Whether the garment has sleeves, where applicable.
    pub sleeve: Option<bool>,
}

/// Input for creating a product.
///
/// Vocabulary fields arrive as raw strings and are parsed during
/// [`Product::create`]; an unknown value fails validation with the field
/// name attached.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    /// Owning category.
    pub category_id: CategoryId,

    /// Main garment colour.
    pub main_colour: String,

    /// Secondary garment colour.
    pub second_colour: String,

    /// Logo colour, if any.
    #[serde(default)]
    pub logo_colour: Option<String>,

    /// Brand name.
    pub brand: String,

    /// Product image URL.
    pub url_img: String,

    /// Unit price.
    pub price: Decimal,

    /// Starting stock level; also becomes the ceiling for `current_stock`.
    #[serde(default = "default_initial_stock")]
    pub initial_stock: i32,

    /// Free-form description.
    pub description: String,

    /// Garment size, if applicable.
    #[serde(default)]
    pub size: Option<String>,

    /// Intended fit, if applicable.
    #[serde(default)]
    pub sizing: Option<String>,

    /// Fabric, if applicable.
    #[serde(default)]
    pub fabric: Option<String>,

    /// Whether the garment has sleeves.
    #[serde(default = "default_sleeve")]
    pub sleeve: Option<bool>,
}

fn default_initial_stock() -> i32 {
    10
}

fn default_sleeve() -> Option<bool> {
    Some(true)
}

/// Input for updating a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    /// Move the product to another category.
    pub category_id: Option<CategoryId>,

    /// Replace the main colour.
    pub main_colour: Option<String>,

    /// Replace the secondary colour.
    pub second_colour: Option<String>,

    /// Replace the logo colour.
    pub logo_colour: Option<String>,

    /// Replace the brand.
    pub brand: Option<String>,

    /// Replace the image URL.
    pub url_img: Option<String>,

    /// Replace the unit price.
    pub price: Option<Decimal>,

    /// Reposition the available stock inside `[0, initial_stock]`.
    pub current_stock: Option<i32>,

    /// Replace the description.
    pub description: Option<String>,

    /// Replace the size.
    pub size: Option<String>,

    /// Replace the sizing.
    pub sizing: Option<String>,

    /// Replace the fabric.
    pub fabric: Option<String>,

    /// Replace the sleeve flag.
    pub sleeve: Option<bool>,
}

impl Product {
    /// Creates a product from validated input.
    ///
    /// `current_stock` starts at `initial_stock`.
    pub fn create(input: NewProduct) -> Result<Self, ValidationError> {
        let main_colour = vocab::parse_field("main_colour", &input.main_colour)?;
        let second_colour = vocab::parse_field("second_colour", &input.second_colour)?;
        let logo_colour = match &input.logo_colour {
            Some(value) => Some(vocab::parse_field("logo_colour", value)?),
            None => None,
        };
        let size = match &input.size {
            Some(value) => Some(vocab::parse_field("size", value)?),
            None => None,
        };
        let sizing = match &input.sizing {
            Some(value) => Some(vocab::parse_field("sizing", value)?),
            None => None,
        };
        let fabric = match &input.fabric {
            Some(value) => Some(vocab::parse_field("fabric", value)?),
            None => None,
        };

        require_text("brand", &input.brand)?;
        require_text("url_img", &input.url_img)?;
        require_text("description", &input.description)?;

        let price = validate_price(input.price)?;
        if input.initial_stock < 0 {
            return Err(ValidationError::new(
                "initial_stock",
                "must not be negative",
            ));
        }

        Ok(Self {
            id: ProductId::new(),
            category_id: input.category_id,
            main_colour,
            second_colour,
            logo_colour,
            brand: input.brand,
            inclusion_date: Utc::now(),
            url_img: input.url_img,
            price,
            initial_stock: input.initial_stock,
            current_stock: input.initial_stock,
            description: input.description,
            size,
            sizing,
            fabric,
            sleeve: input.sleeve,
        })
    }

    /// Applies an update.
    ///
    /// All provided fields are validated before any of them is written, so
    /// a rejected update leaves the product untouched.
    pub fn apply_update(&mut self, update: &ProductUpdate) -> Result<(), ValidationError> {
        let main_colour = match &update.main_colour {
            Some(value) => Some(vocab::parse_field("main_colour", value)?),
            None => None,
        };
        let second_colour = match &update.second_colour {
            Some(value) => Some(vocab::parse_field("second_colour", value)?),
            None => None,
        };
        let logo_colour = match &update.logo_colour {
            Some(value) => Some(vocab::parse_field("logo_colour", value)?),
            None => None,
        };
        let size = match &update.size {
            Some(value) => Some(vocab::parse_field("size", value)?),
            None => None,
        };
        let sizing = match &update.sizing {
            Some(value) => Some(vocab::parse_field("sizing", value)?),
            None => None,
        };
        let fabric = match &update.fabric {
            Some(value) => Some(vocab::parse_field("fabric", value)?),
            None => None,
        };

        if let Some(brand) = &update.brand {
            require_text("brand", brand)?;
        }
        if let Some(url_img) = &update.url_img {
            require_text("url_img", url_img)?;
        }
        if let Some(description) = &update.description {
            require_text("description", description)?;
        }

        let price = match update.price {
            Some(value) => Some(validate_price(value)?),
            None => None,
        };
        if let Some(stock) = update.current_stock {
            if stock < 0 || stock > self.initial_stock {
                return Err(ValidationError::new(
                    "current_stock",
                    format!("must be between 0 and {}", self.initial_stock),
                ));
            }
        }

        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(colour) = main_colour {
            self.main_colour = colour;
        }
        if let Some(colour) = second_colour {
            self.second_colour = colour;
        }
        if let Some(colour) = logo_colour {
            self.logo_colour = Some(colour);
        }
        if let Some(brand) = &update.brand {
            self.brand = brand.clone();
        }
        if let Some(url_img) = &update.url_img {
            self.url_img = url_img.clone();
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(stock) = update.current_stock {
            self.current_stock = stock;
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(size) = size {
            self.size = Some(size);
        }
        if let Some(sizing) = sizing {
            self.sizing = Some(sizing);
        }
        if let Some(fabric) = fabric {
            self.fabric = Some(fabric);
        }
        if let Some(sleeve) = update.sleeve {
            self.sleeve = Some(sleeve);
        }

        Ok(())
    }

    /// Returns true while any stock remains.
    pub fn is_available(&self) -> bool {
        self.current_stock > 0
    }
}

fn validate_price(value: Decimal) -> Result<Price, ValidationError> {
    let price = Price::new(value);
    if price.is_negative() {
        return Err(ValidationError::new("price", "must not be negative"));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn new_product_input() -> NewProduct {
        NewProduct {
            category_id: CategoryId::new(),
            main_colour: "black".to_string(),
            second_colour: "white".to_string(),
            logo_colour: Some("red".to_string()),
            brand: "Nike".to_string(),
            url_img: "https://example.com/cap.png".to_string(),
            price: Decimal::from_str("18.50").unwrap(),
            initial_stock: 8,
            description: "Black cap with a red logo".to_string(),
            size: None,
            sizing: None,
            fabric: None,
            sleeve: None,
        }
    }

    #[test]
    fn test_create_starts_current_stock_at_initial() {
        let product = Product::create(new_product_input()).unwrap();
        assert_eq!(product.initial_stock, 8);
        assert_eq!(product.current_stock, 8);
        assert!(product.is_available());
    }

    #[test]
    fn test_create_rejects_unknown_colour() {
        let mut input = new_product_input();
        input.main_colour = "purple".to_string();
        let err = Product::create(input).unwrap_err();
        assert_eq!(err.field, "main_colour");
    }

    #[test]
    fn test_create_rejects_negative_price() {
        let mut input = new_product_input();
        input.price = Decimal::from_str("-1.00").unwrap();
        let err = Product::create(input).unwrap_err();
        assert_eq!(err.field, "price");
    }

    #[test]
    fn test_create_rejects_blank_brand() {
        let mut input = new_product_input();
        input.brand = "  ".to_string();
        let err = Product::create(input).unwrap_err();
        assert_eq!(err.field, "brand");
    }

    #[test]
    fn test_create_rejects_negative_initial_stock() {
        let mut input = new_product_input();
        input.initial_stock = -1;
        let err = Product::create(input).unwrap_err();
        assert_eq!(err.field, "initial_stock");
    }

    #[test]
    fn test_update_moves_current_stock_within_window() {
        let mut product = Product::create(new_product_input()).unwrap();

        let update = ProductUpdate {
            current_stock: Some(3),
            ..Default::default()
        };
        product.apply_update(&update).unwrap();
        assert_eq!(product.current_stock, 3);
    }

    #[test]
    fn test_update_rejects_stock_above_initial() {
        let mut product = Product::create(new_product_input()).unwrap();

        let update = ProductUpdate {
            current_stock: Some(9),
            ..Default::default()
        };
        let err = product.apply_update(&update).unwrap_err();
        assert_eq!(err.field, "current_stock");
        assert_eq!(product.current_stock, 8);
    }

    #[test]
    fn test_update_validates_before_mutating() {
        let mut product = Product::create(new_product_input()).unwrap();
        let before = product.clone();

        let update = ProductUpdate {
            brand: Some("Adidas".to_string()),
            fabric: Some("wool".to_string()),
            ..Default::default()
        };
        let err = product.apply_update(&update).unwrap_err();

        assert_eq!(err.field, "fabric");
        assert_eq!(product, before);
    }

    #[test]
    fn test_update_changes_price() {
        let mut product = Product::create(new_product_input()).unwrap();

        let update = ProductUpdate {
            price: Some(Decimal::from_str("21.00").unwrap()),
            ..Default::default()
        };
        product.apply_update(&update).unwrap();
        assert_eq!(product.price.to_string(), "21.00");
    }

    #[test]
    fn test_availability_follows_stock() {
        let mut product = Product::create(new_product_input()).unwrap();
        product
            .apply_update(&ProductUpdate {
                current_stock: Some(0),
                ..Default::default()
            })
            .unwrap();
        assert!(!product.is_available());
    }
}
