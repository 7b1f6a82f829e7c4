//! Catalog entities: categories, products, and their vocabularies.

mod category;
mod product;
mod vocab;

pub use category::{Category, CategoryUpdate, NewCategory};
pub use product::{NewProduct, Product, ProductUpdate};
pub use vocab::{CategoryName, Colour, Fabric, Size, Sizing, UnknownVariant};
