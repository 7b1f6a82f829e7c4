//! Domain layer for the online store.
//!
//! This crate provides the pure business rules:
//! - Catalog entities (categories, products) with closed vocabularies
//! - The cart aggregate and its one-way state machine
//! - The stock ledger and the line reconciler as pure decision functions
//! - Cart totals, computed fresh on every read
//!
//! Nothing here performs IO. Persistence applies the decisions these
//! functions return.

pub mod cart;
pub mod catalog;
pub mod customer;
pub mod error;
pub mod price;

pub use cart::{
    Cart, CartError, CartItem, CartState, LineChange, ReconciledAdd, StockReservation, cart_total,
    reconcile_add, reserve,
};
pub use catalog::{
    Category, CategoryName, CategoryUpdate, Colour, Fabric, NewCategory, NewProduct, Product,
    ProductUpdate, Size, Sizing, UnknownVariant,
};
pub use customer::{Customer, NewCustomer};
pub use error::ValidationError;
pub use price::Price;
