//! Shared identifier types for the online store.
//!
//! Every entity gets its own UUID-backed newtype so that a cart ID can
//! never be passed where a product ID is expected.

mod types;

pub use types::{CartId, CartItemId, CategoryId, CustomerId, ProductId};
