//! Persistence for the online store.
//!
//! The [`ShopStore`] trait covers the catalog, carts, and customers.
//! Two implementations are provided: [`InMemoryStore`] for tests and
//! local development, and [`PostgresStore`] for production.

mod error;
mod memory;
mod postgres;
mod registry;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use registry::ActiveCartRegistry;
pub use store::{LoadedCart, ShopStore, ShopStoreExt};
