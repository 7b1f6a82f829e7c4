use thiserror::Error;

use common::{CartId, CategoryId, CustomerId, ProductId};
use domain::{CartError, ValidationError};

/// Errors that can occur when interacting with the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The category was not found in the store.
    #[error("Category not found: {0}")]
    CategoryNotFound(CategoryId),

    /// The product was not found in the store.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The cart was not found in the store.
    #[error("Cart not found: {0}")]
    CartNotFound(CartId),

    /// The customer was not found in the store.
    #[error("Customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// A cart rule rejected the operation.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// Input validation rejected the operation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A stored value could not be decoded into its domain type.
    #[error("Invalid value in column '{column}': {message}")]
    Decode {
        column: &'static str,
        message: String,
    },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
