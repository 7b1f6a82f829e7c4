//! HTTP route handlers and shared application state.

use std::collections::HashMap;
use std::sync::Arc;

use common::CategoryId;
use domain::{CategoryName, Product};
use store::{ActiveCartRegistry, ShopStore};

use crate::error::ApiError;
use crate::notify::Notifier;

pub mod carts;
pub mod categories;
pub mod customers;
pub mod health;
pub mod metrics;
pub mod products;

/// Shared application state accessible from all handlers.
pub struct AppState<S: ShopStore> {
    pub store: S,
    pub registry: ActiveCartRegistry<S>,
    pub notifier: Arc<dyn Notifier>,
}

/// Category names keyed by id, for shaping product views.
pub(crate) async fn category_names<S: ShopStore>(
    store: &S,
) -> Result<HashMap<CategoryId, CategoryName>, ApiError> {
    let categories = store.list_categories().await?;
    Ok(categories.into_iter().map(|c| (c.id, c.name)).collect())
}

/// Resolves the owning category name for a product.
pub(crate) fn owning_category(
    names: &HashMap<CategoryId, CategoryName>,
    product: &Product,
) -> Result<CategoryName, ApiError> {
    names.get(&product.category_id).copied().ok_or_else(|| {
        ApiError::Internal(format!(
            "category {} missing for product {}",
            product.category_id, product.id
        ))
    })
}
