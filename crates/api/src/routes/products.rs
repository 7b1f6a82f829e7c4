//! Product catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::ProductId;
use domain::{NewProduct, ProductUpdate};
use store::ShopStore;

use crate::error::{ApiError, ApiJson};
use crate::routes::{AppState, category_names, owning_category};
use crate::views::ProductView;

/// POST /product: register a new product in the catalog.
#[tracing::instrument(skip(state, input))]
pub async fn create<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(input): ApiJson<NewProduct>,
) -> Result<(StatusCode, Json<ProductView>), ApiError> {
    let product = state.store.create_product(input).await?;
    let category = state.store.get_category(product.category_id).await?;
    let view = ProductView::new(&product, category.name);
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /product: list the catalog grouped by category.
#[tracing::instrument(skip(state))]
pub async fn list<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductView>>, ApiError> {
    let names = category_names(&state.store).await?;
    let products = state.store.list_products().await?;

    let mut views = Vec::with_capacity(products.len());
    for product in &products {
        let name = owning_category(&names, product)?;
        views.push(ProductView::new(product, name));
    }
    Ok(Json(views))
}

/// GET /product/{id}: load a product by id.
#[tracing::instrument(skip(state))]
pub async fn get<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>, ApiError> {
    let product_id = parse_product_id(&id)?;
    let product = state.store.get_product(product_id).await?;
    let category = state.store.get_category(product.category_id).await?;
    Ok(Json(ProductView::new(&product, category.name)))
}

/// PUT/PATCH /product/{id}: apply a partial update.
#[tracing::instrument(skip(state, update))]
pub async fn update<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<ProductUpdate>,
) -> Result<Json<ProductView>, ApiError> {
    let product_id = parse_product_id(&id)?;
    let product = state.store.update_product(product_id, update).await?;
    let category = state.store.get_category(product.category_id).await?;
    Ok(Json(ProductView::new(&product, category.name)))
}

/// DELETE /product/{id}: remove a product and its cart lines.
#[tracing::instrument(skip(state))]
pub async fn delete<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let product_id = parse_product_id(&id)?;
    state.store.delete_product(product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_product_id(id: &str) -> Result<ProductId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;
    Ok(ProductId::from(uuid))
}
