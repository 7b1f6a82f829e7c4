//! Category CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::CategoryId;
use domain::{Category, CategoryUpdate, NewCategory};
use store::ShopStore;

use crate::error::{ApiError, ApiJson};
use crate::routes::AppState;

/// POST /category: register a new category.
#[tracing::instrument(skip(state, input))]
pub async fn create<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(input): ApiJson<NewCategory>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state.store.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /category: list categories in creation order.
#[tracing::instrument(skip(state))]
pub async fn list<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let categories = state.store.list_categories().await?;
    Ok(Json(categories))
}

/// GET /category/{id}: load a category by id.
#[tracing::instrument(skip(state))]
pub async fn get<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Category>, ApiError> {
    let category_id = parse_category_id(&id)?;
    let category = state.store.get_category(category_id).await?;
    Ok(Json(category))
}

/// PUT/PATCH /category/{id}: rename a category.
#[tracing::instrument(skip(state, update))]
pub async fn update<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    ApiJson(update): ApiJson<CategoryUpdate>,
) -> Result<Json<Category>, ApiError> {
    let category_id = parse_category_id(&id)?;
    let category = state.store.update_category(category_id, update).await?;
    Ok(Json(category))
}

/// DELETE /category/{id}: remove a category and its products.
#[tracing::instrument(skip(state))]
pub async fn delete<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let category_id = parse_category_id(&id)?;
    state.store.delete_category(category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_category_id(id: &str) -> Result<CategoryId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;
    Ok(CategoryId::from(uuid))
}
