//! Cart and cart-item endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::{CartId, CategoryId, ProductId};
use domain::{CategoryName, Price};
use serde::Deserialize;
use store::{LoadedCart, ShopStore, ShopStoreExt};

use crate::error::{ApiError, ApiJson};
use crate::routes::{AppState, category_names, owning_category};
use crate::views::{AddedCartItem, CartItemView, CartView};

// -- Request types --

#[derive(Deserialize)]
pub struct CartUpdateRequest {
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub product_id: String,
    pub quantity: i32,
}

// -- Handlers --

/// POST /carts: open a new cart.
#[tracing::instrument(skip(state))]
pub async fn create<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<(StatusCode, Json<CartView>), ApiError> {
    let cart = state.registry.open().await?;
    metrics::counter!("carts_opened_total").increment(1);

    let view = CartView::new(&cart, Vec::new(), Price::zero());
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /carts: list carts with their lines and totals.
#[tracing::instrument(skip(state))]
pub async fn list<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<CartView>>, ApiError> {
    let names = category_names(&state.store).await?;
    let loaded = state.store.load_all_carts().await?;

    let mut views = Vec::with_capacity(loaded.len());
    for cart in &loaded {
        views.push(cart_view(cart, &names)?);
    }
    Ok(Json(views))
}

/// GET /carts/{id}: load a cart with its lines and total.
#[tracing::instrument(skip(state))]
pub async fn get<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<CartView>, ApiError> {
    let cart_id = parse_cart_id(&id)?;
    let names = category_names(&state.store).await?;
    let loaded = state.store.load_cart(cart_id).await?;
    Ok(Json(cart_view(&loaded, &names)?))
}

/// PUT/PATCH /carts/{id}: complete the cart (or re-save it unchanged).
#[tracing::instrument(skip(state, req))]
pub async fn update<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<CartUpdateRequest>,
) -> Result<Json<CartView>, ApiError> {
    let cart_id = parse_cart_id(&id)?;

    let cart = if req.completed {
        let cart = state.registry.complete(cart_id).await?;
        metrics::counter!("carts_completed_total").increment(1);
        cart
    } else {
        state.store.set_cart_completed(cart_id, false).await?
    };

    let names = category_names(&state.store).await?;
    let loaded = state.store.load_cart(cart.id).await?;
    Ok(Json(cart_view(&loaded, &names)?))
}

/// POST /carts/{cart_id}/items: add units of a product to the cart.
///
/// Repeated adds of the same product merge into one line; stock is
/// reserved only for the units this call adds.
#[tracing::instrument(skip(state, req))]
pub async fn add_item<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(cart_id): Path<String>,
    ApiJson(req): ApiJson<AddItemRequest>,
) -> Result<(StatusCode, Json<AddedCartItem>), ApiError> {
    let cart_id = parse_cart_id(&cart_id)?;
    let product_id = parse_product_id(&req.product_id)?;

    let start = std::time::Instant::now();
    let item = state
        .store
        .add_cart_item(cart_id, product_id, req.quantity)
        .await?;
    metrics::counter!("cart_items_added_total").increment(1);
    metrics::histogram!("cart_add_item_duration_seconds").record(start.elapsed().as_secs_f64());

    Ok((StatusCode::CREATED, Json(AddedCartItem::from(item))))
}

/// GET /carts/{cart_id}/items: list the cart's lines.
#[tracing::instrument(skip(state))]
pub async fn items<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(cart_id): Path<String>,
) -> Result<Json<Vec<CartItemView>>, ApiError> {
    let cart_id = parse_cart_id(&cart_id)?;
    let names = category_names(&state.store).await?;
    let lines = state.store.cart_items(cart_id).await?;

    let mut views = Vec::with_capacity(lines.len());
    for (item, product) in &lines {
        let name = owning_category(&names, product)?;
        views.push(CartItemView::new(item, product, name));
    }
    Ok(Json(views))
}

fn cart_view(
    loaded: &LoadedCart,
    names: &HashMap<CategoryId, CategoryName>,
) -> Result<CartView, ApiError> {
    let mut items = Vec::with_capacity(loaded.lines.len());
    for (item, product) in &loaded.lines {
        let name = owning_category(names, product)?;
        items.push(CartItemView::new(item, product, name));
    }
    Ok(CartView::new(&loaded.cart, items, loaded.total))
}

fn parse_cart_id(id: &str) -> Result<CartId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;
    Ok(CartId::from(uuid))
}

fn parse_product_id(id: &str) -> Result<ProductId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;
    Ok(ProductId::from(uuid))
}
