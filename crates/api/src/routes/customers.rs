//! Customer capture endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::CustomerId;
use domain::{Customer, NewCustomer};
use store::{ShopStore, ShopStoreExt};

use crate::error::{ApiError, ApiJson};
use crate::routes::AppState;

/// POST /customers: capture the customer checking out a cart.
///
/// On success a purchase summary quoting the cart total is sent to the
/// customer. Delivery is best-effort; a failure is logged and the
/// capture still succeeds.
#[tracing::instrument(skip(state, input))]
pub async fn create<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    ApiJson(input): ApiJson<NewCustomer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let customer = state.store.create_customer(input).await?;

    let loaded = state.store.load_cart(customer.cart_id).await?;
    if let Err(e) = state
        .notifier
        .purchase_summary(&customer.email, loaded.total)
        .await
    {
        tracing::warn!(
            error = %e,
            customer_id = %customer.id,
            "purchase summary not delivered"
        );
    }

    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /customers: list captured customers.
#[tracing::instrument(skip(state))]
pub async fn list<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    let customers = state.store.list_customers().await?;
    Ok(Json(customers))
}

/// GET /customers/{id}: load a customer by id.
#[tracing::instrument(skip(state))]
pub async fn get<S: ShopStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, ApiError> {
    let customer_id = parse_customer_id(&id)?;
    let customer = state.store.get_customer(customer_id).await?;
    Ok(Json(customer))
}

fn parse_customer_id(id: &str) -> Result<CustomerId, ApiError> {
    let uuid = uuid::Uuid::parse_str(id)
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))?;
    Ok(CustomerId::from(uuid))
}
