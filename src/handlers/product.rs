use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use crate::error::ApiError;
use crate::models::product::{CheckoutResponse, ProductListResponse};
use crate::services::{auth, seller_dashboard};
use crate::AppState;

/// GET /api/products
pub async fn list_products(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ProductListResponse>, ApiError> {
    let caller = auth::authenticate(&state.db, &headers).await?;
    let products = seller_dashboard::list_seller_products(&state.db, caller.as_ref()).await?;
    Ok(Json(products))
}

/// POST /api/products/{product_id}/checkout
pub async fn checkout(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(product_id): Path<String>,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let caller = auth::authenticate(&state.db, &headers).await?;
    let checkout = seller_dashboard::prepare_checkout(
        &state.db,
        &state.config.client_base_url,
        caller.as_ref(),
        &product_id,
    )
    .await?;
    Ok(Json(checkout))
}
