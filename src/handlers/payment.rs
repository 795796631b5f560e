use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use crate::error::ApiError;
use crate::models::payment::{ConfirmPaymentRequest, ConfirmPaymentResponse, PaymentRecordResponse};
use crate::services::{auth, payment_confirmation, seller_dashboard};
use crate::AppState;

/// POST /api/payments/confirm
///
/// Confirms a charge with the gateway after the client's success redirect.
///
/// # Request Body
///
/// ```json
/// { "paymentKey": "tk_1", "orderId": "ord_1", "amount": 1000, "productId": "p1" }
/// ```
///
/// # Response
///
/// ```json
/// { "success": true, "paymentData": { "status": "DONE", "totalAmount": 1000, ... } }
/// ```
pub async fn confirm_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ConfirmPaymentRequest>,
) -> Result<Json<ConfirmPaymentResponse>, ApiError> {
    let caller = auth::authenticate(&state.db, &headers).await?;

    let response = payment_confirmation::confirm_payment(
        &state.db,
        state.gateway.as_ref(),
        caller.as_ref(),
        payload,
    )
    .await?;

    Ok(Json(response))
}

/// GET /api/payments/{order_id}
pub async fn get_payment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(order_id): Path<String>,
) -> Result<Json<PaymentRecordResponse>, ApiError> {
    let caller = auth::authenticate(&state.db, &headers).await?;
    let record = seller_dashboard::get_payment(&state.db, caller.as_ref(), &order_id).await?;
    Ok(Json(record))
}
