use axum::{extract::State, Json};

use crate::error::ApiError;
use crate::models::business::{VerifyBusinessRequest, VerifyBusinessResponse};
use crate::services::business_verification;
use crate::AppState;

/// POST /api/business/verify
pub async fn verify_business(
    State(state): State<AppState>,
    Json(payload): Json<VerifyBusinessRequest>,
) -> Result<Json<VerifyBusinessResponse>, ApiError> {
    let is_verified = business_verification::verify_business(
        state.business_verifier.as_ref(),
        &payload.business_number,
        &payload.representative_name,
    )
    .await?;

    Ok(Json(VerifyBusinessResponse { is_verified }))
}
