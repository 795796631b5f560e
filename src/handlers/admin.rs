use axum::{extract::State, http::HeaderMap, Json};

use crate::error::ApiError;
use crate::models::admin::{GrantAdminRequest, GrantAdminResponse};
use crate::services::auth;
use crate::AppState;

/// POST /api/admin/claims
///
/// Grants the admin claim to the user with the given email. Admin only.
pub async fn grant_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<GrantAdminRequest>,
) -> Result<Json<GrantAdminResponse>, ApiError> {
    let caller = auth::authenticate(&state.db, &headers).await?;
    let response = auth::grant_admin_claim(&state.db, caller.as_ref(), &payload.email).await?;
    Ok(Json(response))
}
