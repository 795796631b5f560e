//! Caller identity and claims
//!
//! Callers present `Authorization: Bearer <token>`. Only the SHA-256 digest
//! of a token is stored, in `users.token_hash`.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    Set,
};
use sha2::{Digest, Sha256};

use crate::entities::{prelude::*, users};
use crate::error::ApiError;
use crate::models::admin::GrantAdminResponse;

/// Verified identity attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub uid: String,
    pub email: String,
    /// Admin claim
    pub is_admin: bool,
}

impl From<users::Model> for CallerIdentity {
    fn from(user: users::Model) -> Self {
        Self {
            uid: user.id,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

/// Hex SHA-256 of a bearer token
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve the caller from request headers
///
/// Returns `Ok(None)` for anonymous requests. Requests without a bearer
/// token never touch the database.
pub async fn authenticate(
    db: &DatabaseConnection,
    headers: &HeaderMap,
) -> Result<Option<CallerIdentity>, ApiError> {
    let Some(token) = bearer_token(headers) else {
        return Ok(None);
    };

    let user = Users::find()
        .filter(users::Column::TokenHash.eq(hash_token(token)))
        .one(db)
        .await?;

    if user.is_none() {
        tracing::debug!("Bearer token did not match any user");
    }

    Ok(user.map(CallerIdentity::from))
}

/// Require an authenticated caller
pub fn require_caller(caller: Option<&CallerIdentity>) -> Result<&CallerIdentity, ApiError> {
    caller.ok_or_else(|| ApiError::Unauthenticated("Login required".to_string()))
}

/// Grant the admin claim to the user registered under `email`
///
/// Only callers that already hold the admin claim may do this.
pub async fn grant_admin_claim(
    db: &DatabaseConnection,
    caller: Option<&CallerIdentity>,
    email: &str,
) -> Result<GrantAdminResponse, ApiError> {
    match caller {
        Some(c) if c.is_admin => {}
        _ => {
            tracing::warn!(caller = ?caller.map(|c| &c.uid), "Admin claim grant denied");
            return Err(ApiError::PermissionDenied(
                "Only administrators can use this feature".to_string(),
            ));
        }
    }

    let email = email.trim();
    if email.is_empty() {
        return Err(ApiError::InvalidArgument("email is required".to_string()));
    }

    let user = Users::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No user registered with {}", email)))?;

    if !user.is_admin {
        let uid = user.id.clone();
        let mut active_model = user.into_active_model();
        active_model.is_admin = Set(true);
        active_model.update(db).await?;
        tracing::info!(uid = %uid, email = %email, "Admin claim granted");
    }

    Ok(GrantAdminResponse {
        message: format!("{} is now an administrator", email),
    })
}
