//! Seller business-number verification
//!
//! No registry provider is wired up yet, so the service runs with the
//! [`AlwaysApprove`] policy. A real provider implements [`BusinessVerifier`]
//! and replaces it in `AppState`.

use async_trait::async_trait;

use crate::error::ApiError;

#[async_trait]
pub trait BusinessVerifier: Send + Sync {
    async fn verify(
        &self,
        business_number: &str,
        representative_name: &str,
    ) -> Result<bool, ApiError>;
}

/// Reports every business as verified
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysApprove;

#[async_trait]
impl BusinessVerifier for AlwaysApprove {
    async fn verify(
        &self,
        business_number: &str,
        representative_name: &str,
    ) -> Result<bool, ApiError> {
        tracing::info!(
            business_number = %business_number,
            representative_name = %representative_name,
            "Business verification requested (always-approve policy)"
        );
        Ok(true)
    }
}

/// Validate input and run the configured verifier
pub async fn verify_business(
    verifier: &dyn BusinessVerifier,
    business_number: &str,
    representative_name: &str,
) -> Result<bool, ApiError> {
    let business_number = business_number.trim();
    let representative_name = representative_name.trim();

    if business_number.is_empty() {
        return Err(ApiError::InvalidArgument(
            "businessNumber is required".to_string(),
        ));
    }
    if representative_name.is_empty() {
        return Err(ApiError::InvalidArgument(
            "representativeName is required".to_string(),
        ));
    }

    verifier.verify(business_number, representative_name).await
}
