//! Payment confirmation request/response models

use serde::{Deserialize, Serialize};

use crate::entities::payments;

/// Status stored on a payment record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentRecordStatus {
    Paid,
}

impl PaymentRecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentRecordStatus::Paid => "PAID",
        }
    }
}

impl std::fmt::Display for PaymentRecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /api/payments/confirm`
///
/// Mirrors the query parameters of the gateway's success redirect. None of
/// these values are trusted: the amount is checked against the stored price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    pub payment_key: String,
    pub order_id: String,
    pub amount: i64,
    pub product_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentResponse {
    pub success: bool,
    /// Confirmation payload returned by the gateway
    pub payment_data: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecordResponse {
    pub order_id: String,
    pub product_id: String,
    pub amount: i64,
    pub status: String,
    pub created_at: String,
}

impl From<payments::Model> for PaymentRecordResponse {
    fn from(model: payments::Model) -> Self {
        Self {
            order_id: model.order_id,
            product_id: model.product_id,
            amount: model.amount,
            status: model.status,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}
