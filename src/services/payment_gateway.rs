//! Toss Payments confirmation client
//!
//! The confirmation transaction only sees the [`PaymentGateway`] trait, so
//! tests can swap in a scripted gateway.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::GatewayConfig;

/// Status the gateway reports for a fully captured charge
pub const STATUS_DONE: &str = "DONE";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfirmRequest {
    pub payment_key: String,
    pub order_id: String,
    pub amount: i64,
}

/// A charge the gateway reported as `DONE`
#[derive(Debug, Clone)]
pub struct GatewayConfirmation {
    pub total_amount: i64,
    /// Raw response body, returned to the client as `paymentData`
    pub payload: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// 2xx response whose status is not `DONE`
    #[error("Payment not completed (status {status})")]
    NotCompleted { status: String },
    /// Non-2xx response; `message` comes from the gateway body when present
    #[error("{message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },
    #[error("Gateway request timed out")]
    Timeout,
    #[error("Gateway request failed: {0}")]
    Transport(String),
    #[error("Unexpected gateway response: {0}")]
    Decode(String),
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Confirm a charge. Returns `Ok` only when the gateway reports `DONE`.
    async fn confirm(
        &self,
        request: &GatewayConfirmRequest,
    ) -> Result<GatewayConfirmation, GatewayError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfirmBody {
    status: String,
    #[serde(default)]
    total_amount: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Clone)]
pub struct TossPaymentsClient {
    client: Client,
    base_url: String,
    secret_key: String,
    max_retries: u32,
}

impl TossPaymentsClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            secret_key: config.secret_key.clone(),
            max_retries: config.max_retries,
        })
    }

    async fn send_confirm(
        &self,
        request: &GatewayConfirmRequest,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let url = format!("{}/v1/payments/confirm", self.base_url);

        // Basic base64("{secret}:")
        self.client
            .post(&url)
            .basic_auth(&self.secret_key, None::<&str>)
            .json(request)
            .send()
            .await
    }
}

#[async_trait]
impl PaymentGateway for TossPaymentsClient {
    async fn confirm(
        &self,
        request: &GatewayConfirmRequest,
    ) -> Result<GatewayConfirmation, GatewayError> {
        let mut attempt = 0;
        let response = loop {
            match self.send_confirm(request).await {
                Ok(response) => break response,
                Err(e) if e.is_connect() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        order_id = %request.order_id,
                        attempt,
                        error = %e,
                        "Gateway connect failed, retrying"
                    );
                }
                Err(e) if e.is_timeout() => return Err(GatewayError::Timeout),
                Err(e) => return Err(GatewayError::Transport(e.to_string())),
            }
        };

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else {
                GatewayError::Transport(e.to_string())
            }
        })?;

        if !status.is_success() {
            let parsed = serde_json::from_str::<GatewayErrorBody>(&body).ok();
            let code = parsed.as_ref().and_then(|b| b.code.clone());
            let message = parsed
                .and_then(|b| b.message)
                .unwrap_or_else(|| format!("Gateway returned HTTP {}", status.as_u16()));
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                code,
                message,
            });
        }

        let payload: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))?;
        let parsed: ConfirmBody = serde_json::from_value(payload.clone())
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        if parsed.status != STATUS_DONE {
            return Err(GatewayError::NotCompleted {
                status: parsed.status,
            });
        }

        Ok(GatewayConfirmation {
            total_amount: parsed.total_amount.unwrap_or(request.amount),
            payload,
        })
    }
}
