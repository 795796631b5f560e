//! Payment confirmation transaction
//!
//! Steps, short-circuiting on the first failure:
//!
//! ```text
//! caller? ──no──▶ Unauthenticated
//!    │
//! product lookup ──missing──▶ NotFound
//!    │
//! already recorded? ──same charge──▶ prior result
//!    │              ╰─other charge─▶ Conflict
//!    │
//! amount == price ──no──▶ InvalidArgument
//!    │
//! gateway confirm ──not DONE──▶ Aborted / Internal
//!    │
//! BEGIN; insert payment; product.status = live; COMMIT
//! ```
//!
//! The unique indexes on `payments.order_id` and `payments.payment_key`
//! settle concurrent confirmations of the same order across instances.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, QueryFilter, Set, SqlErr, TransactionTrait,
};

use crate::entities::{payments, prelude::*, products};
use crate::error::ApiError;
use crate::models::payment::{ConfirmPaymentRequest, ConfirmPaymentResponse, PaymentRecordStatus};
use crate::models::product::ProductStatus;
use crate::services::auth::{require_caller, CallerIdentity};
use crate::services::payment_gateway::{
    GatewayConfirmRequest, GatewayConfirmation, GatewayError, PaymentGateway,
};

pub async fn confirm_payment(
    db: &DatabaseConnection,
    gateway: &dyn PaymentGateway,
    caller: Option<&CallerIdentity>,
    request: ConfirmPaymentRequest,
) -> Result<ConfirmPaymentResponse, ApiError> {
    let caller = require_caller(caller)?;
    validate_request(&request)?;

    tracing::info!(
        seller_id = %caller.uid,
        order_id = %request.order_id,
        product_id = %request.product_id,
        amount = request.amount,
        "Payment confirmation requested"
    );

    let product = Products::find_by_id(request.product_id.clone())
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    if let Some(prior) = find_prior_result(db, caller, &request).await? {
        tracing::info!(order_id = %request.order_id, "Order already confirmed, returning recorded result");
        return Ok(prior);
    }

    if request.amount != product.price {
        tracing::warn!(
            order_id = %request.order_id,
            product_id = %product.id,
            requested = request.amount,
            price = product.price,
            "Payment amount does not match product price"
        );
        return Err(ApiError::InvalidArgument(format!(
            "Amount {} does not match product price {}",
            request.amount, product.price
        )));
    }

    let confirmation = gateway
        .confirm(&GatewayConfirmRequest {
            payment_key: request.payment_key.clone(),
            order_id: request.order_id.clone(),
            amount: request.amount,
        })
        .await
        .map_err(|e| {
            tracing::error!(order_id = %request.order_id, error = ?e, "Gateway confirmation failed");
            map_gateway_error(e)
        })?;

    persist_confirmation(db, caller, product, &request, confirmation).await
}

fn validate_request(request: &ConfirmPaymentRequest) -> Result<(), ApiError> {
    let required = [
        ("paymentKey", &request.payment_key),
        ("orderId", &request.order_id),
        ("productId", &request.product_id),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(ApiError::InvalidArgument(format!("{} is required", name)));
        }
    }

    if request.amount <= 0 {
        return Err(ApiError::InvalidArgument(
            "amount must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

fn map_gateway_error(err: GatewayError) -> ApiError {
    match err {
        GatewayError::NotCompleted { status } => {
            ApiError::Aborted(format!("Payment approval failed (status {})", status))
        }
        GatewayError::Rejected { message, .. } => ApiError::Internal(message),
        GatewayError::Timeout => {
            ApiError::Internal("Payment gateway did not respond in time".to_string())
        }
        GatewayError::Transport(_) | GatewayError::Decode(_) => {
            ApiError::Internal("An error occurred while processing the payment".to_string())
        }
    }
}

/// Look for payment records sharing this order's orderId or paymentKey
///
/// A record for the exact same charge placed by the same seller is replayed.
/// Any other overlap means the key was reused for a different charge.
async fn find_prior_result<C: ConnectionTrait>(
    db: &C,
    caller: &CallerIdentity,
    request: &ConfirmPaymentRequest,
) -> Result<Option<ConfirmPaymentResponse>, ApiError> {
    let existing = Payments::find()
        .filter(
            Condition::any()
                .add(payments::Column::OrderId.eq(request.order_id.as_str()))
                .add(payments::Column::PaymentKey.eq(request.payment_key.as_str())),
        )
        .all(db)
        .await?;

    let mut replay = None;
    for record in existing {
        let same_charge = record.order_id == request.order_id
            && record.payment_key == request.payment_key
            && record.product_id == request.product_id
            && record.amount == request.amount
            && record.seller_id == caller.uid;

        if !same_charge {
            tracing::warn!(
                order_id = %request.order_id,
                recorded_order_id = %record.order_id,
                recorded_seller_id = %record.seller_id,
                "orderId or paymentKey already used for another payment"
            );
            return Err(ApiError::Conflict(
                "orderId or paymentKey was already used for another payment".to_string(),
            ));
        }

        replay = Some(ConfirmPaymentResponse {
            success: true,
            payment_data: record.gateway_response.unwrap_or_default(),
        });
    }

    Ok(replay)
}

/// Write the payment record and mark the product live in one transaction
async fn persist_confirmation(
    db: &DatabaseConnection,
    caller: &CallerIdentity,
    product: products::Model,
    request: &ConfirmPaymentRequest,
    confirmation: GatewayConfirmation,
) -> Result<ConfirmPaymentResponse, ApiError> {
    let now = Utc::now().fixed_offset();
    let txn = db.begin().await?;

    let record = payments::ActiveModel {
        seller_id: Set(caller.uid.clone()),
        product_id: Set(product.id.clone()),
        amount: Set(confirmation.total_amount),
        payment_key: Set(request.payment_key.clone()),
        order_id: Set(request.order_id.clone()),
        status: Set(PaymentRecordStatus::Paid.to_string()),
        gateway_response: Set(Some(confirmation.payload.clone())),
        created_at: Set(now),
        ..Default::default()
    };

    if let Err(e) = record.insert(&txn).await {
        txn.rollback().await?;
        if is_unique_violation(&e) {
            // A concurrent confirmation of this order committed first
            tracing::info!(order_id = %request.order_id, "Lost insert race, resolving against committed record");
            return find_prior_result(db, caller, request).await?.ok_or_else(|| {
                ApiError::Conflict("Payment was recorded concurrently".to_string())
            });
        }
        return Err(e.into());
    }

    let product_id = product.id.clone();
    let mut active_product = product.into_active_model();
    active_product.status = Set(ProductStatus::Live.to_string());
    active_product.updated_at = Set(now);
    active_product.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        seller_id = %caller.uid,
        order_id = %request.order_id,
        product_id = %product_id,
        amount = confirmation.total_amount,
        "Payment recorded and product is live"
    );

    Ok(ConfirmPaymentResponse {
        success: true,
        payment_data: confirmation.payload,
    })
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
