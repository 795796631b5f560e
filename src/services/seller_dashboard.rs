//! Read paths behind the seller dashboard and the payment success page

use reqwest::Url;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::entities::{payments, prelude::*, products};
use crate::error::ApiError;
use crate::models::payment::PaymentRecordResponse;
use crate::models::product::{CheckoutResponse, ProductListResponse, ProductStatus, ProductSummary};
use crate::services::auth::{require_caller, CallerIdentity};

/// Products owned by the caller, oldest first
pub async fn list_seller_products(
    db: &DatabaseConnection,
    caller: Option<&CallerIdentity>,
) -> Result<ProductListResponse, ApiError> {
    let caller = require_caller(caller)?;

    let rows = Products::find()
        .filter(products::Column::SellerId.eq(caller.uid.as_str()))
        .order_by_asc(products::Column::CreatedAt)
        .all(db)
        .await?;

    tracing::debug!(seller_id = %caller.uid, count = rows.len(), "Listed seller products");

    Ok(ProductListResponse {
        products: rows.into_iter().map(ProductSummary::from).collect(),
    })
}

/// Issue a fresh orderId and the parameters for the gateway payment widget
///
/// Only approved products can be paid for.
pub async fn prepare_checkout(
    db: &DatabaseConnection,
    client_base_url: &str,
    caller: Option<&CallerIdentity>,
    product_id: &str,
) -> Result<CheckoutResponse, ApiError> {
    let caller = require_caller(caller)?;

    let product = Products::find_by_id(product_id.to_string())
        .one(db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    if product.seller_id != caller.uid {
        return Err(ApiError::PermissionDenied(
            "Product belongs to another seller".to_string(),
        ));
    }

    let status: ProductStatus = product
        .status
        .parse()
        .map_err(ApiError::Internal)?;
    if status != ProductStatus::Approved {
        return Err(ApiError::InvalidArgument(format!(
            "Product is {}, only approved products can be paid for",
            status
        )));
    }

    let order_id = uuid::Uuid::new_v4().to_string();
    let success_url = build_success_url(client_base_url, &order_id, product.price, &product.id)?;

    tracing::info!(
        seller_id = %caller.uid,
        product_id = %product.id,
        order_id = %order_id,
        "Checkout prepared"
    );

    Ok(CheckoutResponse {
        order_id,
        order_name: product.name,
        amount: product.price,
        product_id: product.id,
        success_url,
    })
}

/// `{paymentKey}` is left literal for the gateway widget to fill in
fn build_success_url(
    client_base_url: &str,
    order_id: &str,
    amount: i64,
    product_id: &str,
) -> Result<String, ApiError> {
    let mut url = Url::parse(&format!("{}/payment/success", client_base_url))
        .map_err(|e| ApiError::Internal(format!("Invalid client base URL: {}", e)))?;
    url.set_query(Some("paymentKey={paymentKey}"));
    url.query_pairs_mut()
        .append_pair("orderId", order_id)
        .append_pair("amount", &amount.to_string())
        .append_pair("productId", product_id);
    Ok(url.to_string())
}

/// Payment record for an order placed by the caller
pub async fn get_payment(
    db: &DatabaseConnection,
    caller: Option<&CallerIdentity>,
    order_id: &str,
) -> Result<PaymentRecordResponse, ApiError> {
    let caller = require_caller(caller)?;

    Payments::find()
        .filter(payments::Column::OrderId.eq(order_id))
        .filter(payments::Column::SellerId.eq(caller.uid.as_str()))
        .one(db)
        .await?
        .map(PaymentRecordResponse::from)
        .ok_or_else(|| ApiError::NotFound("Payment not found".to_string()))
}
