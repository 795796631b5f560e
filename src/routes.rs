use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{admin, business, health, payment, product};
use crate::AppState;

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/payments/confirm", post(payment::confirm_payment))
        .route("/api/payments/{order_id}", get(payment::get_payment))
        .route("/api/products", get(product::list_products))
        .route("/api/products/{product_id}/checkout", post(product::checkout))
        .route("/api/business/verify", post(business::verify_business))
        .route("/api/admin/claims", post(admin::grant_admin))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
