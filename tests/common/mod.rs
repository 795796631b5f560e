#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use pigseller_backend::config::{Config, GatewayConfig};
use pigseller_backend::entities::{payments, products, users};
use pigseller_backend::services::auth::{hash_token, CallerIdentity};
use pigseller_backend::services::business_verification::AlwaysApprove;
use pigseller_backend::services::payment_gateway::{
    GatewayConfirmRequest, GatewayConfirmation, GatewayError, PaymentGateway,
};
use pigseller_backend::AppState;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, DbErr, Set};
use sea_orm_migration::MigratorTrait;

/// Set up a migrated in-memory SQLite database
///
/// A single pooled connection keeps every query on the same in-memory file.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub async fn seed_user(
    db: &DatabaseConnection,
    uid: &str,
    email: &str,
    token: &str,
    is_admin: bool,
) -> CallerIdentity {
    users::ActiveModel {
        id: Set(uid.to_string()),
        email: Set(email.to_string()),
        token_hash: Set(hash_token(token)),
        is_admin: Set(is_admin),
        created_at: Set(Utc::now().fixed_offset()),
    }
    .insert(db)
    .await
    .expect("Failed to seed user");

    CallerIdentity {
        uid: uid.to_string(),
        email: email.to_string(),
        is_admin,
    }
}

pub async fn seed_product(
    db: &DatabaseConnection,
    id: &str,
    seller_id: &str,
    price: i64,
    status: &str,
) -> products::Model {
    let now = Utc::now().fixed_offset();
    products::ActiveModel {
        id: Set(id.to_string()),
        seller_id: Set(seller_id.to_string()),
        name: Set(format!("Product {}", id)),
        price: Set(price),
        status: Set(status.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("Failed to seed product")
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        region: "asia-northeast3".to_string(),
        client_base_url: "https://pigseller.example".to_string(),
        gateway: GatewayConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            secret_key: "test_sk_123".to_string(),
            timeout: Duration::from_secs(2),
            max_retries: 0,
        },
    }
}

pub fn test_app_state(db: DatabaseConnection, gateway: Arc<FakeGateway>) -> AppState {
    AppState {
        db,
        config: Arc::new(test_config()),
        gateway,
        business_verifier: Arc::new(AlwaysApprove),
    }
}

/// What the scripted gateway answers
#[derive(Debug, Clone)]
pub enum FakeOutcome {
    /// 2xx with the given status; `DONE` succeeds
    Status(&'static str),
    /// Non-2xx with the given gateway message
    Rejected(&'static str),
    Timeout,
}

/// Payment record another instance commits while the gateway call is in flight
struct ConcurrentInsert {
    db: DatabaseConnection,
    seller_id: String,
    payment_key: String,
    order_id: String,
    product_id: String,
}

pub struct FakeGateway {
    outcome: FakeOutcome,
    calls: AtomicUsize,
    last_request: Mutex<Option<GatewayConfirmRequest>>,
    concurrent_insert: Option<ConcurrentInsert>,
}

impl FakeGateway {
    pub fn new(outcome: FakeOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            concurrent_insert: None,
        }
    }

    pub fn done() -> Self {
        Self::new(FakeOutcome::Status("DONE"))
    }

    pub fn with_concurrent_insert(
        mut self,
        db: DatabaseConnection,
        seller_id: &str,
        payment_key: &str,
        order_id: &str,
        product_id: &str,
    ) -> Self {
        self.concurrent_insert = Some(ConcurrentInsert {
            db,
            seller_id: seller_id.to_string(),
            payment_key: payment_key.to_string(),
            order_id: order_id.to_string(),
            product_id: product_id.to_string(),
        });
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GatewayConfirmRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn confirm(
        &self,
        request: &GatewayConfirmRequest,
    ) -> Result<GatewayConfirmation, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if let Some(race) = &self.concurrent_insert {
            payments::ActiveModel {
                seller_id: Set(race.seller_id.clone()),
                product_id: Set(race.product_id.clone()),
                amount: Set(request.amount),
                payment_key: Set(race.payment_key.clone()),
                order_id: Set(race.order_id.clone()),
                status: Set("PAID".to_string()),
                gateway_response: Set(Some(serde_json::json!({"status": "DONE", "by": "other-instance"}))),
                created_at: Set(Utc::now().fixed_offset()),
                ..Default::default()
            }
            .insert(&race.db)
            .await
            .expect("Failed to insert concurrent payment");
        }

        match &self.outcome {
            FakeOutcome::Status(status) => {
                let payload = serde_json::json!({
                    "paymentKey": request.payment_key,
                    "orderId": request.order_id,
                    "status": status,
                    "totalAmount": request.amount,
                    "method": "CARD",
                });
                if *status == "DONE" {
                    Ok(GatewayConfirmation {
                        total_amount: request.amount,
                        payload,
                    })
                } else {
                    Err(GatewayError::NotCompleted {
                        status: status.to_string(),
                    })
                }
            }
            FakeOutcome::Rejected(message) => Err(GatewayError::Rejected {
                status: 400,
                code: Some("REJECT_CARD_COMPANY".to_string()),
                message: message.to_string(),
            }),
            FakeOutcome::Timeout => Err(GatewayError::Timeout),
        }
    }
}
