// src/lib.rs

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::services::{business_verification::BusinessVerifier, payment_gateway::PaymentGateway};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub gateway: Arc<dyn PaymentGateway>,
    pub business_verifier: Arc<dyn BusinessVerifier>,
}

pub mod entities {
    pub mod prelude;
    pub mod payments;
    pub mod products;
    pub mod users;
}

pub mod services {
    pub mod auth;
    pub mod business_verification;
    pub mod payment_confirmation;
    pub mod payment_gateway;
    pub mod seller_dashboard;
}

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
