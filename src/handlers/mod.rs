pub mod admin;
pub mod business;
pub mod health;
pub mod payment;
pub mod product;
