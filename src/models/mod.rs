pub mod admin;
pub mod business;
pub mod payment;
pub mod product;
