//! `SeaORM` Entity prelude

pub use super::payments::Entity as Payments;
pub use super::products::Entity as Products;
pub use super::users::Entity as Users;
