//! Product status and seller dashboard models

use serde::{Deserialize, Serialize};

use crate::entities::products;

/// Listing lifecycle of a product
///
/// Products are created as `draft` and approved out of band. Confirming the
/// listing payment moves a product to `live`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Approved,
    Live,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Approved => "approved",
            ProductStatus::Live => "live",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(ProductStatus::Draft),
            "approved" => Ok(ProductStatus::Approved),
            "live" => Ok(ProductStatus::Live),
            _ => Err(format!("Unknown product status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub name: String,
    pub price: i64,
    pub status: String,
}

impl From<products::Model> for ProductSummary {
    fn from(model: products::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            price: model.price,
            status: model.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductListResponse {
    pub products: Vec<ProductSummary>,
}

/// Everything the client needs to open the gateway payment widget
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: String,
    pub order_name: String,
    pub amount: i64,
    pub product_id: String,
    /// Redirect target after the gateway flow. `{paymentKey}` is substituted
    /// by the gateway widget. Informational only.
    pub success_url: String,
}
