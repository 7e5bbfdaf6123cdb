// server/src/models/product.rs

use super::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Email of the managing seller.
pub const CREATED_BY_FIELD: &str = "createdBy";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Seller-supplied product. Apart from the identifier every field is free-form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
  #[serde(rename = "_id")]
  pub id: Uuid,
  #[serde(flatten)]
  pub fields: Document,
}
