// server/src/models/mod.rs

//! Document shapes stored in the three collections.
//!
//! Every document is a JSON object. The typed structs pin down the fields the
//! services own (`status`, `trackingHistory`, ...) and carry everything else
//! through untouched in a flattened map.

pub mod order;
pub mod product;
pub mod user;

pub use order::{Order, OrderStatus, TrackingEntry};
pub use product::Product;
pub use user::{AdminView, RoleView, User, UserStatus};

use crate::errors::{AppError, Result};
use chrono::{DateTime, SubsecRound, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

/// A raw JSON document as stored.
pub type Document = serde_json::Map<String, Value>;

/// Key under which the store exposes a document's identifier.
pub const ID_FIELD: &str = "_id";

/// Current time at millisecond precision, so stored timestamps share one width.
pub fn now() -> DateTime<Utc> {
  Utc::now().trunc_subsecs(3)
}

/// Parses a path identifier.
pub fn parse_id(raw: &str) -> Result<Uuid> {
  Uuid::parse_str(raw.trim()).map_err(|_| AppError::InvalidId(raw.to_string()))
}

/// Accepts a request body only if it is a JSON object, dropping any caller supplied `_id`.
pub fn require_object(body: Value, what: &str) -> Result<Document> {
  match body {
    Value::Object(mut doc) => {
      doc.remove(ID_FIELD);
      Ok(doc)
    }
    other => Err(AppError::Validation(format!(
      "{} must be a JSON object, got {}",
      what,
      json_kind(&other)
    ))),
  }
}

/// Decodes a stored document into one of the typed models.
pub fn from_document<T: DeserializeOwned>(doc: Document) -> Result<T> {
  Ok(serde_json::from_value(Value::Object(doc))?)
}

pub fn from_documents<T: DeserializeOwned>(docs: Vec<Document>) -> Result<Vec<T>> {
  docs.into_iter().map(from_document).collect()
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn parse_id_rejects_garbage() {
    let id = Uuid::new_v4();
    assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    assert!(matches!(parse_id("not-an-id"), Err(AppError::InvalidId(raw)) if raw == "not-an-id"));
  }

  #[test]
  fn require_object_strips_identifier() {
    let doc = require_object(json!({ "_id": "x", "price": 10 }), "Product").unwrap();
    assert!(!doc.contains_key(ID_FIELD));
    assert_eq!(doc.get("price"), Some(&json!(10)));
  }

  #[test]
  fn require_object_rejects_non_objects() {
    let err = require_object(json!([1, 2]), "Order").unwrap_err();
    assert!(matches!(err, AppError::Validation(m) if m.contains("an array")));
  }
}
