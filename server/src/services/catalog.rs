// server/src/services/catalog.rs

use crate::errors::{AppError, Result};
use crate::models::product::{CREATED_BY_FIELD, UPDATED_AT_FIELD};
use crate::models::{from_document, from_documents, now, parse_id, require_object, Product};
use crate::store::{Collection, DeleteOutcome, DocumentStore, Filter, InsertOutcome, Update, UpdateOutcome};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument, warn};

#[derive(Clone)]
pub struct ProductCatalog {
  store: Arc<dyn DocumentStore>,
}

impl ProductCatalog {
  pub fn new(store: Arc<dyn DocumentStore>) -> Self {
    Self { store }
  }

  #[instrument(name = "catalog::list", skip(self))]
  pub async fn list(&self) -> Result<Vec<Product>> {
    let docs = self.store.find(Collection::Products, &Filter::all(), None).await?;
    from_documents(docs)
  }

  #[instrument(name = "catalog::get", skip(self))]
  pub async fn get(&self, id: &str) -> Result<Product> {
    let id = parse_id(id)?;
    match self.store.find_one(Collection::Products, id).await? {
      Some(doc) => from_document(doc),
      None => {
        warn!(%id, "Product not found.");
        Err(AppError::NotFound("Product not found".to_string()))
      }
    }
  }

  /// Products whose `createdBy` equals `email`.
  #[instrument(name = "catalog::list_by_manager", skip(self))]
  pub async fn list_by_manager(&self, email: Option<&str>) -> Result<Vec<Product>> {
    let email = email
      .filter(|e| !e.trim().is_empty())
      .ok_or_else(|| AppError::Validation("Manager email is required".to_string()))?;
    let filter = Filter::all().eq(CREATED_BY_FIELD, email);
    let docs = self.store.find(Collection::Products, &filter, None).await?;
    from_documents(docs)
  }

  /// Inserts the caller's fields as given.
  #[instrument(name = "catalog::create", skip(self, fields))]
  pub async fn create(&self, fields: Value) -> Result<InsertOutcome> {
    let doc = require_object(fields, "Product")?;
    let outcome = self.store.insert(Collection::Products, doc).await?;
    info!(product_id = %outcome.inserted_id, "Product created.");
    Ok(outcome)
  }

  /// Replaces only the supplied fields and refreshes `updatedAt`. `_id` can never be overwritten.
  #[instrument(name = "catalog::update", skip(self, fields))]
  pub async fn update(&self, id: &str, fields: Value) -> Result<UpdateOutcome> {
    let id = parse_id(id)?;
    let patch = require_object(fields, "Product update")?;
    let update = Update::new()
      .set_all(patch)
      .set(UPDATED_AT_FIELD, json!(now()));
    let outcome = self.store.update_one(Collection::Products, id, &update).await?;
    info!(%id, matched = outcome.matched_count, "Product update applied.");
    Ok(outcome)
  }

  /// Removes the product. Orders that mention it are left alone.
  #[instrument(name = "catalog::delete", skip(self))]
  pub async fn delete(&self, id: &str) -> Result<DeleteOutcome> {
    let id = parse_id(id)?;
    let outcome = self.store.delete_one(Collection::Products, id).await?;
    info!(%id, deleted = outcome.deleted_count, "Product delete applied.");
    Ok(outcome)
  }
}
