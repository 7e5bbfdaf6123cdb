// server/src/services/orders.rs

//! Order lifecycle.
//!
//! An order is born `pending` with a one-entry tracking history. Status moves
//! freely between `pending`, `approved` and `rejected`; each move appends a
//! mirror entry to `trackingHistory` in the same store update. Manual tracking
//! entries are appended without touching `status`. History is never rewritten.

use crate::errors::{AppError, Result};
use crate::models::order::{
  CREATED_AT_FIELD, SENDER_EMAIL_FIELD, STATUS_FIELD, TRACKING_DATE_FIELD, TRACKING_HISTORY_FIELD, UPDATED_AT_FIELD,
  USER_EMAIL_FIELD,
};
use crate::models::{from_document, from_documents, now, parse_id, require_object, Order, OrderStatus, TrackingEntry};
use crate::store::{Collection, DocumentStore, Filter, InsertOutcome, Sort, Update, UpdateOutcome};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Optional narrowing for [`OrderLifecycle::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
  /// Matches the order's `userEmail`.
  pub email: Option<String>,
  pub status: Option<OrderStatus>,
}

impl OrderFilter {
  fn to_store_filter(&self) -> Filter {
    let mut filter = Filter::all();
    if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
      filter = filter.eq(USER_EMAIL_FIELD, email);
    }
    if let Some(status) = self.status {
      filter = filter.eq(STATUS_FIELD, status.as_str());
    }
    filter
  }
}

#[derive(Clone)]
pub struct OrderLifecycle {
  store: Arc<dyn DocumentStore>,
}

impl OrderLifecycle {
  pub fn new(store: Arc<dyn DocumentStore>) -> Self {
    Self { store }
  }

  /// Stores a new order. Whatever `status`, `trackingHistory` or `createdAt`
  /// the caller sent is replaced.
  #[instrument(name = "orders::create", skip(self, fields))]
  pub async fn create(&self, fields: Value) -> Result<InsertOutcome> {
    let mut doc = require_object(fields, "Order")?;
    let created_at = now();
    let initial = TrackingEntry::for_status(OrderStatus::Pending, created_at);

    doc.insert(STATUS_FIELD.to_string(), json!(OrderStatus::Pending));
    doc.insert(TRACKING_HISTORY_FIELD.to_string(), Value::Array(vec![serde_json::to_value(initial)?]));
    doc.insert(CREATED_AT_FIELD.to_string(), json!(created_at));
    doc.remove(UPDATED_AT_FIELD);

    let outcome = self.store.insert(Collection::Orders, doc).await?;
    info!(order_id = %outcome.inserted_id, "Order created.");
    Ok(outcome)
  }

  /// Orders newest first, optionally narrowed by requester email and status.
  #[instrument(name = "orders::list", skip(self))]
  pub async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
    let docs = self
      .store
      .find(Collection::Orders, &filter.to_store_filter(), Some(Sort::NewestFirst))
      .await?;
    from_documents(docs)
  }

  /// Listing keyed on `senderEmail`, kept for clients of the `/booking` route.
  #[instrument(name = "orders::list_bookings", skip(self))]
  pub async fn list_bookings(&self, sender_email: Option<&str>) -> Result<Vec<Order>> {
    let filter = match sender_email.filter(|e| !e.trim().is_empty()) {
      Some(email) => Filter::all().eq(SENDER_EMAIL_FIELD, email),
      None => Filter::all(),
    };
    let docs = self.store.find(Collection::Orders, &filter, None).await?;
    from_documents(docs)
  }

  pub async fn list_pending(&self) -> Result<Vec<Order>> {
    self.list_with_status(OrderStatus::Pending).await
  }

  pub async fn list_approved(&self) -> Result<Vec<Order>> {
    self.list_with_status(OrderStatus::Approved).await
  }

  async fn list_with_status(&self, status: OrderStatus) -> Result<Vec<Order>> {
    self
      .list(&OrderFilter {
        email: None,
        status: Some(status),
      })
      .await
  }

  #[instrument(name = "orders::get", skip(self))]
  pub async fn get(&self, id: &str) -> Result<Order> {
    let id = parse_id(id)?;
    match self.store.find_one(Collection::Orders, id).await? {
      Some(doc) => from_document(doc),
      None => {
        warn!(%id, "Order not found.");
        Err(AppError::NotFound("Order not found".to_string()))
      }
    }
  }

  /// Moves the order to `status` and records the move in its history.
  /// An unknown status is rejected before anything is written.
  #[instrument(name = "orders::set_status", skip(self))]
  pub async fn set_status(&self, id: &str, status: &str) -> Result<UpdateOutcome> {
    let id = parse_id(id)?;
    let status: OrderStatus = status.parse()?;
    let changed_at = now();

    let update = Update::new()
      .set(STATUS_FIELD, status.as_str())
      .set(UPDATED_AT_FIELD, json!(changed_at))
      .push(
        TRACKING_HISTORY_FIELD,
        serde_json::to_value(TrackingEntry::for_status(status, changed_at))?,
      );
    let outcome = self.store.update_one(Collection::Orders, id, &update).await?;
    info!(%id, %status, matched = outcome.matched_count, "Order status update applied.");
    Ok(outcome)
  }

  /// Appends a caller-written tracking entry as sent; the order's `status` is untouched.
  /// A `status` key must hold a string, and `date` is filled in when absent.
  #[instrument(name = "orders::add_tracking_entry", skip(self, entry))]
  pub async fn add_tracking_entry(&self, id: &str, entry: Value) -> Result<UpdateOutcome> {
    let id = parse_id(id)?;
    let mut entry = require_object(entry, "Tracking entry")?;
    if entry.get(STATUS_FIELD).is_some_and(|status| !status.is_string()) {
      return Err(AppError::Validation("Tracking entry status must be a string".to_string()));
    }
    if !entry.contains_key(TRACKING_DATE_FIELD) {
      entry.insert(TRACKING_DATE_FIELD.to_string(), json!(now()));
    }

    let update = Update::new().push(TRACKING_HISTORY_FIELD, Value::Object(entry));
    let outcome = self.store.update_one(Collection::Orders, id, &update).await?;
    info!(%id, matched = outcome.matched_count, "Tracking entry appended.");
    Ok(outcome)
  }
}
