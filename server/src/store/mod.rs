// server/src/store/mod.rs

//! Persistence gateway.
//!
//! The rest of the server talks to the database only through [`DocumentStore`],
//! an object-safe async trait over three named collections of JSON documents.
//! [`connect`] builds the configured backend once at start-up; the resulting
//! `Arc<dyn DocumentStore>` is handed to every service.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::config::{AppConfig, StoreBackend};
use crate::errors::{AppError, Result};
use crate::models::{Document, ID_FIELD};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
  Products,
  Users,
  Orders,
}

impl Collection {
  pub fn name(&self) -> &'static str {
    match self {
      Collection::Products => "products",
      Collection::Users => "users",
      Collection::Orders => "orders",
    }
  }
}

impl fmt::Display for Collection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Top-level field equality conditions; a document matches when every condition holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
  conditions: Document,
}

impl Filter {
  pub fn all() -> Self {
    Self::default()
  }

  pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
    self.conditions.insert(field.to_string(), value.into());
    self
  }

  pub fn conditions(&self) -> &Document {
    &self.conditions
  }

  pub fn matches(&self, doc: &Document) -> bool {
    self
      .conditions
      .iter()
      .all(|(field, expected)| doc.get(field) == Some(expected))
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
  /// Descending by the document's `createdAt` timestamp.
  NewestFirst,
}

/// A single-document modification: shallow field replacement plus an optional array append.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
  set: Document,
  push: Option<(String, Value)>,
}

impl Update {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn set(mut self, field: &str, value: impl Into<Value>) -> Self {
    if field != ID_FIELD {
      self.set.insert(field.to_string(), value.into());
    }
    self
  }

  pub fn set_all(mut self, fields: Document) -> Self {
    for (field, value) in fields {
      if field != ID_FIELD {
        self.set.insert(field, value);
      }
    }
    self
  }

  /// Appends `value` to the array at `field`, creating the array if it is missing.
  pub fn push(mut self, field: &str, value: impl Into<Value>) -> Self {
    self.push = Some((field.to_string(), value.into()));
    self
  }

  pub fn fields(&self) -> &Document {
    &self.set
  }

  pub fn pushed(&self) -> Option<(&str, &Value)> {
    self.push.as_ref().map(|(field, value)| (field.as_str(), value))
  }

  /// Applies the modification in place, the way both backends must.
  pub fn apply(&self, doc: &mut Document) {
    for (field, value) in &self.set {
      doc.insert(field.clone(), value.clone());
    }
    if let Some((field, value)) = &self.push {
      match doc.get_mut(field) {
        Some(Value::Array(items)) => items.push(value.clone()),
        _ => {
          doc.insert(field.clone(), Value::Array(vec![value.clone()]));
        }
      }
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
  pub acknowledged: bool,
  pub inserted_id: Uuid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
  pub acknowledged: bool,
  pub matched_count: u64,
  pub modified_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
  pub acknowledged: bool,
  pub deleted_count: u64,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
  /// Stores `doc` under a freshly generated identifier.
  async fn insert(&self, collection: Collection, doc: Document) -> Result<InsertOutcome>;

  async fn find_one(&self, collection: Collection, id: Uuid) -> Result<Option<Document>>;

  /// First document matching `filter`, in insertion order.
  async fn find_first(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>>;

  async fn find(&self, collection: Collection, filter: &Filter, sort: Option<Sort>) -> Result<Vec<Document>>;

  /// Applies `update` atomically. A missing document is not an error: it reports zero matches.
  async fn update_one(&self, collection: Collection, id: Uuid, update: &Update) -> Result<UpdateOutcome>;

  async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<DeleteOutcome>;

  async fn ping(&self) -> Result<()>;

  fn backend_name(&self) -> &'static str;
}

/// Attaches the identifier to a stored body before it leaves the store.
pub(crate) fn with_id(id: Uuid, mut doc: Document) -> Document {
  doc.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
  doc
}

/// Opens the configured backend. Start-up is gated on this: a store that cannot
/// be reached or migrated fails the process instead of serving errors.
pub async fn connect(config: &AppConfig) -> Result<Arc<dyn DocumentStore>> {
  match config.store_backend {
    StoreBackend::Memory => {
      info!("Using in-memory document store; data will not survive a restart.");
      Ok(Arc::new(MemoryStore::new()))
    }
    StoreBackend::Postgres => {
      let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Config("DATABASE_URL is required for the postgres backend".to_string()))?;
      let store = PgStore::connect(url, config.db_max_connections, config.db_connect_timeout).await?;
      if config.run_migrations {
        store.migrate().await?;
      }
      store.ping().await?;
      info!("Successfully connected to the database.");
      Ok(Arc::new(store))
    }
  }
}
