// server/src/store/memory.rs

//! In-process document store with the same semantics as the Postgres backend.
//! Used by the test-suite and by `STORE_BACKEND=memory` for local runs.

use super::{with_id, Collection, DeleteOutcome, DocumentStore, Filter, InsertOutcome, Sort, Update, UpdateOutcome};
use crate::errors::Result;
use crate::models::order::CREATED_AT_FIELD;
use crate::models::{Document, ID_FIELD};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::cmp::Reverse;
use std::collections::HashMap;
use tracing::{debug, instrument};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredDocument {
  id: Uuid,
  body: Document,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
  // Vec keeps insertion order, which `find_first` and unsorted `find` rely on.
  collections: RwLock<HashMap<Collection, Vec<StoredDocument>>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self, collection: Collection) -> usize {
    self.collections.read().get(&collection).map_or(0, Vec::len)
  }

  pub fn is_empty(&self, collection: Collection) -> bool {
    self.len(collection) == 0
  }
}

fn created_at(doc: &Document) -> Option<DateTime<Utc>> {
  doc
    .get(CREATED_AT_FIELD)
    .and_then(|v| v.as_str())
    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    .map(|dt| dt.with_timezone(&Utc))
}

#[async_trait]
impl DocumentStore for MemoryStore {
  #[instrument(name = "memory_store::insert", skip(self, doc), fields(collection = %collection))]
  async fn insert(&self, collection: Collection, mut doc: Document) -> Result<InsertOutcome> {
    doc.remove(ID_FIELD);
    let id = Uuid::new_v4();
    self
      .collections
      .write()
      .entry(collection)
      .or_default()
      .push(StoredDocument { id, body: doc });
    debug!(%id, "Document inserted.");
    Ok(InsertOutcome {
      acknowledged: true,
      inserted_id: id,
    })
  }

  async fn find_one(&self, collection: Collection, id: Uuid) -> Result<Option<Document>> {
    let guard = self.collections.read();
    Ok(
      guard
        .get(&collection)
        .and_then(|docs| docs.iter().find(|d| d.id == id))
        .map(|d| with_id(d.id, d.body.clone())),
    )
  }

  async fn find_first(&self, collection: Collection, filter: &Filter) -> Result<Option<Document>> {
    let guard = self.collections.read();
    Ok(
      guard
        .get(&collection)
        .and_then(|docs| docs.iter().find(|d| filter.matches(&d.body)))
        .map(|d| with_id(d.id, d.body.clone())),
    )
  }

  async fn find(&self, collection: Collection, filter: &Filter, sort: Option<Sort>) -> Result<Vec<Document>> {
    let mut matched: Vec<(usize, StoredDocument)> = {
      let guard = self.collections.read();
      guard
        .get(&collection)
        .map(|docs| {
          docs
            .iter()
            .enumerate()
            .filter(|(_, d)| filter.matches(&d.body))
            .map(|(position, d)| (position, d.clone()))
            .collect()
        })
        .unwrap_or_default()
    }; // guard dropped

    if let Some(Sort::NewestFirst) = sort {
      // Later insertions win ties; documents without a timestamp sort last.
      matched.sort_by_key(|(position, d)| (Reverse(created_at(&d.body)), Reverse(*position)));
    }

    Ok(matched.into_iter().map(|(_, d)| with_id(d.id, d.body)).collect())
  }

  #[instrument(name = "memory_store::update_one", skip(self, update), fields(collection = %collection, %id))]
  async fn update_one(&self, collection: Collection, id: Uuid, update: &Update) -> Result<UpdateOutcome> {
    let mut guard = self.collections.write();
    let Some(stored) = guard.get_mut(&collection).and_then(|docs| docs.iter_mut().find(|d| d.id == id)) else {
      debug!("No document matched update.");
      return Ok(UpdateOutcome {
        acknowledged: true,
        matched_count: 0,
        modified_count: 0,
      });
    };

    let before = stored.body.clone();
    update.apply(&mut stored.body);
    let modified = stored.body != before;
    Ok(UpdateOutcome {
      acknowledged: true,
      matched_count: 1,
      modified_count: u64::from(modified),
    })
  }

  #[instrument(name = "memory_store::delete_one", skip(self), fields(collection = %collection, %id))]
  async fn delete_one(&self, collection: Collection, id: Uuid) -> Result<DeleteOutcome> {
    let mut guard = self.collections.write();
    let deleted = match guard.get_mut(&collection) {
      Some(docs) => {
        let before = docs.len();
        docs.retain(|d| d.id != id);
        (before - docs.len()) as u64
      }
      None => 0,
    };
    Ok(DeleteOutcome {
      acknowledged: true,
      deleted_count: deleted,
    })
  }

  async fn ping(&self) -> Result<()> {
    Ok(())
  }

  fn backend_name(&self) -> &'static str {
    "memory"
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::{json, Value};

  fn doc(value: Value) -> Document {
    value.as_object().cloned().unwrap()
  }

  #[tokio::test]
  async fn insert_assigns_fresh_identifier() {
    let store = MemoryStore::new();
    let outcome = store
      .insert(Collection::Products, doc(json!({ "_id": "caller", "name": "Shirt" })))
      .await
      .unwrap();
    assert!(outcome.acknowledged);

    let found = store.find_one(Collection::Products, outcome.inserted_id).await.unwrap().unwrap();
    assert_eq!(found.get("_id"), Some(&json!(outcome.inserted_id.to_string())));
    assert_eq!(found.get("name"), Some(&json!("Shirt")));
    assert!(store.find_one(Collection::Users, outcome.inserted_id).await.unwrap().is_none());
  }

  #[tokio::test]
  async fn update_reports_match_and_modification() {
    let store = MemoryStore::new();
    let id = store
      .insert(Collection::Users, doc(json!({ "role": "buyer" })))
      .await
      .unwrap()
      .inserted_id;

    let changed = store
      .update_one(Collection::Users, id, &Update::new().set("role", "manager"))
      .await
      .unwrap();
    assert_eq!((changed.matched_count, changed.modified_count), (1, 1));

    let unchanged = store
      .update_one(Collection::Users, id, &Update::new().set("role", "manager"))
      .await
      .unwrap();
    assert_eq!((unchanged.matched_count, unchanged.modified_count), (1, 0));

    let missing = store
      .update_one(Collection::Users, Uuid::new_v4(), &Update::new().set("role", "admin"))
      .await
      .unwrap();
    assert_eq!((missing.matched_count, missing.modified_count), (0, 0));
  }

  #[tokio::test]
  async fn newest_first_orders_by_created_at() {
    let store = MemoryStore::new();
    for (item, created) in [
      ("old", "2024-01-01T00:00:00Z"),
      ("new", "2025-06-01T00:00:00Z"),
      ("mid", "2024-12-31T23:59:59.5Z"),
    ] {
      store
        .insert(Collection::Orders, doc(json!({ "item": item, "createdAt": created })))
        .await
        .unwrap();
    }

    let items: Vec<Value> = store
      .find(Collection::Orders, &Filter::all(), Some(Sort::NewestFirst))
      .await
      .unwrap()
      .into_iter()
      .map(|d| d["item"].clone())
      .collect();
    assert_eq!(items, vec![json!("new"), json!("mid"), json!("old")]);
  }

  #[tokio::test]
  async fn delete_removes_only_target() {
    let store = MemoryStore::new();
    let keep = store.insert(Collection::Products, Document::new()).await.unwrap().inserted_id;
    let drop = store.insert(Collection::Products, Document::new()).await.unwrap().inserted_id;

    assert_eq!(store.delete_one(Collection::Products, drop).await.unwrap().deleted_count, 1);
    assert_eq!(store.delete_one(Collection::Products, drop).await.unwrap().deleted_count, 0);
    assert_eq!(store.len(Collection::Products), 1);
    assert!(store.find_one(Collection::Products, keep).await.unwrap().is_some());
  }
}
