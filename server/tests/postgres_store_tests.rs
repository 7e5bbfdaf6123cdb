// tests/postgres_store_tests.rs
//
// Runs the store contract against a real database. Skipped unless
// DATABASE_URL points at a Postgres instance the tests may migrate.
mod common;
use common::*;

use garments_server::models::Document;
use garments_server::store::{Collection, DocumentStore, Filter, PgStore, Sort, Update};
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

async fn pg_store() -> Option<PgStore> {
  setup_tracing();
  let Some(url) = std::env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty()) else {
    eprintln!("DATABASE_URL not set, skipping Postgres store test");
    return None;
  };
  let store = PgStore::connect(&url, 2, Duration::from_secs(10)).await.unwrap();
  store.migrate().await.unwrap();
  Some(store)
}

fn doc(value: Value) -> Document {
  value.as_object().cloned().unwrap()
}

/// Tables are shared between runs, so every test scopes its rows with a fresh marker.
fn marker() -> String {
  Uuid::new_v4().to_string()
}

#[tokio::test]
async fn update_reports_modification_and_misses() {
  let Some(store) = pg_store().await else { return };
  let id = store
    .insert(Collection::Users, doc(json!({ "role": "buyer", "run": marker() })))
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

  let stored = store.find_one(Collection::Users, id).await.unwrap().unwrap();
  assert_eq!(stored.get("role"), Some(&json!("manager")));
  assert_eq!(stored.get("_id"), Some(&json!(id.to_string())));
}

#[tokio::test]
async fn push_creates_then_extends_the_array() {
  let Some(store) = pg_store().await else { return };
  let id = store
    .insert(Collection::Orders, doc(json!({ "status": "pending", "run": marker() })))
    .await
    .unwrap()
    .inserted_id;

  let first = Update::new().push("trackingHistory", json!({ "status": "pending" }));
  store.update_one(Collection::Orders, id, &first).await.unwrap();

  let second = Update::new()
    .set("status", "approved")
    .push("trackingHistory", json!({ "status": "approved" }));
  let outcome = store.update_one(Collection::Orders, id, &second).await.unwrap();
  assert_eq!(outcome.modified_count, 1);

  let stored = store.find_one(Collection::Orders, id).await.unwrap().unwrap();
  assert_eq!(stored.get("status"), Some(&json!("approved")));
  assert_eq!(
    stored.get("trackingHistory"),
    Some(&json!([{ "status": "pending" }, { "status": "approved" }]))
  );
}

#[tokio::test]
async fn containment_filters_match_every_condition() {
  let Some(store) = pg_store().await else { return };
  let run = marker();
  for (email, status) in [("a@x.com", "pending"), ("a@x.com", "approved"), ("b@x.com", "pending")] {
    store
      .insert(
        Collection::Orders,
        doc(json!({ "run": run, "userEmail": email, "status": status, "nested": { "k": 1 } })),
      )
      .await
      .unwrap();
  }

  let scoped = Filter::all().eq("run", run.as_str());
  assert_eq!(store.find(Collection::Orders, &scoped, None).await.unwrap().len(), 3);

  let mine_pending = scoped.clone().eq("userEmail", "a@x.com").eq("status", "pending");
  let found = store.find(Collection::Orders, &mine_pending, None).await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].get("status"), Some(&json!("pending")));

  let first = store
    .find_first(Collection::Orders, &scoped.clone().eq("userEmail", "b@x.com"))
    .await
    .unwrap()
    .unwrap();
  assert_eq!(first.get("userEmail"), Some(&json!("b@x.com")));

  let nobody = scoped.eq("userEmail", "c@x.com");
  assert!(store.find_first(Collection::Orders, &nobody).await.unwrap().is_none());
}

#[tokio::test]
async fn newest_first_reads_created_at_as_a_timestamp() {
  let Some(store) = pg_store().await else { return };
  let run = marker();
  for (item, created) in [
    ("old", "2024-01-01T00:00:00Z"),
    ("new", "2025-06-01T00:00:00.250Z"),
    ("mid", "2024-12-31T23:59:59.500Z"),
  ] {
    store
      .insert(Collection::Orders, doc(json!({ "run": run, "item": item, "createdAt": created })))
      .await
      .unwrap();
  }

  let items: Vec<Value> = store
    .find(Collection::Orders, &Filter::all().eq("run", run.as_str()), Some(Sort::NewestFirst))
    .await
    .unwrap()
    .into_iter()
    .map(|d| d["item"].clone())
    .collect();
  assert_eq!(items, vec![json!("new"), json!("mid"), json!("old")]);
}

#[tokio::test]
async fn delete_counts_rows() {
  let Some(store) = pg_store().await else { return };
  let id = store
    .insert(Collection::Products, doc(json!({ "run": marker() })))
    .await
    .unwrap()
    .inserted_id;

  assert_eq!(store.delete_one(Collection::Products, id).await.unwrap().deleted_count, 1);
  assert_eq!(store.delete_one(Collection::Products, id).await.unwrap().deleted_count, 0);
  assert!(store.find_one(Collection::Products, id).await.unwrap().is_none());
  store.ping().await.unwrap();
}
