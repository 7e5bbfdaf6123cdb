// server/tests/common/mod.rs
#![allow(dead_code, unused_macros)] // Not every test file uses every helper

use garments_server::config::LogFormat;
use garments_server::state::AppState;
use garments_server::store::MemoryStore;
use garments_server::telemetry;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::Arc;

static TRACING_INIT: Lazy<()> = Lazy::new(|| telemetry::init(LogFormat::Pretty));

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// Fresh memory-backed state. The store handle is returned too so tests can
/// look underneath the HTTP surface.
pub fn memory_state() -> (Arc<MemoryStore>, AppState) {
  setup_tracing();
  let store = Arc::new(MemoryStore::new());
  let state = AppState::new(store.clone());
  (store, state)
}

/// Builds the full route table over `$state`, as `main` does minus the request logger.
macro_rules! test_app {
  ($state:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($state))
        .wrap(garments_server::web::cors_headers())
        .configure(garments_server::web::configure_app_routes),
    )
    .await
  };
}

/// The `insertedId` of a creation acknowledgment.
pub fn inserted_id(ack: &Value) -> String {
  ack["insertedId"]
    .as_str()
    .unwrap_or_else(|| panic!("no insertedId in {}", ack))
    .to_string()
}
