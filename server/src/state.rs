// server/src/state.rs
use crate::services::{OrderLifecycle, ProductCatalog, UserDirectory};
use crate::store::DocumentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn DocumentStore>,
  pub products: ProductCatalog,
  pub users: UserDirectory,
  pub orders: OrderLifecycle,
}

impl AppState {
  /// Wires every service to the one shared store.
  pub fn new(store: Arc<dyn DocumentStore>) -> Self {
    Self {
      products: ProductCatalog::new(store.clone()),
      users: UserDirectory::new(store.clone()),
      orders: OrderLifecycle::new(store.clone()),
      store,
    }
  }
}
