// server/src/web/handlers/mod.rs

pub mod health_handlers;
pub mod order_handlers;
pub mod product_handlers;
pub mod user_handlers;

use serde::Deserialize;

/// `?email=` on lookup and listing routes.
#[derive(Deserialize, Debug, Default)]
pub struct EmailQuery {
  pub email: Option<String>,
}
