// server/src/web/handlers/health_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{error, instrument};

use crate::state::AppState;

pub const LIVENESS_TEXT: &str = "Garments server is running!";

pub async fn liveness_handler() -> HttpResponse {
  HttpResponse::Ok().content_type("text/plain; charset=utf-8").body(LIVENESS_TEXT)
}

/// Readiness: answers 503 while the document store cannot be reached.
#[instrument(name = "handler::readiness", skip(app_state))]
pub async fn readiness_handler(app_state: web::Data<AppState>) -> HttpResponse {
  let backend = app_state.store.backend_name();
  match app_state.store.ping().await {
    Ok(()) => HttpResponse::Ok().json(json!({ "status": "ok", "store": backend })),
    Err(e) => {
      error!(error = %e, "Document store ping failed.");
      HttpResponse::ServiceUnavailable().json(json!({ "status": "unavailable", "store": backend }))
    }
  }
}

pub async fn preflight_handler() -> HttpResponse {
  HttpResponse::NoContent().finish()
}

pub async fn route_not_found_handler() -> HttpResponse {
  HttpResponse::NotFound().json(json!({ "message": "Route not found" }))
}
