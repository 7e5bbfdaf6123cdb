// server/src/main.rs

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use garments_server::config::{AppConfig, LogFormat};
use garments_server::state::AppState;
use garments_server::{store, telemetry, web};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Configuration decides the log format, so tracing comes up right after it
  // (with the default format if the configuration itself is broken).
  let loaded = AppConfig::from_env();
  telemetry::init(loaded.as_ref().map_or(LogFormat::Pretty, |cfg| cfg.log_format));

  tracing::info!("Starting garments server...");

  let app_config = Arc::new(loaded.inspect_err(|e| {
    tracing::error!(error = %e, "Failed to load application configuration.");
  })?);

  // Readiness gate: nothing binds until the store is reachable and migrated.
  let document_store = store::connect(&app_config).await.inspect_err(|e| {
    tracing::error!(error = %e, backend = ?app_config.store_backend, "Document store unavailable, refusing to start.");
  })?;

  let app_state = AppState::new(document_store);

  let server_address = app_config.bind_address();
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(web::cors_headers())
      .wrap(tracing_actix_web::TracingLogger::default()) // one span per request
      .configure(web::configure_app_routes)
  })
  .bind(&server_address)
  .with_context(|| format!("Failed to bind {}", server_address))?
  .run()
  .await
  .context("HTTP server terminated with an error")?;

  tracing::info!("Garments server stopped.");
  Ok(())
}
