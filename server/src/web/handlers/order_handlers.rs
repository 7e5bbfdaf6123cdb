// server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use super::EmailQuery;
use crate::errors::AppError;
use crate::models::OrderStatus;
use crate::services::OrderFilter;
use crate::state::AppState;

#[derive(Deserialize, Debug, Default)]
pub struct ListOrdersQuery {
  pub email: Option<String>,
  pub status: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SetOrderStatusPayload {
  #[serde(default)]
  pub status: Option<String>,
}

#[instrument(name = "handler::create_booking", skip(app_state, body))]
pub async fn create_booking_handler(
  app_state: web::Data<AppState>,
  body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
  let outcome = app_state.orders.create(body.into_inner()).await?;
  Ok(HttpResponse::Created().json(outcome))
}

#[instrument(name = "handler::list_bookings", skip(app_state, query), fields(email = ?query.email))]
pub async fn list_bookings_handler(
  app_state: web::Data<AppState>,
  query: web::Query<EmailQuery>,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.orders.list_bookings(query.email.as_deref()).await?;
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::list_orders", skip(app_state, query), fields(email = ?query.email, status = ?query.status))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListOrdersQuery>,
) -> Result<HttpResponse, AppError> {
  let query = query.into_inner();
  let status = query
    .status
    .as_deref()
    .filter(|s| !s.trim().is_empty())
    .map(str::parse::<OrderStatus>)
    .transpose()?;
  let orders = app_state
    .orders
    .list(&OrderFilter {
      email: query.email,
      status,
    })
    .await?;
  info!("Fetched {} orders.", orders.len());
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::list_pending_orders", skip(app_state))]
pub async fn list_pending_orders_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let orders = app_state.orders.list_pending().await?;
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::list_approved_orders", skip(app_state))]
pub async fn list_approved_orders_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let orders = app_state.orders.list_approved().await?;
  Ok(HttpResponse::Ok().json(orders))
}

#[instrument(name = "handler::get_order", skip(app_state, path), fields(order_id = %path.as_str()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let order = app_state.orders.get(&path).await?;
  Ok(HttpResponse::Ok().json(order))
}

#[instrument(name = "handler::set_order_status", skip(app_state, path, body), fields(order_id = %path.as_str()))]
pub async fn set_order_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  body: web::Json<SetOrderStatusPayload>,
) -> Result<HttpResponse, AppError> {
  // A missing status is just another value outside the allowed set.
  let status = body.status.as_deref().unwrap_or_default();
  let outcome = app_state.orders.set_status(&path, status).await?;
  Ok(HttpResponse::Ok().json(outcome))
}

#[instrument(name = "handler::add_tracking_entry", skip(app_state, path, body), fields(order_id = %path.as_str()))]
pub async fn add_tracking_entry_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
  let outcome = app_state.orders.add_tracking_entry(&path, body.into_inner()).await?;
  Ok(HttpResponse::Ok().json(outcome))
}
