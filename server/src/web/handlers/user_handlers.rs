// server/src/web/handlers/user_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::instrument;

use super::EmailQuery;
use crate::errors::AppError;
use crate::services::Registration;
use crate::state::AppState;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct SetRolePayload {
  pub role: String,
}

#[derive(Deserialize, Debug)]
pub struct SetStatusPayload {
  #[serde(default)]
  pub status: Option<String>,
  #[serde(default)]
  pub reason: Option<String>,
}

// --- Handler Implementations ---

#[instrument(name = "handler::list_users", skip(app_state))]
pub async fn list_users_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let users = app_state.users.list().await?;
  Ok(HttpResponse::Ok().json(users))
}

#[instrument(name = "handler::user_role", skip(app_state, query), fields(email = ?query.email))]
pub async fn user_role_handler(
  app_state: web::Data<AppState>,
  query: web::Query<EmailQuery>,
) -> Result<HttpResponse, AppError> {
  let role = app_state.users.role_of(query.email.as_deref()).await?;
  Ok(HttpResponse::Ok().json(role))
}

#[instrument(name = "handler::user_is_admin", skip(app_state, query), fields(email = ?query.email))]
pub async fn user_is_admin_handler(
  app_state: web::Data<AppState>,
  query: web::Query<EmailQuery>,
) -> Result<HttpResponse, AppError> {
  let admin = app_state.users.is_admin(query.email.as_deref()).await?;
  Ok(HttpResponse::Ok().json(admin))
}

#[instrument(name = "handler::get_user", skip(app_state, path), fields(user_id = %path.as_str()))]
pub async fn get_user_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let user = app_state.users.get(&path).await?;
  Ok(HttpResponse::Ok().json(user))
}

#[instrument(name = "handler::register_user", skip(app_state, body))]
pub async fn register_user_handler(
  app_state: web::Data<AppState>,
  body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
  match app_state.users.register(body.into_inner()).await? {
    Registration::Created(outcome) => Ok(HttpResponse::Created().json(outcome)),
    Registration::AlreadyExists => Ok(HttpResponse::Ok().json(json!({ "message": "User already exists" }))),
  }
}

#[instrument(name = "handler::set_user_role", skip(app_state, path, body), fields(user_id = %path.as_str()))]
pub async fn set_user_role_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  body: web::Json<SetRolePayload>,
) -> Result<HttpResponse, AppError> {
  let outcome = app_state.users.set_role(&path, &body.role).await?;
  Ok(HttpResponse::Ok().json(outcome))
}

#[instrument(name = "handler::set_user_status", skip(app_state, path, body), fields(user_id = %path.as_str()))]
pub async fn set_user_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
  body: web::Json<SetStatusPayload>,
) -> Result<HttpResponse, AppError> {
  let status = body
    .status
    .as_deref()
    .ok_or_else(|| AppError::Validation("Status is required".to_string()))?;
  let outcome = app_state
    .users
    .set_status(&path, status, body.reason.as_deref())
    .await?;
  Ok(HttpResponse::Ok().json(outcome))
}
