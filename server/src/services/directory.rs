// server/src/services/directory.rs

//! User directory: registration, role and status state.
//!
//! Role lookups here are advisory. Nothing in the server gates a mutating
//! route on them; callers that need enforcement must verify identity
//! themselves.

use crate::errors::{AppError, Result};
use crate::models::user::{DEFAULT_ROLE, EMAIL_FIELD, ROLE_FIELD, STATUS_FIELD, SUSPEND_REASON_FIELD};
use crate::models::{from_document, from_documents, parse_id, require_object, AdminView, RoleView, User, UserStatus};
use crate::store::{Collection, DocumentStore, Filter, InsertOutcome, Update, UpdateOutcome};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Result of a registration attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
  Created(InsertOutcome),
  /// A user with that email was already on file; nothing was written.
  AlreadyExists,
}

#[derive(Clone)]
pub struct UserDirectory {
  store: Arc<dyn DocumentStore>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
  value.filter(|v| !v.trim().is_empty())
}

impl UserDirectory {
  pub fn new(store: Arc<dyn DocumentStore>) -> Self {
    Self { store }
  }

  #[instrument(name = "directory::list", skip(self))]
  pub async fn list(&self) -> Result<Vec<User>> {
    let docs = self.store.find(Collection::Users, &Filter::all(), None).await?;
    from_documents(docs)
  }

  #[instrument(name = "directory::get", skip(self))]
  pub async fn get(&self, id: &str) -> Result<User> {
    let id = parse_id(id)?;
    match self.store.find_one(Collection::Users, id).await? {
      Some(doc) => from_document(doc),
      None => {
        warn!(%id, "User not found.");
        Err(AppError::NotFound("User not found".to_string()))
      }
    }
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
    let filter = Filter::all().eq(EMAIL_FIELD, email);
    match self.store.find_first(Collection::Users, &filter).await? {
      Some(doc) => Ok(Some(from_document(doc)?)),
      None => Ok(None),
    }
  }

  /// Best-effort role: `buyer` when the email is missing, unknown, or the user has no role.
  #[instrument(name = "directory::role_of", skip(self))]
  pub async fn role_of(&self, email: Option<&str>) -> Result<RoleView> {
    let role = match non_blank(email) {
      Some(email) => self
        .find_by_email(email)
        .await?
        .map(|user| user.effective_role().to_string()),
      None => None,
    };
    Ok(RoleView {
      role: role.unwrap_or_else(|| DEFAULT_ROLE.to_string()),
    })
  }

  #[instrument(name = "directory::is_admin", skip(self))]
  pub async fn is_admin(&self, email: Option<&str>) -> Result<AdminView> {
    let email = non_blank(email).ok_or_else(|| AppError::Validation("Email is required".to_string()))?;
    let admin = self.find_by_email(email).await?.is_some_and(|user| user.is_admin());
    Ok(AdminView { admin })
  }

  /// Registers a user once per email.
  ///
  /// The existence check and the insert are two separate store calls, so two
  /// concurrent registrations for the same new email can both succeed.
  #[instrument(name = "directory::register", skip(self, fields))]
  pub async fn register(&self, fields: Value) -> Result<Registration> {
    let mut doc = require_object(fields, "User")?;
    let email = non_blank(doc.get(EMAIL_FIELD).and_then(Value::as_str))
      .map(str::to_string)
      .ok_or_else(|| AppError::Validation("Email is required".to_string()))?;

    if self.find_by_email(&email).await?.is_some() {
      info!(%email, "Registration skipped, user already exists.");
      return Ok(Registration::AlreadyExists);
    }

    let role = non_blank(doc.get(ROLE_FIELD).and_then(Value::as_str))
      .unwrap_or(DEFAULT_ROLE)
      .to_string();
    doc.insert(ROLE_FIELD.to_string(), Value::String(role));
    doc.insert(STATUS_FIELD.to_string(), Value::String(UserStatus::Active.to_string()));
    doc.insert(SUSPEND_REASON_FIELD.to_string(), Value::Null);

    let outcome = self.store.insert(Collection::Users, doc).await?;
    info!(%email, user_id = %outcome.inserted_id, "User registered.");
    Ok(Registration::Created(outcome))
  }

  /// Overwrites the role with any string. Values are not checked against the known roles.
  #[instrument(name = "directory::set_role", skip(self))]
  pub async fn set_role(&self, id: &str, role: &str) -> Result<UpdateOutcome> {
    let id = parse_id(id)?;
    let outcome = self
      .store
      .update_one(Collection::Users, id, &Update::new().set(ROLE_FIELD, role))
      .await?;
    debug!(%id, matched = outcome.matched_count, "Role update applied.");
    Ok(outcome)
  }

  /// Sets the account status. `suspendReason` carries `reason` only while suspended.
  #[instrument(name = "directory::set_status", skip(self, reason))]
  pub async fn set_status(&self, id: &str, status: &str, reason: Option<&str>) -> Result<UpdateOutcome> {
    let id = parse_id(id)?;
    let status: UserStatus = status.parse()?;

    let suspend_reason = match status {
      UserStatus::Suspended => {
        let reason = non_blank(reason)
          .ok_or_else(|| AppError::Validation("A reason is required to suspend a user".to_string()))?;
        Value::String(reason.to_string())
      }
      UserStatus::Active => Value::Null,
    };

    let update = Update::new()
      .set(STATUS_FIELD, status.as_str())
      .set(SUSPEND_REASON_FIELD, suspend_reason);
    let outcome = self.store.update_one(Collection::Users, id, &update).await?;
    info!(%id, %status, matched = outcome.matched_count, "Status update applied.");
    Ok(outcome)
  }
}
