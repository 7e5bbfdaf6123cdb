// server/src/models/user.rs

use super::Document;
use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const EMAIL_FIELD: &str = "email";
pub const ROLE_FIELD: &str = "role";
pub const STATUS_FIELD: &str = "status";
pub const SUSPEND_REASON_FIELD: &str = "suspendReason";

/// Role given to anyone who registers without one, and reported for unknown users.
pub const DEFAULT_ROLE: &str = "buyer";
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
  #[default]
  Active,
  Suspended,
}

impl UserStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      UserStatus::Active => "active",
      UserStatus::Suspended => "suspended",
    }
  }
}

impl fmt::Display for UserStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for UserStatus {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "active" => Ok(UserStatus::Active),
      "suspended" => Ok(UserStatus::Suspended),
      _ => Err(AppError::Validation("Invalid status".to_string())),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
  #[serde(rename = "_id")]
  pub id: Uuid,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  /// Free-form; `set_role` stores whatever string it is given.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub role: Option<String>,
  #[serde(default)]
  pub status: UserStatus,
  #[serde(default)]
  pub suspend_reason: Option<String>,
  #[serde(flatten)]
  pub profile: Document,
}

impl User {
  pub fn effective_role(&self) -> &str {
    match self.role.as_deref() {
      Some(role) if !role.is_empty() => role,
      _ => DEFAULT_ROLE,
    }
  }

  pub fn is_admin(&self) -> bool {
    self.role.as_deref() == Some(ADMIN_ROLE)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleView {
  pub role: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdminView {
  pub admin: bool,
}
