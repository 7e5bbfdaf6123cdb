// server/src/models/order.rs

use super::Document;
use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const STATUS_FIELD: &str = "status";
pub const TRACKING_HISTORY_FIELD: &str = "trackingHistory";
/// Timestamp key inside a tracking entry.
pub const TRACKING_DATE_FIELD: &str = "date";
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";
/// Requester email used by the `/orders` listing.
pub const USER_EMAIL_FIELD: &str = "userEmail";
/// Requester email used by the older `/booking` listing.
pub const SENDER_EMAIL_FIELD: &str = "senderEmail";

/// Review state of an order. Any state may move to any other; there is no terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  #[default]
  Pending,
  Approved,
  Rejected,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 3] = [OrderStatus::Pending, OrderStatus::Approved, OrderStatus::Rejected];

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Approved => "approved",
      OrderStatus::Rejected => "rejected",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    OrderStatus::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or_else(|| AppError::Validation("Invalid status".to_string()))
  }
}

/// One line of an order's tracking narrative.
///
/// Entries written by status transitions carry only `status` and `date`.
/// Manual entries are whatever object the caller sent: only `status` is
/// typed, so `note`, `location` and `date` keep their original JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEntry {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub note: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub location: Option<Value>,
  #[serde(default = "current_date")]
  pub date: Value,
  #[serde(flatten)]
  pub extra: Document,
}

fn current_date() -> Value {
  json!(crate::models::now())
}

impl TrackingEntry {
  pub fn for_status(status: OrderStatus, date: DateTime<Utc>) -> Self {
    Self {
      status: Some(status.as_str().to_string()),
      note: None,
      location: None,
      date: json!(date),
      extra: Document::new(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
  #[serde(rename = "_id")]
  pub id: Uuid,
  pub status: OrderStatus,
  #[serde(default)]
  pub tracking_history: Vec<TrackingEntry>,
  pub created_at: DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
  #[serde(flatten)]
  pub details: Document,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_the_three_states_parse() {
    for status in OrderStatus::ALL {
      assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
    }
    for bad in ["", "shipped", "APPROVED", " pending"] {
      assert!(matches!(bad.parse::<OrderStatus>(), Err(AppError::Validation(_))), "{:?}", bad);
    }
  }

  #[test]
  fn manual_entry_keeps_extra_keys_and_defaults_date() {
    let before = crate::models::now();
    let entry: TrackingEntry = serde_json::from_value(json!({
      "note": "Left the warehouse",
      "location": "Dhaka",
      "courier": "DHL"
    }))
    .unwrap();
    let date: DateTime<Utc> = serde_json::from_value(entry.date.clone()).unwrap();
    assert!(date >= before);
    assert_eq!(entry.status, None);
    assert_eq!(entry.extra.get("courier"), Some(&json!("DHL")));
  }

  #[test]
  fn stored_entries_load_whatever_their_shape() {
    let entry: TrackingEntry = serde_json::from_value(json!({
      "note": 5,
      "location": { "lat": 23.8, "lng": 90.4 },
      "date": 1714521600000u64
    }))
    .unwrap();
    assert_eq!(entry.note, Some(json!(5)));
    assert_eq!(entry.location, Some(json!({ "lat": 23.8, "lng": 90.4 })));
    assert_eq!(entry.date, json!(1714521600000u64));
    assert!(entry.extra.is_empty());
  }

  #[test]
  fn status_entry_serializes_status_and_date_only() {
    let date = Utc::now();
    let value = serde_json::to_value(TrackingEntry::for_status(OrderStatus::Approved, date)).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.len(), 2);
    assert_eq!(obj.get("status"), Some(&json!("approved")));
  }
}
