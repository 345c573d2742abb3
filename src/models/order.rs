// src/models/order.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A committed purchase. Immutable after creation; `is_paid` is flipped by a
/// separate payment-confirmation step outside this service.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub total_cents: i64,
  pub is_paid: bool,
  pub created_at: DateTime<Utc>,
}
