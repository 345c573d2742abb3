// src/db.rs

//! Database startup plumbing: embedded migrations and optional demo data.

use crate::errors::{AppError, Result};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
  sqlx::migrate!("./migrations")
    .run(pool)
    .await
    .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;
  info!("Database migrations applied.");
  Ok(())
}

/// Inserts a small demo catalog. Idempotent: fixed ids, existing rows are
/// left untouched (including any stock already decremented by checkouts).
pub async fn seed_demo_data(pool: &PgPool) -> Result<()> {
  let demo_products: [(&str, &str, Option<&str>, i32, i32); 3] = [
    (
      "11111111-1111-4111-8111-111111111111",
      "Espresso Beans 1kg",
      Some("Dark roast, whole bean."),
      1850,
      40,
    ),
    (
      "22222222-2222-4222-8222-222222222222",
      "Pour-Over Kettle",
      Some("Gooseneck, 1l."),
      4900,
      12,
    ),
    ("33333333-3333-4333-8333-333333333333", "Ceramic Mug", None, 1200, 60),
  ];

  for (id, name, description, price_cents, stock) in demo_products {
    let id = Uuid::parse_str(id).map_err(|e| AppError::Internal(format!("Bad seed product id: {}", e)))?;
    sqlx::query(
      "INSERT INTO products (id, name, description, price_cents, stock)
       VALUES ($1, $2, $3, $4, $5)
       ON CONFLICT (id) DO NOTHING",
    )
    .bind(id)
    .bind(name)
    .bind(description)
    .bind(price_cents)
    .bind(stock)
    .execute(pool)
    .await?;
  }

  info!("Demo catalog seeded.");
  Ok(())
}
