// src/stores/postgres.rs

//! PostgreSQL store. Queries are runtime-checked (`sqlx::query_as`) so the
//! crate builds without a live database.

use crate::errors::{AppError, Result};
use crate::models::{Order, Product, User};
use crate::stores::{CheckoutStore, NewProduct, OrderLine, OrderWithItems, PricedLine, ProductBrief};
use sqlx::{FromRow, PgPool};
use std::collections::HashMap;
use uuid::Uuid;

const UNIQUE_VIOLATION: &str = "23505";
const FK_VIOLATION: &str = "23503";

fn db_error_code(err: &sqlx::Error) -> Option<String> {
  match err {
    sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
    _ => None,
  }
}

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub const fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  // --- Users ---

  pub async fn create_user(&self, username: &str, email: &str, password_hash: &str, is_admin: bool) -> Result<User> {
    let result = sqlx::query_as::<_, User>(
      "INSERT INTO users (id, username, email, password_hash, is_admin)
       VALUES ($1, $2, $3, $4, $5)
       RETURNING id, username, email, password_hash, is_admin, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(is_admin)
    .fetch_one(&self.pool)
    .await;

    match result {
      Ok(user) => Ok(user),
      Err(err) if db_error_code(&err).as_deref() == Some(UNIQUE_VIOLATION) => {
        Err(AppError::Conflict("Username or email is already taken.".to_string()))
      }
      Err(err) => Err(err.into()),
    }
  }

  pub async fn user_by_username(&self, username: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
      "SELECT id, username, email, password_hash, is_admin, created_at, updated_at
       FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }

  pub async fn user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(
      "SELECT id, username, email, password_hash, is_admin, created_at, updated_at
       FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(user)
  }

  pub async fn list_users(&self) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
      "SELECT id, username, email, password_hash, is_admin, created_at, updated_at
       FROM users ORDER BY created_at",
    )
    .fetch_all(&self.pool)
    .await?;
    Ok(users)
  }

  // --- Products ---

  pub async fn list_products(&self) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(
      "SELECT id, name, description, price_cents, stock, created_at, updated_at
       FROM products ORDER BY name",
    )
    .fetch_all(&self.pool)
    .await?;
    Ok(products)
  }

  pub async fn product(&self, product_id: Uuid) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
      "SELECT id, name, description, price_cents, stock, created_at, updated_at
       FROM products WHERE id = $1",
    )
    .bind(product_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(product)
  }

  pub async fn create_product(&self, input: &NewProduct) -> Result<Product> {
    let product = sqlx::query_as::<_, Product>(
      "INSERT INTO products (id, name, description, price_cents, stock)
       VALUES ($1, $2, $3, $4, $5)
       RETURNING id, name, description, price_cents, stock, created_at, updated_at",
    )
    .bind(Uuid::new_v4())
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.price_cents)
    .bind(input.stock)
    .fetch_one(&self.pool)
    .await?;
    Ok(product)
  }

  pub async fn update_product(&self, product_id: Uuid, input: &NewProduct) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(
      "UPDATE products
       SET name = $2, description = $3, price_cents = $4, stock = $5, updated_at = now()
       WHERE id = $1
       RETURNING id, name, description, price_cents, stock, created_at, updated_at",
    )
    .bind(product_id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.price_cents)
    .bind(input.stock)
    .fetch_optional(&self.pool)
    .await?;
    Ok(product)
  }

  /// Returns `false` if the product does not exist. Deleting a product that
  /// is referenced by order items is refused (line items must outlive
  /// catalog edits).
  pub async fn delete_product(&self, product_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(product_id)
      .execute(&self.pool)
      .await;

    match result {
      Ok(done) => Ok(done.rows_affected() > 0),
      Err(err) if db_error_code(&err).as_deref() == Some(FK_VIOLATION) => Err(AppError::Conflict(
        "Product is referenced by existing orders and cannot be deleted.".to_string(),
      )),
      Err(err) => Err(err.into()),
    }
  }

  // --- Orders ---

  pub async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<OrderWithItems>> {
    let orders = sqlx::query_as::<_, Order>(
      "SELECT id, user_id, total_cents, is_paid, created_at
       FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;
    self.attach_items(orders).await
  }

  pub async fn list_orders(&self) -> Result<Vec<OrderWithItems>> {
    let orders = sqlx::query_as::<_, Order>(
      "SELECT id, user_id, total_cents, is_paid, created_at
       FROM orders ORDER BY created_at DESC",
    )
    .fetch_all(&self.pool)
    .await?;
    self.attach_items(orders).await
  }

  pub async fn order_with_items(&self, order_id: Uuid) -> Result<Option<OrderWithItems>> {
    let order = sqlx::query_as::<_, Order>(
      "SELECT id, user_id, total_cents, is_paid, created_at
       FROM orders WHERE id = $1",
    )
    .bind(order_id)
    .fetch_optional(&self.pool)
    .await?;
    match order {
      Some(order) => Ok(self.attach_items(vec![order]).await?.pop()),
      None => Ok(None),
    }
  }

  async fn attach_items(&self, orders: Vec<Order>) -> Result<Vec<OrderWithItems>> {
    if orders.is_empty() {
      return Ok(Vec::new());
    }

    #[derive(FromRow)]
    struct ItemRow {
      order_id: Uuid,
      quantity: i32,
      price_cents: i32,
      product_id: Uuid,
      product_name: String,
      product_description: Option<String>,
    }

    let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let rows = sqlx::query_as::<_, ItemRow>(
      "SELECT oi.order_id, oi.quantity, oi.price_cents,
              p.id AS product_id, p.name AS product_name, p.description AS product_description
       FROM order_items oi
       JOIN products p ON p.id = oi.product_id
       WHERE oi.order_id = ANY($1)
       ORDER BY oi.order_id, oi.line_no",
    )
    .bind(&order_ids)
    .fetch_all(&self.pool)
    .await?;

    let mut items_by_order: HashMap<Uuid, Vec<OrderLine>> = HashMap::new();
    for row in rows {
      items_by_order.entry(row.order_id).or_default().push(OrderLine {
        product: ProductBrief {
          id: row.product_id,
          name: row.product_name,
          description: row.product_description,
        },
        quantity: row.quantity,
        price_cents: row.price_cents,
      });
    }

    Ok(
      orders
        .into_iter()
        .map(|order| {
          let items = items_by_order.remove(&order.id).unwrap_or_default();
          OrderWithItems { order, items }
        })
        .collect(),
    )
  }
}

impl CheckoutStore for PgStore {
  async fn product_for_checkout(&self, product_id: Uuid) -> Result<Option<Product>> {
    self.product(product_id).await
  }

  async fn commit_order(&self, owner: Uuid, lines: &[PricedLine], total_cents: i64) -> Result<Order> {
    let mut tx = self.pool.begin().await?;

    // Conditional decrement doubles as the stock re-validation: a cart that
    // passed the read-time check can still lose the race here. Ascending
    // product-id order keeps two overlapping carts from deadlocking.
    let mut decrements: Vec<&PricedLine> = lines.iter().collect();
    decrements.sort_by_key(|line| line.product_id);

    for line in decrements {
      let updated = sqlx::query("UPDATE products SET stock = stock - $2, updated_at = now() WHERE id = $1 AND stock >= $2")
        .bind(line.product_id)
        .bind(line.quantity)
        .execute(&mut *tx)
        .await?
        .rows_affected();

      if updated == 0 {
        let available: Option<i32> = sqlx::query_scalar("SELECT stock FROM products WHERE id = $1")
          .bind(line.product_id)
          .fetch_optional(&mut *tx)
          .await?;
        // Dropping the transaction rolls back any earlier decrements.
        return Err(match available {
          Some(available) => AppError::InsufficientStock {
            product_id: line.product_id,
            name: line.name.clone(),
            requested: line.quantity,
            available,
          },
          None => AppError::InvalidProduct {
            product_id: line.product_id,
          },
        });
      }
    }

    let order = sqlx::query_as::<_, Order>(
      "INSERT INTO orders (id, user_id, total_cents, is_paid)
       VALUES ($1, $2, $3, FALSE)
       RETURNING id, user_id, total_cents, is_paid, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(owner)
    .bind(total_cents)
    .fetch_one(&mut *tx)
    .await?;

    for (line_no, line) in lines.iter().enumerate() {
      sqlx::query(
        "INSERT INTO order_items (id, order_id, product_id, line_no, quantity, price_cents)
         VALUES ($1, $2, $3, $4, $5, $6)",
      )
      .bind(Uuid::new_v4())
      .bind(order.id)
      .bind(line.product_id)
      .bind(line_no as i32)
      .bind(line.quantity)
      .bind(line.price_cents)
      .execute(&mut *tx)
      .await?;
    }

    tx.commit().await?;
    Ok(order)
  }
}
