// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

use storefront::errors::{AppError, Result as AppResult};
use storefront::models::{Order, OrderItem, Product};
use storefront::services::email_service::Notifier;
use storefront::stores::{CheckoutStore, PricedLine};

// --- In-memory checkout store ---

#[derive(Default)]
struct MemoryInner {
  products: HashMap<Uuid, Product>,
  orders: Vec<(Order, Vec<OrderItem>)>,
}

/// In-memory `CheckoutStore` with the same commit semantics as the
/// PostgreSQL store: the whole commit happens under one lock, and a
/// shortfall leaves every counter untouched.
#[derive(Default)]
pub struct MemoryStore {
  inner: Mutex<MemoryInner>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_product(&self, name: &str, price_cents: i32, stock: i32) -> Uuid {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let product = Product {
      id,
      name: name.to_string(),
      description: None,
      price_cents,
      stock,
      created_at: now,
      updated_at: now,
    };
    self.inner.lock().unwrap().products.insert(id, product);
    id
  }

  pub fn stock_of(&self, product_id: Uuid) -> i32 {
    self
      .inner
      .lock()
      .unwrap()
      .products
      .get(&product_id)
      .map(|p| p.stock)
      .expect("product must exist")
  }

  pub fn set_price(&self, product_id: Uuid, price_cents: i32) {
    self
      .inner
      .lock()
      .unwrap()
      .products
      .get_mut(&product_id)
      .expect("product must exist")
      .price_cents = price_cents;
  }

  pub fn orders(&self) -> Vec<(Order, Vec<OrderItem>)> {
    self.inner.lock().unwrap().orders.clone()
  }
}

impl CheckoutStore for MemoryStore {
  async fn product_for_checkout(&self, product_id: Uuid) -> AppResult<Option<Product>> {
    Ok(self.inner.lock().unwrap().products.get(&product_id).cloned())
  }

  async fn commit_order(&self, owner: Uuid, lines: &[PricedLine], total_cents: i64) -> AppResult<Order> {
    let mut guard = self.inner.lock().unwrap();

    // Mirror the conditional-decrement semantics: run every line against a
    // scratch view first so a failure leaves the real counters untouched.
    let mut scratch: HashMap<Uuid, i32> = HashMap::new();
    let mut ordered: Vec<&PricedLine> = lines.iter().collect();
    ordered.sort_by_key(|line| line.product_id);
    for line in ordered {
      let Some(product) = guard.products.get(&line.product_id) else {
        return Err(AppError::InvalidProduct {
          product_id: line.product_id,
        });
      };
      let available = *scratch.get(&line.product_id).unwrap_or(&product.stock);
      if available < line.quantity {
        return Err(AppError::InsufficientStock {
          product_id: line.product_id,
          name: line.name.clone(),
          requested: line.quantity,
          available,
        });
      }
      scratch.insert(line.product_id, available - line.quantity);
    }

    for (product_id, remaining) in scratch {
      guard.products.get_mut(&product_id).expect("checked above").stock = remaining;
    }

    let order = Order {
      id: Uuid::new_v4(),
      user_id: owner,
      total_cents,
      is_paid: false,
      created_at: Utc::now(),
    };
    let items = lines
      .iter()
      .map(|line| OrderItem {
        id: Uuid::new_v4(),
        order_id: order.id,
        product_id: line.product_id,
        quantity: line.quantity,
        price_cents: line.price_cents,
      })
      .collect();
    guard.orders.push((order.clone(), items));
    Ok(order)
  }
}

// --- Notifier doubles ---

#[derive(Default)]
pub struct RecordingNotifier {
  pub sent: Mutex<Vec<(String, String)>>, // (recipient, subject)
}

impl Notifier for RecordingNotifier {
  async fn send(&self, to: &str, subject: &str, _body: &str) -> AppResult<()> {
    self.sent.lock().unwrap().push((to.to_string(), subject.to_string()));
    Ok(())
  }
}

pub struct FailingNotifier;

impl Notifier for FailingNotifier {
  async fn send(&self, _to: &str, _subject: &str, _body: &str) -> AppResult<()> {
    Err(AppError::Internal("simulated notification outage".to_string()))
  }
}
