// src/stores/mod.rs

//! Persistence seams. The checkout path talks to storage through
//! [`CheckoutStore`] so the commit semantics can be exercised against an
//! in-memory double; everything else uses [`PgStore`] directly.

pub mod postgres;

pub use postgres::PgStore;

use crate::errors::Result as AppResult;
use crate::models::{Order, Product};
use serde::{Deserialize, Serialize};
use std::future::Future;
use uuid::Uuid;

/// A cart entry after validation: product resolved, quantity coerced, unit
/// price captured. The price here is the one the order commits with; it is
/// never re-read after the stock decrement.
#[derive(Debug, Clone)]
pub struct PricedLine {
  pub product_id: Uuid,
  pub name: String,
  pub description: Option<String>,
  pub quantity: i32,
  pub price_cents: i32,
}

/// Storage operations the checkout processor needs.
///
/// `commit_order` is the atomic region: order row, every line item, and
/// every conditional stock decrement persist together or not at all. A
/// decrement that matches zero rows is a lost race and must surface as
/// `InsufficientStock`, indistinguishable from a validation-time shortfall.
/// Implementations apply decrements in ascending product-id order so two
/// carts sharing two products cannot deadlock.
pub trait CheckoutStore: Send + Sync {
  fn product_for_checkout(&self, product_id: Uuid) -> impl Future<Output = AppResult<Option<Product>>> + Send;

  fn commit_order(
    &self,
    owner: Uuid,
    lines: &[PricedLine],
    total_cents: i64,
  ) -> impl Future<Output = AppResult<Order>> + Send;
}

/// Payload for administrative product creation and edits.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
  pub name: String,
  pub description: Option<String>,
  pub price_cents: i32,
  pub stock: i32,
}

/// Read model for order representations: the order row plus its line items
/// in purchase order, each with a brief of the referenced product.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
  #[serde(flatten)]
  pub order: Order,
  pub items: Vec<OrderLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
  pub product: ProductBrief,
  pub quantity: i32,
  pub price_cents: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductBrief {
  pub id: Uuid,
  pub name: String,
  pub description: Option<String>,
}

impl OrderWithItems {
  /// Builds the representation of a freshly committed order from the
  /// validated lines, avoiding a read-back of what was just written.
  pub fn from_lines(order: Order, lines: &[PricedLine]) -> Self {
    let items = lines
      .iter()
      .map(|line| OrderLine {
        product: ProductBrief {
          id: line.product_id,
          name: line.name.clone(),
          description: line.description.clone(),
        },
        quantity: line.quantity,
        price_cents: line.price_cents,
      })
      .collect();
    Self { order, items }
  }
}
