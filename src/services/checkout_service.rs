// src/services/checkout_service.rs

//! The checkout workflow: validate the cart against live inventory, commit
//! the order atomically, then fire the confirmation notification.
//!
//! Validation is fail-fast: the first invalid entry aborts the whole cart
//! and nothing is mutated. The atomic commit re-validates stock via
//! conditional decrements, so a concurrent checkout that wins the race
//! surfaces here as `InsufficientStock` exactly as if it had been caught
//! up front.

use crate::errors::{AppError, Result};
use crate::services::email_service::Notifier;
use crate::stores::{CheckoutStore, OrderWithItems, PricedLine};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// One raw cart entry as submitted by the client. The quantity is kept as
/// raw JSON because clients send it as a number or a numeric string; it is
/// coerced during validation.
#[derive(Debug, Clone, Deserialize)]
pub struct CartEntry {
  pub product_id: Uuid,
  pub quantity: Value,
}

/// The identity placing the order, as established by the request layer.
#[derive(Debug, Clone)]
pub struct Customer {
  pub id: Uuid,
  pub username: String,
  pub email: String,
}

/// Coerces a raw quantity into a positive `i32`, naming the offending entry
/// on failure. Accepts JSON integers and strings holding integers.
fn coerce_quantity(index: usize, entry: &CartEntry) -> Result<i32> {
  let invalid = |reason: &str| AppError::InvalidQuantity {
    entry: format!("#{} (product {})", index + 1, entry.product_id),
    reason: reason.to_string(),
  };

  let quantity = match &entry.quantity {
    Value::Number(n) => n.as_i64().ok_or_else(|| invalid("not an integer"))?,
    Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid("not an integer"))?,
    _ => return Err(invalid("not a number")),
  };

  if quantity <= 0 {
    return Err(invalid("must be positive"));
  }
  i32::try_from(quantity).map_err(|_| invalid("too large"))
}

/// Runs a full checkout for `customer`.
///
/// On success every product's stock has decreased by exactly the requested
/// quantity and the returned order's total equals the sum of its line items
/// at validation-time prices. On any failure no state has changed.
#[instrument(
  name = "checkout_service::checkout",
  skip(store, notifier, cart),
  fields(user_id = %customer.id, entries = cart.len())
)]
pub async fn checkout<S: CheckoutStore, N: Notifier>(
  store: &S,
  notifier: &N,
  customer: &Customer,
  cart: &[CartEntry],
) -> Result<OrderWithItems> {
  if cart.is_empty() {
    return Err(AppError::EmptyCart);
  }

  // Validate everything before mutating anything: coerce quantities first,
  // then resolve products and check stock, aborting on the first bad entry.
  let mut requested = Vec::with_capacity(cart.len());
  for (index, entry) in cart.iter().enumerate() {
    requested.push((entry.product_id, coerce_quantity(index, entry)?));
  }

  let mut lines: Vec<PricedLine> = Vec::with_capacity(requested.len());
  for (product_id, quantity) in requested {
    let product = store
      .product_for_checkout(product_id)
      .await?
      .ok_or(AppError::InvalidProduct { product_id })?;

    if product.stock < quantity {
      return Err(AppError::InsufficientStock {
        product_id,
        name: product.name,
        requested: quantity,
        available: product.stock,
      });
    }

    lines.push(PricedLine {
      product_id,
      name: product.name,
      description: product.description,
      quantity,
      price_cents: product.price_cents,
    });
  }

  let total_cents: i64 = lines
    .iter()
    .map(|line| i64::from(line.price_cents) * i64::from(line.quantity))
    .sum();

  let order = store.commit_order(customer.id, &lines, total_cents).await?;
  info!(order_id = %order.id, total_cents, "Checkout committed");

  // Best-effort confirmation: a failed send is logged and swallowed, the
  // committed order stands.
  let body = format!("Thank you for your order #{}!", order.id);
  if let Err(err) = notifier.send(&customer.email, "Order Confirmation", &body).await {
    warn!(error = %err, order_id = %order.id, "Order confirmation notification failed");
  }

  Ok(OrderWithItems::from_lines(order, &lines))
}
