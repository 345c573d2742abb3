// src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::checkout_service::{self, CartEntry, Customer};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTO ---
#[derive(Deserialize, Debug)]
pub struct CheckoutRequestPayload {
  pub items: Vec<CartEntry>,
}

#[instrument(
  name = "handler::checkout",
  skip(app_state, req_payload, auth_user),
  fields(user_id = %auth_user.user_id, entries = req_payload.items.len())
)]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<CheckoutRequestPayload>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  info!("Checkout attempt by user: {}", auth_user.user_id);

  let customer = Customer {
    id: auth_user.user_id,
    username: auth_user.username,
    email: auth_user.email,
  };

  let order = checkout_service::checkout(
    &app_state.store,
    &app_state.notifier,
    &customer,
    &req_payload.items,
  )
  .await?;

  info!(
    "Checkout successful for user: {}. Order ID: {}. Total: {} cents",
    customer.id, order.order.id, order.order.total_cents
  );
  Ok(HttpResponse::Created().json(order))
}
