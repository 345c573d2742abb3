// src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[instrument(name = "handler::order_history", skip(app_state, auth_user), fields(user_id = %auth_user.user_id))]
pub async fn order_history_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.store.orders_for_user(auth_user.user_id).await?;
  info!("Fetched {} orders for user {}.", orders.len(), auth_user.user_id);
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}
