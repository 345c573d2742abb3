// src/web/handlers/admin_handlers.rs

//! Administrative CRUD: products are fully editable; orders and users are
//! read-only views.

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::stores::NewProduct;
use crate::web::extractors::AdminUser;

fn validate_product_input(input: &NewProduct) -> Result<(), AppError> {
  if input.name.trim().is_empty() {
    return Err(AppError::Validation("Product name cannot be empty.".to_string()));
  }
  if input.price_cents < 0 {
    return Err(AppError::Validation("Product price cannot be negative.".to_string()));
  }
  if input.stock < 0 {
    return Err(AppError::Validation("Product stock cannot be negative.".to_string()));
  }
  Ok(())
}

// --- Products ---

#[instrument(name = "handler::admin_list_products", skip(app_state, _admin))]
pub async fn list_products_handler(app_state: web::Data<AppState>, _admin: AdminUser) -> Result<HttpResponse, AppError> {
  let products = app_state.store.list_products().await?;
  Ok(HttpResponse::Ok().json(json!({ "products": products })))
}

#[instrument(
  name = "handler::admin_create_product",
  skip(app_state, admin, req_payload),
  fields(admin_id = %admin.0.user_id)
)]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  req_payload: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
  validate_product_input(&req_payload)?;
  let product = app_state.store.create_product(&req_payload).await?;
  info!("Admin {} created product {}.", admin.0.user_id, product.id);
  Ok(HttpResponse::Created().json(json!({ "product": product })))
}

#[instrument(name = "handler::admin_get_product", skip(app_state, _admin, path))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  match app_state.store.product(product_id).await? {
    Some(product) => Ok(HttpResponse::Ok().json(json!({ "product": product }))),
    None => Err(AppError::NotFound(format!("Product with ID {} not found.", product_id))),
  }
}

#[instrument(
  name = "handler::admin_update_product",
  skip(app_state, admin, path, req_payload),
  fields(admin_id = %admin.0.user_id)
)]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<NewProduct>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  validate_product_input(&req_payload)?;

  match app_state.store.update_product(product_id, &req_payload).await? {
    Some(product) => {
      info!("Admin {} updated product {}.", admin.0.user_id, product_id);
      Ok(HttpResponse::Ok().json(json!({ "product": product })))
    }
    None => Err(AppError::NotFound(format!("Product with ID {} not found.", product_id))),
  }
}

#[instrument(
  name = "handler::admin_delete_product",
  skip(app_state, admin, path),
  fields(admin_id = %admin.0.user_id)
)]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  if app_state.store.delete_product(product_id).await? {
    info!("Admin {} deleted product {}.", admin.0.user_id, product_id);
    Ok(HttpResponse::NoContent().finish())
  } else {
    warn!("Admin delete: product {} not found.", product_id);
    Err(AppError::NotFound(format!("Product with ID {} not found.", product_id)))
  }
}

// --- Orders (read-only) ---

#[instrument(name = "handler::admin_list_orders", skip(app_state, _admin))]
pub async fn list_orders_handler(app_state: web::Data<AppState>, _admin: AdminUser) -> Result<HttpResponse, AppError> {
  let orders = app_state.store.list_orders().await?;
  Ok(HttpResponse::Ok().json(json!({ "orders": orders })))
}

#[instrument(name = "handler::admin_get_order", skip(app_state, _admin, path))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  match app_state.store.order_with_items(order_id).await? {
    Some(order) => Ok(HttpResponse::Ok().json(order)),
    None => Err(AppError::NotFound(format!("Order with ID {} not found.", order_id))),
  }
}

// --- Users (read-only) ---

#[instrument(name = "handler::admin_list_users", skip(app_state, _admin))]
pub async fn list_users_handler(app_state: web::Data<AppState>, _admin: AdminUser) -> Result<HttpResponse, AppError> {
  let users = app_state.store.list_users().await?;
  Ok(HttpResponse::Ok().json(json!({ "users": users })))
}

#[instrument(name = "handler::admin_get_user", skip(app_state, _admin, path))]
pub async fn get_user_handler(
  app_state: web::Data<AppState>,
  _admin: AdminUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  match app_state.store.user_by_id(user_id).await? {
    Some(user) => Ok(HttpResponse::Ok().json(json!({ "user": user }))),
    None => Err(AppError::NotFound(format!("User with ID {} not found.", user_id))),
  }
}
