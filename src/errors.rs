// src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Cart is empty.")]
  EmptyCart,

  #[error("Invalid quantity for cart entry {entry}: {reason}")]
  InvalidQuantity { entry: String, reason: String },

  #[error("Invalid product ID: {product_id}")]
  InvalidProduct { product_id: Uuid },

  #[error("{name} has insufficient stock (requested {requested}, available {available}).")]
  InsufficientStock {
    product_id: Uuid,
    name: String,
    requested: i32,
    available: i32,
  },

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Forbidden: {0}")]
  Forbidden(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  /// Machine-checkable kind, included in every error response body so
  /// clients can branch without parsing the human-readable message.
  pub fn kind(&self) -> &'static str {
    match self {
      AppError::Validation(_) => "validation",
      AppError::EmptyCart => "empty_cart",
      AppError::InvalidQuantity { .. } => "invalid_quantity",
      AppError::InvalidProduct { .. } => "invalid_product",
      AppError::InsufficientStock { .. } => "insufficient_stock",
      AppError::Auth(_) => "auth",
      AppError::Forbidden(_) => "forbidden",
      AppError::NotFound(_) => "not_found",
      AppError::Conflict(_) => "conflict",
      AppError::Config(_) => "config",
      AppError::Sqlx(_) => "persistence",
      AppError::Internal(_) => "internal",
    }
  }
}

// Allow anyhow::Error to be converted into AppError::Internal for convenience
// in top-level glue that uses `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    if err.is::<sqlx::Error>() {
      if let Ok(sqlx_err) = err.downcast::<sqlx::Error>() {
        return AppError::Sqlx(sqlx_err);
      }
      return AppError::Internal("Database error (context lost in conversion).".to_string());
    }
    AppError::Internal(err.to_string())
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> actix_web::http::StatusCode {
    use actix_web::http::StatusCode;
    match self {
      AppError::Validation(_)
      | AppError::EmptyCart
      | AppError::InvalidQuantity { .. }
      | AppError::InvalidProduct { .. } => StatusCode::BAD_REQUEST,
      AppError::InsufficientStock { .. } | AppError::Conflict(_) => StatusCode::CONFLICT,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::Forbidden(_) => StatusCode::FORBIDDEN,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Config(_) | AppError::Sqlx(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, kind = self.kind(), "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m, "kind": self.kind()})),
      AppError::EmptyCart => HttpResponse::BadRequest().json(json!({"error": self.to_string(), "kind": self.kind()})),
      AppError::InvalidQuantity { .. } => {
        HttpResponse::BadRequest().json(json!({"error": self.to_string(), "kind": self.kind()}))
      }
      AppError::InvalidProduct { product_id } => HttpResponse::BadRequest().json(json!({
        "error": self.to_string(),
        "kind": self.kind(),
        "productId": product_id,
      })),
      // Also covers losing the race on the conditional stock decrement; the
      // caller cannot tell a race loss from a plain shortfall.
      AppError::InsufficientStock {
        product_id,
        requested,
        available,
        ..
      } => HttpResponse::Conflict().json(json!({
        "error": self.to_string(),
        "kind": self.kind(),
        "productId": product_id,
        "requested": requested,
        "available": available,
      })),
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m, "kind": self.kind()})),
      AppError::Forbidden(m) => HttpResponse::Forbidden().json(json!({"error": m, "kind": self.kind()})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m, "kind": self.kind()})),
      AppError::Conflict(m) => HttpResponse::Conflict().json(json!({"error": m, "kind": self.kind()})),
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m, "kind": self.kind()}))
      }
      AppError::Sqlx(_) => {
        // Detail stays in the log; retrying the whole request is safe.
        HttpResponse::InternalServerError().json(json!({"error": "Database operation failed", "kind": self.kind()}))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "detail": m, "kind": self.kind()}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
