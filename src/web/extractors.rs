// src/web/extractors.rs

//! Request extractors establishing the caller's identity from the
//! `Authorization: Bearer` header.

use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::auth_service::{self, TokenKind};
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub user_id: Uuid,
  pub username: String,
  pub email: String,
  pub is_admin: bool,
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
  let app_state = req
    .app_data::<web::Data<AppState>>()
    .ok_or_else(|| AppError::Internal("Application state is not configured.".to_string()))?;

  let header = req
    .headers()
    .get(actix_web::http::header::AUTHORIZATION)
    .and_then(|value| value.to_str().ok())
    .ok_or_else(|| AppError::Auth("Missing Authorization header.".to_string()))?;

  let token = header
    .strip_prefix("Bearer ")
    .ok_or_else(|| AppError::Auth("Authorization header must use the Bearer scheme.".to_string()))?;

  let claims = auth_service::verify_token(token, TokenKind::Access, &app_state.config.token_secret)?;

  Ok(AuthenticatedUser {
    user_id: claims.sub,
    username: claims.username,
    email: claims.email,
    is_admin: claims.is_admin,
  })
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let result = authenticate(req);
    if let Err(err) = &result {
      warn!(error = %err, "Request authentication failed.");
    }
    ready(result)
  }
}

/// An authenticated user that also carries the admin claim. Non-admin
/// tokens are rejected with 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthenticatedUser);

impl FromRequest for AdminUser {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let result = authenticate(req).and_then(|user| {
      if user.is_admin {
        Ok(AdminUser(user))
      } else {
        Err(AppError::Forbidden("Administrator access required.".to_string()))
      }
    });
    ready(result)
  }
}
