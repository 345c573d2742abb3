// src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::services::auth_service::{self, TokenKind};
use crate::state::AppState;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct RegisterRequestPayload {
  pub username: String,
  pub email: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginRequestPayload {
  pub username: String,
  pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct RefreshRequestPayload {
  pub refresh: String,
}

fn validate_registration(payload: &RegisterRequestPayload) -> Result<(), AppError> {
  if payload.username.trim().is_empty() || payload.username.len() > 64 {
    return Err(AppError::Validation(
      "Username must be between 1 and 64 characters.".to_string(),
    ));
  }
  if !payload.email.contains('@') {
    return Err(AppError::Validation("Email address is not valid.".to_string()));
  }
  if payload.password.len() < 8 {
    return Err(AppError::Validation(
      "Password must be at least 8 characters long.".to_string(),
    ));
  }
  Ok(())
}

// --- Handler Implementations ---

#[instrument(
  name = "handler::register",
  skip(app_state, req_payload),
  fields(req_username = %req_payload.username)
)]
pub async fn register_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RegisterRequestPayload>,
) -> Result<HttpResponse, AppError> {
  info!("Registration attempt for username: {}", req_payload.username);

  validate_registration(&req_payload)?;
  let password_hash = auth_service::hash_password(&req_payload.password)?;

  let user = app_state
    .store
    .create_user(req_payload.username.trim(), req_payload.email.trim(), &password_hash, false)
    .await?;

  info!("Registration successful for username: {}. User ID: {}", user.username, user.id);
  Ok(HttpResponse::Created().json(json!({
    "message": "User created successfully.",
    "user": user,
  })))
}

#[instrument(
  name = "handler::login",
  skip(app_state, req_payload),
  fields(req_username = %req_payload.username)
)]
pub async fn login_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<LoginRequestPayload>,
) -> Result<HttpResponse, AppError> {
  info!("Login attempt for username: {}", req_payload.username);

  // Identical error for unknown user and bad password, so probes can't tell
  // accounts apart.
  let invalid_credentials = || AppError::Auth("Invalid username or password.".to_string());

  let user = app_state
    .store
    .user_by_username(req_payload.username.trim())
    .await?
    .ok_or_else(invalid_credentials)?;

  if !auth_service::verify_password(&user.password_hash, &req_payload.password)? {
    warn!("Login failed for username: {}", req_payload.username);
    return Err(invalid_credentials());
  }

  let config = &app_state.config;
  let tokens = auth_service::issue_token_pair(
    &user,
    config.access_token_ttl_secs,
    config.refresh_token_ttl_secs,
    &config.token_secret,
  )?;

  info!("Login successful for username: {}", user.username);
  Ok(HttpResponse::Ok().json(json!({
    "access": tokens.access,
    "refresh": tokens.refresh,
    "user": user,
  })))
}

#[instrument(name = "handler::refresh", skip(app_state, req_payload))]
pub async fn refresh_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<RefreshRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let config = &app_state.config;
  let claims = auth_service::verify_token(&req_payload.refresh, TokenKind::Refresh, &config.token_secret)?;

  // Re-read the account so a deleted user (or a changed admin flag) does not
  // live on in refreshed tokens.
  let user = app_state
    .store
    .user_by_id(claims.sub)
    .await?
    .ok_or_else(|| AppError::Auth("Account no longer exists.".to_string()))?;

  let access = auth_service::issue_token(
    &user,
    TokenKind::Access,
    config.access_token_ttl_secs,
    &config.token_secret,
  )?;

  Ok(HttpResponse::Ok().json(json!({ "access": access })))
}
