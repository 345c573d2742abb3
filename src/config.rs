// src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,

  // Token signing
  pub token_secret: String,
  pub access_token_ttl_secs: i64,
  pub refresh_token_ttl_secs: i64,

  // Outbound notifications
  pub email_sender: String,

  // Optional: load demo data on startup
  pub seed_db: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;

    let token_secret = get_env("TOKEN_SECRET")?;
    if token_secret.len() < 32 {
      return Err(AppError::Config(
        "TOKEN_SECRET must be at least 32 bytes long.".to_string(),
      ));
    }
    let access_token_ttl_secs = get_env("ACCESS_TOKEN_TTL_SECS")
      .unwrap_or_else(|_| "900".to_string())
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid ACCESS_TOKEN_TTL_SECS: {}", e)))?;
    let refresh_token_ttl_secs = get_env("REFRESH_TOKEN_TTL_SECS")
      .unwrap_or_else(|_| "1209600".to_string()) // 14 days
      .parse::<i64>()
      .map_err(|e| AppError::Config(format!("Invalid REFRESH_TOKEN_TTL_SECS: {}", e)))?;

    let email_sender = get_env("EMAIL_SENDER").unwrap_or_else(|_| "noreply@example.com".to_string());

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      token_secret,
      access_token_ttl_secs,
      refresh_token_ttl_secs,
      email_sender,
      seed_db,
    })
  }
}
