// src/services/auth_service.rs

//! Password hashing/verification and signed-token issuance.
//!
//! Tokens are HMAC-SHA256-signed JSON claims: `b64url(claims).b64url(sig)`.
//! An access token authenticates requests; a refresh token can only be
//! exchanged for a new access token. The `kind` claim enforces the split.

use crate::errors::AppError;
use crate::models::User;
use argon2::{
  password_hash::{
    rand_core::OsRng, // For generating random salts
    PasswordHash,
    PasswordHasher,
    PasswordVerifier,
    SaltString,
  },
  Argon2,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::{debug, error, instrument};
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a plain-text password using Argon2 with a random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String, AppError> {
  if password.is_empty() {
    return Err(AppError::Validation(
      "Password cannot be empty for hashing.".to_string(),
    ));
  }

  let salt = SaltString::generate(&mut OsRng);
  let argon2_hasher = Argon2::default();

  match argon2_hasher.hash_password(password.as_bytes(), &salt) {
    Ok(password_hash_obj) => Ok(password_hash_obj.to_string()),
    Err(argon_err) => {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      Err(AppError::Internal(format!(
        "Password hashing process failed: {}",
        argon_err
      )))
    }
  }
}

/// Verifies a plain-text password against a stored Argon2 hash.
///
/// Returns `Ok(false)` on a mismatch; errors are reserved for malformed
/// stored hashes or internal verifier failures.
#[instrument(name = "auth_service::verify_password", skip_all, err(Display))]
pub fn verify_password(hashed_password_str: &str, provided_password: &str) -> Result<bool, AppError> {
  if hashed_password_str.is_empty() {
    return Err(AppError::Auth("Invalid stored password format (empty).".to_string()));
  }
  if provided_password.is_empty() {
    return Err(AppError::Auth(
      "Provided password for verification cannot be empty.".to_string(),
    ));
  }

  let parsed_hash = match PasswordHash::new(hashed_password_str) {
    Ok(ph) => ph,
    Err(parse_err) => {
      error!(error = %parse_err, "Failed to parse stored password hash string.");
      return Err(AppError::Internal(format!(
        "Invalid stored password hash format: {}",
        parse_err
      )));
    }
  };

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: Passwords do not match.");
      Ok(false)
    }
    Err(other_argon_err) => {
      error!(error = %other_argon_err, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other_argon_err
      )))
    }
  }
}

// --- Signed tokens ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
  Access,
  Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
  pub sub: Uuid,
  pub username: String,
  pub email: String,
  pub is_admin: bool,
  pub kind: TokenKind,
  pub exp: i64, // Unix timestamp, seconds
}

/// Access + refresh pair returned by the login endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
  pub access: String,
  pub refresh: String,
}

fn sign(payload: &str, secret: &str) -> Result<String, AppError> {
  let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
    .map_err(|e| AppError::Internal(format!("Token secret rejected by HMAC: {}", e)))?;
  mac.update(payload.as_bytes());
  Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}

#[instrument(name = "auth_service::issue_token", skip(user, secret), fields(user_id = %user.id))]
pub fn issue_token(user: &User, kind: TokenKind, ttl_secs: i64, secret: &str) -> Result<String, AppError> {
  let claims = TokenClaims {
    sub: user.id,
    username: user.username.clone(),
    email: user.email.clone(),
    is_admin: user.is_admin,
    kind,
    exp: Utc::now().timestamp() + ttl_secs,
  };
  let payload_json =
    serde_json::to_string(&claims).map_err(|e| AppError::Internal(format!("Failed to encode claims: {}", e)))?;
  let payload = URL_SAFE_NO_PAD.encode(payload_json.as_bytes());
  let signature = sign(&payload, secret)?;
  Ok(format!("{}.{}", payload, signature))
}

pub fn issue_token_pair(user: &User, access_ttl_secs: i64, refresh_ttl_secs: i64, secret: &str) -> Result<TokenPair, AppError> {
  Ok(TokenPair {
    access: issue_token(user, TokenKind::Access, access_ttl_secs, secret)?,
    refresh: issue_token(user, TokenKind::Refresh, refresh_ttl_secs, secret)?,
  })
}

/// Verifies signature, expiry, and token kind, returning the claims.
#[instrument(name = "auth_service::verify_token", skip_all, err(Display))]
pub fn verify_token(token: &str, expected_kind: TokenKind, secret: &str) -> Result<TokenClaims, AppError> {
  let (payload, signature_b64) = token
    .split_once('.')
    .ok_or_else(|| AppError::Auth("Malformed token.".to_string()))?;

  let signature = URL_SAFE_NO_PAD
    .decode(signature_b64)
    .map_err(|_| AppError::Auth("Malformed token signature.".to_string()))?;

  let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
    .map_err(|e| AppError::Internal(format!("Token secret rejected by HMAC: {}", e)))?;
  mac.update(payload.as_bytes());
  // verify_slice is constant-time
  mac
    .verify_slice(&signature)
    .map_err(|_| AppError::Auth("Invalid token signature.".to_string()))?;

  let payload_json = URL_SAFE_NO_PAD
    .decode(payload)
    .map_err(|_| AppError::Auth("Malformed token payload.".to_string()))?;
  let claims: TokenClaims =
    serde_json::from_slice(&payload_json).map_err(|_| AppError::Auth("Malformed token claims.".to_string()))?;

  if claims.exp <= Utc::now().timestamp() {
    return Err(AppError::Auth("Token has expired.".to_string()));
  }
  if claims.kind != expected_kind {
    return Err(AppError::Auth("Wrong token kind for this operation.".to_string()));
  }

  Ok(claims)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  const SECRET: &str = "test-secret-test-secret-test-secret!";

  fn sample_user() -> User {
    User {
      id: Uuid::new_v4(),
      username: "alice".to_string(),
      email: "alice@example.com".to_string(),
      password_hash: String::new(),
      is_admin: false,
      created_at: Utc::now(),
      updated_at: Utc::now(),
    }
  }

  #[test]
  fn password_hash_roundtrip() {
    let hash = hash_password("hunter2hunter2").unwrap();
    assert!(verify_password(&hash, "hunter2hunter2").unwrap());
    assert!(!verify_password(&hash, "wrong-password").unwrap());
  }

  #[test]
  fn empty_password_rejected() {
    assert!(hash_password("").is_err());
  }

  #[test]
  fn token_roundtrip_preserves_claims() {
    let user = sample_user();
    let token = issue_token(&user, TokenKind::Access, 60, SECRET).unwrap();
    let claims = verify_token(&token, TokenKind::Access, SECRET).unwrap();
    assert_eq!(claims.sub, user.id);
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.email, "alice@example.com");
    assert!(!claims.is_admin);
  }

  #[test]
  fn tampered_token_rejected() {
    let user = sample_user();
    let token = issue_token(&user, TokenKind::Access, 60, SECRET).unwrap();
    let mut tampered = token.clone();
    // Flip a character in the payload half
    tampered.replace_range(0..1, if token.starts_with('A') { "B" } else { "A" });
    assert!(verify_token(&tampered, TokenKind::Access, SECRET).is_err());
  }

  #[test]
  fn wrong_secret_rejected() {
    let user = sample_user();
    let token = issue_token(&user, TokenKind::Access, 60, SECRET).unwrap();
    assert!(verify_token(&token, TokenKind::Access, "another-secret-another-secret!!!").is_err());
  }

  #[test]
  fn expired_token_rejected() {
    let user = sample_user();
    let token = issue_token(&user, TokenKind::Access, -10, SECRET).unwrap();
    let err = verify_token(&token, TokenKind::Access, SECRET).unwrap_err();
    assert_eq!(err.kind(), "auth");
  }

  #[test]
  fn refresh_token_cannot_authenticate_requests() {
    let user = sample_user();
    let pair = issue_token_pair(&user, 60, 120, SECRET).unwrap();
    assert!(verify_token(&pair.access, TokenKind::Access, SECRET).is_ok());
    assert!(verify_token(&pair.refresh, TokenKind::Access, SECRET).is_err());
    assert!(verify_token(&pair.refresh, TokenKind::Refresh, SECRET).is_ok());
  }
}
