// src/state.rs

use crate::config::AppConfig;
use crate::services::email_service::MockEmailSender;
use crate::stores::PgStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: PgStore,
  pub notifier: MockEmailSender,
  pub config: Arc<AppConfig>, // Share loaded config
}
