// src/services/mod.rs

//! Application services: authentication, checkout, and outbound email.

pub mod auth_service;
pub mod checkout_service;
pub mod email_service;
