// src/lib.rs

//! Storefront: an e-commerce backend with product browsing, user
//! registration/authentication, checkout, order history, and administrative
//! CRUD over products, orders, and users.
//!
//! The correctness-critical piece is the checkout workflow in
//! [`services::checkout_service`]: carts are validated against live
//! inventory and committed atomically via conditional stock decrements, so
//! stock never goes negative under concurrent checkouts.

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod stores;
pub mod web;
