// src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{admin_handlers, auth_handlers, checkout_handlers, order_handlers, product_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// This function is called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1") // Base path for API version 1
      // Health Check Route
      .route("/health", web::get().to(health_check_handler))
      // Authentication Routes
      .service(
        web::scope("/auth")
          .route("/register", web::post().to(auth_handlers::register_handler))
          .route("/login", web::post().to(auth_handlers::login_handler))
          .route("/refresh", web::post().to(auth_handlers::refresh_handler)),
      )
      // Public catalog
      .service(
        web::scope("/products")
          .route("", web::get().to(product_handlers::list_products_handler))
          .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
      )
      // Checkout
      .service(web::scope("/checkout").route("", web::post().to(checkout_handlers::checkout_handler)))
      // The requesting user's order history
      .service(web::scope("/orders").route("", web::get().to(order_handlers::order_history_handler)))
      // Administrative CRUD (admin token required by the extractors)
      .service(
        web::scope("/admin")
          .service(
            web::scope("/products")
              .route("", web::get().to(admin_handlers::list_products_handler))
              .route("", web::post().to(admin_handlers::create_product_handler))
              .route("/{product_id}", web::get().to(admin_handlers::get_product_handler))
              .route("/{product_id}", web::put().to(admin_handlers::update_product_handler))
              .route("/{product_id}", web::delete().to(admin_handlers::delete_product_handler)),
          )
          .service(
            web::scope("/orders")
              .route("", web::get().to(admin_handlers::list_orders_handler))
              .route("/{order_id}", web::get().to(admin_handlers::get_order_handler)),
          )
          .service(
            web::scope("/users")
              .route("", web::get().to(admin_handlers::list_users_handler))
              .route("/{user_id}", web::get().to(admin_handlers::get_user_handler)),
          ),
      ),
  );
}
