// server/src/web/routes.rs

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::middleware::DefaultHeaders;
use actix_web::{guard, web, HttpRequest};

use crate::errors::AppError;
use crate::web::handlers::{health_handlers, order_handlers, product_handlers, user_handlers};

/// Permissive CORS headers added to every response.
pub fn cors_headers() -> DefaultHeaders {
  DefaultHeaders::new()
    .add(("Access-Control-Allow-Origin", "*"))
    .add(("Access-Control-Allow-Methods", "GET,POST,PATCH,DELETE,OPTIONS"))
    .add(("Access-Control-Allow-Headers", "Content-Type,Authorization"))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid JSON body: {}", err)).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid query string: {}", err)).into()
}

// Literal segments (`role`, `admin`, `manager`, `pending`, ...) are registered
// before the `{id}` resources they would otherwise be captured by.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .app_data(web::QueryConfig::default().error_handler(query_error_handler))
    // CORS preflight for any path
    .service(
      web::resource("/{tail:.*}")
        .guard(guard::Options())
        .to(health_handlers::preflight_handler),
    )
    .route("/", web::get().to(health_handlers::liveness_handler))
    .route("/health", web::get().to(health_handlers::readiness_handler))
    // User Directory Routes
    .service(
      web::scope("/users")
        .route("", web::get().to(user_handlers::list_users_handler))
        .route("", web::post().to(user_handlers::register_user_handler))
        .route("/role", web::get().to(user_handlers::user_role_handler))
        .route("/admin", web::get().to(user_handlers::user_is_admin_handler))
        .route("/role/{id}", web::patch().to(user_handlers::set_user_role_handler))
        .route("/status/{id}", web::patch().to(user_handlers::set_user_status_handler))
        .route("/{id}", web::get().to(user_handlers::get_user_handler)),
    )
    // Product Catalog Routes
    .service(
      web::scope("/products")
        .route("", web::get().to(product_handlers::list_products_handler))
        .route("", web::post().to(product_handlers::create_product_handler))
        .route("/manager", web::get().to(product_handlers::list_manager_products_handler))
        .service(
          web::resource("/{id}")
            .route(web::get().to(product_handlers::get_product_handler))
            .route(web::patch().to(product_handlers::update_product_handler))
            .route(web::delete().to(product_handlers::delete_product_handler)),
        ),
    )
    // Order Lifecycle Routes
    .service(
      web::scope("/booking")
        .route("", web::get().to(order_handlers::list_bookings_handler))
        .route("", web::post().to(order_handlers::create_booking_handler)),
    )
    .service(
      web::scope("/orders")
        .route("", web::get().to(order_handlers::list_orders_handler))
        .route("/pending", web::get().to(order_handlers::list_pending_orders_handler))
        .route("/approved", web::get().to(order_handlers::list_approved_orders_handler))
        .route("/status/{id}", web::patch().to(order_handlers::set_order_status_handler))
        .route("/{id}/tracking", web::post().to(order_handlers::add_tracking_entry_handler))
        .service(
          web::resource("/{id}")
            .route(web::get().to(order_handlers::get_order_handler))
            .route(web::patch().to(order_handlers::set_order_status_handler)),
        ),
    )
    .default_service(web::to(health_handlers::route_not_found_handler));
}
