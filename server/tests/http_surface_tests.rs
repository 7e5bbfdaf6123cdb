// tests/http_surface_tests.rs
#[macro_use]
mod common;
use common::*;

use actix_web::http::{header, Method, StatusCode};
use actix_web::test;
use garments_server::web::handlers::health_handlers::LIVENESS_TEXT;
use serde_json::{json, Value};

#[actix_web::test]
async fn liveness_answers_plain_text() {
  let (_store, state) = memory_state();
  let app = test_app!(state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body = test::read_body(resp).await;
  assert_eq!(body, LIVENESS_TEXT.as_bytes());
}

#[actix_web::test]
async fn readiness_reports_the_backend() {
  let (_store, state) = memory_state();
  let app = test_app!(state);

  let health: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;
  assert_eq!(health, json!({ "status": "ok", "store": "memory" }));
}

#[actix_web::test]
async fn every_response_carries_cors_headers() {
  let (_store, state) = memory_state();
  let app = test_app!(state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/products").to_request()).await;
  assert_eq!(
    resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
    "*"
  );

  let resp = test::call_service(&app, test::TestRequest::get().uri("/nowhere").to_request()).await;
  assert_eq!(
    resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
    "*"
  );
}

#[actix_web::test]
async fn preflight_is_answered_for_any_path() {
  let (_store, state) = memory_state();
  let app = test_app!(state);

  for uri in ["/orders/123/tracking", "/users", "/not/a/route"] {
    let req = test::TestRequest::default().method(Method::OPTIONS).uri(uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let methods = resp.headers().get(header::ACCESS_CONTROL_ALLOW_METHODS).unwrap();
    assert!(methods.to_str().unwrap().contains("PATCH"));
  }
}

#[actix_web::test]
async fn unknown_routes_get_a_json_404() {
  let (_store, state) = memory_state();
  let app = test_app!(state);

  let resp = test::call_service(&app, test::TestRequest::get().uri("/carts").to_request()).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let err: Value = test::read_body_json(resp).await;
  assert_eq!(err, json!({ "message": "Route not found" }));
}

#[actix_web::test]
async fn malformed_json_is_a_bad_request() {
  let (_store, state) = memory_state();
  let app = test_app!(state);

  let req = test::TestRequest::post()
    .uri("/products")
    .insert_header((header::CONTENT_TYPE, "application/json"))
    .set_payload("{\"name\": ")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let err: Value = test::read_body_json(resp).await;
  assert!(err["message"].as_str().unwrap().starts_with("Invalid JSON body"));
}

#[actix_web::test]
async fn non_object_bodies_are_rejected_everywhere() {
  let (store, state) = memory_state();
  let app = test_app!(state);

  for uri in ["/products", "/users", "/booking"] {
    let req = test::TestRequest::post().uri(uri).set_json(json!(42)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);
  }
  assert!(store.is_empty(garments_server::store::Collection::Products));
  assert!(store.is_empty(garments_server::store::Collection::Orders));
}
