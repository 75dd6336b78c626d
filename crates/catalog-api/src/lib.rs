//! JSON REST API for the product catalog.
//!
//! Exposes an axum [`Router`] backed by a [`Catalog`] over any
//! [`catalog_core::store::CatalogStore`]. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(catalog_api::api_router(catalog.clone()))
//! ```

pub mod envelope;
pub mod error;
pub mod products;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use catalog_core::{Catalog, store::CatalogStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `catalog`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(catalog: Arc<Catalog<S>>) -> Router<()>
where
  S: CatalogStore + 'static,
{
  Router::new()
    .route("/products", post(products::create::<S>))
    .route("/products/no-sku", post(products::create_without_skus::<S>))
    .route("/products/skus/{id}", get(products::sku::<S>))
    .route("/products/{id}", get(products::get_one::<S>).delete(products::delete::<S>))
    .route("/products/{id}/detail", get(products::detail::<S>))
    .with_state(catalog)
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use catalog_core::CatalogConfig;
  use catalog_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  struct Ids {
    brand:    i64,
    category: i64,
    user:     i64,
    size:     i64,
    color:    i64,
  }

  async fn app() -> (Router, Ids) {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let ids = Ids {
      brand:    store.add_brand("Acme").await.unwrap(),
      category: store.add_category("Shirts").await.unwrap(),
      user:     store.add_user("admin").await.unwrap(),
      size:     store.add_option("size").await.unwrap(),
      color:    store.add_option("color").await.unwrap(),
    };
    let catalog = Arc::new(Catalog::new(store, CatalogConfig::default()));
    (api_router(catalog), ids)
  }

  async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  /// Money is serialised as a decimal string.
  fn decimal(value: &Value) -> f64 { value.as_str().unwrap().parse().unwrap() }

  fn tee(ids: &Ids, slug: &str) -> Value {
    json!({
      "name": format!("Tee {slug}"),
      "image_url": "https://img.example/tee.png",
      "slug": slug,
      "base_price": "100",
      "status": "ACTIVE",
      "brand_id": ids.brand,
      "category_id": ids.category,
      "user_id": ids.user,
      "product_skus": [
        { "sku": format!("{slug}-s"), "extra_price": "0.10", "stock": 4,
          "sale": { "sale_type": "FIXED", "sale_value": "200" } }
      ],
      "option_values": { (ids.size.to_string()): ["S"] }
    })
  }

  #[tokio::test]
  async fn create_returns_201_with_envelope() {
    let (app, ids) = app().await;
    let (status, body) = send(&app, "POST", "/products", Some(tee(&ids, "tee"))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["code"], 201);
    assert_eq!(body["message"], "Product created successfully");
    let sku = &body["data"]["product_skus"][0];
    assert_eq!(decimal(&sku["price"]), 110.0);
    // A fixed discount larger than the price floors at zero.
    assert_eq!(decimal(&sku["sale_price"]), 0.0);
    assert_eq!(sku["stock"], 4);
  }

  #[tokio::test]
  async fn no_sku_route_generates_variants() {
    let (app, ids) = app().await;
    let request = json!({
      "name": "Tee",
      "image_url": "https://img.example/tee.png",
      "slug": "tee",
      "base_price": "20",
      "brand_id": ids.brand,
      "category_id": ids.category,
      "user_id": ids.user,
      "option_values": {
        (ids.size.to_string()): ["S", "M"],
        (ids.color.to_string()): ["Red"]
      }
    });
    let (status, body) = send(&app, "POST", "/products/no-sku", Some(request)).await;

    assert_eq!(status, StatusCode::CREATED);
    let skus = body["data"]["product_skus"].as_array().unwrap();
    assert_eq!(skus.len(), 2);
    assert_eq!(skus[0]["sku"], "Tee_S_Red");
    assert_eq!(skus[1]["sku"], "Tee_M_Red");
  }

  #[tokio::test]
  async fn reads_use_the_envelope() {
    let (app, ids) = app().await;
    let (_, created) = send(&app, "POST", "/products", Some(tee(&ids, "tee"))).await;
    let id = created["data"]["id"].as_i64().unwrap();
    let sku_id = created["data"]["product_skus"][0]["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["slug"], "tee");

    let (status, body) = send(&app, "GET", &format!("/products/{id}/detail"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["option_values"][0]["name"], "size");

    let (status, body) = send(&app, "GET", &format!("/products/skus/{sku_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["product_id"], id);
  }

  #[tokio::test]
  async fn duplicate_slug_is_409() {
    let (app, ids) = app().await;
    send(&app, "POST", "/products", Some(tee(&ids, "tee"))).await;

    let mut dup = tee(&ids, "tee");
    dup["name"] = json!("Another name");
    dup["product_skus"][0]["sku"] = json!("another-s");
    let (status, body) = send(&app, "POST", "/products", Some(dup)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 409);
    assert_eq!(body["status"], "Conflict");
  }

  #[tokio::test]
  async fn missing_brand_is_404() {
    let (app, ids) = app().await;
    let mut req = tee(&ids, "tee");
    req["brand_id"] = json!(999);
    let (status, body) = send(&app, "POST", "/products", Some(req)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "brand with id 999 not found");
  }

  #[tokio::test]
  async fn blank_name_is_400() {
    let (app, ids) = app().await;
    let mut req = tee(&ids, "tee");
    req["name"] = json!(" ");
    let (status, body) = send(&app, "POST", "/products", Some(req)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "Bad Request");
  }

  #[tokio::test]
  async fn malformed_body_is_400() {
    let (app, _) = app().await;
    let (status, body) = send(&app, "POST", "/products", Some(json!({ "name": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
  }

  #[tokio::test]
  async fn delete_then_get_is_404() {
    let (app, ids) = app().await;
    let (_, created) = send(&app, "POST", "/products", Some(tee(&ids, "tee"))).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("data").is_none());

    let (status, body) = send(&app, "GET", &format!("/products/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "Not Found");
  }
}
