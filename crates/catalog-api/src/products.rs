//! Handlers for `/products` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/products` | Body: full creation request with `product_skus` |
//! | `POST`   | `/products/no-sku` | SKUs generated from `option_values` |
//! | `GET`    | `/products/{id}` | Product row only |
//! | `GET`    | `/products/{id}/detail` | Assignments and priced variants |
//! | `GET`    | `/products/skus/{id}` | One priced variant |
//! | `DELETE` | `/products/{id}` | Dependants are removed with it |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
};
use catalog_core::{
  Catalog,
  detail::{ProductDetail, VariantView},
  product::Product,
  request::{CreateProductRequest, CreateProductWithoutSkuRequest},
  store::CatalogStore,
};

use crate::{envelope::Reply, error::ApiError};

type Id = Result<Path<i64>, PathRejection>;

fn id(path: Id) -> Result<i64, ApiError> {
  path.map(|Path(id)| id).map_err(|e| ApiError::BadRequest(e.body_text()))
}

fn body<T>(json: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
  json.map(|Json(body)| body).map_err(|e| ApiError::BadRequest(e.body_text()))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /products`
pub async fn create<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  request: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<Reply<ProductDetail>, ApiError> {
  let detail = catalog.create_product(body(request)?).await?;
  Ok(Reply::created("Product created successfully", detail))
}

/// `POST /products/no-sku`
pub async fn create_without_skus<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  request: Result<Json<CreateProductWithoutSkuRequest>, JsonRejection>,
) -> Result<Reply<ProductDetail>, ApiError> {
  let detail = catalog.create_product_without_skus(body(request)?).await?;
  Ok(Reply::created("Product created successfully", detail))
}

// ─── Read ─────────────────────────────────────────────────────────────────────

/// `GET /products/{id}`
pub async fn get_one<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  path: Id,
) -> Result<Reply<Product>, ApiError> {
  let product = catalog.product(id(path)?).await?;
  Ok(Reply::ok("Product retrieved successfully", product))
}

/// `GET /products/{id}/detail`
pub async fn detail<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  path: Id,
) -> Result<Reply<ProductDetail>, ApiError> {
  let detail = catalog.product_detail(id(path)?).await?;
  Ok(Reply::ok("Product detail retrieved successfully", detail))
}

/// `GET /products/skus/{id}`
pub async fn sku<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  path: Id,
) -> Result<Reply<VariantView>, ApiError> {
  let variant = catalog.sku(id(path)?).await?;
  Ok(Reply::ok("Product SKU retrieved successfully", variant))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /products/{id}`
pub async fn delete<S: CatalogStore>(
  State(catalog): State<Arc<Catalog<S>>>,
  path: Id,
) -> Result<Reply<()>, ApiError> {
  catalog.delete_product(id(path)?).await?;
  Ok(Reply::message("Product deleted successfully"))
}
