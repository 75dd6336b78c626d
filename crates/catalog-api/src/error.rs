//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Error bodies look like `{"code": 404, "status": "Not Found", "message": ".."}`.
//! The status code is chosen from [`catalog_core::Error::kind`], never from
//! the message.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use catalog_core::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Catalog(#[from] catalog_core::Error),

  /// The request could not be decoded.
  #[error("bad request: {0}")]
  BadRequest(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Catalog(e) => match e.kind() {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::InvalidData => StatusCode::BAD_REQUEST,
        ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
      },
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    let body = json!({
      "code":    status.as_u16(),
      "status":  status.canonical_reason().unwrap_or_default(),
      "message": self.to_string(),
    });
    (status, Json(body)).into_response()
  }
}

#[cfg(test)]
mod tests {
  use catalog_core::{Error, error::ProductKey};

  use super::*;

  #[test]
  fn status_follows_error_kind() {
    let cases = [
      (Error::SkuNotFound(1), StatusCode::NOT_FOUND),
      (Error::BrandNotFound(1), StatusCode::NOT_FOUND),
      (Error::ProductAlreadyExists(ProductKey::Name("Tee".into())), StatusCode::CONFLICT),
      (Error::invalid_product("slug", "must not be blank"), StatusCode::BAD_REQUEST),
      (Error::transaction("insert sku"), StatusCode::INTERNAL_SERVER_ERROR),
      (Error::DatabaseConnection, StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (err, expected) in cases {
      assert_eq!(ApiError::from(err).status(), expected);
    }
  }
}
