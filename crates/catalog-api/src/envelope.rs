//! The success envelope: `{"code": 200, "message": "..", "data": ..}`.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub code:    u16,
  pub message: &'static str,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub data:    Option<T>,
}

/// A successful response with its HTTP status.
pub struct Reply<T> {
  status: StatusCode,
  body:   Envelope<T>,
}

impl<T> Reply<T> {
  pub fn ok(message: &'static str, data: T) -> Self {
    Self::with_status(StatusCode::OK, message, Some(data))
  }

  pub fn created(message: &'static str, data: T) -> Self {
    Self::with_status(StatusCode::CREATED, message, Some(data))
  }

  fn with_status(status: StatusCode, message: &'static str, data: Option<T>) -> Self {
    Self { status, body: Envelope { code: status.as_u16(), message, data } }
  }
}

impl Reply<()> {
  /// A 200 without a `data` member.
  pub fn message(message: &'static str) -> Self { Self::with_status(StatusCode::OK, message, None) }
}

impl<T: Serialize> IntoResponse for Reply<T> {
  fn into_response(self) -> Response { (self.status, Json(self.body)).into_response() }
}
