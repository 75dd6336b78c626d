//! Error types for `catalog-core`.
//!
//! Every failure the creation pipeline can surface is one of these variants.
//! Boundaries map [`Error::kind`] onto their own status vocabulary; the
//! message is for humans only.

use std::fmt;

use thiserror::Error;

/// Which unique key of a product collided with an existing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductKey {
  Name(String),
  Slug(String),
}

impl fmt::Display for ProductKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ProductKey::Name(name) => write!(f, "name {name:?}"),
      ProductKey::Slug(slug) => write!(f, "slug {slug:?}"),
    }
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("product not found: {0}")]
  ProductNotFound(i64),

  #[error("product with {0} already exists")]
  ProductAlreadyExists(ProductKey),

  #[error("category with id {0} not found")]
  CategoryNotFound(i64),

  #[error("brand with id {0} not found")]
  BrandNotFound(i64),

  #[error("user with id {0} not found")]
  UserNotFound(i64),

  #[error("product attribute with id {0} not found")]
  AttributeNotFound(i64),

  #[error("product option with id {0} not found")]
  OptionNotFound(i64),

  #[error("option value {value:?} not found for option id {option_id}")]
  OptionValueNotFound { value: String, option_id: i64 },

  #[error("sku not found: {0}")]
  SkuNotFound(i64),

  #[error("sku {0:?} already exists")]
  SkuAlreadyExists(String),

  #[error("invalid product data - {field}: {message}")]
  InvalidProductData { field: String, message: String },

  #[error("invalid sku data for {sku:?}: {message}")]
  InvalidSkuData { sku: String, message: String },

  /// A product exists but has no purchasable variant.
  #[error("product {0} has no variants")]
  NoVariants(i64),

  #[error("database transaction failed during {operation}")]
  DatabaseTransaction { operation: String },

  #[error("database connection failed")]
  DatabaseConnection,
}

impl Error {
  pub fn invalid_product(field: impl Into<String>, message: impl Into<String>) -> Self {
    Error::InvalidProductData { field: field.into(), message: message.into() }
  }

  pub fn invalid_sku(sku: impl Into<String>, message: impl Into<String>) -> Self {
    Error::InvalidSkuData { sku: sku.into(), message: message.into() }
  }

  pub fn transaction(operation: impl Into<String>) -> Self {
    Error::DatabaseTransaction { operation: operation.into() }
  }

  /// Coarse classification used by transport layers.
  pub fn kind(&self) -> ErrorKind {
    match self {
      Error::ProductNotFound(_)
      | Error::CategoryNotFound(_)
      | Error::BrandNotFound(_)
      | Error::UserNotFound(_)
      | Error::AttributeNotFound(_)
      | Error::OptionNotFound(_)
      | Error::OptionValueNotFound { .. }
      | Error::SkuNotFound(_) => ErrorKind::NotFound,
      Error::ProductAlreadyExists(_) | Error::SkuAlreadyExists(_) => ErrorKind::Conflict,
      Error::InvalidProductData { .. } | Error::InvalidSkuData { .. } => {
        ErrorKind::InvalidData
      }
      Error::NoVariants(_) | Error::DatabaseTransaction { .. } | Error::DatabaseConnection => {
        ErrorKind::Storage
      }
    }
  }
}

/// The category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  NotFound,
  Conflict,
  InvalidData,
  Storage,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kinds_follow_the_error_family() {
    assert_eq!(Error::ProductNotFound(1).kind(), ErrorKind::NotFound);
    assert_eq!(
      Error::ProductAlreadyExists(ProductKey::Slug("tee".into())).kind(),
      ErrorKind::Conflict
    );
    assert_eq!(Error::SkuAlreadyExists("tee_S".into()).kind(), ErrorKind::Conflict);
    assert_eq!(Error::invalid_sku("tee_S", "bad").kind(), ErrorKind::InvalidData);
    assert_eq!(Error::transaction("create product").kind(), ErrorKind::Storage);
    assert_eq!(Error::NoVariants(3).kind(), ErrorKind::Storage);
  }

  #[test]
  fn conflict_message_names_the_key() {
    let err = Error::ProductAlreadyExists(ProductKey::Slug("basic-tee".into()));
    assert_eq!(err.to_string(), "product with slug \"basic-tee\" already exists");
  }
}
