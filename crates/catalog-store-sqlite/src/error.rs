//! Error type for `catalog-store-sqlite`.

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A failure already classified into a domain kind.
  #[error(transparent)]
  Core(#[from] catalog_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  /// A statement failed for a reason that could not be attributed to a
  /// domain kind.
  #[error("{operation} failed: {source}")]
  Statement {
    operation: &'static str,
    #[source]
    source:    rusqlite::Error,
  },

  #[error("decimal parse error: {0}")]
  Decimal(#[from] rust_decimal::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("unknown {column} value: {value:?}")]
  UnknownValue { column: &'static str, value: String },

  /// The unit of work panicked and was rolled back.
  #[error("{operation} aborted: {message}")]
  Aborted { operation: String, message: String },
}

impl Error {
  pub fn statement(operation: &'static str, source: rusqlite::Error) -> Self {
    Error::Statement { operation, source }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl From<Error> for catalog_core::Error {
  fn from(err: Error) -> Self {
    match err {
      Error::Core(e) => e,
      Error::Database(tokio_rusqlite::Error::Rusqlite(e)) | Error::Sqlite(e) => sqlite_failure(&e),
      Error::Database(tokio_rusqlite::Error::ConnectionClosed) => {
        catalog_core::Error::DatabaseConnection
      }
      Error::Database(_) => catalog_core::Error::transaction("query"),
      Error::Statement { operation, .. } => catalog_core::Error::transaction(operation),
      Error::Decimal(_) | Error::DateParse(_) | Error::UnknownValue { .. } => {
        catalog_core::Error::transaction("decode row")
      }
      Error::Aborted { operation, .. } => catalog_core::Error::transaction(operation),
    }
  }
}

fn sqlite_failure(err: &rusqlite::Error) -> catalog_core::Error {
  match err.sqlite_error_code() {
    Some(ErrorCode::CannotOpen | ErrorCode::NotADatabase | ErrorCode::DatabaseBusy) => {
      catalog_core::Error::DatabaseConnection
    }
    _ => catalog_core::Error::transaction("query"),
  }
}
