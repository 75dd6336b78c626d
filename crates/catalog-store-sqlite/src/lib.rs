//! SQLite backend for the product catalog.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Product creation runs as a single unit
//! of work; see [`unit_of_work::in_transaction`].

mod constraint;
mod encode;
mod schema;
mod store;
mod writer;

pub mod error;
pub mod unit_of_work;

pub use error::{Error, Result};
pub use store::SqliteStore;
