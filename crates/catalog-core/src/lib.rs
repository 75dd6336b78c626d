//! Core types and trait definitions for the product catalog.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the creation pipeline (request mapping, variant generation), read-time
//! pricing, the detail view, and the [`store::CatalogStore`] abstraction the
//! backends implement.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod catalog;
pub mod detail;
pub mod error;
pub mod mapper;
pub mod pricing;
pub mod product;
pub mod request;
pub mod sku;
pub mod store;
pub mod variant;
pub mod vocabulary;

pub use catalog::{Catalog, CatalogConfig};
pub use error::{Error, ErrorKind, Result};
