//! The `CatalogStore` trait.
//!
//! Implemented by storage backends (e.g. `catalog-store-sqlite`). The
//! [`Catalog`](crate::catalog::Catalog) service and the HTTP layer depend on
//! this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  mapper::CatalogRecord,
  product::Product,
  sku::SkuWithInventory,
  vocabulary::{Assignment, Definition, UnknownReferencePolicy},
};

/// Abstraction over a relational catalog backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  /// Backend failures must be expressible as domain errors.
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist every row of `record` in one transaction and return the new
  /// product id.
  ///
  /// Rows are written in a fixed order: product; attribute info; option info;
  /// attribute vocabulary; SKUs then their inventory; option combinations
  /// then option vocabulary. Attribute and option names are resolved inside
  /// the transaction, applying `policy` to unknown ids. Any failure, including
  /// a panic, leaves no row behind.
  fn create_product(
    &self,
    record: CatalogRecord,
    policy: UnknownReferencePolicy,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Delete a product; its dependants go with it. Returns `false` if no such
  /// product existed.
  fn delete_product(&self, id: i64) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  fn find_product(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Product>, Self::Error>> + Send + '_;

  fn find_product_by_slug<'a>(
    &'a self,
    slug: &'a str,
  ) -> impl Future<Output = Result<Option<Product>, Self::Error>> + Send + 'a;

  /// Attribute definitions among `ids`. Unknown ids are simply absent.
  fn find_attributes_by_ids<'a>(
    &'a self,
    ids: &'a [i64],
  ) -> impl Future<Output = Result<Vec<Definition>, Self::Error>> + Send + 'a;

  /// Option definitions among `ids`. Unknown ids are simply absent.
  fn find_options_by_ids<'a>(
    &'a self,
    ids: &'a [i64],
  ) -> impl Future<Output = Result<Vec<Definition>, Self::Error>> + Send + 'a;

  /// Attribute info rows of a product, in insertion order.
  fn attribute_assignments(
    &self,
    product_id: i64,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  /// Option info rows of a product, in insertion order.
  fn option_assignments(
    &self,
    product_id: i64,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  /// Every SKU of a product joined with its inventory row.
  fn skus_with_inventory(
    &self,
    product_id: i64,
  ) -> impl Future<Output = Result<Vec<SkuWithInventory>, Self::Error>> + Send + '_;

  fn find_sku(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<SkuWithInventory>, Self::Error>> + Send + '_;
}
