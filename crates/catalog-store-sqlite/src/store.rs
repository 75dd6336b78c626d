//! [`SqliteStore`] — the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, params};
use tracing::debug;

use catalog_core::{
  mapper::CatalogRecord,
  product::Product,
  sku::SkuWithInventory,
  store::CatalogStore,
  vocabulary::{Assignment, Definition, UnknownReferencePolicy},
};

use crate::{
  Error, Result,
  encode::{PRODUCT_COLUMNS, RawProduct, RawSku, SKU_COLUMNS},
  schema::SCHEMA,
  unit_of_work::in_transaction,
  writer::{self, Vocabulary},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A product catalog backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Referenced rows ───────────────────────────────────────────────────────

  pub async fn add_brand(&self, name: impl Into<String>) -> Result<i64> {
    self.insert_named("INSERT INTO brands (name) VALUES (?1)", name.into()).await
  }

  pub async fn add_category(&self, name: impl Into<String>) -> Result<i64> {
    self.insert_named("INSERT INTO categories (name) VALUES (?1)", name.into()).await
  }

  pub async fn add_user(&self, username: impl Into<String>) -> Result<i64> {
    self.insert_named("INSERT INTO users (username) VALUES (?1)", username.into()).await
  }

  pub async fn add_attribute(&self, name: impl Into<String>) -> Result<i64> {
    self.insert_named("INSERT INTO attributes (name) VALUES (?1)", name.into()).await
  }

  pub async fn add_option(&self, name: impl Into<String>) -> Result<i64> {
    self.insert_named("INSERT INTO options (name) VALUES (?1)", name.into()).await
  }

  async fn insert_named(&self, sql: &'static str, name: String) -> Result<i64> {
    let id = self
      .conn
      .call(move |conn| {
        conn.execute(sql, params![name])?;
        Ok(conn.last_insert_rowid())
      })
      .await?;
    Ok(id)
  }

  async fn find_definitions(&self, kind: Vocabulary, ids: &[i64]) -> Result<Vec<Definition>> {
    let ids = ids.to_vec();
    let definitions = self
      .conn
      .call(move |conn| Ok(writer::find_definitions(conn, kind, &ids)?))
      .await?;
    Ok(definitions)
  }

  async fn assignments(&self, table: &'static str, product_id: i64) -> Result<Vec<Assignment>> {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT id, product_id, name, value FROM {table} WHERE product_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(params![product_id], |row| {
            Ok(Assignment {
              id:         row.get(0)?,
              product_id: row.get(1)?,
              name:       row.get(2)?,
              value:      row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Number of rows in `table`.
  #[cfg(test)]
  pub(crate) async fn row_count(&self, table: &'static str) -> i64 {
    self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
      })
      .await
      .expect("row count")
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn create_product(
    &self,
    record: CatalogRecord,
    policy: UnknownReferencePolicy,
  ) -> Result<i64> {
    let id = self
      .conn
      .call(move |conn| {
        Ok(in_transaction(conn, "create product", |tx| {
          writer::create_product(tx, record, policy)
        }))
      })
      .await??;
    Ok(id)
  }

  async fn delete_product(&self, id: i64) -> Result<bool> {
    let deleted = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM products WHERE id = ?1", params![id])?))
      .await?;
    debug!(product_id = id, deleted, "delete product");
    Ok(deleted > 0)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn find_product(&self, id: i64) -> Result<Option<Product>> {
    let raw: Option<RawProduct> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"),
            params![id],
            RawProduct::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProduct::into_product).transpose()
  }

  async fn find_product_by_slug(&self, slug: &str) -> Result<Option<Product>> {
    let slug = slug.to_owned();
    let raw: Option<RawProduct> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE slug = ?1"),
            params![slug],
            RawProduct::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawProduct::into_product).transpose()
  }

  async fn find_attributes_by_ids(&self, ids: &[i64]) -> Result<Vec<Definition>> {
    self.find_definitions(Vocabulary::Attribute, ids).await
  }

  async fn find_options_by_ids(&self, ids: &[i64]) -> Result<Vec<Definition>> {
    self.find_definitions(Vocabulary::Option, ids).await
  }

  async fn attribute_assignments(&self, product_id: i64) -> Result<Vec<Assignment>> {
    self.assignments("product_attribute_info", product_id).await
  }

  async fn option_assignments(&self, product_id: i64) -> Result<Vec<Assignment>> {
    self.assignments("product_option_info", product_id).await
  }

  async fn skus_with_inventory(&self, product_id: i64) -> Result<Vec<SkuWithInventory>> {
    let raws: Vec<RawSku> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SKU_COLUMNS}
           FROM skus s
           JOIN inventories i ON i.sku_id = s.id
           WHERE s.product_id = ?1
           ORDER BY s.id"
        ))?;
        let rows = stmt
          .query_map(params![product_id], RawSku::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSku::into_sku).collect()
  }

  async fn find_sku(&self, id: i64) -> Result<Option<SkuWithInventory>> {
    let raw: Option<RawSku> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {SKU_COLUMNS}
               FROM skus s
               JOIN inventories i ON i.sku_id = s.id
               WHERE s.id = ?1"
            ),
            params![id],
            RawSku::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSku::into_sku).transpose()
  }
}
