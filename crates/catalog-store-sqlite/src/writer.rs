//! The write sequence for one product, run inside a single unit of work.
//!
//! Every statement failure is classified here, where the row being written
//! is known, so the caller receives a domain kind rather than a driver error.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension as _, params, params_from_iter};
use tracing::debug;

use catalog_core::{
  Error as CoreError,
  error::ProductKey,
  mapper::CatalogRecord,
  product::NewProduct,
  sku::NewSku,
  vocabulary::{
    Definition, NewAssignment, OptionCombination, UnknownReferencePolicy, VocabularyValue,
  },
};

use crate::{
  Error, Result,
  constraint::Violation,
  encode::{encode_decimal, encode_dt, encode_sale_type, encode_status},
};

// ─── Vocabulary tables ───────────────────────────────────────────────────────

/// The two parallel families of vocabulary tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vocabulary {
  Attribute,
  Option,
}

impl Vocabulary {
  fn definitions(self) -> &'static str {
    match self {
      Vocabulary::Attribute => "attributes",
      Vocabulary::Option => "options",
    }
  }

  fn info(self) -> &'static str {
    match self {
      Vocabulary::Attribute => "product_attribute_info",
      Vocabulary::Option => "product_option_info",
    }
  }

  fn values(self) -> &'static str {
    match self {
      Vocabulary::Attribute => "attribute_values",
      Vocabulary::Option => "option_values",
    }
  }

  fn key(self) -> &'static str {
    match self {
      Vocabulary::Attribute => "attribute_id",
      Vocabulary::Option => "option_id",
    }
  }

  fn not_found(self, id: i64) -> CoreError {
    match self {
      Vocabulary::Attribute => CoreError::AttributeNotFound(id),
      Vocabulary::Option => CoreError::OptionNotFound(id),
    }
  }

  fn info_operation(self) -> &'static str {
    match self {
      Vocabulary::Attribute => "insert attribute info",
      Vocabulary::Option => "insert option info",
    }
  }

  fn values_operation(self) -> &'static str {
    match self {
      Vocabulary::Attribute => "insert attribute values",
      Vocabulary::Option => "insert option values",
    }
  }
}

/// Definitions of `kind` whose id is in `ids`; unknown ids are absent.
pub fn find_definitions(
  conn: &Connection,
  kind: Vocabulary,
  ids: &[i64],
) -> rusqlite::Result<Vec<Definition>> {
  if ids.is_empty() {
    return Ok(Vec::new());
  }
  let placeholders = vec!["?"; ids.len()].join(", ");
  let sql = format!(
    "SELECT id, name FROM {} WHERE id IN ({placeholders}) ORDER BY id",
    kind.definitions()
  );
  let mut stmt = conn.prepare(&sql)?;
  stmt
    .query_map(params_from_iter(ids), |row| Ok(Definition { id: row.get(0)?, name: row.get(1)? }))?
    .collect()
}

// ─── Orchestration ───────────────────────────────────────────────────────────

/// Write every row of `record` and return the new product id.
///
/// Must run inside a transaction; on error the caller rolls back, so partial
/// progress is never visible.
pub fn create_product(
  conn: &Connection,
  record: CatalogRecord,
  policy: UnknownReferencePolicy,
) -> Result<i64> {
  // 1. Product.
  let product_id = insert_product(conn, &record.product)?;
  debug!(product_id, "inserted product");

  let attributes = find_definitions(conn, Vocabulary::Attribute, &record.attribute_ids())
    .map_err(|e| Error::statement("find attributes", e))?;
  let options = find_definitions(conn, Vocabulary::Option, &record.option_ids())
    .map_err(|e| Error::statement("find options", e))?;
  let resolved = record.resolve(&attributes, &options, policy)?;

  // 2. and 3. Attribute and option info rows.
  insert_assignments(conn, Vocabulary::Attribute, product_id, &resolved.attribute_assignments)?;
  insert_assignments(conn, Vocabulary::Option, product_id, &resolved.option_assignments)?;
  debug!(
    product_id,
    attributes = resolved.attribute_assignments.len(),
    options = resolved.option_assignments.len(),
    "inserted info rows"
  );

  // 4. Attribute vocabulary.
  upsert_values(conn, Vocabulary::Attribute, &resolved.attribute_values)?;

  // 5. SKUs, each followed by its inventory row.
  for sku in &resolved.skus {
    let sku_id = insert_sku(conn, product_id, sku)?;
    insert_inventory(conn, product_id, sku_id, sku)?;
  }
  debug!(product_id, skus = resolved.skus.len(), "inserted skus");

  // 6. Option axes, then option vocabulary.
  insert_combinations(conn, product_id, &resolved.option_combinations)?;
  upsert_values(conn, Vocabulary::Option, &resolved.option_values)?;
  debug!(product_id, axes = resolved.option_combinations.len(), "inserted option axes");

  Ok(product_id)
}

// ─── Steps ───────────────────────────────────────────────────────────────────

fn insert_product(conn: &Connection, product: &NewProduct) -> Result<i64> {
  let now = encode_dt(Utc::now());

  conn
    .execute(
      "INSERT INTO products (
         name, description, short_description, image_url, slug,
         base_price, sale_price, is_featured, sale_start_date, sale_end_date,
         status, brand_id, category_id, user_id, created_at, updated_at
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?15)",
      params![
        product.name,
        product.description,
        product.short_description,
        product.image_url,
        product.slug,
        encode_decimal(product.base_price),
        product.sale_price.map(encode_decimal),
        product.is_featured,
        product.sale_start_date.map(encode_dt),
        product.sale_end_date.map(encode_dt),
        encode_status(product.status),
        product.brand_id,
        product.category_id,
        product.user_id,
        now,
      ],
    )
    .map_err(|e| product_failure(conn, product, e))?;

  Ok(conn.last_insert_rowid())
}

fn insert_assignments(
  conn: &Connection,
  kind: Vocabulary,
  product_id: i64,
  rows: &[NewAssignment],
) -> Result<()> {
  let operation = kind.info_operation();
  let sql = format!("INSERT INTO {} (product_id, name, value) VALUES (?1, ?2, ?3)", kind.info());
  let mut stmt = conn.prepare(&sql).map_err(|e| Error::statement(operation, e))?;
  for row in rows {
    stmt
      .execute(params![product_id, row.name, row.value])
      .map_err(|e| Error::statement(operation, e))?;
  }
  Ok(())
}

/// Insert vocabulary entries that do not exist yet; existing ones are reused.
fn upsert_values(conn: &Connection, kind: Vocabulary, values: &[VocabularyValue]) -> Result<()> {
  let operation = kind.values_operation();
  let sql = format!(
    "INSERT INTO {table} ({key}, value) VALUES (?1, ?2) ON CONFLICT ({key}, value) DO NOTHING",
    table = kind.values(),
    key = kind.key(),
  );
  let mut stmt = conn.prepare(&sql).map_err(|e| Error::statement(operation, e))?;
  for entry in values {
    stmt.execute(params![entry.definition_id, entry.value]).map_err(|e| {
      match Violation::from_error(&e) {
        Some(Violation::ForeignKey) => Error::Core(kind.not_found(entry.definition_id)),
        _ => Error::statement(operation, e),
      }
    })?;
  }
  Ok(())
}

fn insert_sku(conn: &Connection, product_id: i64, sku: &NewSku) -> Result<i64> {
  conn
    .execute(
      "INSERT INTO skus (
         product_id, sku, sku_signature, extra_price,
         sale_type, sale_value, sale_start_date, sale_end_date, status
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
      params![
        product_id,
        sku.sku,
        sku.sku_signature,
        encode_decimal(sku.extra_price),
        sku.sale.sale_type.map(encode_sale_type),
        sku.sale.sale_value.map(encode_decimal),
        sku.sale.sale_start_date.map(encode_dt),
        sku.sale.sale_end_date.map(encode_dt),
        encode_status(sku.status),
      ],
    )
    .map_err(|e| {
      let classified = match Violation::from_error(&e) {
        Some(v) if v.is_unique("skus", "sku") || v.is_unique("skus", "sku_signature") => {
          Some(CoreError::SkuAlreadyExists(sku.sku.clone()))
        }
        Some(Violation::Check { constraint }) => match constraint.as_str() {
          "skus_sale_value_check" => {
            Some(CoreError::invalid_sku(&sku.sku, "sale_value must not be negative"))
          }
          "skus_status_check" => Some(CoreError::invalid_sku(&sku.sku, "unknown status")),
          _ => None,
        },
        _ => None,
      };
      classified.map_or_else(|| Error::statement("insert sku", e), Error::Core)
    })?;

  Ok(conn.last_insert_rowid())
}

fn insert_inventory(conn: &Connection, product_id: i64, sku_id: i64, sku: &NewSku) -> Result<()> {
  conn
    .execute(
      "INSERT INTO inventories (product_id, sku_id, available_stock) VALUES (?1, ?2, ?3)",
      params![product_id, sku_id, sku.stock],
    )
    .map_err(|e| match Violation::from_error(&e) {
      Some(Violation::Check { constraint }) if constraint == "inventories_stock_check" => {
        Error::Core(CoreError::invalid_sku(&sku.sku, "stock must not be negative"))
      }
      _ => Error::statement("insert inventory", e),
    })?;
  Ok(())
}

fn insert_combinations(
  conn: &Connection,
  product_id: i64,
  combinations: &[OptionCombination],
) -> Result<()> {
  let mut stmt = conn
    .prepare(
      "INSERT INTO option_combinations (product_id, option_id, display_order)
       VALUES (?1, ?2, ?3)",
    )
    .map_err(|e| Error::statement("insert option combinations", e))?;
  for combination in combinations {
    stmt
      .execute(params![product_id, combination.option_id, combination.display_order])
      .map_err(|e| match Violation::from_error(&e) {
        Some(Violation::ForeignKey) => {
          Error::Core(CoreError::OptionNotFound(combination.option_id))
        }
        _ => Error::statement("insert option combinations", e),
      })?;
  }
  Ok(())
}

// ─── Failure classification ──────────────────────────────────────────────────

fn product_failure(conn: &Connection, product: &NewProduct, err: rusqlite::Error) -> Error {
  let classified = match Violation::from_error(&err) {
    Some(v) if v.is_unique("products", "slug") => {
      Some(CoreError::ProductAlreadyExists(ProductKey::Slug(product.slug.clone())))
    }
    Some(v) if v.is_unique("products", "name") => {
      Some(CoreError::ProductAlreadyExists(ProductKey::Name(product.name.clone())))
    }
    Some(Violation::ForeignKey) => missing_reference(conn, product),
    Some(Violation::Check { constraint }) => match constraint.as_str() {
      "products_base_price_check" => {
        Some(CoreError::invalid_product("base_price", "must not be negative"))
      }
      "products_sale_price_check" => {
        Some(CoreError::invalid_product("sale_price", "must not be negative"))
      }
      "products_status_check" => Some(CoreError::invalid_product("status", "unknown status")),
      _ => None,
    },
    _ => None,
  };
  classified.map_or_else(|| Error::statement("insert product", err), Error::Core)
}

/// SQLite does not say which reference of a row failed, so look for the
/// absent one. `None` when every referenced row is present.
fn missing_reference(conn: &Connection, product: &NewProduct) -> Option<CoreError> {
  if !row_exists(conn, "categories", product.category_id) {
    Some(CoreError::CategoryNotFound(product.category_id))
  } else if !row_exists(conn, "brands", product.brand_id) {
    Some(CoreError::BrandNotFound(product.brand_id))
  } else if !row_exists(conn, "users", product.user_id) {
    Some(CoreError::UserNotFound(product.user_id))
  } else {
    None
  }
}

/// A failed probe counts as present, so the failure stays unclassified.
fn row_exists(conn: &Connection, table: &str, id: i64) -> bool {
  conn
    .query_row(&format!("SELECT 1 FROM {table} WHERE id = ?1"), [id], |_| Ok(()))
    .optional()
    .map_or(true, |row| row.is_some())
}
