//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings. Money is the decimal's canonical string
//! form, never a float. Enumerations use their SCREAMING_SNAKE_CASE names.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use catalog_core::{
  product::{Product, ProductStatus},
  sku::{Inventory, SaleDescriptor, SaleType, Sku, SkuWithInventory},
};

use crate::{Error, Result};

// ─── Decimal ─────────────────────────────────────────────────────────────────

pub fn encode_decimal(d: Decimal) -> String { d.to_string() }

pub fn decode_decimal(s: &str) -> Result<Decimal> { Ok(s.parse::<Decimal>()?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── Enumerations ────────────────────────────────────────────────────────────

pub fn encode_status(status: ProductStatus) -> &'static str { status.into() }

pub fn decode_status(s: &str) -> Result<ProductStatus> {
  s.parse().map_err(|_| Error::UnknownValue { column: "status", value: s.to_owned() })
}

pub fn encode_sale_type(t: SaleType) -> &'static str { t.into() }

/// Sale types this build does not know yield no sale price, so they decode to
/// `None` rather than failing the read.
pub fn decode_sale_type(s: Option<&str>) -> Option<SaleType> { s.and_then(|s| s.parse().ok()) }

// ─── Row types ───────────────────────────────────────────────────────────────

pub const PRODUCT_COLUMNS: &str = "id, name, description, short_description, image_url, slug, \
                                   base_price, sale_price, is_featured, sale_start_date, \
                                   sale_end_date, status, brand_id, category_id, user_id, \
                                   version, created_at, updated_at";

/// Raw values read directly from a `products` row.
pub struct RawProduct {
  pub id:                i64,
  pub name:              String,
  pub description:       String,
  pub short_description: String,
  pub image_url:         String,
  pub slug:              String,
  pub base_price:        String,
  pub sale_price:        Option<String>,
  pub is_featured:       bool,
  pub sale_start_date:   Option<String>,
  pub sale_end_date:     Option<String>,
  pub status:            String,
  pub brand_id:          i64,
  pub category_id:       i64,
  pub user_id:           i64,
  pub version:           i32,
  pub created_at:        String,
  pub updated_at:        String,
}

impl RawProduct {
  /// Read a row selected with [`PRODUCT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      name:              row.get(1)?,
      description:       row.get(2)?,
      short_description: row.get(3)?,
      image_url:         row.get(4)?,
      slug:              row.get(5)?,
      base_price:        row.get(6)?,
      sale_price:        row.get(7)?,
      is_featured:       row.get(8)?,
      sale_start_date:   row.get(9)?,
      sale_end_date:     row.get(10)?,
      status:            row.get(11)?,
      brand_id:          row.get(12)?,
      category_id:       row.get(13)?,
      user_id:           row.get(14)?,
      version:           row.get(15)?,
      created_at:        row.get(16)?,
      updated_at:        row.get(17)?,
    })
  }

  pub fn into_product(self) -> Result<Product> {
    Ok(Product {
      id:                self.id,
      name:              self.name,
      description:       self.description,
      short_description: self.short_description,
      image_url:         self.image_url,
      slug:              self.slug,
      base_price:        decode_decimal(&self.base_price)?,
      sale_price:        self.sale_price.as_deref().map(decode_decimal).transpose()?,
      is_featured:       self.is_featured,
      sale_start_date:   decode_opt_dt(self.sale_start_date)?,
      sale_end_date:     decode_opt_dt(self.sale_end_date)?,
      status:            decode_status(&self.status)?,
      brand_id:          self.brand_id,
      category_id:       self.category_id,
      user_id:           self.user_id,
      version:           self.version,
      created_at:        decode_dt(&self.created_at)?,
      updated_at:        decode_dt(&self.updated_at)?,
    })
  }
}

/// Select list for a `skus s JOIN inventories i` query.
pub const SKU_COLUMNS: &str = "s.id, s.product_id, s.sku, s.sku_signature, s.extra_price, \
                               s.sale_type, s.sale_value, s.sale_start_date, s.sale_end_date, \
                               s.status, s.version, i.id, i.available_stock, i.reserved_stock, \
                               i.damaged_stock, i.version";

/// Raw values of a SKU row joined with its inventory row.
pub struct RawSku {
  pub id:                i64,
  pub product_id:        i64,
  pub sku:               String,
  pub sku_signature:     String,
  pub extra_price:       String,
  pub sale_type:         Option<String>,
  pub sale_value:        Option<String>,
  pub sale_start_date:   Option<String>,
  pub sale_end_date:     Option<String>,
  pub status:            String,
  pub version:           i32,
  pub inventory_id:      i64,
  pub available_stock:   i32,
  pub reserved_stock:    i32,
  pub damaged_stock:     i32,
  pub inventory_version: i32,
}

impl RawSku {
  /// Read a row selected with [`SKU_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      product_id:        row.get(1)?,
      sku:               row.get(2)?,
      sku_signature:     row.get(3)?,
      extra_price:       row.get(4)?,
      sale_type:         row.get(5)?,
      sale_value:        row.get(6)?,
      sale_start_date:   row.get(7)?,
      sale_end_date:     row.get(8)?,
      status:            row.get(9)?,
      version:           row.get(10)?,
      inventory_id:      row.get(11)?,
      available_stock:   row.get(12)?,
      reserved_stock:    row.get(13)?,
      damaged_stock:     row.get(14)?,
      inventory_version: row.get(15)?,
    })
  }

  pub fn into_sku(self) -> Result<SkuWithInventory> {
    let sale = SaleDescriptor {
      sale_type:       decode_sale_type(self.sale_type.as_deref()),
      sale_value:      self.sale_value.as_deref().map(decode_decimal).transpose()?,
      sale_start_date: decode_opt_dt(self.sale_start_date)?,
      sale_end_date:   decode_opt_dt(self.sale_end_date)?,
    };

    Ok(SkuWithInventory {
      sku:       Sku {
        id: self.id,
        product_id: self.product_id,
        sku: self.sku,
        sku_signature: self.sku_signature,
        extra_price: decode_decimal(&self.extra_price)?,
        sale,
        status: decode_status(&self.status)?,
        version: self.version,
      },
      inventory: Inventory {
        id:              self.inventory_id,
        product_id:      self.product_id,
        sku_id:          self.id,
        available_stock: self.available_stock,
        reserved_stock:  self.reserved_stock,
        damaged_stock:   self.damaged_stock,
        version:         self.inventory_version,
      },
    })
  }
}

#[cfg(test)]
mod tests {
  use rust_decimal_macros::dec;

  use super::*;

  #[test]
  fn decimals_keep_their_scale() {
    assert_eq!(encode_decimal(dec!(19.90)), "19.90");
    assert_eq!(decode_decimal("19.90").unwrap(), dec!(19.9));
  }

  #[test]
  fn status_names_are_screaming_snake_case() {
    assert_eq!(encode_status(ProductStatus::OutOfStock), "OUT_OF_STOCK");
    assert_eq!(decode_status("DISCONTINUED").unwrap(), ProductStatus::Discontinued);
    assert!(matches!(decode_status("GONE"), Err(Error::UnknownValue { column: "status", .. })));
  }

  #[test]
  fn unknown_sale_type_reads_as_none() {
    assert_eq!(decode_sale_type(Some("PERCENTAGE")), Some(SaleType::Percentage));
    assert_eq!(decode_sale_type(Some("BOGO")), None);
    assert_eq!(decode_sale_type(None), None);
  }
}
