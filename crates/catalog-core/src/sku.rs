//! SKUs (purchasable variants) and their inventory rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::product::ProductStatus;

// ─── Sale descriptor ─────────────────────────────────────────────────────────

/// How a SKU's `sale_value` is applied to its effective price.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleType {
  /// `sale_value` is a fraction of the price, e.g. `0.20` for 20% off.
  Percentage,
  /// `sale_value` is an absolute amount subtracted from the price.
  Fixed,
}

/// Optional per-SKU discount. The window is carried verbatim; nothing in this
/// crate decides whether a sale is currently running.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaleDescriptor {
  pub sale_type:       Option<SaleType>,
  pub sale_value:      Option<Decimal>,
  pub sale_start_date: Option<DateTime<Utc>>,
  pub sale_end_date:   Option<DateTime<Utc>>,
}

// ─── SKU ─────────────────────────────────────────────────────────────────────

/// A persisted SKU row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sku {
  pub id:            i64,
  pub product_id:    i64,
  pub sku:           String,
  pub sku_signature: String,
  /// Fractional delta over the product's base price (`0.10` = +10%).
  pub extra_price:   Decimal,
  pub sale:          SaleDescriptor,
  pub status:        ProductStatus,
  pub version:       i32,
}

/// A SKU about to be written, together with its opening stock.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSku {
  pub sku:           String,
  pub sku_signature: String,
  pub extra_price:   Decimal,
  pub sale:          SaleDescriptor,
  pub status:        ProductStatus,
  pub stock:         i32,
}

/// Derive the catalog-wide unique signature of a SKU.
///
/// The signature is the lowercased `"<product name>-<sku>"` with every run of
/// whitespace collapsed into a single `-`.
pub fn sku_signature(product_name: &str, sku: &str) -> String {
  format!("{product_name}-{sku}")
    .to_lowercase()
    .split_whitespace()
    .collect::<Vec<_>>()
    .join("-")
}

// ─── Inventory ───────────────────────────────────────────────────────────────

/// Stock counters for exactly one SKU.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
  pub id:              i64,
  pub product_id:      i64,
  pub sku_id:          i64,
  pub available_stock: i32,
  pub reserved_stock:  i32,
  pub damaged_stock:   i32,
  pub version:         i32,
}

impl Inventory {
  /// Total units on hand; derived, never stored.
  pub fn total_stock(&self) -> i32 {
    self.available_stock + self.reserved_stock + self.damaged_stock
  }
}

/// A SKU joined with its inventory row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuWithInventory {
  pub sku:       Sku,
  pub inventory: Inventory,
}
