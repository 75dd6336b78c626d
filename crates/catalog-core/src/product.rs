//! Product — the base catalog record every other entity hangs off.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Lifecycle status shared by products and their SKUs.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
  /// Available for purchase.
  #[default]
  Active,
  /// Temporarily disabled.
  Inactive,
  OutOfStock,
  /// No longer sold.
  Discontinued,
}

/// A persisted product row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
  pub id:                i64,
  pub name:              String,
  pub description:       String,
  pub short_description: String,
  pub image_url:         String,
  pub slug:              String,
  pub base_price:        Decimal,
  pub sale_price:        Option<Decimal>,
  pub is_featured:       bool,
  pub sale_start_date:   Option<DateTime<Utc>>,
  pub sale_end_date:     Option<DateTime<Utc>>,
  pub status:            ProductStatus,
  pub brand_id:          i64,
  pub category_id:       i64,
  pub user_id:           i64,
  /// Optimistic-concurrency counter; starts at 1.
  pub version:           i32,
  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
}

/// A product that has not been written yet. The id, version and timestamps
/// are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewProduct {
  pub name:              String,
  pub description:       String,
  pub short_description: String,
  pub image_url:         String,
  pub slug:              String,
  pub base_price:        Decimal,
  pub sale_price:        Option<Decimal>,
  pub is_featured:       bool,
  pub sale_start_date:   Option<DateTime<Utc>>,
  pub sale_end_date:     Option<DateTime<Utc>>,
  pub status:            ProductStatus,
  pub brand_id:          i64,
  pub category_id:       i64,
  pub user_id:           i64,
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn status_text_matches_wire_form() {
    assert_eq!(<&str>::from(ProductStatus::OutOfStock), "OUT_OF_STOCK");
    assert_eq!(ProductStatus::from_str("DISCONTINUED").unwrap(), ProductStatus::Discontinued);
    assert!(ProductStatus::from_str("archived").is_err());

    let json = serde_json::to_string(&ProductStatus::Active).unwrap();
    assert_eq!(json, "\"ACTIVE\"");
  }
}
