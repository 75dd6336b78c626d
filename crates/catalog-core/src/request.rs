//! Inbound creation requests.
//!
//! Attribute and option maps are keyed by definition id and ordered by it,
//! so every pass over them (SKU generation, display order) is reproducible.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  pricing::{effective_price, sale_price},
  product::ProductStatus,
  sku::SaleDescriptor,
};

/// Definition id → the values chosen for it, in caller order.
pub type AxisValues = BTreeMap<i64, Vec<String>>;

// ─── SKU request ─────────────────────────────────────────────────────────────

/// One explicitly requested SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSkuRequest {
  pub sku:         String,
  /// Fractional delta over the product's base price.
  #[serde(default)]
  pub extra_price: Decimal,
  #[serde(default)]
  pub stock:       i32,
  #[serde(default)]
  pub sale:        Option<SaleDescriptor>,
}

impl CreateSkuRequest {
  pub fn new(sku: impl Into<String>, extra_price: Decimal, stock: i32) -> Self {
    Self { sku: sku.into(), extra_price, stock, sale: None }
  }

  /// Every price shown for this SKU must be computable once it is stored.
  fn check_prices(&self, base_price: Decimal) -> Result<()> {
    let sale = self.sale.clone().unwrap_or_default();
    effective_price(base_price, self.extra_price)
      .and_then(|price| sale_price(price, sale.sale_type, sale.sale_value))
      .map(drop)
      .map_err(|e| Error::invalid_sku(&self.sku, e.to_string()))
  }
}

// ─── Product requests ────────────────────────────────────────────────────────

/// Full creation request with an explicit SKU list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
  pub name:               String,
  #[serde(default)]
  pub description:        String,
  #[serde(default)]
  pub short_description:  String,
  pub image_url:          String,
  pub slug:               String,
  pub base_price:         Decimal,
  pub sale_price:         Option<Decimal>,
  #[serde(default)]
  pub is_featured:        bool,
  pub sale_start_date:    Option<DateTime<Utc>>,
  pub sale_end_date:      Option<DateTime<Utc>>,
  pub status:             ProductStatus,
  pub brand_id:           i64,
  pub category_id:        i64,
  pub user_id:            i64,
  #[serde(default)]
  pub product_attributes: AxisValues,
  pub product_skus:       Vec<CreateSkuRequest>,
  #[serde(default)]
  pub option_values:      AxisValues,
}

impl CreateProductRequest {
  /// Reject requests the store would accept but the catalog must not.
  pub fn validate(&self) -> Result<()> {
    for (field, value) in [
      ("name", &self.name),
      ("slug", &self.slug),
      ("image_url", &self.image_url),
    ] {
      if value.trim().is_empty() {
        return Err(Error::invalid_product(field, "must not be blank"));
      }
    }

    if self.product_skus.is_empty() {
      return Err(Error::invalid_product("product_skus", "at least one sku is required"));
    }

    for sku in &self.product_skus {
      if sku.sku.trim().is_empty() {
        return Err(Error::invalid_sku(&sku.sku, "sku code must not be blank"));
      }
      if sku.stock < 0 {
        return Err(Error::invalid_sku(&sku.sku, "stock must not be negative"));
      }
      sku.check_prices(self.base_price)?;
    }

    Ok(())
  }
}

/// Creation request whose SKUs are derived from `option_values`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductWithoutSkuRequest {
  pub name:               String,
  #[serde(default)]
  pub description:        String,
  #[serde(default)]
  pub short_description:  String,
  pub image_url:          String,
  pub slug:               String,
  pub base_price:         Decimal,
  pub sale_price:         Option<Decimal>,
  #[serde(default)]
  pub is_featured:        bool,
  pub sale_start_date:    Option<DateTime<Utc>>,
  pub sale_end_date:      Option<DateTime<Utc>>,
  pub brand_id:           i64,
  pub category_id:        i64,
  pub user_id:            i64,
  #[serde(default)]
  pub product_attributes: AxisValues,
  #[serde(default)]
  pub option_values:      AxisValues,
}

impl CreateProductWithoutSkuRequest {
  /// Promote to a full request. Products created this way are always
  /// `ACTIVE`.
  pub fn with_skus(self, product_skus: Vec<CreateSkuRequest>) -> CreateProductRequest {
    CreateProductRequest {
      name: self.name,
      description: self.description,
      short_description: self.short_description,
      image_url: self.image_url,
      slug: self.slug,
      base_price: self.base_price,
      sale_price: self.sale_price,
      is_featured: self.is_featured,
      sale_start_date: self.sale_start_date,
      sale_end_date: self.sale_end_date,
      status: ProductStatus::Active,
      brand_id: self.brand_id,
      category_id: self.category_id,
      user_id: self.user_id,
      product_attributes: self.product_attributes,
      product_skus,
      option_values: self.option_values,
    }
  }
}

#[cfg(test)]
mod tests {
  use rust_decimal_macros::dec;

  use super::*;

  fn request() -> CreateProductRequest {
    CreateProductRequest {
      name:               "Basic Tee".into(),
      description:        String::new(),
      short_description:  String::new(),
      image_url:          "https://img.example/tee.png".into(),
      slug:               "basic-tee".into(),
      base_price:         dec!(100),
      sale_price:         None,
      is_featured:        false,
      sale_start_date:    None,
      sale_end_date:      None,
      status:             ProductStatus::Active,
      brand_id:           1,
      category_id:        1,
      user_id:            1,
      product_attributes: AxisValues::new(),
      product_skus:       vec![CreateSkuRequest::new("tee-s", dec!(0), 3)],
      option_values:      AxisValues::new(),
    }
  }

  #[test]
  fn valid_request_passes() {
    request().validate().unwrap();
  }

  #[test]
  fn blank_slug_is_invalid_product_data() {
    let mut req = request();
    req.slug = "  ".into();
    let err = req.validate().unwrap_err();
    assert!(matches!(err, Error::InvalidProductData { ref field, .. } if field == "slug"));
  }

  #[test]
  fn negative_stock_is_invalid_sku_data() {
    let mut req = request();
    req.product_skus[0].stock = -1;
    let err = req.validate().unwrap_err();
    assert!(matches!(err, Error::InvalidSkuData { ref sku, .. } if sku == "tee-s"));
  }

  #[test]
  fn unpriceable_sku_is_invalid_sku_data() {
    let mut req = request();
    req.base_price = Decimal::MAX;
    req.product_skus[0].extra_price = dec!(1);
    let err = req.validate().unwrap_err();
    assert!(matches!(err, Error::InvalidSkuData { ref sku, .. } if sku == "tee-s"));

    let mut req = request();
    req.product_skus[0].sale = Some(SaleDescriptor {
      sale_type: Some(crate::sku::SaleType::Percentage),
      sale_value: Some(Decimal::MAX),
      ..SaleDescriptor::default()
    });
    assert!(matches!(req.validate().unwrap_err(), Error::InvalidSkuData { .. }));
  }

  #[test]
  fn empty_sku_list_is_invalid_product_data() {
    let mut req = request();
    req.product_skus.clear();
    let err = req.validate().unwrap_err();
    assert!(matches!(err, Error::InvalidProductData { ref field, .. } if field == "product_skus"));
  }

  #[test]
  fn axis_keys_deserialize_from_json_object() {
    let json = r#"{
      "name": "Basic Tee", "image_url": "x", "slug": "basic-tee",
      "base_price": 100, "brand_id": 1, "category_id": 2, "user_id": 3,
      "option_values": { "7": ["Red"], "2": ["S", "M"] }
    }"#;
    let req: CreateProductWithoutSkuRequest = serde_json::from_str(json).unwrap();
    let ids: Vec<i64> = req.option_values.keys().copied().collect();
    assert_eq!(ids, vec![2, 7]);
    assert!(req.product_attributes.is_empty());
  }

  #[test]
  fn promotion_forces_active_status() {
    let json = r#"{
      "name": "Mug", "image_url": "x", "slug": "mug",
      "base_price": "12.50", "brand_id": 1, "category_id": 1, "user_id": 1
    }"#;
    let req: CreateProductWithoutSkuRequest = serde_json::from_str(json).unwrap();
    let full = req.with_skus(vec![CreateSkuRequest::new("Mug_default", dec!(0), 100)]);
    assert_eq!(full.status, ProductStatus::Active);
    assert_eq!(full.base_price, dec!(12.50));
    assert_eq!(full.product_skus.len(), 1);
  }
}
