//! The product detail view — never stored, always assembled on read.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  pricing::{Overflow, effective_price, sale_price},
  product::{Product, ProductStatus},
  sku::{SaleType, SkuWithInventory},
  vocabulary::Assignment,
};

/// All values recorded for one attribute or option name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentGroup {
  pub name:   String,
  pub values: Vec<String>,
}

/// A SKU as buyers see it: prices computed, stock attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantView {
  pub id:              i64,
  pub sku:             String,
  pub sku_signature:   String,
  pub price:           Decimal,
  pub sale_type:       Option<SaleType>,
  pub sale_price:      Option<Decimal>,
  pub sale_start_date: Option<DateTime<Utc>>,
  pub sale_end_date:   Option<DateTime<Utc>>,
  /// Units available for sale.
  pub stock:           i32,
  pub status:          ProductStatus,
  pub product_id:      i64,
}

impl VariantView {
  /// Price `row` against its product's base price. Fails with
  /// [`Error::InvalidSkuData`] when a derived price is not representable.
  pub fn new(base_price: Decimal, row: &SkuWithInventory) -> Result<Self> {
    let sku = &row.sku;
    let out_of_range = |e: Overflow| Error::invalid_sku(&sku.sku, e.to_string());
    let price = effective_price(base_price, sku.extra_price).map_err(out_of_range)?;
    let sale_price =
      sale_price(price, sku.sale.sale_type, sku.sale.sale_value).map_err(out_of_range)?;

    Ok(Self {
      id: sku.id,
      sku: sku.sku.clone(),
      sku_signature: sku.sku_signature.clone(),
      price,
      sale_type: sku.sale.sale_type,
      sale_price,
      sale_start_date: sku.sale.sale_start_date,
      sale_end_date: sku.sale.sale_end_date,
      stock: row.inventory.available_stock,
      status: sku.status,
      product_id: sku.product_id,
    })
  }
}

/// The read model returned after creation and by detail lookups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDetail {
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
  pub version:           i32,
  pub attribute_values:  Vec<AssignmentGroup>,
  pub option_values:     Vec<AssignmentGroup>,
  pub product_skus:      Vec<VariantView>,
}

impl ProductDetail {
  /// Compose the detail view of `product`.
  ///
  /// Fails with [`Error::NoVariants`] when `skus` is empty: a product without
  /// a purchasable variant was never fully created.
  pub fn assemble(
    product: Product,
    attributes: Vec<Assignment>,
    options: Vec<Assignment>,
    skus: Vec<SkuWithInventory>,
  ) -> Result<Self> {
    if skus.is_empty() {
      return Err(Error::NoVariants(product.id));
    }

    let product_skus = skus
      .iter()
      .map(|row| VariantView::new(product.base_price, row))
      .collect::<Result<Vec<_>>>()?;

    Ok(Self {
      id: product.id,
      name: product.name,
      description: product.description,
      short_description: product.short_description,
      image_url: product.image_url,
      slug: product.slug,
      base_price: product.base_price,
      sale_price: product.sale_price,
      is_featured: product.is_featured,
      sale_start_date: product.sale_start_date,
      sale_end_date: product.sale_end_date,
      status: product.status,
      brand_id: product.brand_id,
      category_id: product.category_id,
      user_id: product.user_id,
      version: product.version,
      attribute_values: group(attributes),
      option_values: group(options),
      product_skus,
    })
  }
}

/// Group rows by name, keeping the order in which names first appear.
fn group(rows: Vec<Assignment>) -> Vec<AssignmentGroup> {
  let mut groups: Vec<AssignmentGroup> = Vec::new();
  for row in rows {
    match groups.iter_mut().find(|g| g.name == row.name) {
      Some(existing) => existing.values.push(row.value),
      None => groups.push(AssignmentGroup { name: row.name, values: vec![row.value] }),
    }
  }
  groups
}
