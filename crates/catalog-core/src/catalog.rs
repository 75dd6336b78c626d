//! The catalog service: the creation pipeline and the reads that back it.

use serde::Deserialize;
use tracing::{info, warn};

use crate::{
  Error, Result,
  detail::{ProductDetail, VariantView},
  mapper::CatalogRecord,
  product::Product,
  request::{CreateProductRequest, CreateProductWithoutSkuRequest},
  store::CatalogStore,
  variant::VariantGenerator,
  vocabulary::UnknownReferencePolicy,
};

/// Tunables of the creation pipeline.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
  /// Stock given to the single SKU of a product created without options.
  pub default_variant_stock:  i32,
  /// Most SKUs a single option-driven creation may generate.
  pub max_generated_variants: usize,
  pub unknown_references:     UnknownReferencePolicy,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    let generator = VariantGenerator::default();
    Self {
      default_variant_stock:  generator.default_variant_stock,
      max_generated_variants: generator.max_variants,
      unknown_references:     UnknownReferencePolicy::default(),
    }
  }
}

/// Product creation and lookup over any [`CatalogStore`].
pub struct Catalog<S> {
  store:     S,
  generator: VariantGenerator,
  policy:    UnknownReferencePolicy,
}

impl<S: CatalogStore> Catalog<S> {
  pub fn new(store: S, config: CatalogConfig) -> Self {
    Self {
      store,
      generator: VariantGenerator::new(config.default_variant_stock)
        .with_max_variants(config.max_generated_variants),
      policy: config.unknown_references,
    }
  }

  pub fn store(&self) -> &S { &self.store }

  /// Create a product from a request with an explicit SKU list and return
  /// its detail view.
  pub async fn create_product(&self, request: CreateProductRequest) -> Result<ProductDetail> {
    info!(name = %request.name, slug = %request.slug, "creating product");
    request.validate()?;

    let record = CatalogRecord::from_request(request);
    let id = self.store.create_product(record, self.policy).await.map_err(|e| {
      let err: Error = e.into();
      warn!(error = %err, "product creation failed");
      err
    })?;

    info!(product_id = id, "product created");
    self.product_detail(id).await
  }

  /// Create a product whose SKUs are every combination of its option values.
  pub async fn create_product_without_skus(
    &self,
    request: CreateProductWithoutSkuRequest,
  ) -> Result<ProductDetail> {
    let skus = self.generator.generate(&request.name, &request.option_values)?;
    info!(name = %request.name, generated = skus.len(), "generated skus from options");
    self.create_product(request.with_skus(skus)).await
  }

  pub async fn product(&self, id: i64) -> Result<Product> {
    self
      .store
      .find_product(id)
      .await
      .map_err(Into::into)?
      .ok_or(Error::ProductNotFound(id))
  }

  pub async fn product_detail(&self, id: i64) -> Result<ProductDetail> {
    let product = self.product(id).await?;
    let attributes = self.store.attribute_assignments(id).await.map_err(Into::into)?;
    let options = self.store.option_assignments(id).await.map_err(Into::into)?;
    let skus = self.store.skus_with_inventory(id).await.map_err(Into::into)?;

    ProductDetail::assemble(product, attributes, options, skus)
  }

  /// A single SKU priced against its product.
  pub async fn sku(&self, id: i64) -> Result<VariantView> {
    let row = self.store.find_sku(id).await.map_err(Into::into)?.ok_or(Error::SkuNotFound(id))?;
    let product = self.product(row.sku.product_id).await?;
    VariantView::new(product.base_price, &row)
  }

  pub async fn delete_product(&self, id: i64) -> Result<()> {
    if !self.store.delete_product(id).await.map_err(Into::into)? {
      return Err(Error::ProductNotFound(id));
    }
    info!(product_id = id, "product deleted");
    Ok(())
  }
}
