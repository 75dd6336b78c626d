//! Variant generation — every purchasable combination of a product's option
//! axes.

use rust_decimal::Decimal;

use crate::{
  Error, Result,
  request::{AxisValues, CreateSkuRequest},
};

/// Joins the product name and chosen axis values into a SKU code.
pub const SKU_SEPARATOR: &str = "_";

/// Suffix of the SKU generated for products without any option axis.
pub const DEFAULT_SKU_SUFFIX: &str = "default";

/// Derives SKU requests from option axes.
#[derive(Debug, Clone, Copy)]
pub struct VariantGenerator {
  /// Opening stock of the single SKU generated when there are no axes.
  pub default_variant_stock: i32,
  /// Upper bound on the number of combinations one request may expand to.
  pub max_variants:          usize,
}

impl Default for VariantGenerator {
  fn default() -> Self { Self { default_variant_stock: 100, max_variants: 1000 } }
}

impl VariantGenerator {
  pub fn new(default_variant_stock: i32) -> Self {
    Self { default_variant_stock, ..Self::default() }
  }

  pub fn with_max_variants(self, max_variants: usize) -> Self { Self { max_variants, ..self } }

  /// Produce one SKU request per element of the Cartesian product of the
  /// non-empty axes, in ascending axis id order.
  ///
  /// Generated SKUs have zero extra price and zero stock. If every axis is
  /// empty (or there are none), a single `<name>_default` SKU is returned
  /// instead, stocked with [`Self::default_variant_stock`].
  ///
  /// Fails with [`Error::InvalidProductData`] on `option_values` when the
  /// axes would expand to more than [`Self::max_variants`] combinations.
  /// Nothing is built in that case.
  pub fn generate(
    &self,
    product_name: &str,
    axes: &AxisValues,
  ) -> Result<Vec<CreateSkuRequest>> {
    let axes: Vec<&Vec<String>> = axes.values().filter(|values| !values.is_empty()).collect();

    if axes.is_empty() {
      return Ok(vec![CreateSkuRequest::new(
        format!("{product_name}{SKU_SEPARATOR}{DEFAULT_SKU_SUFFIX}"),
        Decimal::ZERO,
        self.default_variant_stock,
      )]);
    }

    let count = axes.iter().try_fold(1_usize, |count, values| count.checked_mul(values.len()));
    match count {
      Some(count) if count <= self.max_variants => {}
      _ => {
        return Err(Error::invalid_product(
          "option_values",
          format!("more than {} combinations requested", self.max_variants),
        ));
      }
    }

    Ok(
      cartesian_product(&axes)
        .into_iter()
        .map(|combination| {
          CreateSkuRequest::new(sku_code(product_name, &combination), Decimal::ZERO, 0)
        })
        .collect(),
    )
  }
}

/// All combinations picking one value per axis. The first axis varies
/// slowest.
fn cartesian_product<'a>(axes: &[&'a Vec<String>]) -> Vec<Vec<&'a str>> {
  axes.iter().fold(vec![Vec::new()], |combinations, &values| {
    combinations
      .iter()
      .flat_map(|prefix| {
        values.iter().map(move |value| {
          let mut next = prefix.clone();
          next.push(value.as_str());
          next
        })
      })
      .collect()
  })
}

fn sku_code(product_name: &str, combination: &[&str]) -> String {
  std::iter::once(product_name.to_owned())
    .chain(combination.iter().map(|value| strip_whitespace(value)))
    .collect::<Vec<_>>()
    .join(SKU_SEPARATOR)
}

fn strip_whitespace(value: &str) -> String {
  value.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  fn axes(entries: &[(i64, &[&str])]) -> AxisValues {
    entries
      .iter()
      .map(|(id, values)| (*id, values.iter().map(|v| v.to_string()).collect()))
      .collect()
  }

  fn codes(skus: &[CreateSkuRequest]) -> Vec<&str> {
    skus.iter().map(|s| s.sku.as_str()).collect()
  }

  #[test]
  fn no_axes_yields_default_variant() {
    let generator = VariantGenerator::new(100);
    let skus = generator.generate("Mug", &AxisValues::new()).unwrap();
    assert_eq!(codes(&skus), vec!["Mug_default"]);
    assert_eq!(skus[0].stock, 100);
    assert_eq!(skus[0].extra_price, Decimal::ZERO);
  }

  #[test]
  fn all_empty_axes_yield_default_variant() {
    let skus = VariantGenerator::new(5).generate("Mug", &axes(&[(1, &[]), (2, &[])])).unwrap();
    assert_eq!(codes(&skus), vec!["Mug_default"]);
    assert_eq!(skus[0].stock, 5);
  }

  #[test]
  fn size_by_color() {
    let input = axes(&[(1, &["S", "M"]), (2, &["Red"])]);
    let skus = VariantGenerator::default().generate("Tee", &input).unwrap();
    assert_eq!(codes(&skus), vec!["Tee_S_Red", "Tee_M_Red"]);
    assert!(skus.iter().all(|s| s.stock == 0 && s.extra_price == Decimal::ZERO));
  }

  #[test]
  fn empty_axes_are_skipped() {
    let input = axes(&[(1, &["S"]), (2, &[]), (3, &["Blue"])]);
    let skus = VariantGenerator::default().generate("Tee", &input).unwrap();
    assert_eq!(codes(&skus), vec!["Tee_S_Blue"]);
  }

  #[test]
  fn values_lose_whitespace() {
    let input = axes(&[(4, &["Navy Blue", " X L "])]);
    let skus = VariantGenerator::default().generate("Tee", &input).unwrap();
    assert_eq!(codes(&skus), vec!["Tee_NavyBlue", "Tee_XL"]);
  }

  #[test]
  fn count_is_product_of_axis_sizes_and_codes_are_distinct() {
    let input = axes(&[
      (1, &["XS", "S", "M", "L"]),
      (2, &["Red", "Green", "Blue"]),
      (3, &["Cotton", "Linen"]),
    ]);
    let skus = VariantGenerator::default().generate("Shirt", &input).unwrap();
    assert_eq!(skus.len(), 4 * 3 * 2);

    let distinct: HashSet<&str> = codes(&skus).into_iter().collect();
    assert_eq!(distinct.len(), skus.len());
    assert!(skus.iter().all(|s| s.sku.split(SKU_SEPARATOR).count() == 4));
  }

  #[test]
  fn generation_is_deterministic() {
    let input = axes(&[(9, &["a", "b"]), (3, &["x", "y", "z"])]);
    let first = VariantGenerator::default().generate("P", &input).unwrap();
    let second = VariantGenerator::default().generate("P", &input).unwrap();
    assert_eq!(first, second);
    assert_eq!(first[0].sku, "P_x_a");
  }

  #[test]
  fn too_many_combinations_are_rejected() {
    let input = axes(&[(1, &["XS", "S", "M", "L"]), (2, &["Red", "Green", "Blue"])]);
    let generator = VariantGenerator::default().with_max_variants(11);

    let err = generator.generate("Shirt", &input).unwrap_err();
    assert!(matches!(err, Error::InvalidProductData { ref field, .. } if field == "option_values"));

    let skus = generator.with_max_variants(12).generate("Shirt", &input).unwrap();
    assert_eq!(skus.len(), 12);
  }

  #[test]
  fn combination_count_overflow_is_rejected() {
    let values: Vec<String> = (0..1 << 16).map(|i| i.to_string()).collect();
    let input: AxisValues = (1..=5).map(|id| (id, values.clone())).collect();
    let generator = VariantGenerator::default().with_max_variants(usize::MAX);

    let err = generator.generate("Shirt", &input).unwrap_err();
    assert!(matches!(err, Error::InvalidProductData { .. }));
  }
}
