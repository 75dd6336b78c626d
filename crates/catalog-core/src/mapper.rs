//! Mapping a creation request onto the rows that represent it.
//!
//! Mapping happens in two stages. [`CatalogRecord::from_request`] is pure and
//! needs nothing from the store. [`CatalogRecord::resolve`] runs inside the
//! write transaction once attribute and option names have been looked up, and
//! produces the [`ResolvedRecord`] that is actually persisted.

use std::collections::{HashMap, HashSet};

use crate::{
  Error, Result,
  product::{NewProduct, ProductStatus},
  request::{AxisValues, CreateProductRequest},
  sku::{NewSku, sku_signature},
  vocabulary::{
    Definition, NewAssignment, OptionCombination, UnknownReferencePolicy, VocabularyValue,
  },
};

// ─── Stage one ───────────────────────────────────────────────────────────────

/// Everything a creation request turns into, before name resolution.
#[derive(Debug, Clone)]
pub struct CatalogRecord {
  pub product:             NewProduct,
  /// Attribute id → values, still unresolved.
  pub attributes:          AxisValues,
  /// Option id → values, still unresolved.
  pub options:             AxisValues,
  pub attribute_values:    Vec<VocabularyValue>,
  pub skus:                Vec<NewSku>,
  pub option_combinations: Vec<OptionCombination>,
  pub option_values:       Vec<VocabularyValue>,
}

impl CatalogRecord {
  pub fn from_request(request: CreateProductRequest) -> Self {
    let product = NewProduct {
      name:              request.name,
      description:       request.description,
      short_description: request.short_description,
      image_url:         request.image_url,
      slug:              request.slug,
      base_price:        request.base_price,
      sale_price:        request.sale_price,
      is_featured:       request.is_featured,
      sale_start_date:   request.sale_start_date,
      sale_end_date:     request.sale_end_date,
      status:            request.status,
      brand_id:          request.brand_id,
      category_id:       request.category_id,
      user_id:           request.user_id,
    };

    let skus = request
      .product_skus
      .into_iter()
      .map(|sku| NewSku {
        sku_signature: sku_signature(&product.name, &sku.sku),
        sku:           sku.sku,
        extra_price:   sku.extra_price,
        sale:          sku.sale.unwrap_or_default(),
        status:        ProductStatus::Active,
        stock:         sku.stock,
      })
      .collect();

    Self {
      attribute_values: distinct_values(&request.product_attributes),
      option_values: distinct_values(&request.option_values),
      option_combinations: combinations(&request.option_values),
      attributes: request.product_attributes,
      options: request.option_values,
      product,
      skus,
    }
  }

  pub fn attribute_ids(&self) -> Vec<i64> { self.attributes.keys().copied().collect() }

  pub fn option_ids(&self) -> Vec<i64> { self.options.keys().copied().collect() }

  /// Attach definition names and apply `policy` to ids without a definition.
  pub fn resolve(
    self,
    attributes: &[Definition],
    options: &[Definition],
    policy: UnknownReferencePolicy,
  ) -> Result<ResolvedRecord> {
    let attribute_names = names_by_id(attributes);
    let option_names = names_by_id(options);

    if policy == UnknownReferencePolicy::Reject {
      if let Some(id) = first_unknown(&self.attributes, &attribute_names) {
        return Err(Error::AttributeNotFound(id));
      }
      if let Some(id) = first_unknown(&self.options, &option_names) {
        return Err(Error::OptionNotFound(id));
      }
    }

    let option_combinations = self
      .option_combinations
      .into_iter()
      .filter(|c| option_names.contains_key(&c.option_id))
      .zip(1..)
      .map(|(c, display_order)| OptionCombination { option_id: c.option_id, display_order })
      .collect();

    Ok(ResolvedRecord {
      attribute_assignments: assignments(&self.attributes, &attribute_names),
      option_assignments: assignments(&self.options, &option_names),
      attribute_values: self
        .attribute_values
        .into_iter()
        .filter(|v| attribute_names.contains_key(&v.definition_id))
        .collect(),
      option_values: self
        .option_values
        .into_iter()
        .filter(|v| option_names.contains_key(&v.definition_id))
        .collect(),
      product: self.product,
      skus: self.skus,
      option_combinations,
    })
  }
}

// ─── Stage two ───────────────────────────────────────────────────────────────

/// The exact set of rows written for one product.
#[derive(Debug, Clone)]
pub struct ResolvedRecord {
  pub product:               NewProduct,
  pub attribute_assignments: Vec<NewAssignment>,
  pub option_assignments:    Vec<NewAssignment>,
  pub attribute_values:      Vec<VocabularyValue>,
  pub skus:                  Vec<NewSku>,
  pub option_combinations:   Vec<OptionCombination>,
  pub option_values:         Vec<VocabularyValue>,
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn names_by_id(definitions: &[Definition]) -> HashMap<i64, &str> {
  definitions.iter().map(|d| (d.id, d.name.as_str())).collect()
}

fn first_unknown(axes: &AxisValues, names: &HashMap<i64, &str>) -> Option<i64> {
  axes.keys().copied().find(|id| !names.contains_key(id))
}

fn assignments(axes: &AxisValues, names: &HashMap<i64, &str>) -> Vec<NewAssignment> {
  axes
    .iter()
    .filter_map(|(id, values)| names.get(id).map(|name| (*name, values)))
    .flat_map(|(name, values)| {
      values.iter().map(move |value| NewAssignment { name: name.to_owned(), value: value.clone() })
    })
    .collect()
}

/// One entry per distinct `(id, value)` pair, in first-seen order.
fn distinct_values(axes: &AxisValues) -> Vec<VocabularyValue> {
  let mut seen = HashSet::new();
  axes
    .iter()
    .flat_map(|(id, values)| {
      values.iter().map(|value| VocabularyValue { definition_id: *id, value: value.clone() })
    })
    .filter(|v| seen.insert(v.clone()))
    .collect()
}

/// One combination per axis that offers at least one value.
fn combinations(axes: &AxisValues) -> Vec<OptionCombination> {
  axes
    .iter()
    .filter(|(_, values)| !values.is_empty())
    .zip(1..)
    .map(|((id, _), display_order)| OptionCombination { option_id: *id, display_order })
    .collect()
}

#[cfg(test)]
mod tests {
  use rust_decimal_macros::dec;

  use super::*;
  use crate::request::CreateSkuRequest;

  fn values(items: &[&str]) -> Vec<String> { items.iter().map(|s| s.to_string()).collect() }

  fn request() -> CreateProductRequest {
    CreateProductRequest {
      name:               "Basic Tee".into(),
      description:        "Soft".into(),
      short_description:  "Tee".into(),
      image_url:          "https://img.example/tee.png".into(),
      slug:               "basic-tee".into(),
      base_price:         dec!(20),
      sale_price:         None,
      is_featured:        true,
      sale_start_date:    None,
      sale_end_date:      None,
      status:             ProductStatus::Inactive,
      brand_id:           1,
      category_id:        2,
      user_id:            3,
      product_attributes: AxisValues::from([
        (10, values(&["Cotton", "Cotton"])),
        (11, values(&["Crew"])),
      ]),
      product_skus:       vec![
        CreateSkuRequest::new("Basic Tee_S", dec!(0), 4),
        CreateSkuRequest::new("Basic Tee_M", dec!(0.1), 2),
      ],
      option_values:      AxisValues::from([
        (1, values(&["S", "M"])),
        (2, Vec::new()),
        (3, values(&["White"])),
      ]),
    }
  }

  fn definitions(entries: &[(i64, &str)]) -> Vec<Definition> {
    entries.iter().map(|(id, name)| Definition { id: *id, name: name.to_string() }).collect()
  }

  #[test]
  fn maps_skus_with_signatures_and_stock() {
    let record = CatalogRecord::from_request(request());
    assert_eq!(record.skus.len(), 2);
    assert_eq!(record.skus[0].sku_signature, "basic-tee-basic-tee_s");
    assert_eq!(record.skus[1].extra_price, dec!(0.1));
    assert_eq!(record.skus[1].stock, 2);
    assert!(record.skus.iter().all(|s| s.status == ProductStatus::Active));
    assert_eq!(record.product.status, ProductStatus::Inactive);
  }

  #[test]
  fn vocabulary_values_are_distinct() {
    let record = CatalogRecord::from_request(request());
    let attrs: Vec<_> =
      record.attribute_values.iter().map(|v| (v.definition_id, v.value.as_str())).collect();
    assert_eq!(attrs, vec![(10, "Cotton"), (11, "Crew")]);
    assert_eq!(record.option_values.len(), 3);
  }

  #[test]
  fn combinations_skip_empty_axes_and_count_from_one() {
    let record = CatalogRecord::from_request(request());
    assert_eq!(record.option_combinations, vec![
      OptionCombination { option_id: 1, display_order: 1 },
      OptionCombination { option_id: 3, display_order: 2 },
    ]);
  }

  #[test]
  fn resolve_names_every_assignment() {
    let resolved = CatalogRecord::from_request(request())
      .resolve(
        &definitions(&[(10, "material"), (11, "neck")]),
        &definitions(&[(1, "size"), (2, "fit"), (3, "color")]),
        UnknownReferencePolicy::Reject,
      )
      .unwrap();

    assert_eq!(resolved.attribute_assignments.len(), 3);
    assert_eq!(resolved.attribute_assignments[2], NewAssignment {
      name:  "neck".into(),
      value: "Crew".into(),
    });
    let options: Vec<_> = resolved
      .option_assignments
      .iter()
      .map(|a| format!("{}={}", a.name, a.value))
      .collect();
    assert_eq!(options, vec!["size=S", "size=M", "color=White"]);
  }

  #[test]
  fn reject_policy_reports_unknown_attribute() {
    let err = CatalogRecord::from_request(request())
      .resolve(
        &definitions(&[(10, "material")]),
        &definitions(&[(1, "size"), (2, "fit"), (3, "color")]),
        UnknownReferencePolicy::Reject,
      )
      .unwrap_err();
    assert!(matches!(err, Error::AttributeNotFound(11)));
  }

  #[test]
  fn reject_policy_reports_unknown_option() {
    let err = CatalogRecord::from_request(request())
      .resolve(
        &definitions(&[(10, "material"), (11, "neck")]),
        &definitions(&[(1, "size"), (3, "color")]),
        UnknownReferencePolicy::Reject,
      )
      .unwrap_err();
    assert!(matches!(err, Error::OptionNotFound(2)));
  }

  #[test]
  fn drop_policy_omits_unknown_ids_everywhere() {
    let resolved = CatalogRecord::from_request(request())
      .resolve(
        &definitions(&[(11, "neck")]),
        &definitions(&[(3, "color")]),
        UnknownReferencePolicy::Drop,
      )
      .unwrap();

    assert_eq!(resolved.attribute_assignments.len(), 1);
    assert!(resolved.attribute_values.iter().all(|v| v.definition_id == 11));
    assert!(resolved.option_values.iter().all(|v| v.definition_id == 3));
    assert_eq!(resolved.option_combinations, vec![OptionCombination {
      option_id:     3,
      display_order: 1,
    }]);
    assert_eq!(resolved.skus.len(), 2);
  }
}
