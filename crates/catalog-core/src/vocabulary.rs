//! Attribute and option vocabulary, and the per-product rows that reference it.
//!
//! Attributes (e.g. "material") describe a product; options (e.g. "size",
//! "color") are the axes its variants are generated from. Both share the same
//! row shapes, so the types here are used for either.

use serde::{Deserialize, Serialize};

/// A named attribute or option definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
  pub id:   i64,
  pub name: String,
}

/// A persisted `(product, name, value)` info row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
  pub id:         i64,
  pub product_id: i64,
  pub name:       String,
  pub value:      String,
}

/// An info row about to be written; the product id is supplied by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
  pub name:  String,
  pub value: String,
}

/// A deduplicated `(definition id, value)` vocabulary entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VocabularyValue {
  pub definition_id: i64,
  pub value:         String,
}

/// Records that an option axis applies to a product, and where it sits in
/// the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionCombination {
  pub option_id:     i64,
  /// 1-based.
  pub display_order: i32,
}

/// What to do with attribute or option ids that do not resolve to a
/// definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownReferencePolicy {
  /// Fail the creation with `AttributeNotFound` / `OptionNotFound`.
  #[default]
  Reject,
  /// Omit the unknown ids from every row written for the product.
  Drop,
}
