//! Read-time price derivation for SKUs.
//!
//! Stored rows only hold the product's base price and each SKU's extra-price
//! delta and sale descriptor; the numbers shown to buyers come from here.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::sku::SaleType;

/// A derived price does not fit in a [`Decimal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("computed price is out of range")]
pub struct Overflow;

/// `base + base * extra` for a non-negative `extra`. A negative delta is
/// ignored and the base price returned unchanged.
pub fn effective_price(base_price: Decimal, extra_price: Decimal) -> Result<Decimal, Overflow> {
  if extra_price < Decimal::ZERO {
    return Ok(base_price);
  }
  base_price
    .checked_mul(extra_price)
    .and_then(|delta| base_price.checked_add(delta))
    .ok_or(Overflow)
}

/// Apply a sale to an effective price.
///
/// Yields `None` unless both the type and the value are present. A fixed
/// discount never takes the price below zero.
pub fn sale_price(
  effective_price: Decimal,
  sale_type: Option<SaleType>,
  sale_value: Option<Decimal>,
) -> Result<Option<Decimal>, Overflow> {
  let (Some(sale_type), Some(sale_value)) = (sale_type, sale_value) else {
    return Ok(None);
  };
  let discounted = match sale_type {
    SaleType::Percentage => effective_price
      .checked_mul(sale_value)
      .and_then(|discount| effective_price.checked_sub(discount)),
    SaleType::Fixed => effective_price.checked_sub(sale_value).map(|p| p.max(Decimal::ZERO)),
  };
  discounted.map(Some).ok_or(Overflow)
}
