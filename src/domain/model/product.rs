use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{validate_name, Category};
use crate::domain::error::ValidationError;

/// Number of fractional digits kept for prices (`NUMERIC(10, 2)`).
pub const PRICE_SCALE: u32 = 2;

/// A priced item, always returned with its category resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    pub category: Category,
}

/// A validated product ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    name: String,
    price: Decimal,
    category_id: i32,
}

impl NewProduct {
    pub fn new(
        name: impl Into<String>,
        price: Decimal,
        category_id: i32,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        let price = validate_price(price)?;
        validate_id("categoryId", category_id)?;
        Ok(Self {
            name,
            price,
            category_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Price rounded and padded to [`PRICE_SCALE`] digits.
    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn category_id(&self) -> i32 {
        self.category_id
    }
}

/// A validated update payload.
///
/// Only the category association is kept; `name` and `price` are checked so
/// malformed payloads are still rejected, then dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductUpdate {
    category_id: i32,
}

impl ProductUpdate {
    pub fn new(
        name: Option<String>,
        price: Option<Decimal>,
        category_id: i32,
    ) -> Result<Self, ValidationError> {
        if let Some(name) = &name {
            validate_name(name)?;
        }
        if let Some(price) = price {
            validate_price(price)?;
        }
        validate_id("categoryId", category_id)?;
        Ok(Self { category_id })
    }

    pub fn category_id(&self) -> i32 {
        self.category_id
    }
}

fn validate_price(price: Decimal) -> Result<Decimal, ValidationError> {
    if price <= Decimal::ZERO {
        return Err(ValidationError::NotPositive("price"));
    }
    let mut rounded =
        price.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(PRICE_SCALE);
    // 10 digits of precision, 2 of them fractional.
    if rounded >= Decimal::from(100_000_000) {
        return Err(ValidationError::Malformed(
            "price must be lower than 100000000".to_string(),
        ));
    }
    Ok(rounded)
}

fn validate_id(field: &'static str, id: i32) -> Result<(), ValidationError> {
    if id <= 0 {
        return Err(ValidationError::NotPositive(field));
    }
    Ok(())
}
