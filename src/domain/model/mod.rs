//! Catalog entities and the validated inputs used to create or change them.

pub mod category;
pub mod product;

pub use category::{Category, NewCategory};
pub use product::{NewProduct, Product, ProductUpdate, PRICE_SCALE};

use crate::domain::error::ValidationError;

pub const NAME_MIN_LEN: usize = 3;
pub const NAME_MAX_LEN: usize = 255;

/// Names are 3 to 255 characters, counted as Unicode scalar values.
pub(crate) fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(ValidationError::Length {
            field: "name",
            min: NAME_MIN_LEN,
            max: NAME_MAX_LEN,
        });
    }
    Ok(())
}
