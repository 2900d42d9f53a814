use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::validate_name;
use crate::domain::error::ValidationError;

/// A named grouping referenced by products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
}

/// A validated category ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    name: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
