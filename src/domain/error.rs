//! Service-level error taxonomy.
//!
//! Transport adapters map these onto status codes; storage adapters only ever
//! produce `anyhow::Error`, which the services wrap into [`ServiceError::Internal`].

use thiserror::Error;

/// Errors surfaced by the product and category services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A referenced product or category does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The input failed shape or range checks.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Any other failure while talking to the store. The cause is logged, never
    /// shown to clients.
    #[error("internal failure: {0:#}")]
    Internal(#[source] anyhow::Error),
}

impl ServiceError {
    pub fn category_not_found(id: i32) -> Self {
        Self::NotFound(format!("Category with ID {id} not found"))
    }

    pub fn product_not_found(id: i32) -> Self {
        Self::NotFound(format!("Product with ID {id} not found"))
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

/// Input validation failure, raised before a request reaches a service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must be between {min} and {max} characters long")]
    Length {
        field: &'static str,
        min: usize,
        max: usize,
    },
    #[error("{0} must be a positive number")]
    NotPositive(&'static str),
    #[error("{0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_messages_name_the_missing_id() {
        assert_eq!(
            ServiceError::category_not_found(999).to_string(),
            "Category with ID 999 not found"
        );
        assert_eq!(
            ServiceError::product_not_found(4).to_string(),
            "Product with ID 4 not found"
        );
    }

    #[test]
    fn storage_errors_become_internal() {
        let err: ServiceError = anyhow::anyhow!("connection refused").into();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn validation_errors_render_field_names() {
        let err = ValidationError::Length {
            field: "name",
            min: 3,
            max: 255,
        };
        assert_eq!(err.to_string(), "name must be between 3 and 255 characters long");
        assert_eq!(
            ValidationError::NotPositive("price").to_string(),
            "price must be a positive number"
        );
    }
}
