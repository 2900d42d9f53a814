use crate::domain::{ServiceError, ValidationError};
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::Json;
use std::fmt::Display;

pub type ErrorResponse = (StatusCode, Json<ApiResponse>);

/// Maps a service error onto a status code. Internal causes never leave the process.
pub fn service_error_response(err: ServiceError) -> ErrorResponse {
    match err {
        ServiceError::NotFound(message) => {
            (StatusCode::NOT_FOUND, Json(ApiResponse::error(message)))
        }
        ServiceError::Validation(e) => validation_response(e),
        ServiceError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error("Internal server error")),
        ),
    }
}

pub fn validation_response(err: ValidationError) -> ErrorResponse {
    (StatusCode::BAD_REQUEST, Json(ApiResponse::error(err.to_string())))
}

/// Rejected JSON body, path segment or query string.
pub fn bad_request(err: impl Display, expected: &str) -> ErrorResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::error(format!(
            "Invalid request: {} (expected: {})",
            err, expected
        ))),
    )
}

/// Removes one layer of matching `"` or `'` quotes around a non-empty value.
pub fn strip_quotes(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = raw
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            if !inner.is_empty() {
                return inner;
            }
        }
    }
    raw
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_a_single_layer_of_matching_quotes() {
        assert_eq!(strip_quotes("\"boots\""), "boots");
        assert_eq!(strip_quotes("'boots'"), "boots");
        assert_eq!(strip_quotes("\"\"boots\"\""), "\"boots\"");
        assert_eq!(strip_quotes("boots"), "boots");
    }

    #[test]
    fn leaves_unbalanced_or_empty_quotes_alone() {
        assert_eq!(strip_quotes("\"boots'"), "\"boots'");
        assert_eq!(strip_quotes("\"boots"), "\"boots");
        assert_eq!(strip_quotes("\"\""), "\"\"");
        assert_eq!(strip_quotes("\""), "\"");
    }

    #[test]
    fn internal_errors_are_opaque() {
        let (status, Json(body)) =
            service_error_response(ServiceError::Internal(anyhow::anyhow!("password auth failed")));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.error.as_deref(), Some("Internal server error"));
    }

    #[test]
    fn not_found_keeps_its_message() {
        let (status, Json(body)) = service_error_response(ServiceError::category_not_found(9));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.error.as_deref(), Some("Category with ID 9 not found"));
    }
}
