use crate::transport::http::handlers::common::{
    bad_request, service_error_response, validation_response,
};
use crate::transport::http::types::{AppState, CreateCategoryRequest};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/categories",
    tag = "categories",
    request_body = CreateCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = crate::domain::model::Category),
        (
            status = 400,
            description = "Invalid payload",
            body = crate::transport::http::types::ApiResponse
        ),
        (
            status = 500,
            description = "Internal server error",
            body = crate::transport::http::types::ApiResponse
        )
    )
)]
pub async fn create_category_handler(
    State(state): State<AppState>,
    request: Result<Json<CreateCategoryRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return bad_request(e, r#"{"name": "..."}"#).into_response(),
    };
    let category = match request.validate() {
        Ok(c) => c,
        Err(e) => return validation_response(e).into_response(),
    };

    match state.categories.create(category).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/categories",
    tag = "categories",
    responses(
        (
            status = 200,
            description = "All categories ordered by id",
            body = Vec<crate::domain::model::Category>
        ),
        (
            status = 500,
            description = "Internal server error",
            body = crate::transport::http::types::ApiResponse
        )
    )
)]
pub async fn list_categories_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.categories.find_all().await {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    tag = "categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = crate::domain::model::Category),
        (
            status = 404,
            description = "Category not found",
            body = crate::transport::http::types::ApiResponse
        )
    )
)]
pub async fn get_category_handler(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> impl IntoResponse {
    let Path(id) = match id {
        Ok(v) => v,
        Err(e) => return bad_request(e, "integer id").into_response(),
    };

    match state.categories.find_one(id).await {
        Ok(category) => (StatusCode::OK, Json(category)).into_response(),
        Err(e) => service_error_response(e).into_response(),
    }
}
