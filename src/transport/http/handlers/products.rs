use crate::transport::http::handlers::common::{
    bad_request, service_error_response, validation_response,
};
use crate::transport::http::types::{
    ApiResponse, AppState, CreateProductRequest, ListProductsParams, UpdateProductRequest,
};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = crate::domain::model::Product),
        (status = 400, description = "Invalid payload", body = ApiResponse),
        (status = 404, description = "Category not found", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    request: Result<Json<CreateProductRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => {
            return bad_request(e, r#"{"name": "...", "price": 9.99, "categoryId": 1}"#)
                .into_response()
        }
    };
    let product = match request.validate() {
        Ok(p) => p,
        Err(e) => return validation_response(e).into_response(),
    };

    match state.products.create(product).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    params(ListProductsParams),
    responses(
        (
            status = 200,
            description = "One page of matching products",
            body = crate::domain::query::ProductPage
        ),
        (status = 400, description = "Malformed query parameter", body = ApiResponse),
        (status = 500, description = "Unknown sortBy or storage failure", body = ApiResponse)
    )
)]
pub async fn list_products_handler(
    State(state): State<AppState>,
    params: Result<Query<ListProductsParams>, QueryRejection>,
) -> impl IntoResponse {
    let Query(params) = match params {
        Ok(v) => v,
        Err(e) => {
            return bad_request(
                e,
                "page, query, minPrice, maxPrice, categoryId, sortBy, sortOrder",
            )
            .into_response()
        }
    };

    match state.products.list(params.into()).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (
            status = 200,
            description = "Product with its category",
            body = crate::domain::model::Product
        ),
        (status = 404, description = "Product not found", body = ApiResponse)
    )
)]
pub async fn get_product_handler(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> impl IntoResponse {
    let Path(id) = match id {
        Ok(v) => v,
        Err(e) => return bad_request(e, "integer id").into_response(),
    };

    match state.products.find_one(id).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    patch,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (
            status = 200,
            description = "Product moved to the given category",
            body = crate::domain::model::Product
        ),
        (status = 400, description = "Invalid payload", body = ApiResponse),
        (status = 404, description = "Product or category not found", body = ApiResponse)
    )
)]
pub async fn update_product_handler(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    request: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Path(id) = match id {
        Ok(v) => v,
        Err(e) => return bad_request(e, "integer id").into_response(),
    };
    let Json(request) = match request {
        Ok(v) => v,
        Err(e) => return bad_request(e, r#"{"categoryId": 1}"#).into_response(),
    };
    let update = match request.validate() {
        Ok(u) => u,
        Err(e) => return validation_response(e).into_response(),
    };

    match state.products.update(id, update).await {
        Ok(product) => (StatusCode::OK, Json(product)).into_response(),
        Err(e) => service_error_response(e).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = ApiResponse),
        (status = 404, description = "Product not found", body = ApiResponse)
    )
)]
pub async fn delete_product_handler(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> impl IntoResponse {
    let Path(id) = match id {
        Ok(v) => v,
        Err(e) => return bad_request(e, "integer id").into_response(),
    };

    match state.products.remove(id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::ok(Some(serde_json::json!({ "id": id })))),
        )
            .into_response(),
        Err(e) => service_error_response(e).into_response(),
    }
}
