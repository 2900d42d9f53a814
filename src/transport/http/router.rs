use crate::domain::model::{Category, Product};
use crate::domain::query::{ProductPage, SortOrder};
use crate::transport::http::handlers::{categories, health, products};
use crate::transport::http::types::{
    ApiResponse, AppState, CreateCategoryRequest, CreateProductRequest, UpdateProductRequest,
};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Product catalog API", description = "Products grouped into categories"),
    paths(
        health::healthcheck_handler,
        products::create_product_handler,
        products::list_products_handler,
        products::get_product_handler,
        products::update_product_handler,
        products::delete_product_handler,
        categories::create_category_handler,
        categories::list_categories_handler,
        categories::get_category_handler
    ),
    components(schemas(
        ApiResponse,
        Category,
        Product,
        ProductPage,
        SortOrder,
        CreateProductRequest,
        UpdateProductRequest,
        CreateCategoryRequest
    )),
    tags(
        (name = "products"),
        (name = "categories"),
        (name = "health")
    )
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/products",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route(
            "/products/:id",
            get(products::get_product_handler)
                .patch(products::update_product_handler)
                .delete(products::delete_product_handler),
        )
        .route(
            "/categories",
            get(categories::list_categories_handler).post(categories::create_category_handler),
        )
        .route("/categories/:id", get(categories::get_category_handler))
        .with_state(app_state)
}

/// Router plus Swagger UI, CORS and request tracing.
pub fn create_app(app_state: AppState) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    create_router(app_state)
        .merge(SwaggerUi::new("/api").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
