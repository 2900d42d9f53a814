use crate::app::{CatalogProductService, CategoryService, ProductService};
use crate::domain::model::{NewCategory, NewProduct, ProductUpdate};
use crate::domain::ports::{CategoryRepository, ProductRepository, StoreHealth};
use crate::domain::query::{ListProducts, SortOrder};
use crate::domain::ValidationError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use super::handlers::common::strip_quotes;

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductService>,
    pub categories: Arc<CategoryService>,
    pub health: Arc<dyn StoreHealth>,
}

impl AppState {
    /// Wires both services over a single store.
    pub fn from_store<S>(store: Arc<S>, items_per_page: u32) -> Self
    where
        S: ProductRepository + CategoryRepository + StoreHealth + 'static,
    {
        Self {
            products: Arc::new(CatalogProductService::new(
                store.clone(),
                store.clone(),
                items_per_page,
            )),
            categories: Arc::new(CategoryService::new(store.clone())),
            health: store,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: Option<JsonValue>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// 3 to 255 characters.
    pub name: String,
    /// Must be greater than zero; stored with two decimal places. A JSON
    /// number only, strings are rejected.
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 19.99)]
    pub price: Decimal,
    pub category_id: i32,
}

impl CreateProductRequest {
    pub fn validate(self) -> Result<NewProduct, ValidationError> {
        NewProduct::new(self.name, self.price, self.category_id)
    }
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    /// Validated but not applied.
    #[serde(default)]
    pub name: Option<String>,
    /// Validated but not applied.
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    /// The category the product is moved to.
    pub category_id: i32,
}

impl UpdateProductRequest {
    pub fn validate(self) -> Result<ProductUpdate, ValidationError> {
        ProductUpdate::new(self.name, self.price, self.category_id)
    }
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct CreateCategoryRequest {
    /// 3 to 255 characters.
    pub name: String,
}

impl CreateCategoryRequest {
    pub fn validate(self) -> Result<NewCategory, ValidationError> {
        NewCategory::new(self.name)
    }
}

/// Query string of `GET /products`.
#[derive(Deserialize, Debug, Default, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListProductsParams {
    /// 1-based page number; `0` or absent means the first page.
    pub page: Option<u32>,
    /// Case-insensitive search over product and category names. One layer of
    /// surrounding quotes is ignored.
    pub query: Option<String>,
    #[param(value_type = Option<f64>)]
    pub min_price: Option<Decimal>,
    #[param(value_type = Option<f64>)]
    pub max_price: Option<Decimal>,
    pub category_id: Option<i32>,
    /// One of `id`, `name`, `price`, `category`. Defaults to `id`.
    pub sort_by: Option<String>,
    #[param(value_type = Option<String>, example = "ASC")]
    pub sort_order: Option<SortOrder>,
}

impl From<ListProductsParams> for ListProducts {
    fn from(params: ListProductsParams) -> Self {
        Self {
            page: params.page,
            text: params.query.as_deref().map(|q| strip_quotes(q).to_string()),
            min_price: params.min_price,
            max_price: params.max_price,
            category_id: params.category_id,
            sort_by: params.sort_by,
            sort_order: params.sort_order.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_reads_camel_case_and_numeric_price() {
        let request: CreateProductRequest =
            serde_json::from_str(r#"{"name":"Shoe","price":19.99,"categoryId":4}"#).unwrap();
        let product = request.validate().unwrap();
        assert_eq!(product.price().to_string(), "19.99");
        assert_eq!(product.category_id(), 4);
    }

    #[test]
    fn price_must_be_a_json_number() {
        let quoted = serde_json::from_str::<CreateProductRequest>(
            r#"{"name":"Shoe","price":"20","categoryId":4}"#,
        );
        assert!(quoted.is_err());
        let whole: CreateProductRequest =
            serde_json::from_str(r#"{"name":"Shoe","price":20,"categoryId":4}"#).unwrap();
        assert_eq!(whole.validate().unwrap().price().to_string(), "20.00");

        let quoted =
            serde_json::from_str::<UpdateProductRequest>(r#"{"price":"5","categoryId":2}"#);
        assert!(quoted.is_err());
        let empty: UpdateProductRequest =
            serde_json::from_str(r#"{"price":null,"categoryId":2}"#).unwrap();
        assert_eq!(empty.price, None);
    }

    #[test]
    fn update_request_only_requires_category() {
        let request: UpdateProductRequest = serde_json::from_str(r#"{"categoryId":2}"#).unwrap();
        assert_eq!(request.validate().unwrap().category_id(), 2);
    }

    #[test]
    fn quoted_query_is_unwrapped() {
        let params = ListProductsParams {
            query: Some("\"boots\"".into()),
            ..Default::default()
        };
        let query = ListProducts::from(params);
        assert_eq!(query.text.as_deref(), Some("boots"));
        assert_eq!(query.sort_order, SortOrder::Asc);
    }
}
