//! Product catalog REST backend: products grouped into categories, stored in
//! PostgreSQL, with a filtered and paginated product listing.

pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::{CatalogProductService, CategoryService, ProductService};
pub use domain::model::{Category, NewCategory, NewProduct, Product, ProductUpdate};
pub use domain::query::{ListProducts, Page, SortOrder};
pub use domain::{ServiceError, ValidationError};
pub use infra::config::AppConfig;
pub use storage::{InMemoryCatalogStore, PgCatalogStore};
