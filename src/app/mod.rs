pub mod category_service;
pub mod product_service;

pub use category_service::CategoryService;
pub use product_service::{CatalogProductService, ProductService};
