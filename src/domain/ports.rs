//! Storage ports implemented by the PostgreSQL and in-memory adapters.
//!
//! Adapters report failures as `anyhow::Error`; the services decide what is a
//! domain error and what is an internal failure.

use async_trait::async_trait;

use crate::domain::model::{Category, NewCategory, NewProduct, Product};
use crate::domain::query::{PageWindow, ProductFilter, ProductSort};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn insert(&self, category: &NewCategory) -> anyhow::Result<Category>;

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Category>>;

    /// All categories ordered by id.
    async fn find_all(&self) -> anyhow::Result<Vec<Category>>;
}

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Fetches one product with its category resolved.
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Product>>;

    /// Number of products matching every filter.
    async fn count(&self, filters: &[ProductFilter]) -> anyhow::Result<u64>;

    /// One page of products matching every filter, in `sort` order.
    async fn fetch_page(
        &self,
        filters: &[ProductFilter],
        sort: ProductSort,
        window: PageWindow,
    ) -> anyhow::Result<Vec<Product>>;

    /// Inserts a product bound to `category`, which the caller has resolved.
    async fn insert(&self, product: &NewProduct, category: &Category) -> anyhow::Result<Product>;

    /// Points an existing product at another category. Returns `None` if the
    /// product vanished in the meantime.
    async fn set_category(&self, id: i32, category: &Category) -> anyhow::Result<Option<Product>>;

    /// Deletes a product, returning the number of rows removed.
    async fn delete(&self, id: i32) -> anyhow::Result<u64>;
}

/// Liveness check for the backing store.
#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> anyhow::Result<()>;
}
