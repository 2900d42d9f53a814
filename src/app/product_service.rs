//! Product listing and commands.
//!
//! Storage failures are wrapped into [`ServiceError::Internal`] here; a
//! `NotFound` raised by a handler always reaches the caller unchanged.

use anyhow::anyhow;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::model::{NewProduct, Product, ProductUpdate};
use crate::domain::ports::{CategoryRepository, ProductRepository};
use crate::domain::query::{ListProducts, Page, PageWindow};
use crate::domain::ServiceError;

#[async_trait]
pub trait ProductService: Send + Sync {
    /// Filtered, sorted page of products.
    async fn list(&self, query: ListProducts) -> Result<Page<Product>, ServiceError>;

    async fn find_one(&self, id: i32) -> Result<Product, ServiceError>;

    async fn create(&self, product: NewProduct) -> Result<Product, ServiceError>;

    /// Re-points the product at `update.category_id()`. Name and price are not
    /// applied.
    async fn update(&self, id: i32, update: ProductUpdate) -> Result<Product, ServiceError>;

    async fn remove(&self, id: i32) -> Result<(), ServiceError>;
}

/// [`ProductService`] over the storage ports.
pub struct CatalogProductService {
    products: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
    items_per_page: u32,
}

impl CatalogProductService {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        items_per_page: u32,
    ) -> Self {
        Self {
            products,
            categories,
            items_per_page: items_per_page.max(1),
        }
    }

    async fn list_inner(&self, query: &ListProducts) -> Result<Page<Product>, ServiceError> {
        let sort = query.sort().ok_or_else(|| {
            ServiceError::Internal(anyhow!(
                "cannot sort products by unknown column '{}'",
                query.sort_by.as_deref().unwrap_or_default()
            ))
        })?;
        let filters = query.filters();
        let page = query.page();
        let window = PageWindow::new(page, self.items_per_page);

        // Two independent reads; a concurrent write may slip in between.
        let total = self.products.count(&filters).await?;
        let items = self.products.fetch_page(&filters, sort, window).await?;

        Ok(Page::new(items, total, page, self.items_per_page))
    }

    async fn update_inner(&self, id: i32, update: &ProductUpdate) -> Result<Product, ServiceError> {
        if self.products.find_by_id(id).await?.is_none() {
            return Err(ServiceError::product_not_found(id));
        }
        let category_id = update.category_id();
        let category = self
            .categories
            .find_by_id(category_id)
            .await?
            .ok_or_else(|| ServiceError::category_not_found(category_id))?;

        self.products
            .set_category(id, &category)
            .await?
            .ok_or_else(|| ServiceError::product_not_found(id))
    }
}

#[async_trait]
impl ProductService for CatalogProductService {
    async fn list(&self, query: ListProducts) -> Result<Page<Product>, ServiceError> {
        info!(page = query.page(), text = ?query.text, "listing products");
        match self.list_inner(&query).await {
            Ok(page) => {
                info!(
                    total = page.total,
                    page = page.page,
                    last_page = page.last_page,
                    returned = page.items.len(),
                    "listed products"
                );
                Ok(page)
            }
            Err(err) => {
                log_failure("list products", &err);
                Err(err)
            }
        }
    }

    async fn find_one(&self, id: i32) -> Result<Product, ServiceError> {
        info!(product_id = id, "fetching product");
        let result = match self.products.find_by_id(id).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) => Err(ServiceError::product_not_found(id)),
            Err(e) => Err(e.into()),
        };
        match &result {
            Ok(_) => info!(product_id = id, "fetched product"),
            Err(err) => log_failure("fetch product", err),
        }
        result
    }

    async fn create(&self, product: NewProduct) -> Result<Product, ServiceError> {
        let category_id = product.category_id();
        info!(name = product.name(), category_id, "creating product");
        let result = async {
            let category = self
                .categories
                .find_by_id(category_id)
                .await?
                .ok_or_else(|| ServiceError::category_not_found(category_id))?;
            Ok::<_, ServiceError>(self.products.insert(&product, &category).await?)
        }
        .await;
        match &result {
            Ok(created) => info!(product_id = created.id, category_id, "created product"),
            Err(err) => log_failure("create product", err),
        }
        result
    }

    async fn update(&self, id: i32, update: ProductUpdate) -> Result<Product, ServiceError> {
        info!(product_id = id, category_id = update.category_id(), "updating product");
        let result = self.update_inner(id, &update).await;
        match &result {
            Ok(updated) => info!(
                product_id = id,
                category_id = updated.category.id,
                "updated product"
            ),
            Err(err) => log_failure("update product", err),
        }
        result
    }

    async fn remove(&self, id: i32) -> Result<(), ServiceError> {
        info!(product_id = id, "removing product");
        let result = match self.products.delete(id).await {
            Ok(0) => Err(ServiceError::product_not_found(id)),
            Ok(_) => Ok(()),
            Err(e) => Err(e.into()),
        };
        match &result {
            Ok(()) => info!(product_id = id, "removed product"),
            Err(err) => log_failure("remove product", err),
        }
        result
    }
}

/// Client errors are warnings; internal failures carry the whole cause chain.
pub(crate) fn log_failure(action: &str, err: &ServiceError) {
    match err {
        ServiceError::Internal(cause) => error!(action, error = ?cause, "operation failed"),
        other => warn!(action, error = %other, "operation rejected"),
    }
}
