//! In-process catalog store.
//!
//! Evaluates the same filter predicates as the PostgreSQL store, which makes it
//! usable for tests and for running the API without a database.

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::domain::model::{Category, NewCategory, NewProduct, Product};
use crate::domain::ports::{CategoryRepository, ProductRepository, StoreHealth};
use crate::domain::query::{PageWindow, ProductFilter, ProductSort};

#[derive(Default)]
struct Tables {
    categories: BTreeMap<i32, Category>,
    /// Product rows keep only the category id, like the `product` table.
    products: BTreeMap<i32, ProductRow>,
    next_category_id: i32,
    next_product_id: i32,
}

#[derive(Clone)]
struct ProductRow {
    name: String,
    price: rust_decimal::Decimal,
    category_id: i32,
}

impl Tables {
    fn resolve(&self, id: i32, row: &ProductRow) -> anyhow::Result<Product> {
        let category = self.categories.get(&row.category_id).ok_or_else(|| {
            anyhow::anyhow!(
                "product {id} references missing category {}",
                row.category_id
            )
        })?;
        Ok(Product {
            id,
            name: row.name.clone(),
            price: row.price,
            category: category.clone(),
        })
    }

    fn matching(&self, filters: &[ProductFilter]) -> anyhow::Result<Vec<Product>> {
        let mut out = Vec::new();
        for (id, row) in &self.products {
            let product = self.resolve(*id, row)?;
            if filters.iter().all(|f| f.matches(&product)) {
                out.push(product);
            }
        }
        Ok(out)
    }
}

/// Catalog store held entirely in memory. Ids start at 1 and are never reused.
#[derive(Default)]
pub struct InMemoryCatalogStore {
    tables: RwLock<Tables>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCatalogStore {
    async fn insert(&self, category: &NewCategory) -> anyhow::Result<Category> {
        let mut tables = self.tables.write().await;
        tables.next_category_id += 1;
        let created = Category {
            id: tables.next_category_id,
            name: category.name().to_string(),
        };
        tables.categories.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Category>> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }
}

#[async_trait]
impl ProductRepository for InMemoryCatalogStore {
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Product>> {
        let tables = self.tables.read().await;
        tables
            .products
            .get(&id)
            .map(|row| tables.resolve(id, row))
            .transpose()
    }

    async fn count(&self, filters: &[ProductFilter]) -> anyhow::Result<u64> {
        let tables = self.tables.read().await;
        Ok(tables.matching(filters)?.len() as u64)
    }

    async fn fetch_page(
        &self,
        filters: &[ProductFilter],
        sort: ProductSort,
        window: PageWindow,
    ) -> anyhow::Result<Vec<Product>> {
        let tables = self.tables.read().await;
        let mut items = tables.matching(filters)?;
        items.sort_by(|a, b| sort.compare(a, b));
        let offset = usize::try_from(window.offset)?;
        Ok(items
            .into_iter()
            .skip(offset)
            .take(window.limit as usize)
            .collect())
    }

    async fn insert(&self, product: &NewProduct, category: &Category) -> anyhow::Result<Product> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&category.id) {
            anyhow::bail!("foreign key violation: category {} does not exist", category.id);
        }
        tables.next_product_id += 1;
        let id = tables.next_product_id;
        let row = ProductRow {
            name: product.name().to_string(),
            price: product.price(),
            category_id: category.id,
        };
        let created = tables.resolve(id, &row)?;
        tables.products.insert(id, row);
        Ok(created)
    }

    async fn set_category(&self, id: i32, category: &Category) -> anyhow::Result<Option<Product>> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&category.id) {
            anyhow::bail!("foreign key violation: category {} does not exist", category.id);
        }
        let Some(row) = tables.products.get_mut(&id) else {
            return Ok(None);
        };
        row.category_id = category.id;
        let row = row.clone();
        tables.resolve(id, &row).map(Some)
    }

    async fn delete(&self, id: i32) -> anyhow::Result<u64> {
        let mut tables = self.tables.write().await;
        Ok(u64::from(tables.products.remove(&id).is_some()))
    }
}

#[async_trait]
impl StoreHealth for InMemoryCatalogStore {
    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
