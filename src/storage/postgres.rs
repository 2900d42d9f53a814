//! PostgreSQL catalog store.
//!
//! Owns the connection pool and the two catalog tables. Listing queries are
//! assembled with `sqlx::QueryBuilder` from the filter predicates; every value
//! is bound, never spliced into the SQL text.

use anyhow::Context;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use crate::domain::model::{Category, NewCategory, NewProduct, Product};
use crate::domain::ports::{CategoryRepository, ProductRepository, StoreHealth};
use crate::domain::query::{PageWindow, ProductFilter, ProductSort, SortField};
use crate::infra::config::DatabaseConfig;

const PRODUCT_FROM: &str = " FROM product p INNER JOIN category c ON c.id = p.category_id";
const PRODUCT_COLUMNS: &str =
    "SELECT p.id, p.name, p.price, c.id AS category_id, c.name AS category_name";

/// Catalog store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the configured database and makes sure the catalog tables exist.
    pub async fn connect(config: &DatabaseConfig) -> anyhow::Result<Self> {
        let options = config
            .connection
            .connect_options()
            .context("invalid catalog database settings")?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .context("failed to connect to the catalog database")?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Creates the catalog tables if they are missing.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS category (
                id SERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS product (
                id SERIAL PRIMARY KEY,
                name VARCHAR(255) NOT NULL,
                price NUMERIC(10, 2) NOT NULL,
                category_id INTEGER NOT NULL REFERENCES category (id)
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS product_category_id_idx ON product (category_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for PgCatalogStore {
    async fn insert(&self, category: &NewCategory) -> anyhow::Result<Category> {
        let row = sqlx::query("INSERT INTO category (name) VALUES ($1) RETURNING id, name")
            .bind(category.name())
            .fetch_one(&self.pool)
            .await
            .context("failed to insert category")?;
        category_from_row(&row)
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Category>> {
        let row = sqlx::query("SELECT id, name FROM category WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load category {id}"))?;
        row.as_ref().map(category_from_row).transpose()
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM category ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("failed to list categories")?;
        rows.iter().map(category_from_row).collect()
    }
}

#[async_trait]
impl ProductRepository for PgCatalogStore {
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<Product>> {
        let sql = format!("{PRODUCT_COLUMNS}{PRODUCT_FROM} WHERE p.id = $1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to load product {id}"))?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn count(&self, filters: &[ProductFilter]) -> anyhow::Result<u64> {
        let mut qb = count_query(filters);
        let total: i64 = qb
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .context("failed to count products")?;
        Ok(u64::try_from(total)?)
    }

    async fn fetch_page(
        &self,
        filters: &[ProductFilter],
        sort: ProductSort,
        window: PageWindow,
    ) -> anyhow::Result<Vec<Product>> {
        let mut qb = page_query(filters, sort, window)?;
        let rows = qb
            .build()
            .fetch_all(&self.pool)
            .await
            .context("failed to fetch products page")?;
        rows.iter().map(product_from_row).collect()
    }

    async fn insert(&self, product: &NewProduct, category: &Category) -> anyhow::Result<Product> {
        let row = sqlx::query(
            "INSERT INTO product (name, price, category_id) VALUES ($1, $2, $3)
             RETURNING id, name, price",
        )
        .bind(product.name())
        .bind(product.price())
        .bind(category.id)
        .fetch_one(&self.pool)
        .await
        .context("failed to insert product")?;
        product_with_category(&row, category.clone())
    }

    async fn set_category(&self, id: i32, category: &Category) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query(
            "UPDATE product SET category_id = $1 WHERE id = $2 RETURNING id, name, price",
        )
        .bind(category.id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .with_context(|| format!("failed to update product {id}"))?;
        row.map(|row| product_with_category(&row, category.clone()))
            .transpose()
    }

    async fn delete(&self, id: i32) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM product WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete product {id}"))?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl StoreHealth for PgCatalogStore {
    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn count_query(filters: &[ProductFilter]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*)");
    qb.push(PRODUCT_FROM);
    push_filters(&mut qb, filters);
    qb
}

fn page_query(
    filters: &[ProductFilter],
    sort: ProductSort,
    window: PageWindow,
) -> anyhow::Result<QueryBuilder<'static, Postgres>> {
    let mut qb = QueryBuilder::new(PRODUCT_COLUMNS);
    qb.push(PRODUCT_FROM);
    push_filters(&mut qb, filters);

    qb.push(" ORDER BY ")
        .push(sort_column(sort.field))
        .push(" ")
        .push(sort.order.as_sql());
    if sort.field != SortField::Id {
        qb.push(", p.id ASC");
    }

    qb.push(" LIMIT ")
        .push_bind(i64::from(window.limit))
        .push(" OFFSET ")
        .push_bind(i64::try_from(window.offset).context("page offset out of range")?);
    Ok(qb)
}

fn push_filters(qb: &mut QueryBuilder<'static, Postgres>, filters: &[ProductFilter]) {
    let mut separator = " WHERE ";
    for filter in filters {
        qb.push(separator);
        separator = " AND ";
        match filter {
            ProductFilter::Text(text) => {
                let pattern = like_pattern(text);
                qb.push("(p.name ILIKE ")
                    .push_bind(pattern.clone())
                    .push(" OR c.name ILIKE ")
                    .push_bind(pattern)
                    .push(")");
            }
            ProductFilter::MinPrice(min) => {
                qb.push("p.price >= ").push_bind(*min);
            }
            ProductFilter::MaxPrice(max) => {
                qb.push("p.price <= ").push_bind(*max);
            }
            ProductFilter::Category(id) => {
                qb.push("c.id = ").push_bind(*id);
            }
        }
    }
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::Id => "p.id",
        SortField::Name => "LOWER(p.name) COLLATE \"C\"",
        SortField::Price => "p.price",
        SortField::Category => "p.category_id",
    }
}

/// `%text%` with LIKE wildcards in `text` escaped so they match literally.
fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn category_from_row(row: &PgRow) -> anyhow::Result<Category> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
    })
}

fn product_from_row(row: &PgRow) -> anyhow::Result<Product> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        price: row.try_get::<Decimal, _>("price")?,
        category: Category {
            id: row.try_get("category_id")?,
            name: row.try_get("category_name")?,
        },
    })
}

fn product_with_category(row: &PgRow, category: Category) -> anyhow::Result<Product> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        price: row.try_get::<Decimal, _>("price")?,
        category,
    })
}
