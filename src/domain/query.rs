//! Product listing: filter predicates, sort order and the page envelope.
//!
//! A listing request is turned into a list of [`ProductFilter`]s containing only
//! the filters that are present. Storage adapters either render the predicates
//! into SQL or evaluate them with [`ProductFilter::matches`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use utoipa::ToSchema;

use crate::domain::model::Product;

pub const DEFAULT_ITEMS_PER_PAGE: u32 = 10;
pub const DEFAULT_SORT_BY: &str = "id";

/// Raw listing parameters as they reach the query engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListProducts {
    pub page: Option<u32>,
    /// Already stripped of surrounding quotes by the caller.
    pub text: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub category_id: Option<i32>,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
}

impl ListProducts {
    /// 1-based page; absent and zero both mean the first page.
    pub fn page(&self) -> u32 {
        match self.page {
            Some(page) if page > 0 => page,
            _ => 1,
        }
    }

    /// Active filters. Zero-valued numbers and empty text count as absent.
    pub fn filters(&self) -> Vec<ProductFilter> {
        let mut filters = Vec::new();
        if let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) {
            filters.push(ProductFilter::Text(text.to_string()));
        }
        if let Some(min) = self.min_price.filter(|p| !p.is_zero()) {
            filters.push(ProductFilter::MinPrice(min));
        }
        if let Some(max) = self.max_price.filter(|p| !p.is_zero()) {
            filters.push(ProductFilter::MaxPrice(max));
        }
        if let Some(id) = self.category_id.filter(|id| *id != 0) {
            filters.push(ProductFilter::Category(id));
        }
        filters
    }

    /// The requested sort, or `None` when `sort_by` names no product field.
    pub fn sort(&self) -> Option<ProductSort> {
        let field = SortField::parse(self.sort_by.as_deref().unwrap_or(DEFAULT_SORT_BY))?;
        Some(ProductSort {
            field,
            order: self.sort_order,
        })
    }
}

/// A single optional listing condition. All filters in a request are ANDed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductFilter {
    /// Case-insensitive substring of the product name or its category name.
    Text(String),
    MinPrice(Decimal),
    MaxPrice(Decimal),
    Category(i32),
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            Self::Text(needle) => {
                let needle = needle.to_lowercase();
                product.name.to_lowercase().contains(&needle)
                    || product.category.name.to_lowercase().contains(&needle)
            }
            Self::MinPrice(min) => product.price >= *min,
            Self::MaxPrice(max) => product.price <= *max,
            Self::Category(id) => product.category.id == *id,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "ASC", alias = "asc")]
    Asc,
    #[serde(rename = "DESC", alias = "desc")]
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Product fields a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Price,
    Category,
}

impl SortField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "name" => Some(Self::Name),
            "price" => Some(Self::Price),
            "category" | "categoryId" => Some(Self::Category),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSort {
    pub field: SortField,
    pub order: SortOrder,
}

impl ProductSort {
    /// Orders two products; ties fall back to ascending id.
    ///
    /// Names compare case-insensitively by code point, the same order the
    /// PostgreSQL store produces with `LOWER(p.name) COLLATE "C"`. Lowercasing
    /// outside ASCII follows the database ctype there, so exotic scripts may
    /// still differ between the two stores.
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let primary = match self.field {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Price => a.price.cmp(&b.price),
            SortField::Category => a.category.id.cmp(&b.category.id),
        };
        let primary = match self.order {
            SortOrder::Asc => primary,
            SortOrder::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// Offset/limit window for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub limit: u32,
}

impl PageWindow {
    pub fn new(page: u32, items_per_page: u32) -> Self {
        Self {
            offset: u64::from(page.saturating_sub(1)) * u64::from(items_per_page),
            limit: items_per_page,
        }
    }
}

/// Page envelope returned by listing endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[aliases(ProductPage = Page<Product>)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub last_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, page: u32, items_per_page: u32) -> Self {
        Self {
            items,
            total,
            page,
            last_page: last_page(total, items_per_page),
        }
    }
}

/// `ceil(total / items_per_page)`; zero when there is nothing to show.
pub fn last_page(total: u64, items_per_page: u32) -> u64 {
    if items_per_page == 0 {
        return 0;
    }
    total.div_ceil(u64::from(items_per_page))
}
