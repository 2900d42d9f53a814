use std::sync::Arc;
use tracing::info;

use crate::app::product_service::log_failure;
use crate::domain::model::{Category, NewCategory};
use crate::domain::ports::CategoryRepository;
use crate::domain::ServiceError;

/// Category commands. Names are not required to be unique.
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    pub async fn create(&self, category: NewCategory) -> Result<Category, ServiceError> {
        info!(name = category.name(), "creating category");
        let result = self
            .categories
            .insert(&category)
            .await
            .map_err(ServiceError::from);
        match &result {
            Ok(created) => info!(category_id = created.id, "created category"),
            Err(err) => log_failure("create category", err),
        }
        result
    }

    pub async fn find_all(&self) -> Result<Vec<Category>, ServiceError> {
        let result = self.categories.find_all().await.map_err(ServiceError::from);
        if let Err(err) = &result {
            log_failure("list categories", err);
        }
        result
    }

    pub async fn find_one(&self, id: i32) -> Result<Category, ServiceError> {
        let result = match self.categories.find_by_id(id).await {
            Ok(Some(category)) => Ok(category),
            Ok(None) => Err(ServiceError::category_not_found(id)),
            Err(e) => Err(e.into()),
        };
        if let Err(err) = &result {
            log_failure("fetch category", err);
        }
        result
    }
}
