//! Trait abstraction for the backend client to enable mocking in tests

use crate::api::ApiError;
use crate::state::{Category, CategoryDraft, ListQuery};
use async_trait::async_trait;

/// Trait for backend category operations, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// List categories, filtered when the query carries search terms
    async fn list_categories(&self, query: &ListQuery) -> Result<Vec<Category>, ApiError>;

    /// Check whether a category with this short link already exists
    async fn guid_exists(&self, guid: &str) -> Result<bool, ApiError>;

    /// Create a new category
    async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, ApiError>;

    /// Update an existing category
    async fn update_category(&self, id: &str, draft: &CategoryDraft)
        -> Result<Category, ApiError>;
}
