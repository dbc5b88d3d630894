//! REST client for communicating with the Vellum backend
//!
//! Thin typed wrapper over reqwest; every call returns the decoded
//! response body or an [`ApiError`].

use crate::api::{ApiError, CategoryService};
use crate::state::{Category, CategoryDraft, ListQuery};
use async_trait::async_trait;
use std::time::Duration;

/// Default backend address
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:4000/api";

/// Client for the Vellum REST API
pub struct HttpCategoryService {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCategoryService {
    /// Create a new client for the given base URL
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status {
                status: response.status(),
            })
        }
    }
}

#[async_trait]
impl CategoryService for HttpCategoryService {
    async fn list_categories(&self, query: &ListQuery) -> Result<Vec<Category>, ApiError> {
        let mut request = self.http.get(self.url("/categories"));
        if let Some(s) = &query.s {
            request = request.query(&[("s", s.as_str())]);
        }
        if let Some(s_type) = &query.s_type {
            request = request.query(&[("sType", s_type.as_str())]);
        }
        let response = Self::check(request.send().await?)?;
        Ok(response.json().await?)
    }

    async fn guid_exists(&self, guid: &str) -> Result<bool, ApiError> {
        let response = self
            .http
            .get(self.url("/categories/guid-exists"))
            .query(&[("guid", guid)])
            .send()
            .await?;
        let response = Self::check(response)?;
        Ok(response.json().await?)
    }

    async fn create_category(&self, draft: &CategoryDraft) -> Result<Category, ApiError> {
        let response = self
            .http
            .post(self.url("/categories"))
            .json(draft)
            .send()
            .await?;
        let response = Self::check(response)?;
        Ok(response.json().await?)
    }

    async fn update_category(
        &self,
        id: &str,
        draft: &CategoryDraft,
    ) -> Result<Category, ApiError> {
        let response = self
            .http
            .patch(self.url(&format!("/categories/{id}")))
            .json(draft)
            .send()
            .await?;
        let response = Self::check(response)?;
        Ok(response.json().await?)
    }
}
