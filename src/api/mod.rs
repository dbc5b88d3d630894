//! Backend client module for REST communication

mod client;
mod error;
mod traits;

pub use client::{HttpCategoryService, DEFAULT_API_URL};
pub use error::ApiError;
pub use traits::CategoryService;

#[cfg(test)]
pub use traits::MockCategoryService;
