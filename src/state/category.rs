//! Category data model matching the backend wire format

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A content category as served by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    /// Short link segment, unique across categories
    pub guid: String,
    /// Populated parent reference, absent for top-level categories
    #[serde(default)]
    pub parent: Option<CategoryRef>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Title of the parent category, if one is set
    pub fn parent_title(&self) -> Option<&str> {
        self.parent.as_ref().map(|p| p.title.as_str())
    }
}

/// Parent reference embedded in category documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub guid: String,
}

/// Payload for category create and update calls
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryDraft {
    pub title: String,
    pub description: String,
    pub guid: String,
    /// Parent category id; serialized as null so the backend clears the
    /// reference when the selection was removed
    pub parent: Option<String>,
}

/// Query parameters for category list calls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub s: Option<String>,
    pub s_type: Option<String>,
}

impl ListQuery {
    /// Query that searches category titles for the given text
    pub fn search_title(text: &str) -> Self {
        Self {
            s: Some(text.to_string()),
            s_type: Some("title".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category_json() -> &'static str {
        r#"{
            "_id": "64a1f2e8c9d4b8001f3a2b1c",
            "title": "Guides",
            "description": "Long-form guides",
            "guid": "guides",
            "parent": {
                "_id": "64a1f2e8c9d4b8001f3a2b00",
                "title": "Docs",
                "guid": "docs"
            },
            "createdAt": "2024-01-15T09:30:00.000Z",
            "updatedAt": "2024-02-01T12:00:00.000Z"
        }"#
    }

    mod category {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_deserialize_maps_mongo_id() {
            let category: Category = serde_json::from_str(category_json()).unwrap();
            assert_eq!(category.id, "64a1f2e8c9d4b8001f3a2b1c");
            assert_eq!(category.title, "Guides");
            assert_eq!(category.guid, "guides");
        }

        #[test]
        fn test_deserialize_populated_parent() {
            let category: Category = serde_json::from_str(category_json()).unwrap();
            let parent = category.parent.expect("parent should be populated");
            assert_eq!(parent.id, "64a1f2e8c9d4b8001f3a2b00");
            assert_eq!(parent.title, "Docs");
        }

        #[test]
        fn test_deserialize_missing_parent() {
            let json = r#"{
                "_id": "64a1f2e8c9d4b8001f3a2b1c",
                "title": "Guides",
                "description": "Long-form guides",
                "guid": "guides",
                "createdAt": "2024-01-15T09:30:00.000Z",
                "updatedAt": "2024-02-01T12:00:00.000Z"
            }"#;
            let category: Category = serde_json::from_str(json).unwrap();
            assert!(category.parent.is_none());
            assert!(category.parent_title().is_none());
        }

        #[test]
        fn test_deserialize_null_parent() {
            let json = r#"{
                "_id": "64a1f2e8c9d4b8001f3a2b1c",
                "title": "Guides",
                "description": "Long-form guides",
                "guid": "guides",
                "parent": null,
                "createdAt": "2024-01-15T09:30:00.000Z",
                "updatedAt": "2024-02-01T12:00:00.000Z"
            }"#;
            let category: Category = serde_json::from_str(json).unwrap();
            assert!(category.parent.is_none());
        }

        #[test]
        fn test_parent_title() {
            let category: Category = serde_json::from_str(category_json()).unwrap();
            assert_eq!(category.parent_title(), Some("Docs"));
        }
    }

    mod draft {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_serialize_with_parent() {
            let draft = CategoryDraft {
                title: "Guides".to_string(),
                description: "Long-form guides".to_string(),
                guid: "guides".to_string(),
                parent: Some("64a1f2e8c9d4b8001f3a2b00".to_string()),
            };
            let value = serde_json::to_value(&draft).unwrap();
            assert_eq!(value["title"], "Guides");
            assert_eq!(value["parent"], "64a1f2e8c9d4b8001f3a2b00");
        }

        #[test]
        fn test_serialize_without_parent_sends_null() {
            let draft = CategoryDraft {
                title: "Guides".to_string(),
                description: "Long-form guides".to_string(),
                guid: "guides".to_string(),
                parent: None,
            };
            let value = serde_json::to_value(&draft).unwrap();
            assert!(value.get("parent").is_some());
            assert!(value["parent"].is_null());
        }
    }

    mod list_query {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_default_has_no_filters() {
            let query = ListQuery::default();
            assert!(query.s.is_none());
            assert!(query.s_type.is_none());
        }

        #[test]
        fn test_search_title() {
            let query = ListQuery::search_title("gui");
            assert_eq!(query.s.as_deref(), Some("gui"));
            assert_eq!(query.s_type.as_deref(), Some("title"));
        }
    }
}
