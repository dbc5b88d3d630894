//! Form values and per-field bookkeeping for the category editor

use crate::state::{Category, CategoryDraft};
use std::collections::{HashMap, HashSet};

/// Fields of the category form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Title,
    Description,
    Guid,
    Parent,
}

impl FieldId {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Description => "Description",
            Self::Guid => "Short Link",
            Self::Parent => "Parent Category",
        }
    }
}

/// Current values of the category form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryValues {
    /// Present when editing an existing category
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub guid: String,
    /// Selected parent category id
    pub parent: Option<String>,
}

impl CategoryValues {
    /// Seed values from an existing category, flattening the populated
    /// parent reference down to its id
    pub fn from_category(category: &Category) -> Self {
        Self {
            id: Some(category.id.clone()),
            title: category.title.clone(),
            description: category.description.clone(),
            guid: category.guid.clone(),
            parent: category.parent.as_ref().map(|p| p.id.clone()),
        }
    }

    pub fn to_draft(&self) -> CategoryDraft {
        CategoryDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            guid: self.guid.clone(),
            parent: self.parent.clone(),
        }
    }

    /// Whether the field holds no usable value
    pub fn is_blank(&self, field: FieldId) -> bool {
        match field {
            FieldId::Title => self.title.is_empty(),
            FieldId::Description => self.description.is_empty(),
            FieldId::Guid => self.guid.is_empty(),
            FieldId::Parent => self.parent.is_none(),
        }
    }

    /// Text content of the field, for fields edited as free text
    pub fn text(&self, field: FieldId) -> Option<&str> {
        match field {
            FieldId::Title => Some(&self.title),
            FieldId::Description => Some(&self.description),
            FieldId::Guid => Some(&self.guid),
            FieldId::Parent => None,
        }
    }
}

/// Validation results keyed by field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    errors: HashMap<FieldId, &'static str>,
}

impl FieldErrors {
    pub fn insert(&mut self, field: FieldId, message: &'static str) {
        self.errors.insert(field, message);
    }

    pub fn get(&self, field: FieldId) -> Option<&'static str> {
        self.errors.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Fields the operator has interacted with
#[derive(Debug, Clone, Default)]
pub struct TouchedSet {
    touched: HashSet<FieldId>,
}

impl TouchedSet {
    pub fn mark(&mut self, field: FieldId) {
        self.touched.insert(field);
    }

    pub fn contains(&self, field: FieldId) -> bool {
        self.touched.contains(&field)
    }
}
