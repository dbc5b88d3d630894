//! Declarative validation schema for the category form

use super::values::{CategoryValues, FieldErrors, FieldId};

/// Message shown for any missing required field
pub const REQUIRED_MESSAGE: &str = "Required field";

#[derive(Debug, Clone)]
struct Rule {
    field: FieldId,
    message: &'static str,
}

/// Set of rules evaluated together against the whole value set
#[derive(Debug, Clone, Default)]
pub struct Schema {
    rules: Vec<Rule>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule requiring the field to be non-blank
    pub fn required(mut self, field: FieldId, message: &'static str) -> Self {
        self.rules.push(Rule { field, message });
        self
    }

    pub fn validate(&self, values: &CategoryValues) -> FieldErrors {
        let mut errors = FieldErrors::default();
        for rule in &self.rules {
            if values.is_blank(rule.field) {
                errors.insert(rule.field, rule.message);
            }
        }
        errors
    }
}

/// Schema for the category editor: title, description and short link are
/// required; the parent reference is optional and may stay null
pub fn category_schema() -> Schema {
    Schema::new()
        .required(FieldId::Title, REQUIRED_MESSAGE)
        .required(FieldId::Description, REQUIRED_MESSAGE)
        .required(FieldId::Guid, REQUIRED_MESSAGE)
}
