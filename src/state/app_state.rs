//! Application state definitions

use crate::state::Category;

/// Sort field for the category list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategorySortField {
    #[default]
    Title,
    Guid,
    CreatedAt,
    UpdatedAt,
}

impl CategorySortField {
    pub fn next(&self) -> Self {
        match self {
            Self::Title => Self::Guid,
            Self::Guid => Self::CreatedAt,
            Self::CreatedAt => Self::UpdatedAt,
            Self::UpdatedAt => Self::Title,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Guid => "Link",
            Self::CreatedAt => "Created",
            Self::UpdatedAt => "Updated",
        }
    }

    pub fn as_config(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Guid => "guid",
            Self::CreatedAt => "created",
            Self::UpdatedAt => "updated",
        }
    }

    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "title" => Some(Self::Title),
            "guid" => Some(Self::Guid),
            "created" => Some(Self::CreatedAt),
            "updated" => Some(Self::UpdatedAt),
            _ => None,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }

    pub fn as_config(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn from_config(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// Transient notification shown in the status bar until the next keypress
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub message: String,
    pub severity: Severity,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    // Data
    pub categories: Vec<Category>,

    // Selection
    pub selected_index: usize,

    // Sorting
    pub sort_field: CategorySortField,
    pub sort_direction: SortDirection,

    // UI state
    pub backend_reachable: bool,
    pub toast: Option<Toast>,
}

impl AppState {
    /// Move selection down
    pub fn move_selection_down(&mut self) {
        let max = self.categories.len();
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Reset selection
    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
    }

    /// Keep the selection inside the list after a refresh shrank it
    pub fn clamp_selection(&mut self) {
        let max = self.categories.len();
        if max == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= max {
            self.selected_index = max - 1;
        }
    }

    /// Cycle sort field
    pub fn cycle_sort_field(&mut self) {
        self.sort_field = self.sort_field.next();
        self.reset_selection();
    }

    /// Toggle sort direction
    pub fn toggle_sort_direction(&mut self) {
        self.sort_direction = self.sort_direction.toggle();
        self.reset_selection();
    }

    /// Get categories in the current sort order
    pub fn sorted_categories(&self) -> Vec<&Category> {
        let mut categories: Vec<_> = self.categories.iter().collect();

        categories.sort_by(|a, b| {
            let cmp = match self.sort_field {
                CategorySortField::Title => a.title.cmp(&b.title),
                CategorySortField::Guid => a.guid.cmp(&b.guid),
                CategorySortField::CreatedAt => a.created_at.cmp(&b.created_at),
                CategorySortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            };

            match self.sort_direction {
                SortDirection::Asc => cmp,
                SortDirection::Desc => cmp.reverse(),
            }
        });

        categories
    }

    /// Get the category under the cursor, respecting the current sort order
    pub fn selected_category(&self) -> Option<&Category> {
        self.sorted_categories().get(self.selected_index).copied()
    }
}
