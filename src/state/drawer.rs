//! Drawer shell state for the category editor

use crate::session::FormSession;
use crate::state::Category;

/// Focusable slots inside the drawer, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawerFocus {
    #[default]
    Title,
    Description,
    Guid,
    Parent,
    Buttons,
}

impl DrawerFocus {
    pub fn next(&self) -> Self {
        match self {
            Self::Title => Self::Description,
            Self::Description => Self::Guid,
            Self::Guid => Self::Parent,
            Self::Parent => Self::Buttons,
            Self::Buttons => Self::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Self::Title => Self::Buttons,
            Self::Description => Self::Title,
            Self::Guid => Self::Description,
            Self::Parent => Self::Guid,
            Self::Buttons => Self::Parent,
        }
    }
}

/// A selectable entry in the parent picker dropdown
#[derive(Debug, Clone, PartialEq)]
pub struct ParentCandidate {
    pub id: String,
    pub title: String,
}

impl From<&Category> for ParentCandidate {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            title: category.title.clone(),
        }
    }
}

/// Search-as-you-type state for the parent selection widget
#[derive(Debug, Clone, Default)]
pub struct ParentPicker {
    /// Text typed into the picker; relayed to the backend as a title search
    pub search: String,
    pub candidates: Vec<ParentCandidate>,
    pub highlighted: usize,
    /// Title of the currently chosen parent, for display
    pub selected_title: Option<String>,
}

impl ParentPicker {
    /// Replace the candidate list from a fresh search response
    pub fn set_candidates(&mut self, categories: &[Category]) {
        self.candidates = categories.iter().map(ParentCandidate::from).collect();
        self.highlighted = 0;
    }

    pub fn clear_candidates(&mut self) {
        self.candidates.clear();
        self.highlighted = 0;
    }

    pub fn highlight_down(&mut self) {
        if !self.candidates.is_empty() && self.highlighted < self.candidates.len() - 1 {
            self.highlighted += 1;
        }
    }

    pub fn highlight_up(&mut self) {
        if self.highlighted > 0 {
            self.highlighted -= 1;
        }
    }

    pub fn highlighted_candidate(&self) -> Option<&ParentCandidate> {
        self.candidates.get(self.highlighted)
    }

    /// Whether the dropdown should be rendered
    pub fn has_dropdown(&self) -> bool {
        !self.candidates.is_empty()
    }
}

/// State for the category editor drawer: the form session plus the
/// shell-side focus and picker bookkeeping
pub struct DrawerState {
    pub session: FormSession,
    pub focus: DrawerFocus,
    pub picker: ParentPicker,
    /// Which button is selected on the buttons row (0=Save, 1=Cancel)
    pub selected_button: usize,
}

impl DrawerState {
    /// Drawer for creating a new category
    pub fn create(session: FormSession) -> Self {
        Self {
            session,
            focus: DrawerFocus::default(),
            picker: ParentPicker::default(),
            selected_button: 0,
        }
    }

    /// Drawer for editing an existing category
    pub fn edit(session: FormSession, category: &Category) -> Self {
        let mut drawer = Self::create(session);
        drawer.picker.selected_title = category.parent_title().map(str::to_string);
        drawer
    }

    pub fn title(&self) -> &'static str {
        if self.session.is_edit() {
            " Edit Category "
        } else {
            " New Category "
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Returns true if the buttons row is currently active
    pub fn is_buttons_row_active(&self) -> bool {
        self.focus == DrawerFocus::Buttons
    }

    /// Move to the next button (wraps around)
    pub fn next_button(&mut self) {
        self.selected_button = (self.selected_button + 1) % 2;
    }

    /// Move to the previous button (wraps around)
    pub fn prev_button(&mut self) {
        self.next_button();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockCategoryService;
    use chrono::TimeZone;
    use chrono::Utc;
    use std::sync::Arc;

    fn new_session() -> FormSession {
        FormSession::new(Arc::new(MockCategoryService::new()))
    }

    fn category_with_parent() -> Category {
        Category {
            id: "64a1f2e8c9d4b8001f3a2b1c".to_string(),
            title: "Guides".to_string(),
            description: "Long-form guides".to_string(),
            guid: "guides".to_string(),
            parent: Some(crate::state::CategoryRef {
                id: "64a1f2e8c9d4b8001f3a2b00".to_string(),
                title: "Docs".to_string(),
                guid: "docs".to_string(),
            }),
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
        }
    }

    mod focus {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_next_cycles_through_all_slots() {
            let mut focus = DrawerFocus::Title;
            for _ in 0..5 {
                focus = focus.next();
            }
            assert_eq!(focus, DrawerFocus::Title);
        }

        #[test]
        fn test_prev_is_inverse_of_next() {
            for focus in [
                DrawerFocus::Title,
                DrawerFocus::Description,
                DrawerFocus::Guid,
                DrawerFocus::Parent,
                DrawerFocus::Buttons,
            ] {
                assert_eq!(focus.next().prev(), focus);
            }
        }
    }

    mod picker {
        use super::*;
        use pretty_assertions::assert_eq;

        fn picker_with_candidates(count: usize) -> ParentPicker {
            ParentPicker {
                candidates: (0..count)
                    .map(|i| ParentCandidate {
                        id: format!("id-{i}"),
                        title: format!("Category {i}"),
                    })
                    .collect(),
                ..ParentPicker::default()
            }
        }

        #[test]
        fn test_highlight_down_stops_at_end() {
            let mut picker = picker_with_candidates(2);
            picker.highlight_down();
            picker.highlight_down();
            picker.highlight_down();
            assert_eq!(picker.highlighted, 1);
        }

        #[test]
        fn test_highlight_up_stops_at_zero() {
            let mut picker = picker_with_candidates(2);
            picker.highlight_up();
            assert_eq!(picker.highlighted, 0);
        }

        #[test]
        fn test_highlight_on_empty_candidates() {
            let mut picker = ParentPicker::default();
            picker.highlight_down();
            assert_eq!(picker.highlighted, 0);
            assert!(picker.highlighted_candidate().is_none());
        }

        #[test]
        fn test_set_candidates_resets_highlight() {
            let mut picker = picker_with_candidates(3);
            picker.highlighted = 2;
            picker.set_candidates(&[]);
            assert_eq!(picker.highlighted, 0);
            assert!(!picker.has_dropdown());
        }
    }

    mod drawer_state {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_create_defaults() {
            let drawer = DrawerState::create(new_session());
            assert_eq!(drawer.focus, DrawerFocus::Title);
            assert_eq!(drawer.selected_button, 0);
            assert!(drawer.picker.selected_title.is_none());
            assert_eq!(drawer.title(), " New Category ");
        }

        #[test]
        fn test_edit_picks_up_parent_title() {
            let category = category_with_parent();
            let session =
                FormSession::edit(Arc::new(MockCategoryService::new()), &category);
            let drawer = DrawerState::edit(session, &category);
            assert_eq!(drawer.picker.selected_title.as_deref(), Some("Docs"));
            assert_eq!(drawer.title(), " Edit Category ");
        }

        #[test]
        fn test_button_toggle_wraps() {
            let mut drawer = DrawerState::create(new_session());
            drawer.next_button();
            assert_eq!(drawer.selected_button, 1);
            drawer.next_button();
            assert_eq!(drawer.selected_button, 0);
            drawer.prev_button();
            assert_eq!(drawer.selected_button, 1);
        }
    }
}
