//! The form session behind the category editor drawer
//!
//! A session owns the draft values, validation, the short-link uniqueness
//! lifecycle and the save handshake. The shell hosting the session renders
//! from its accessors and applies the effects it emits; a failed save only
//! notifies, so the drawer stays open for a retry.

use std::mem;
use std::sync::Arc;

use tokio::sync::mpsc;
use uuid::Uuid;

use crate::api::CategoryService;
use crate::state::{Category, Severity};

use super::uniqueness::{ProbeEvent, ProbeRunner, ProbeTiming, UniquenessState};
use super::validate::{category_schema, Schema};
use super::values::{CategoryValues, FieldErrors, FieldId, TouchedSet};

/// Instructions for the shell hosting the session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// Show a transient notification
    Notify { message: String, severity: Severity },
    /// The category list is stale and should be reloaded
    RefreshCategories,
    /// Dismiss the editor drawer
    CloseDrawer,
}

pub struct FormSession {
    /// Correlates log lines for one drawer lifetime
    id: Uuid,
    service: Arc<dyn CategoryService>,
    timing: ProbeTiming,
    values: CategoryValues,
    /// Short link the record was loaded with; empty for new records
    initial_guid: String,
    schema: Schema,
    errors: FieldErrors,
    touched: TouchedSet,
    uniqueness: UniquenessState,
    probe: ProbeRunner,
    events: mpsc::UnboundedReceiver<ProbeEvent>,
    submitting: bool,
    effects: Vec<SessionEffect>,
}

impl FormSession {
    /// Session for a brand-new category
    pub fn new(service: Arc<dyn CategoryService>) -> Self {
        Self::with_timing(service, ProbeTiming::default())
    }

    pub fn with_timing(service: Arc<dyn CategoryService>, timing: ProbeTiming) -> Self {
        Self::build(service, timing, CategoryValues::default(), String::new())
    }

    /// Session editing an existing category
    pub fn edit(service: Arc<dyn CategoryService>, category: &Category) -> Self {
        Self::edit_with_timing(service, ProbeTiming::default(), category)
    }

    pub fn edit_with_timing(
        service: Arc<dyn CategoryService>,
        timing: ProbeTiming,
        category: &Category,
    ) -> Self {
        let values = CategoryValues::from_category(category);
        let initial_guid = category.guid.clone();
        Self::build(service, timing, values, initial_guid)
    }

    fn build(
        service: Arc<dyn CategoryService>,
        timing: ProbeTiming,
        values: CategoryValues,
        initial_guid: String,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let schema = category_schema();
        let errors = schema.validate(&values);

        let mut session = Self {
            id: Uuid::new_v4(),
            service,
            timing,
            values,
            initial_guid,
            schema,
            errors,
            touched: TouchedSet::default(),
            uniqueness: UniquenessState::Unknown,
            probe: ProbeRunner::new(events_tx),
            events: events_rx,
            submitting: false,
            effects: Vec::new(),
        };
        session.restart_guid_probe();
        session
    }

    pub fn values(&self) -> &CategoryValues {
        &self.values
    }

    pub fn uniqueness(&self) -> UniquenessState {
        self.uniqueness
    }

    /// Whether the session edits an existing record
    pub fn is_edit(&self) -> bool {
        self.values.id.is_some()
    }

    /// Validation message for the field, once the operator has touched it
    pub fn field_error(&self, field: FieldId) -> Option<&'static str> {
        if self.touched.contains(field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    /// Whether every validation rule passes
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether a save request would be accepted right now. Mirrors the
    /// enabled state of the save button.
    pub fn ready(&self) -> bool {
        self.is_valid() && !self.uniqueness.blocks_submission()
    }

    /// Replace the whole value of one field
    pub fn set_field(&mut self, field: FieldId, value: String) {
        if self.submitting {
            return;
        }

        match field {
            FieldId::Title => self.values.title = value,
            FieldId::Description => self.values.description = value,
            FieldId::Guid => self.values.guid = value,
            FieldId::Parent => {
                let parent = if value.is_empty() { None } else { Some(value) };
                self.set_parent(parent);
                return;
            }
        }

        self.touched.mark(field);
        self.revalidate();
        if field == FieldId::Guid {
            self.restart_guid_probe();
        }
    }

    /// Append one character to a text field
    pub fn input_char(&mut self, field: FieldId, c: char) {
        if let Some(text) = self.values.text(field) {
            let mut next = text.to_string();
            next.push(c);
            self.set_field(field, next);
        }
    }

    /// Delete the last character of a text field
    pub fn backspace(&mut self, field: FieldId) {
        if let Some(text) = self.values.text(field) {
            let mut next = text.to_string();
            next.pop();
            self.set_field(field, next);
        }
    }

    /// Select or clear the parent category
    pub fn set_parent(&mut self, parent: Option<String>) {
        if self.submitting {
            return;
        }
        self.values.parent = parent;
        self.touched.mark(FieldId::Parent);
        self.revalidate();
    }

    /// Drain probe events and fold them into the uniqueness state.
    /// Returns whether anything changed, so the caller knows to redraw.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        while let Ok(event) = self.events.try_recv() {
            match event {
                ProbeEvent::Started { generation } => {
                    if self.probe.is_current(generation)
                        && self.uniqueness == UniquenessState::Debouncing
                    {
                        changed |= self.set_uniqueness(UniquenessState::Checking);
                    }
                }
                ProbeEvent::Finished {
                    generation,
                    outcome,
                } => {
                    if !self.probe.is_current(generation) {
                        continue;
                    }
                    let next = match outcome {
                        Ok(true) => UniquenessState::Exists,
                        Ok(false) => UniquenessState::Available,
                        Err(error) => {
                            let session = self.id;
                            tracing::warn!("Session {session} short link check failed: {error}");
                            UniquenessState::Unknown
                        }
                    };
                    changed |= self.set_uniqueness(next);
                }
            }
        }

        changed
    }

    /// Drive the save handshake. When refused, required-field errors become
    /// visible on every field instead.
    pub async fn on_submission_requested(&mut self) {
        if self.submitting {
            return;
        }

        self.revalidate();
        if !self.ready() {
            self.touch_all();
            return;
        }

        self.submitting = true;
        let draft = self.values.to_draft();
        let result = match &self.values.id {
            Some(id) => self.service.update_category(id, &draft).await,
            None => self.service.create_category(&draft).await,
        };
        self.submitting = false;

        let session = self.id;
        match result {
            Ok(saved) => {
                let category = &saved.id;
                tracing::info!("Session {session} saved category {category}");
                let message = if self.is_edit() {
                    "Category updated."
                } else {
                    "Category created."
                };
                self.effects.push(SessionEffect::Notify {
                    message: message.to_string(),
                    severity: Severity::Success,
                });
                self.effects.push(SessionEffect::RefreshCategories);
                self.effects.push(SessionEffect::CloseDrawer);
            }
            Err(error) => {
                tracing::error!("Session {session} failed to save category: {error}");
                self.effects.push(SessionEffect::Notify {
                    message: "Failed to save the category.".to_string(),
                    severity: Severity::Error,
                });
            }
        }
    }

    /// Hand pending effects over to the shell
    pub fn take_effects(&mut self) -> Vec<SessionEffect> {
        mem::take(&mut self.effects)
    }

    fn revalidate(&mut self) {
        self.errors = self.schema.validate(&self.values);
    }

    fn touch_all(&mut self) {
        for field in [
            FieldId::Title,
            FieldId::Description,
            FieldId::Guid,
            FieldId::Parent,
        ] {
            self.touched.mark(field);
        }
    }

    /// Retire any in-flight probe, then decide what the new value needs.
    /// Runs on every short-link edit and once at construction.
    fn restart_guid_probe(&mut self) {
        self.probe.retire();

        // A record never collides with its own stored short link
        if self.values.id.is_some() && self.values.guid == self.initial_guid {
            self.set_uniqueness(UniquenessState::Available);
            return;
        }

        if self.values.guid.is_empty() {
            self.set_uniqueness(UniquenessState::Unknown);
            return;
        }

        self.set_uniqueness(UniquenessState::Debouncing);
        self.probe.schedule(
            self.values.guid.clone(),
            Arc::clone(&self.service),
            self.timing,
        );
    }

    fn set_uniqueness(&mut self, next: UniquenessState) -> bool {
        if self.uniqueness == next {
            return false;
        }
        let session = self.id;
        let from = self.uniqueness;
        tracing::debug!("Session {session} short link {from:?} -> {next:?}");
        self.uniqueness = next;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, MockCategoryService};
    use crate::session::uniqueness::{MIN_CHECKING_DELAY, SETTLE_DELAY};
    use crate::session::validate::REQUIRED_MESSAGE;
    use crate::state::CategoryRef;
    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;
    use reqwest::StatusCode;
    use std::time::Duration;

    /// Let spawned probes register their timers, move the paused clock,
    /// then let them observe the new time
    async fn advance(duration: Duration) {
        tokio::task::yield_now().await;
        tokio::time::advance(duration).await;
        tokio::task::yield_now().await;
    }

    fn saved_category(id: &str, title: &str, guid: &str) -> Category {
        Category {
            id: id.to_string(),
            title: title.to_string(),
            description: "Long-form guides".to_string(),
            guid: guid.to_string(),
            parent: None,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn existing_category() -> Category {
        Category {
            parent: Some(CategoryRef {
                id: "64a1f2e8c9d4b8001f3a2b00".to_string(),
                title: "Docs".to_string(),
                guid: "docs".to_string(),
            }),
            ..saved_category("64a1f2e8c9d4b8001f3a2b1c", "Guides", "guides")
        }
    }

    fn fill_valid(session: &mut FormSession) {
        session.set_field(FieldId::Title, "Guides".to_string());
        session.set_field(FieldId::Description, "Long-form guides".to_string());
        session.set_field(FieldId::Guid, "guides".to_string());
    }

    /// Run the probe scheduled for the current guid to completion
    async fn settle_probe(session: &mut FormSession) {
        advance(SETTLE_DELAY).await;
        session.poll();
        advance(MIN_CHECKING_DELAY).await;
        session.poll();
    }

    mod validation {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_new_session_starts_invalid() {
            let session = FormSession::new(Arc::new(MockCategoryService::new()));

            assert!(!session.is_valid());
            assert!(!session.ready());
            assert_eq!(session.uniqueness(), UniquenessState::Unknown);
        }

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_errors_stay_hidden_until_the_field_is_touched() {
            let mut session = FormSession::new(Arc::new(MockCategoryService::new()));
            assert_eq!(session.field_error(FieldId::Title), None);

            session.set_field(FieldId::Title, String::new());

            assert_eq!(session.field_error(FieldId::Title), Some(REQUIRED_MESSAGE));
        }

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_filling_required_fields_clears_their_errors() {
            let mut session = FormSession::new(Arc::new(MockCategoryService::new()));

            fill_valid(&mut session);

            assert!(session.is_valid());
            assert_eq!(session.field_error(FieldId::Title), None);
            assert_eq!(session.field_error(FieldId::Guid), None);
        }

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_typing_edits_one_character_at_a_time() {
            let mut session = FormSession::new(Arc::new(MockCategoryService::new()));

            session.input_char(FieldId::Title, 'H');
            session.input_char(FieldId::Title, 'i');
            assert_eq!(session.values().title, "Hi");

            session.backspace(FieldId::Title);
            assert_eq!(session.values().title, "H");
        }
    }

    mod uniqueness {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_probe_fires_once_the_short_link_settles() {
            let mut service = MockCategoryService::new();
            service
                .expect_guid_exists()
                .with(eq("guides"))
                .times(1)
                .returning(|_| Ok(false));
            let mut session = FormSession::new(Arc::new(service));

            fill_valid(&mut session);
            assert_eq!(session.uniqueness(), UniquenessState::Debouncing);

            advance(SETTLE_DELAY).await;
            session.poll();
            assert_eq!(session.uniqueness(), UniquenessState::Checking);

            advance(MIN_CHECKING_DELAY).await;
            session.poll();
            assert_eq!(session.uniqueness(), UniquenessState::Available);
            assert!(session.ready());
        }

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_rapid_edits_collapse_into_a_single_probe() {
            let mut service = MockCategoryService::new();
            service
                .expect_guid_exists()
                .with(eq("ab"))
                .times(1)
                .returning(|_| Ok(false));
            let mut session = FormSession::new(Arc::new(service));

            session.input_char(FieldId::Guid, 'a');
            advance(Duration::from_millis(600)).await;
            session.input_char(FieldId::Guid, 'b');

            settle_probe(&mut session).await;
            assert_eq!(session.uniqueness(), UniquenessState::Available);
        }

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_a_queued_result_goes_stale_when_the_value_changes() {
            let mut service = MockCategoryService::new();
            service
                .expect_guid_exists()
                .with(eq("guides"))
                .times(1)
                .returning(|_| Ok(true));
            let mut session = FormSession::new(Arc::new(service));

            fill_valid(&mut session);
            // Let the probe finish without draining its events
            advance(SETTLE_DELAY).await;
            advance(MIN_CHECKING_DELAY).await;

            session.backspace(FieldId::Guid);
            let changed = session.poll();

            assert!(!changed);
            assert_eq!(session.uniqueness(), UniquenessState::Debouncing);
        }

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_editing_a_record_skips_the_probe_for_its_own_guid() {
            // No expectations: a network call would panic the test
            let service = MockCategoryService::new();
            let session = FormSession::edit(Arc::new(service), &existing_category());

            assert_eq!(session.uniqueness(), UniquenessState::Available);
            assert!(session.ready());
        }

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_reverting_to_the_original_guid_cancels_the_probe() {
            // No expectations: a network call would panic the test
            let service = MockCategoryService::new();
            let mut session = FormSession::edit(Arc::new(service), &existing_category());

            session.input_char(FieldId::Guid, 'x');
            assert_eq!(session.uniqueness(), UniquenessState::Debouncing);

            advance(Duration::from_millis(500)).await;
            session.backspace(FieldId::Guid);
            assert_eq!(session.uniqueness(), UniquenessState::Available);

            advance(Duration::from_secs(5)).await;
            assert!(!session.poll());
            assert!(session.ready());
        }

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_clearing_the_guid_resets_to_unknown() {
            // No expectations: a network call would panic the test
            let service = MockCategoryService::new();
            let mut session = FormSession::new(Arc::new(service));

            session.input_char(FieldId::Guid, 'a');
            assert_eq!(session.uniqueness(), UniquenessState::Debouncing);

            session.backspace(FieldId::Guid);
            assert_eq!(session.uniqueness(), UniquenessState::Unknown);

            advance(Duration::from_secs(5)).await;
            assert!(!session.poll());
        }

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_probe_failure_leaves_the_answer_unknown() {
            let mut service = MockCategoryService::new();
            service.expect_guid_exists().times(1).returning(|_| {
                Err(ApiError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                })
            });
            let mut session = FormSession::new(Arc::new(service));

            fill_valid(&mut session);
            settle_probe(&mut session).await;

            // The backend still enforces uniqueness on save, so an
            // unanswered check does not block submission
            assert_eq!(session.uniqueness(), UniquenessState::Unknown);
            assert!(session.ready());
        }

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_checking_holds_for_the_minimum_display_time() {
            let mut service = MockCategoryService::new();
            service
                .expect_guid_exists()
                .times(1)
                .returning(|_| Ok(false));
            let mut session = FormSession::new(Arc::new(service));

            fill_valid(&mut session);
            advance(SETTLE_DELAY).await;
            session.poll();
            assert_eq!(session.uniqueness(), UniquenessState::Checking);

            advance(MIN_CHECKING_DELAY - Duration::from_millis(1)).await;
            session.poll();
            assert_eq!(session.uniqueness(), UniquenessState::Checking);

            advance(Duration::from_millis(1)).await;
            session.poll();
            assert_eq!(session.uniqueness(), UniquenessState::Available);
        }
    }

    mod readiness {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_not_ready_while_the_short_link_is_unsettled() {
            let mut service = MockCategoryService::new();
            service
                .expect_guid_exists()
                .times(1)
                .returning(|_| Ok(false));
            let mut session = FormSession::new(Arc::new(service));

            fill_valid(&mut session);
            assert!(session.is_valid());
            assert!(!session.ready());

            advance(SETTLE_DELAY).await;
            session.poll();
            assert_eq!(session.uniqueness(), UniquenessState::Checking);
            assert!(!session.ready());
        }

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_a_taken_short_link_blocks_submission() {
            let mut service = MockCategoryService::new();
            service
                .expect_guid_exists()
                .with(eq("guides"))
                .times(1)
                .returning(|_| Ok(true));
            let mut session = FormSession::new(Arc::new(service));

            fill_valid(&mut session);
            settle_probe(&mut session).await;

            assert_eq!(session.uniqueness(), UniquenessState::Exists);
            assert!(session.is_valid());
            assert!(!session.ready());

            // Even an explicit request must not reach the backend
            session.on_submission_requested().await;
            assert!(session.take_effects().is_empty());
        }
    }

    mod submission {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_create_sends_the_draft_and_emits_the_success_effects() {
            let mut service = MockCategoryService::new();
            service
                .expect_guid_exists()
                .times(1)
                .returning(|_| Ok(false));
            service
                .expect_create_category()
                .withf(|draft| {
                    draft.title == "Guides" && draft.guid == "guides" && draft.parent.is_none()
                })
                .times(1)
                .returning(|_| Ok(saved_category("64a1f2e8c9d4b8001f3a2b1c", "Guides", "guides")));
            let mut session = FormSession::new(Arc::new(service));

            fill_valid(&mut session);
            settle_probe(&mut session).await;
            session.on_submission_requested().await;

            assert_eq!(
                session.take_effects(),
                vec![
                    SessionEffect::Notify {
                        message: "Category created.".to_string(),
                        severity: Severity::Success,
                    },
                    SessionEffect::RefreshCategories,
                    SessionEffect::CloseDrawer,
                ]
            );
            assert!(session.take_effects().is_empty());
        }

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_update_patches_the_existing_record() {
            let mut service = MockCategoryService::new();
            service
                .expect_update_category()
                .withf(|id, draft| {
                    id == "64a1f2e8c9d4b8001f3a2b1c"
                        && draft.title == "Field Guides"
                        && draft.parent.is_none()
                })
                .times(1)
                .returning(|id, _| Ok(saved_category(id, "Field Guides", "guides")));
            let mut session = FormSession::edit(Arc::new(service), &existing_category());

            session.set_field(FieldId::Title, "Field Guides".to_string());
            session.set_parent(None);
            session.on_submission_requested().await;

            let effects = session.take_effects();
            assert_eq!(
                effects[0],
                SessionEffect::Notify {
                    message: "Category updated.".to_string(),
                    severity: Severity::Success,
                }
            );
            assert!(effects.contains(&SessionEffect::CloseDrawer));
        }

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_a_failed_save_keeps_the_session_open_for_a_retry() {
            let mut service = MockCategoryService::new();
            service
                .expect_guid_exists()
                .times(1)
                .returning(|_| Ok(false));
            service.expect_create_category().times(1).returning(|_| {
                Err(ApiError::Status {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                })
            });
            service
                .expect_create_category()
                .times(1)
                .returning(|_| Ok(saved_category("64a1f2e8c9d4b8001f3a2b1c", "Guides", "guides")));
            let mut session = FormSession::new(Arc::new(service));

            fill_valid(&mut session);
            settle_probe(&mut session).await;

            session.on_submission_requested().await;
            assert_eq!(
                session.take_effects(),
                vec![SessionEffect::Notify {
                    message: "Failed to save the category.".to_string(),
                    severity: Severity::Error,
                }]
            );
            assert!(session.ready());

            session.on_submission_requested().await;
            let effects = session.take_effects();
            assert!(effects.contains(&SessionEffect::CloseDrawer));
        }

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_an_invalid_submission_is_refused_and_surfaces_errors() {
            // No expectations: a network call would panic the test
            let service = MockCategoryService::new();
            let mut session = FormSession::new(Arc::new(service));

            session.on_submission_requested().await;

            assert!(session.take_effects().is_empty());
            assert_eq!(session.field_error(FieldId::Title), Some(REQUIRED_MESSAGE));
            assert_eq!(session.field_error(FieldId::Guid), Some(REQUIRED_MESSAGE));
        }

        #[tokio::test(flavor = "current_thread", start_paused = true)]
        async fn test_the_draft_carries_the_selected_parent() {
            let mut service = MockCategoryService::new();
            service
                .expect_guid_exists()
                .times(1)
                .returning(|_| Ok(false));
            service
                .expect_create_category()
                .withf(|draft| draft.parent.as_deref() == Some("64a1f2e8c9d4b8001f3a2b00"))
                .times(1)
                .returning(|_| Ok(saved_category("64a1f2e8c9d4b8001f3a2b1c", "Guides", "guides")));
            let mut session = FormSession::new(Arc::new(service));

            fill_valid(&mut session);
            session.set_parent(Some("64a1f2e8c9d4b8001f3a2b00".to_string()));
            settle_probe(&mut session).await;
            session.on_submission_requested().await;

            let effects = session.take_effects();
            assert!(effects.contains(&SessionEffect::RefreshCategories));
        }
    }
}
