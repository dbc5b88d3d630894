//! Application state and core logic

use crate::api::{CategoryService, HttpCategoryService, DEFAULT_API_URL};
use crate::config::TuiConfig;
use crate::session::{FieldId, FormSession, SessionEffect};
use crate::state::{
    AppState, CategorySortField, DrawerFocus, DrawerState, ListQuery, SortDirection, Toast,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use std::sync::Arc;
use std::time::Duration;

/// Public site origin used when none is configured
const DEFAULT_SITE_URL: &str = "http://127.0.0.1:3000";

/// Request timeout used when none is configured
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Category editor drawer, when open
    pub drawer: Option<DrawerState>,
    /// Backend client, shared with form sessions
    service: Arc<dyn CategoryService>,
    /// Loaded user configuration
    config: TuiConfig,
    /// Public site origin for copied category links
    site_url: String,
    /// Whether the app should quit
    quit: bool,
    /// Monotonic counter driving the checking spinner
    pub tick_count: u64,
}

impl App {
    /// Create a new App instance against the configured backend
    pub async fn new() -> Result<Self> {
        let config = TuiConfig::load().unwrap_or_default();

        let api_url = std::env::var("VELLUM_API_URL")
            .ok()
            .or_else(|| config.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let timeout =
            Duration::from_secs(config.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
        let service: Arc<dyn CategoryService> =
            Arc::new(HttpCategoryService::new(&api_url, timeout)?);

        let mut app = Self::from_parts(service, config);
        app.reload_categories().await;
        Ok(app)
    }

    fn from_parts(service: Arc<dyn CategoryService>, config: TuiConfig) -> Self {
        let mut state = AppState::default();
        if let Some(field) = config.category_sort_field.as_deref() {
            if let Some(field) = CategorySortField::from_config(field) {
                state.sort_field = field;
            }
        }
        if let Some(direction) = config.category_sort_direction.as_deref() {
            if let Some(direction) = SortDirection::from_config(direction) {
                state.sort_direction = direction;
            }
        }
        let site_url = config
            .site_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SITE_URL.to_string());

        Self {
            state,
            drawer: None,
            service,
            config,
            site_url,
            quit: false,
            tick_count: 0,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Advance one UI tick: feed probe results into the open session
    pub fn tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        if let Some(drawer) = self.drawer.as_mut() {
            drawer.session.poll();
        }
    }

    /// Fetch the category list, tracking backend reachability
    pub async fn reload_categories(&mut self) {
        match self.service.list_categories(&ListQuery::default()).await {
            Ok(categories) => {
                self.state.categories = categories;
                self.state.backend_reachable = true;
                self.state.clamp_selection();
            }
            Err(error) => {
                tracing::warn!("Failed to load categories: {error}");
                self.state.backend_reachable = false;
                self.state.toast = Some(Toast::error("Failed to load categories."));
            }
        }
    }

    /// Route a key event to the drawer or the category list
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        // Any keypress dismisses the current toast
        self.state.toast = None;

        if self.drawer.is_some() {
            self.handle_drawer_key(key).await
        } else {
            self.handle_categories_key(key).await
        }
    }

    /// Route mouse events; only the list reacts to scrolling
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        self.state.toast = None;

        if self.drawer.is_some() {
            return;
        }
        match mouse.kind {
            MouseEventKind::ScrollDown => self.state.move_selection_down(),
            MouseEventKind::ScrollUp => self.state.move_selection_up(),
            _ => {}
        }
    }

    async fn handle_categories_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => self.state.move_selection_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.move_selection_up(),
            KeyCode::Char('n') => self.open_create_drawer(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit_drawer(),
            KeyCode::Char('r') => self.reload_categories().await,
            KeyCode::Char('s') => {
                self.state.cycle_sort_field();
                self.persist_sort_prefs();
            }
            KeyCode::Char('S') => {
                self.state.toggle_sort_direction();
                self.persist_sort_prefs();
            }
            KeyCode::Char('y') => self.copy_selected_link(),
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
        Ok(())
    }

    async fn handle_drawer_key(&mut self, key: KeyEvent) -> Result<()> {
        // Ctrl+S saves from any field
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.submit_drawer().await;
            return Ok(());
        }
        if key.code == KeyCode::Esc {
            self.close_drawer();
            return Ok(());
        }

        let Some(drawer) = self.drawer.as_mut() else {
            return Ok(());
        };

        let mut refresh_picker = false;
        let mut submit = false;
        let mut close = false;

        match (drawer.focus, key.code) {
            (_, KeyCode::Tab) => drawer.focus_next(),
            (_, KeyCode::BackTab) => drawer.focus_prev(),

            (DrawerFocus::Title, KeyCode::Char(c)) => drawer.session.input_char(FieldId::Title, c),
            (DrawerFocus::Title, KeyCode::Backspace) => drawer.session.backspace(FieldId::Title),

            (DrawerFocus::Description, KeyCode::Char(c)) => {
                drawer.session.input_char(FieldId::Description, c)
            }
            (DrawerFocus::Description, KeyCode::Backspace) => {
                drawer.session.backspace(FieldId::Description)
            }
            // Enter in the description field adds a newline
            (DrawerFocus::Description, KeyCode::Enter) => {
                drawer.session.input_char(FieldId::Description, '\n')
            }

            (DrawerFocus::Guid, KeyCode::Char(c)) => drawer.session.input_char(FieldId::Guid, c),
            (DrawerFocus::Guid, KeyCode::Backspace) => drawer.session.backspace(FieldId::Guid),

            (DrawerFocus::Parent, KeyCode::Char('x'))
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                drawer.session.set_parent(None);
                drawer.picker.selected_title = None;
            }
            (DrawerFocus::Parent, KeyCode::Char(c)) => {
                drawer.picker.search.push(c);
                refresh_picker = true;
            }
            (DrawerFocus::Parent, KeyCode::Backspace) => {
                if drawer.picker.search.pop().is_some() {
                    refresh_picker = true;
                } else {
                    drawer.session.set_parent(None);
                    drawer.picker.selected_title = None;
                }
            }
            (DrawerFocus::Parent, KeyCode::Delete) => {
                drawer.session.set_parent(None);
                drawer.picker.selected_title = None;
            }
            (DrawerFocus::Parent, KeyCode::Down) => drawer.picker.highlight_down(),
            (DrawerFocus::Parent, KeyCode::Up) => drawer.picker.highlight_up(),
            (DrawerFocus::Parent, KeyCode::Enter) => {
                if let Some(candidate) = drawer.picker.highlighted_candidate().cloned() {
                    drawer.session.set_parent(Some(candidate.id));
                    drawer.picker.selected_title = Some(candidate.title);
                    drawer.picker.search.clear();
                    drawer.picker.clear_candidates();
                }
            }

            (DrawerFocus::Buttons, KeyCode::Left) => drawer.prev_button(),
            (DrawerFocus::Buttons, KeyCode::Right) => drawer.next_button(),
            // Button order: 0=Save, 1=Cancel
            (DrawerFocus::Buttons, KeyCode::Enter) => {
                if drawer.selected_button == 0 {
                    submit = true;
                } else {
                    close = true;
                }
            }

            _ => {}
        }

        if close {
            self.close_drawer();
            return Ok(());
        }
        if submit {
            self.submit_drawer().await;
            return Ok(());
        }
        if refresh_picker {
            self.refresh_parent_candidates().await;
        }
        Ok(())
    }

    fn open_create_drawer(&mut self) {
        let session = FormSession::new(Arc::clone(&self.service));
        self.drawer = Some(DrawerState::create(session));
    }

    fn open_edit_drawer(&mut self) {
        if let Some(category) = self.state.selected_category().cloned() {
            let session = FormSession::edit(Arc::clone(&self.service), &category);
            self.drawer = Some(DrawerState::edit(session, &category));
        }
    }

    fn close_drawer(&mut self) {
        self.drawer = None;
    }

    async fn submit_drawer(&mut self) {
        let Some(drawer) = self.drawer.as_mut() else {
            return;
        };
        // Save is inert while the session is not ready
        if !drawer.session.ready() {
            return;
        }
        drawer.session.on_submission_requested().await;
        self.apply_session_effects().await;
    }

    /// Apply the effects a session emitted after a save attempt
    async fn apply_session_effects(&mut self) {
        let effects = match self.drawer.as_mut() {
            Some(drawer) => drawer.session.take_effects(),
            None => return,
        };

        for effect in effects {
            match effect {
                SessionEffect::Notify { message, severity } => {
                    self.state.toast = Some(Toast { message, severity });
                }
                SessionEffect::RefreshCategories => self.reload_categories().await,
                SessionEffect::CloseDrawer => self.drawer = None,
            }
        }
    }

    /// Re-run the parent search for the text typed into the picker
    async fn refresh_parent_candidates(&mut self) {
        let search = match self.drawer.as_ref() {
            Some(drawer) => drawer.picker.search.clone(),
            None => return,
        };

        if search.is_empty() {
            if let Some(drawer) = self.drawer.as_mut() {
                drawer.picker.clear_candidates();
            }
            return;
        }

        match self
            .service
            .list_categories(&ListQuery::search_title(&search))
            .await
        {
            Ok(categories) => {
                if let Some(drawer) = self.drawer.as_mut() {
                    drawer.picker.set_candidates(&categories);
                }
            }
            Err(error) => {
                tracing::warn!("Parent lookup failed: {error}");
            }
        }
    }

    fn persist_sort_prefs(&mut self) {
        self.config.category_sort_field = Some(self.state.sort_field.as_config().to_string());
        self.config.category_sort_direction =
            Some(self.state.sort_direction.as_config().to_string());
        if let Err(error) = self.config.save() {
            tracing::debug!("Failed to persist sort preferences: {error}");
        }
    }

    /// Public link for a category on the configured site
    fn category_link(&self, guid: &str) -> String {
        format!("{}/{}", self.site_url.trim_end_matches('/'), guid)
    }

    /// Copy the public link of the selected category
    fn copy_selected_link(&mut self) {
        let Some(category) = self.state.selected_category() else {
            return;
        };
        let link = self.category_link(&category.guid);

        match self.copy_to_clipboard(&link) {
            Ok(()) => self.state.toast = Some(Toast::success("Link copied to clipboard.")),
            Err(error) => {
                tracing::warn!("Clipboard copy failed: {error}");
                self.state.toast = Some(Toast::error("Failed to copy the link."));
            }
        }
    }

    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        use arboard::Clipboard;
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }
}
