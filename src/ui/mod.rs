//! UI module for rendering the TUI

mod categories;
mod drawer;
mod field_renderer;
mod layout;

use crate::app::App;
use layout::render_scrollable_list;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Reserve the bottom line for the status bar
    let content_area = layout::create_layout(area);

    categories::draw(frame, content_area, app);

    // The editor drawer overlays the list when open
    if let Some(drawer) = &app.drawer {
        drawer::draw(frame, content_area, app, drawer);
    }

    layout::draw_status_bar(frame, app);
}
