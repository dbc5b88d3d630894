//! Category editor drawer, anchored to the right edge

use super::field_renderer::draw_field_with_value;
use super::render_scrollable_list;
use crate::app::App;
use crate::session::{FieldId, FormSession, UniquenessState};
use crate::state::{DrawerFocus, DrawerState};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

/// Braille spinner shown while the short link is being checked
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Draw the editor drawer over the category list
pub fn draw(frame: &mut Frame, area: Rect, app: &App, drawer: &DrawerState) {
    let width = (area.width * 3 / 5).clamp(44, 64).min(area.width);
    let drawer_area = Rect {
        x: area.x + area.width - width,
        y: area.y,
        width,
        height: area.height,
    };

    frame.render_widget(Clear, drawer_area);

    let block = Block::default()
        .title(drawer.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(block, drawer_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Description
            Constraint::Length(3), // Short link
            Constraint::Length(3), // Parent
            Constraint::Length(2), // Buttons
        ])
        .margin(1)
        .split(drawer_area);

    let values = drawer.session.values();

    draw_field_with_value(
        frame,
        chunks[0],
        FieldId::Title.label(),
        &values.title,
        drawer.focus == DrawerFocus::Title,
        false,
        error_span(&drawer.session, FieldId::Title),
    );

    draw_field_with_value(
        frame,
        chunks[1],
        FieldId::Description.label(),
        &values.description,
        drawer.focus == DrawerFocus::Description,
        true,
        error_span(&drawer.session, FieldId::Description),
    );

    draw_field_with_value(
        frame,
        chunks[2],
        FieldId::Guid.label(),
        &values.guid,
        drawer.focus == DrawerFocus::Guid,
        false,
        error_span(&drawer.session, FieldId::Guid)
            .or_else(|| guid_status_span(&drawer.session, app.tick_count)),
    );

    // The picker shows the search text while typing, the chosen title otherwise
    let parent_value = if drawer.picker.search.is_empty() {
        drawer.picker.selected_title.as_deref().unwrap_or("")
    } else {
        drawer.picker.search.as_str()
    };
    draw_field_with_value(
        frame,
        chunks[3],
        FieldId::Parent.label(),
        parent_value,
        drawer.focus == DrawerFocus::Parent,
        false,
        None,
    );

    draw_buttons(frame, chunks[4], drawer);

    if drawer.focus == DrawerFocus::Parent && drawer.picker.has_dropdown() {
        draw_parent_dropdown(frame, chunks[3], drawer);
    }
}

/// Validation message for the field, styled for the field title
fn error_span(session: &FormSession, field: FieldId) -> Option<Span<'static>> {
    session
        .field_error(field)
        .map(|message| Span::styled(message, Style::default().fg(Color::Red)))
}

/// Short-link check state, rendered next to the field label
fn guid_status_span(session: &FormSession, tick_count: u64) -> Option<Span<'static>> {
    match session.uniqueness() {
        UniquenessState::Unknown => None,
        UniquenessState::Debouncing => {
            Some(Span::styled("…", Style::default().fg(Color::DarkGray)))
        }
        UniquenessState::Checking => {
            let spinner = SPINNER_FRAMES[tick_count as usize % SPINNER_FRAMES.len()];
            Some(Span::styled(
                format!("{spinner} checking"),
                Style::default().fg(Color::Yellow),
            ))
        }
        UniquenessState::Exists => Some(Span::styled(
            "already in use",
            Style::default().fg(Color::Red),
        )),
        UniquenessState::Available => Some(Span::styled(
            "✓ available",
            Style::default().fg(Color::Green),
        )),
    }
}

/// Draw the Save and Cancel buttons; Save is dimmed until the session
/// accepts submissions
fn draw_buttons(frame: &mut Frame, area: Rect, drawer: &DrawerState) {
    let on_buttons = drawer.is_buttons_row_active();

    let save_style = if drawer.session.ready() {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let save_prefix = if on_buttons && drawer.selected_button == 0 {
        Span::styled("▸", Style::default().fg(Color::Cyan))
    } else {
        Span::raw(" ")
    };
    let cancel_prefix = if on_buttons && drawer.selected_button == 1 {
        Span::styled("▸", Style::default().fg(Color::Cyan))
    } else {
        Span::raw(" ")
    };

    let line = Line::from(vec![
        save_prefix,
        Span::styled("[ Save ]", save_style),
        Span::raw("  "),
        cancel_prefix,
        Span::styled("[ Cancel ]", Style::default()),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Draw the candidate dropdown under the parent field
fn draw_parent_dropdown(frame: &mut Frame, parent_area: Rect, drawer: &DrawerState) {
    let frame_area = frame.area();
    let below = parent_area.y.saturating_add(parent_area.height);
    // Keep the bottom status line clear
    let max_height = frame_area.height.saturating_sub(1).saturating_sub(below);
    let height = ((drawer.picker.candidates.len().min(5) as u16) + 2).min(max_height);
    if height < 3 {
        return;
    }

    let area = Rect {
        x: parent_area.x,
        y: below,
        width: parent_area.width,
        height,
    };

    frame.render_widget(Clear, area);

    let items: Vec<ListItem> = drawer
        .picker
        .candidates
        .iter()
        .enumerate()
        .map(|(idx, candidate)| {
            let is_highlighted = idx == drawer.picker.highlighted;
            let prefix = if is_highlighted { "▸" } else { " " };
            let style = if is_highlighted {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(&candidate.title, style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    render_scrollable_list(frame, area, list, drawer.picker.highlighted);
}
