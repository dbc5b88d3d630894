//! Layout helpers and the status bar

use crate::app::App;
use crate::state::Severity;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{List, ListState, Paragraph},
    Frame,
};

/// Create the main layout, reserving the bottom line for the status bar
pub fn create_layout(area: Rect) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    chunks[0]
}

/// Render a list, scrolling as needed to keep the given index visible
pub fn render_scrollable_list(frame: &mut Frame, area: Rect, list: List, selected_index: usize) {
    let mut state = ListState::default().with_selected(Some(selected_index));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    // Backend reachability
    let conn_status = if app.state.backend_reachable {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::Red))
    };
    spans.push(conn_status);

    let hints = if app.drawer.is_some() {
        "Tab:next  ^S:save  Esc:cancel"
    } else {
        "j/k:nav  Enter:edit  n:new  r:refresh  s/S:sort  y:copy"
    };
    spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));

    // Transient notification
    if let Some(toast) = &app.state.toast {
        let color = match toast.severity {
            Severity::Success => Color::Green,
            Severity::Error => Color::Red,
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(&toast.message, Style::default().fg(color)));
    }

    let quit_hint = " ^C:quit ";

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    // Render quit hint on the right
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}
