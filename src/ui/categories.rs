//! Category list view

use super::render_scrollable_list;
use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Draw the category list
pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let sorted_categories = app.state.sorted_categories();

    // The drawer takes focus away from the list
    let border_color = if app.drawer.is_none() {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    if sorted_categories.is_empty() {
        let content = Paragraph::new("No categories found.\nPress 'n' to create a new category.")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(" Categories ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border_color)),
            );
        frame.render_widget(content, area);
        return;
    }

    // Split area for header and list
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let sort_label = format!(
        "Sort: {} {}",
        app.state.sort_field.label(),
        app.state.sort_direction.symbol()
    );
    let count_label = format!("({} categories)", sorted_categories.len());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(sort_label, Style::default().fg(Color::Cyan)),
        Span::styled(" [s]cycle [S]dir", Style::default().fg(Color::DarkGray)),
        Span::raw(" | "),
        Span::styled(count_label, Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = sorted_categories
        .iter()
        .enumerate()
        .map(|(idx, category)| {
            let is_selected = idx == app.state.selected_index;

            let prefix = if is_selected { "▸" } else { " " };
            let link = format!("/{}", category.guid);
            let updated = category.updated_at.format("%Y-%m-%d").to_string();

            let style = if is_selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };

            let mut spans = vec![
                Span::styled(prefix, style),
                Span::styled(&category.title, style),
                Span::raw(" "),
                Span::styled(link, Style::default().fg(Color::Cyan)),
            ];

            if let Some(parent) = category.parent_title() {
                spans.push(Span::raw(" "));
                spans.push(Span::styled(
                    format!("· {parent}"),
                    Style::default().fg(Color::DarkGray),
                ));
            }

            spans.push(Span::raw(" "));
            spans.push(Span::styled(updated, Style::default().fg(Color::DarkGray)));

            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Categories ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color)),
    );

    render_scrollable_list(frame, chunks[1], list, app.state.selected_index);
}
