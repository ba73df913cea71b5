//! Home menu

use super::components::centered_rect;
use super::render_scrollable_list;
use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let greeting = app
        .store
        .user
        .user
        .as_ref()
        .map(|u| format!(" Welcome, {} ", u.full_name()))
        .unwrap_or_else(|| " Welcome ".to_string());

    let menu = app.home_menu();
    let items: Vec<ListItem> = menu
        .iter()
        .enumerate()
        .map(|(idx, entry)| {
            let is_selected = idx == app.state.selected_index;
            let style = if is_selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let prefix = if is_selected { "▸ " } else { "  " };
            ListItem::new(Line::from(Span::styled(
                format!("{}{}", prefix, entry.label()),
                style,
            )))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(greeting)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    let menu_area = centered_rect(area, 44, menu.len() as u16 + 2);
    render_scrollable_list(frame, menu_area, list, app.state.selected_index);
}
