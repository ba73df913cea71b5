//! The user's applications: list and read-only detail

use super::widgets::{render_placeholder, status_span};
use super::render_scrollable_list;
use crate::app::App;
use crate::state::models::{format_date, Application, ApplicationItem, COMMENTABLE_FIELDS};
use crate::state::text::parse_paragraphs;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// One row of an application list
pub(super) fn application_row(item: &ApplicationItem, is_selected: bool, show_author: bool) -> ListItem<'static> {
    let prefix = if is_selected { "▸" } else { " " };
    let title_style = if is_selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::raw(prefix),
        Span::styled(format!("#{:<5}", item.id), Style::default().fg(Color::Cyan)),
        Span::styled(item.title.clone(), title_style),
        Span::raw(" "),
        status_span(&item.status),
    ];
    if item.needs_consultation {
        spans.push(Span::styled(" ?", Style::default().fg(Color::Yellow)));
    }

    let mut details = vec![
        Span::raw("        "),
        Span::styled(item.company.clone(), Style::default().fg(Color::Gray)),
        Span::styled(
            format!("  {}", format_date(&item.creation_date)),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if show_author {
        details.push(Span::styled(
            format!("  {} <{}>", item.author_name, item.author_email),
            Style::default().fg(Color::DarkGray),
        ));
    }

    ListItem::new(vec![Line::from(spans), Line::from(details)])
}

/// Filter input shown above the list
fn filter_bar(query: &str, editing: bool) -> Paragraph<'static> {
    let (text, style) = if query.is_empty() && !editing {
        ("Press / to search by title".to_string(), Style::default().fg(Color::DarkGray))
    } else if editing {
        (format!("{}_", query), Style::default().fg(Color::White))
    } else {
        (query.to_string(), Style::default().fg(Color::Cyan))
    };
    let border = if editing { Color::Cyan } else { Color::DarkGray };
    Paragraph::new(text).style(style).block(
        Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    )
}

/// Placeholder when no application passes the filter
fn no_match_message(query: &str) -> String {
    format!("Nothing matches \"{}\".\nPress Esc to clear the search.", query)
}

/// Draw the list of applications authored by the user, newest first
pub fn draw_list(frame: &mut Frame, area: Rect, app: &App) {
    let slice = &app.store.application;
    let title = "My applications";

    if slice.applications.is_empty() {
        let (message, color) = if slice.is_loading {
            ("Loading applications...", Color::DarkGray)
        } else if let Some(error) = &slice.error {
            (error.as_str(), Color::Red)
        } else {
            ("No applications yet.\nPress 'n' to submit a new one.", Color::DarkGray)
        };
        render_placeholder(frame, area, title, message, color);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let filter = &app.state.list_filter;
    frame.render_widget(filter_bar(&filter.query, filter.editing), chunks[0]);

    let visible = app.visible_applications();
    if visible.is_empty() {
        render_placeholder(
            frame,
            chunks[1],
            title,
            &no_match_message(&filter.query),
            Color::DarkGray,
        );
        return;
    }

    let items: Vec<ListItem> = visible
        .iter()
        .enumerate()
        .map(|(idx, item)| application_row(item, idx == app.state.selected_index, false))
        .collect();

    let count = if filter.is_active() {
        format!("{} of {}", visible.len(), slice.applications.len())
    } else {
        slice.applications.len().to_string()
    };
    let list = List::new(items).block(
        Block::default()
            .title(format!(" {} ({}) ", title, count))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    render_scrollable_list(frame, chunks[1], list, app.state.selected_index);
}

/// Render free text as paragraphs, with titles emphasised
pub(super) fn paragraph_lines(text: &str) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for paragraph in parse_paragraphs(text) {
        if paragraph.is_title() {
            lines.push(Line::from(Span::styled(
                paragraph.text,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
        } else {
            lines.extend(paragraph.text.lines().map(|l| Line::from(l.to_string())));
        }
        lines.push(Line::from(""));
    }
    lines.pop();
    lines
}

/// Header lines of an application: title, status, author, dates
pub(super) fn header_lines(application: &Application) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    vec![
        Line::from(vec![
            Span::styled(
                format!("#{} ", application.id),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                application.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            status_span(&application.status),
        ]),
        Line::from(vec![
            Span::styled("Author: ", label),
            Span::raw(application.author_name()),
            Span::styled(
                format!("  {}  {}", application.author_email, application.author_phone),
                label,
            ),
        ]),
        Line::from(vec![
            Span::styled("Submitted: ", label),
            Span::raw(format_date(&application.creation_date)),
            Span::styled("  Consultation: ", label),
            Span::raw(if application.needs_consultation { "needed" } else { "not needed" }),
        ]),
    ]
}

/// Full read-only rendering of an application
fn application_lines(application: &Application) -> Vec<Line<'static>> {
    let mut lines = header_lines(application);
    for (code, label) in COMMENTABLE_FIELDS.iter().skip(1) {
        let text = application.field_text(code);
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            label.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        if text.trim().is_empty() {
            lines.push(Line::from(Span::styled("-", Style::default().fg(Color::DarkGray))));
        } else {
            lines.extend(paragraph_lines(&text));
        }
    }
    lines
}

/// Draw one of the user's applications
pub fn draw_detail(frame: &mut Frame, area: Rect, app: &App) {
    let slice = &app.store.coordination;
    let Some(detail) = app.current_detail() else {
        let (message, color) = match &slice.error {
            Some(error) if !slice.is_loading_detail => (error.as_str(), Color::Red),
            _ => ("Loading application...", Color::DarkGray),
        };
        render_placeholder(frame, area, "Application", message, color);
        return;
    };

    let content = Paragraph::new(application_lines(&detail.application))
        .wrap(Wrap { trim: false })
        .scroll((app.state.scroll_offset as u16, 0))
        .block(
            Block::default()
                .title(" Application ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(content, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_paragraph_lines_separate_blocks() {
        let lines = paragraph_lines("#### Goals\n\nFirst line\nsecond line\n\nLast");
        assert_eq!(
            plain(&lines),
            vec!["Goals", "", "First line", "second line", "", "Last"]
        );
        assert_eq!(lines[0].spans[0].style.fg, Some(Color::Yellow));
    }

    #[test]
    fn test_application_lines_mark_empty_fields() {
        let application = Application {
            id: 3,
            title: "Campus map".into(),
            goal: "Help freshmen".into(),
            ..Default::default()
        };
        let text = plain(&application_lines(&application));
        assert!(text[0].starts_with("#3 Campus map"));
        let goal = text.iter().position(|l| l == "Goal").unwrap_or(0);
        assert_eq!(text[goal + 1], "Help freshmen");
        let barrier = text.iter().position(|l| l == "Barrier").unwrap_or(0);
        assert_eq!(text[barrier + 1], "-");
    }
}
