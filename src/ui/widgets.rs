//! Reusable UI widget helpers

use crate::state::models::Status;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Span,
    widgets::{Block, Borders, List, ListState, Paragraph},
    Frame,
};

/// Render a scrollable list that keeps the selected item visible.
///
/// ```ignore
/// let list = List::new(items).block(block);
/// render_scrollable_list(frame, area, list, app.state.selected_index);
/// ```
pub fn render_scrollable_list(frame: &mut Frame, area: Rect, list: List, selected_index: usize) {
    let mut list_state = ListState::default().with_selected(Some(selected_index));
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// Placeholder shown instead of a list: loading, failed or empty
pub fn render_placeholder(frame: &mut Frame, area: Rect, title: &str, message: &str, color: Color) {
    let content = Paragraph::new(message)
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(content, area);
}

/// Colour for a workflow status code such as `await_department` or `approved_cpds`
pub fn status_color(code: &str) -> Color {
    if code.starts_with("approved") {
        Color::Green
    } else if code.starts_with("rejected") {
        Color::Red
    } else if code.starts_with("revision_required") {
        Color::Yellow
    } else {
        Color::Blue
    }
}

/// Status rendered as a coloured tag
pub fn status_span(status: &Status) -> Span<'static> {
    let name = if status.name.is_empty() {
        status.code.clone()
    } else {
        status.name.clone()
    };
    Span::styled(format!("[{}]", name), Style::default().fg(status_color(&status.code)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_span_falls_back_to_code() {
        let status = Status {
            code: "rejected".into(),
            name: String::new(),
        };
        let span = status_span(&status);
        assert_eq!(span.content, "[rejected]");
        assert_eq!(span.style.fg, Some(Color::Red));
    }

    #[test]
    fn test_status_colors_by_prefix() {
        assert_eq!(status_color("approved_cpds"), Color::Green);
        assert_eq!(status_color("rejected_institute"), Color::Red);
        assert_eq!(status_color("revision_required_department"), Color::Yellow);
        assert_eq!(status_color("await_department"), Color::Blue);
    }
}
