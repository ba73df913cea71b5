//! Error dialog component

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

fn dialog_title(queued: usize) -> String {
    match queued {
        0 => "Error".to_string(),
        n => format!("Error ({} more)", n),
    }
}

/// Render the oldest queued error; `queued` counts the ones behind it
pub fn render_error_dialog(frame: &mut Frame, error_message: &str, queued: usize) {
    let key = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let next = if queued > 0 { " for the next one" } else { " to dismiss" };
    let title = dialog_title(queued);

    render_dialog(
        frame,
        DialogConfig {
            title: &title,
            title_color: Color::Red,
            border_color: Color::Red,
            message: error_message,
            hint: Some(vec![
                Span::styled("Enter", key),
                Span::raw("/"),
                Span::styled("Esc", key),
                Span::raw(next),
            ]),
            max_width: 64,
        },
    );
}
