//! Confirmation dialog for coordinator decisions

use super::base::{render_dialog, DialogConfig};
use crate::store::Decision;
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

/// Ask to confirm a decision on the application titled `title`
pub fn render_decision_dialog(frame: &mut Frame, decision: Decision, title: &str) {
    let color = match decision {
        Decision::Approve => Color::Green,
        Decision::RequestChanges => Color::Yellow,
        Decision::Reject => Color::Red,
    };
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let hint = vec![
        Span::styled("Enter/y", key_style),
        Span::styled(" confirm  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc/n", key_style),
        Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
    ];

    let dialog_title = format!("{}?", decision.label());
    let message = format!("The decision applies to \"{title}\".");
    render_dialog(
        frame,
        DialogConfig {
            title: &dialog_title,
            title_color: color,
            border_color: color,
            message: &message,
            hint: Some(hint),
            max_width: 56,
        },
    );
}
