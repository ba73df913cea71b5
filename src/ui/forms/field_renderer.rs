//! Field rendering utilities for forms

use crate::state::forms::{Choice, FieldValue, FormFields, FormState};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const SINGLE_LINE_HEIGHT: u16 = 3;
const MULTILINE_HEIGHT: u16 = 6;
const CURSOR: &str = "▌";

/// A form as seen by the renderer
pub struct FormView<'a, F: FormFields> {
    pub form: &'a FormState<F>,
    /// Fields shown, in order
    pub fields: &'a [F],
    pub focus: usize,
    /// Highlighted option of a focused multi-select
    pub option_cursor: usize,
}

fn field_block(label: &str, is_active: bool, error: Option<&str>) -> Block<'static> {
    let border_color = match (is_active, error.is_some()) {
        (_, true) => Color::Red,
        (true, false) => Color::Cyan,
        (false, false) => Color::DarkGray,
    };

    let mut block = Block::default()
        .title(format!(" {} ", label))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    if let Some(error) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} ", error),
            Style::default().fg(Color::Red),
        )));
    }
    block
}

/// Draw a text field with the given display value
pub fn draw_field_with_value(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    is_active: bool,
    is_multiline: bool,
    error: Option<&str>,
) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let display_value = if value.is_empty() && !is_active {
        "(empty)"
    } else {
        value
    };

    let cursor = if is_active { CURSOR } else { "" };

    let content = if is_multiline {
        let mut lines: Vec<Line> = display_value
            .split('\n')
            .map(|l| Line::from(l.to_string()))
            .collect();
        if is_active {
            if let Some(last) = lines.last_mut() {
                last.spans
                    .push(Span::styled(cursor, Style::default().fg(Color::Cyan)));
            }
        }
        // Keep the cursor line in view
        let inner_height = area.height.saturating_sub(2) as usize;
        let skip = lines.len().saturating_sub(inner_height.max(1));
        Paragraph::new(lines.split_off(skip))
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(display_value, style),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]))
    };

    let block = field_block(label, is_active, error);
    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), area);
}

/// Draw a single-choice field as a cycling selector
fn draw_choice_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    choice: Option<&Choice>,
    has_options: bool,
    is_active: bool,
    error: Option<&str>,
) {
    let text = match (choice, has_options) {
        (Some(choice), _) => choice.label.clone(),
        (None, true) => "(not selected)".to_string(),
        (None, false) => "(no options loaded)".to_string(),
    };
    let line = if is_active {
        Line::from(vec![
            Span::styled("◂ ", Style::default().fg(Color::Cyan)),
            Span::styled(text, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(" ▸", Style::default().fg(Color::Cyan)),
        ])
    } else {
        Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
    };

    let block = field_block(label, is_active, error);
    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Draw a multi-select field as a wrapped row of checkboxes
#[allow(clippy::too_many_arguments)]
fn draw_choices_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    selected: &[Choice],
    options: &[Choice],
    option_cursor: usize,
    is_active: bool,
    error: Option<&str>,
) {
    let mut spans = Vec::new();
    if options.is_empty() {
        spans.push(Span::styled(
            "(no options loaded)",
            Style::default().fg(Color::DarkGray),
        ));
    }
    for (idx, option) in options.iter().enumerate() {
        let checked = selected.iter().any(|c| c.value == option.value);
        let mark = if checked { "[x]" } else { "[ ]" };
        let style = match (is_active && idx == option_cursor, checked) {
            (true, _) => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            (false, true) => Style::default().fg(Color::Green),
            (false, false) => Style::default().fg(Color::DarkGray),
        };
        spans.push(Span::styled(format!("{} {}", mark, option.label), style));
        spans.push(Span::raw("  "));
    }

    let block = field_block(label, is_active, error);
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}

/// Rows a field occupies
fn field_height<F: FormFields>(field: F, value: Option<&FieldValue>) -> u16 {
    match value {
        Some(FieldValue::Choices(_)) => MULTILINE_HEIGHT - 1,
        Some(FieldValue::Text(_)) | None if field.is_multiline() => MULTILINE_HEIGHT,
        _ => SINGLE_LINE_HEIGHT,
    }
}

/// First field to draw so that the focused one fits into `available` rows
fn first_visible(heights: &[u16], focus: usize, available: u16) -> usize {
    if heights.is_empty() {
        return 0;
    }
    let focus = focus.min(heights.len() - 1);
    let mut start = 0;
    while start < focus && heights[start..=focus].iter().sum::<u16>() > available {
        start += 1;
    }
    start
}

/// Draw one field of any kind
fn draw_form_field<F: FormFields>(
    frame: &mut Frame,
    area: Rect,
    view: &FormView<F>,
    field: F,
    is_active: bool,
    options: &[Choice],
) {
    let value = view
        .form
        .value(field)
        .cloned()
        .unwrap_or_else(|| field.initial());
    let error = view.form.error(field);
    let label = field.label();

    match value {
        FieldValue::Choice(choice) => draw_choice_field(
            frame,
            area,
            label,
            choice.as_ref(),
            !options.is_empty(),
            is_active,
            error,
        ),
        FieldValue::Choices(selected) => draw_choices_field(
            frame,
            area,
            label,
            &selected,
            options,
            view.option_cursor,
            is_active,
            error,
        ),
        FieldValue::Flag(_) => {
            draw_field_with_value(frame, area, label, &value.display_value(), is_active, false, error)
        }
        FieldValue::Text(text) => draw_field_with_value(
            frame,
            area,
            label,
            &text,
            is_active,
            field.is_multiline(),
            error,
        ),
    }
}

/// Draw a stack of fields, scrolled to keep the focused field visible
pub fn draw_form<F: FormFields>(
    frame: &mut Frame,
    area: Rect,
    view: &FormView<F>,
    options: impl Fn(F) -> Vec<Choice>,
) {
    let heights: Vec<u16> = view
        .fields
        .iter()
        .map(|&f| field_height(f, view.form.value(f)))
        .collect();
    let start = first_visible(&heights, view.focus, area.height);

    let bottom = area.y + area.height;
    let mut y = area.y;
    for (idx, &field) in view.fields.iter().enumerate().skip(start) {
        let height = heights[idx];
        if y + height > bottom {
            break;
        }
        let rect = Rect {
            x: area.x,
            y,
            width: area.width,
            height,
        };
        draw_form_field(frame, rect, view, field, idx == view.focus, &options(field));
        y += height;
    }
}

/// Draw a dim help line
pub fn draw_help_text(frame: &mut Frame, area: Rect, text: &str) {
    let help = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::{ApplicationField, CommentField, LoginField};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_visible_scrolls_to_focus() {
        let heights = [3, 3, 6, 3];
        assert_eq!(first_visible(&heights, 0, 9), 0);
        assert_eq!(first_visible(&heights, 2, 9), 1);
        assert_eq!(first_visible(&heights, 3, 9), 2);
        assert_eq!(first_visible(&heights, 9, 100), 0);
        assert_eq!(first_visible(&[], 0, 10), 0);
    }

    #[test]
    fn test_field_heights_by_kind() {
        assert_eq!(field_height(LoginField::Email, None), SINGLE_LINE_HEIGHT);
        assert_eq!(field_height(CommentField::Text, None), MULTILINE_HEIGHT);
        assert_eq!(
            field_height(
                ApplicationField::TargetInstitutes,
                Some(&FieldValue::Choices(Vec::new()))
            ),
            MULTILINE_HEIGHT - 1
        );
        assert_eq!(
            field_height(ApplicationField::NeedsConsultation, Some(&FieldValue::Flag(false))),
            SINGLE_LINE_HEIGHT
        );
    }
}
