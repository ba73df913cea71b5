//! Coordinator workspace: assigned applications and the review screen

use super::applications::{application_row, header_lines, paragraph_lines};
use super::components::{render_decision_dialog, BUTTON_HEIGHT};
use super::forms::{draw_form, draw_submit_button, FormView};
use super::render_scrollable_list;
use super::widgets::render_placeholder;
use crate::app::{application_options, App};
use crate::state::forms::{
    ApplicationField, CommentField, FormFields, ReasonField, APPLICATION_REQUIRED, EDIT_FIELDS,
};
use crate::state::models::{format_date, ApplicationDetail, Comment, COMMENTABLE_FIELDS};
use crate::state::DetailMode;
use crate::store::Decision;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Draw the applications assigned to the coordinator
pub fn draw_list(frame: &mut Frame, area: Rect, app: &App) {
    let slice = &app.store.coordination;
    let title = "Applications to review";

    if slice.applications.is_empty() {
        let (message, color) = if slice.is_loading_apps {
            ("Loading applications...", Color::DarkGray)
        } else if let Some(error) = &slice.error {
            (error.as_str(), Color::Red)
        } else {
            ("Nothing to review right now.", Color::DarkGray)
        };
        render_placeholder(frame, area, title, message, color);
        return;
    }

    let items: Vec<ListItem> = slice
        .applications
        .iter()
        .enumerate()
        .map(|(idx, item)| application_row(item, idx == app.state.selected_index, true))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(" {} ({}) ", title, slice.applications.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    render_scrollable_list(frame, area, list, app.state.selected_index);
}

/// Draw the review screen of one application
pub fn draw_detail(frame: &mut Frame, area: Rect, app: &App) {
    let slice = &app.store.coordination;
    let Some(detail) = app.current_detail() else {
        let (message, color) = match &slice.error {
            Some(error) if !slice.is_loading_detail => (error.as_str(), Color::Red),
            _ => ("Loading application...", Color::DarkGray),
        };
        render_placeholder(frame, area, "Review application", message, color);
        return;
    };

    if app.state.detail_mode == DetailMode::Edit {
        draw_edit(frame, area, app);
        return;
    }

    let h_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(0)])
        .split(area);

    draw_field_list(frame, h_chunks[0], app, detail);

    let v_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(h_chunks[1]);

    draw_field_text(frame, v_chunks[0], app, detail);
    match app.state.detail_mode {
        DetailMode::Comment => draw_text_panel(frame, v_chunks[1], app, TextPanel::Comment),
        DetailMode::Reject => draw_text_panel(frame, v_chunks[1], app, TextPanel::Reject),
        DetailMode::Browse | DetailMode::Edit => draw_comments(frame, v_chunks[1], app, detail),
    }

    if let Some(decision) = app.state.pending_decision {
        render_decision_dialog(frame, decision, &detail.application.title);
    }
}

/// Field navigator with per-field comment counts; row 0 stands for all fields
fn draw_field_list(frame: &mut Frame, area: Rect, app: &App, detail: &ApplicationDetail) {
    let count_style = Style::default().fg(Color::Yellow);
    let rows = std::iter::once(("All comments".to_string(), detail.comments.len())).chain(
        COMMENTABLE_FIELDS
            .iter()
            .map(|(code, label)| (label.to_string(), detail.comment_count(code))),
    );

    let items: Vec<ListItem> = rows
        .enumerate()
        .map(|(idx, (label, count))| {
            let is_selected = idx == app.state.selected_index;
            let style = if is_selected {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = vec![
                Span::styled(if is_selected { "▸ " } else { "  " }, style),
                Span::styled(label, style),
            ];
            if count > 0 {
                spans.push(Span::styled(format!(" ({})", count), count_style));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(" Fields ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    render_scrollable_list(frame, area, list, app.state.selected_index);
}

/// Workflow actions the user may take, as a hint line
fn actions_line(detail: &ApplicationDetail) -> Line<'static> {
    let keys = [
        (Decision::Approve, "a"),
        (Decision::RequestChanges, "w"),
        (Decision::Reject, "x"),
    ];
    let mut spans = vec![Span::styled("Actions: ", Style::default().fg(Color::DarkGray))];
    let available: Vec<_> = keys
        .iter()
        .filter(|(decision, _)| detail.has_action(decision.action_name()))
        .collect();
    if available.is_empty() {
        spans.push(Span::styled("none", Style::default().fg(Color::DarkGray)));
    }
    for (decision, key) in available {
        spans.push(Span::styled(key.to_string(), Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(format!(":{}  ", decision.label())));
    }
    Line::from(spans)
}

/// Application header and the text of the highlighted field
fn draw_field_text(frame: &mut Frame, area: Rect, app: &App, detail: &ApplicationDetail) {
    let application = &detail.application;
    let mut lines = header_lines(application);
    lines.push(actions_line(detail));

    let departments: Vec<&str> = detail
        .involved_departments
        .iter()
        .map(|d| d.department.name.as_str())
        .collect();
    if !departments.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Departments: ", Style::default().fg(Color::DarkGray)),
            Span::raw(departments.join(", ")),
        ]));
    }
    lines.push(Line::from(""));

    let title = match &app.store.coordination.current_field {
        Some(field) => {
            let text = application.field_text(&field.code);
            if text.trim().is_empty() {
                lines.push(Line::from(Span::styled(
                    "(empty)",
                    Style::default().fg(Color::DarkGray),
                )));
            } else {
                lines.extend(paragraph_lines(&text));
            }
            format!(" {} ", field.name)
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Select a field on the left to read it and see its comments.",
                Style::default().fg(Color::DarkGray),
            )));
            " Application ".to_string()
        }
    };

    let content = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.state.scroll_offset as u16, 0))
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
    frame.render_widget(content, area);
}

fn comment_lines(comment: &Comment, show_field: bool) -> Vec<Line<'static>> {
    let author = &comment.author;
    let mut header = vec![
        Span::styled(
            author.name.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {} {}", author.role_name, author.department_name),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("  {}", format_date(&comment.created_at)),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if show_field {
        let label = COMMENTABLE_FIELDS
            .iter()
            .find(|(code, _)| *code == comment.field)
            .map(|(_, label)| *label)
            .unwrap_or(comment.field.as_str());
        header.push(Span::styled(
            format!("  on {}", label),
            Style::default().fg(Color::Yellow),
        ));
    }

    let mut lines = vec![Line::from(header)];
    lines.extend(comment.text.lines().map(|l| Line::from(format!("  {}", l))));
    lines.push(Line::from(""));
    lines
}

/// Comment thread of the highlighted field, newest first
fn draw_comments(frame: &mut Frame, area: Rect, app: &App, detail: &ApplicationDetail) {
    let current = app.store.coordination.current_field.as_ref();
    let comments = detail.comments_for(current);

    let lines: Vec<Line> = if comments.is_empty() {
        vec![Line::from(Span::styled(
            "No comments yet. Press 'c' to add one.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        comments
            .iter()
            .flat_map(|c| comment_lines(c, current.is_none()))
            .collect()
    };

    let content = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(format!(" Comments ({}) ", comments.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(content, area);
}

#[derive(Clone, Copy)]
enum TextPanel {
    Comment,
    Reject,
}

/// Comment or rejection reason input under the field text
fn draw_text_panel(frame: &mut Frame, area: Rect, app: &App, panel: TextPanel) {
    let (title, color) = match panel {
        TextPanel::Comment => {
            let field = app
                .store
                .coordination
                .current_field
                .as_ref()
                .map(|f| f.name.as_str())
                .unwrap_or("");
            (format!(" Comment on {} ", field), Color::Cyan)
        }
        TextPanel::Reject => (" Reject application ".to_string(), Color::Red),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(BUTTON_HEIGHT)])
        .split(inner);

    let coordination = &app.store.coordination;
    match panel {
        TextPanel::Comment => {
            let form = &app.state.comment_form;
            let view = FormView {
                form,
                fields: CommentField::ALL,
                focus: 0,
                option_cursor: 0,
            };
            draw_form(frame, chunks[0], &view, |_| Vec::new());
            draw_submit_button(
                frame,
                chunks[1],
                "Add comment",
                form.blocks_submit(CommentField::ALL),
                coordination.is_loading_comment,
            );
        }
        TextPanel::Reject => {
            let form = &app.state.reason_form;
            let view = FormView {
                form,
                fields: ReasonField::ALL,
                focus: 0,
                option_cursor: 0,
            };
            draw_form(frame, chunks[0], &view, |_| Vec::new());
            draw_submit_button(
                frame,
                chunks[1],
                "Reject",
                form.blocks_submit(ReasonField::ALL),
                coordination.is_loading_decision,
            );
        }
    }
}

/// Full-width edit form of the application
fn draw_edit(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Edit application ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(BUTTON_HEIGHT)])
        .margin(1)
        .split(inner);

    let institutes = app.institute_choices();
    let form = &app.state.edit_form;
    let view = FormView {
        form,
        fields: EDIT_FIELDS,
        focus: app.state.focus.index(),
        option_cursor: app.state.option_cursor,
    };
    draw_form(frame, chunks[0], &view, |field| {
        application_options(field, &institutes)
    });

    let required: Vec<ApplicationField> = APPLICATION_REQUIRED
        .iter()
        .copied()
        .filter(|f| EDIT_FIELDS.contains(f))
        .collect();
    draw_submit_button(
        frame,
        chunks[1],
        "Save changes",
        form.blocks_submit(&required),
        app.store.coordination.is_loading_decision,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::models::{AvailableAction, CommentAuthor};

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_actions_line_lists_available_only() {
        let detail = ApplicationDetail {
            available_actions: vec![AvailableAction {
                action: "reject".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(text(&actions_line(&detail)), "Actions: x:Reject  ");
        assert_eq!(
            text(&actions_line(&ApplicationDetail::default())),
            "Actions: none"
        );
    }

    #[test]
    fn test_comment_lines_name_field_when_showing_all() {
        let comment = Comment {
            id: 1,
            field: "goal".into(),
            text: "Too vague\nPlease specify".into(),
            author: CommentAuthor {
                name: "Petrov P.".into(),
                ..Default::default()
            },
            created_at: String::new(),
        };
        let lines = comment_lines(&comment, true);
        assert!(text(&lines[0]).ends_with("on Goal"));
        assert_eq!(text(&lines[1]), "  Too vague");
        assert_eq!(text(&lines[2]), "  Please specify");

        let lines = comment_lines(&comment, false);
        assert!(!text(&lines[0]).contains("on Goal"));
    }
}
