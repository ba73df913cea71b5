//! Registration requests awaiting an administrator

use super::components::{centered_rect, BUTTON_HEIGHT};
use super::forms::{draw_form, draw_submit_button, FormView};
use super::render_scrollable_list;
use super::widgets::render_placeholder;
use crate::app::App;
use crate::state::forms::{
    ApproveUserField, Choice, FormFields, ReasonField, SelectOption, APPROVE_USER_REQUIRED,
};
use crate::state::models::{format_date, ApproveUser, RequestStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

fn request_status_color(status: RequestStatus) -> Color {
    match status {
        RequestStatus::Submitted => Color::Blue,
        RequestStatus::Approved => Color::Green,
        RequestStatus::Rejected => Color::Red,
    }
}

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    draw_list(frame, area, app);

    let control = &app.store.control;
    if control.is_open_detail_modal {
        draw_detail_modal(frame, area, app);
    } else if control.is_open_approve_modal {
        draw_approve_modal(frame, area, app);
    } else if control.is_open_reject_modal {
        draw_reject_modal(frame, area, app);
    }
}

fn draw_list(frame: &mut Frame, area: Rect, app: &App) {
    let control = &app.store.control;
    let title = "Registration requests";

    if control.users.is_empty() {
        let (message, color) = if control.is_loading_list {
            ("Loading requests...", Color::DarkGray)
        } else if let Some(error) = &control.error {
            (error.as_str(), Color::Red)
        } else {
            ("No registration requests.", Color::DarkGray)
        };
        render_placeholder(frame, area, title, message, color);
        return;
    }

    let items: Vec<ListItem> = control
        .users
        .iter()
        .enumerate()
        .map(|(idx, user)| {
            let is_selected = idx == app.state.selected_index;
            let name_style = if is_selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::raw(if is_selected { "▸ " } else { "  " }),
                Span::styled(format!("{:<32}", user.full_name()), name_style),
                Span::styled(format!("{:<30}", user.email), Style::default().fg(Color::Gray)),
                Span::styled(
                    format!("{:<11}", user.status.label()),
                    Style::default().fg(request_status_color(user.status)),
                ),
                Span::styled(
                    format_date(&user.created_at),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let pending = control
        .users
        .iter()
        .filter(|u| u.status == RequestStatus::Submitted)
        .count();
    let list = List::new(items).block(
        Block::default()
            .title(format!(" {} ({} pending) ", title, pending))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    render_scrollable_list(frame, area, list, app.state.selected_index);
}

/// Clear and frame a modal; returns its inner area
fn modal(frame: &mut Frame, area: Rect, title: &str, color: Color, height: u16) -> Rect {
    let modal_area = centered_rect(area, 70, height);
    frame.render_widget(Clear, modal_area);
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(modal_area);
    frame.render_widget(block, modal_area);
    inner
}

fn draw_missing_user(frame: &mut Frame, area: Rect) {
    frame.render_widget(
        Paragraph::new("User not found").style(Style::default().fg(Color::Red)),
        area,
    );
}

/// Summary lines of a registration request
fn request_lines(user: &ApproveUser) -> Vec<Line<'static>> {
    let label = Style::default().fg(Color::DarkGray);
    let row = |name: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<12}", name), label),
            Span::raw(if value.is_empty() { "-".to_string() } else { value }),
        ])
    };

    let mut lines = vec![
        row("Name", user.full_name()),
        row("Email", user.email.clone()),
        row("Phone", user.phone.clone()),
        row("Requested", format_date(&user.created_at)),
        Line::from(vec![
            Span::styled(format!("{:<12}", "Status"), label),
            Span::styled(
                user.status.label().to_string(),
                Style::default().fg(request_status_color(user.status)),
            ),
        ]),
    ];
    if let Some(role) = &user.role {
        lines.push(row("Role", role.name.clone()));
    }
    if let Some(department) = &user.department {
        lines.push(row("Department", department.name.clone()));
    }
    if let Some(actor) = &user.actor {
        lines.push(row("Reviewed by", actor.full_name.clone()));
    }
    if let Some(reason) = &user.reason {
        lines.push(row("Reason", reason.clone()));
    }
    if !user.comment.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Comment", label)));
        lines.extend(user.comment.lines().map(|l| Line::from(l.to_string())));
    }
    lines
}

fn draw_detail_modal(frame: &mut Frame, area: Rect, app: &App) {
    let inner = modal(frame, area, "Registration request", Color::Cyan, 18);
    let Some(user) = &app.store.control.current_user else {
        draw_missing_user(frame, inner);
        return;
    };

    let mut lines = request_lines(user);
    lines.push(Line::from(""));
    let hint = if user.status == RequestStatus::Submitted {
        "a: approve  x: reject  Esc: close"
    } else {
        "Esc: close"
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_approve_modal(frame: &mut Frame, area: Rect, app: &App) {
    let inner = modal(frame, area, "Approve registration", Color::Green, 14);
    let Some(user) = &app.store.control.current_user else {
        draw_missing_user(frame, inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),             // Who
            Constraint::Min(6),                // Role + department
            Constraint::Length(BUTTON_HEIGHT), // Submit
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(format!("{} <{}>", user.full_name(), user.email)),
        chunks[0],
    );

    let catalog = &app.store.catalog;
    let roles: Vec<Choice> = catalog.roles.iter().map(SelectOption::to_choice).collect();
    let departments: Vec<Choice> = catalog
        .departments
        .iter()
        .map(SelectOption::to_choice)
        .collect();
    let form = &app.state.approve_form;
    let view = FormView {
        form,
        fields: ApproveUserField::ALL,
        focus: app.state.focus.index(),
        option_cursor: app.state.option_cursor,
    };
    draw_form(frame, chunks[1], &view, |field| match field {
        ApproveUserField::Role => roles.clone(),
        ApproveUserField::Department => departments.clone(),
    });

    draw_submit_button(
        frame,
        chunks[2],
        "Approve",
        form.blocks_submit(APPROVE_USER_REQUIRED),
        app.store.control.is_loading_request,
    );
}

fn draw_reject_modal(frame: &mut Frame, area: Rect, app: &App) {
    let inner = modal(frame, area, "Reject registration", Color::Red, 14);
    let Some(user) = &app.store.control.current_user else {
        draw_missing_user(frame, inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(6),
            Constraint::Length(BUTTON_HEIGHT),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(format!("{} <{}>", user.full_name(), user.email)),
        chunks[0],
    );

    let form = &app.state.reason_form;
    let view = FormView {
        form,
        fields: ReasonField::ALL,
        focus: 0,
        option_cursor: 0,
    };
    draw_form(frame, chunks[1], &view, |_| Vec::new());

    draw_submit_button(
        frame,
        chunks[2],
        "Reject",
        form.blocks_submit(ReasonField::ALL),
        app.store.control.is_loading_request,
    );
}
