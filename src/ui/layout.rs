//! Layout components (header, status bar)

use crate::app::App;
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::{AppState, DetailMode, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Split the screen into header and content, reserving the bottom line for the status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    (chunks[0], chunks[1])
}

/// Draw the header: app name, current view and the signed-in user
pub fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled(
            " Showcase ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(
            app.state.current_view.title(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(user) = &app.store.user.user {
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(user.full_name(), Style::default().fg(Color::Green)));
        if !user.role.is_empty() {
            spans.push(Span::styled(
                format!(" ({})", user.role),
                Style::default().fg(Color::DarkGray),
            ));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Whether any request the current view cares about is in flight
fn is_busy(app: &App) -> bool {
    let store = &app.store;
    store.user.is_loading
        || store.catalog.is_loading
        || store.application.is_loading
        || store.coordination.is_loading_apps
        || store.coordination.is_loading_detail
        || store.coordination.is_loading_comment
        || store.coordination.is_loading_decision
        || store.control.is_loading_list
        || store.control.is_loading_request
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

    let mut spans = vec![if is_busy(app) {
        Span::styled(" ◌ ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    }];

    let hints = get_view_hints(&app.state, app.store.control.any_modal_open());
    spans.push(Span::styled(hints, Style::default().fg(Color::Gray)));

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Green)));
    }

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    // Quit hint on the right (double Ctrl+C to quit)
    let quit_hint = " ^C^C:quit ";
    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: (quit_hint.len() as u16).min(area.width),
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Keyboard hints for the current view
fn get_view_hints(state: &AppState, modal_open: bool) -> String {
    let form = |extra: &str| format!("Tab:next  {}:submit  {}Esc:cancel", SUBMIT_SHORTCUT, extra);
    match state.current_view {
        View::Login => "Tab:next  Enter:sign in  ^R:register  ^P:submit a project".to_string(),
        View::Registration => form(""),
        View::PublicApplication | View::NewApplication => {
            form("PgDn/PgUp:step  ←→:choose  Space:toggle  ")
        }
        View::Home => "j/k:nav  Enter:open  q:quit".to_string(),
        View::MyApplications if state.list_filter.editing => {
            "type to search  Backspace:erase  Enter:done  Esc:clear".to_string()
        }
        View::MyApplications => "j/k:nav  Enter:view  /:search  n:new  r:reload  Esc:back".to_string(),
        View::ApplicationDetail => "j/k:scroll  d/u:page  y:copy  r:reload  Esc:back".to_string(),
        View::Coordination => "j/k:nav  Enter:review  r:reload  Esc:back".to_string(),
        View::CoordinationDetail => match state.detail_mode {
            DetailMode::Browse => {
                "j/k:field  J/K:scroll  c:comment  e:edit  a:approve  w:changes  x:reject  y:copy  Esc:back"
                    .to_string()
            }
            DetailMode::Edit => form("←→:choose  Space:toggle  "),
            DetailMode::Comment | DetailMode::Reject => form("Enter:newline  "),
        },
        View::Control if modal_open => form("←→:choose  "),
        View::Control => "j/k:nav  Enter:details  a:approve  x:reject  r:reload  Esc:back".to_string(),
    }
}
