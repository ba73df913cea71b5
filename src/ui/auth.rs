//! Sign-in and registration screens

use super::components::{centered_rect, BUTTON_HEIGHT};
use super::forms::{
    draw_field_with_value, draw_form, draw_help_text, draw_submit_button, FormView,
};
use crate::app::App;
use crate::state::forms::{FormFields, LoginField, RegistrationField, LOGIN_REQUIRED, REGISTRATION_REQUIRED};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const PANEL_WIDTH: u16 = 64;

fn panel(frame: &mut Frame, area: Rect, title: &str, height: u16) -> Rect {
    let panel_area = centered_rect(area, PANEL_WIDTH, height);
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(panel_area);
    frame.render_widget(block, panel_area);
    inner
}

/// Draw the sign-in form
pub fn draw_login(frame: &mut Frame, area: Rect, app: &App) {
    if !app.store.user.is_auth_checked {
        let inner = panel(frame, area, "Sign in", 5);
        frame.render_widget(
            Paragraph::new("Checking saved session...").style(Style::default().fg(Color::DarkGray)),
            inner,
        );
        return;
    }

    let inner = panel(frame, area, "Sign in", 14);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Email
            Constraint::Length(3),             // Password
            Constraint::Length(BUTTON_HEIGHT), // Submit
            Constraint::Min(0),                // Help
        ])
        .margin(1)
        .split(inner);

    let form = &app.state.login_form;
    let focus = app.state.focus.current(LoginField::ALL);

    draw_field_with_value(
        frame,
        chunks[0],
        LoginField::Email.label(),
        form.text(LoginField::Email),
        focus == Some(LoginField::Email),
        false,
        form.error(LoginField::Email),
    );

    let masked = "•".repeat(form.text(LoginField::Password).chars().count());
    draw_field_with_value(
        frame,
        chunks[1],
        LoginField::Password.label(),
        &masked,
        focus == Some(LoginField::Password),
        false,
        form.error(LoginField::Password),
    );

    draw_submit_button(
        frame,
        chunks[2],
        "Sign in",
        form.blocks_submit(LOGIN_REQUIRED),
        app.store.user.is_loading,
    );

    draw_help_text(
        frame,
        chunks[3],
        "No account? Ctrl+R to request one, or Ctrl+P to submit a project without signing in.",
    );
}

/// Draw the registration request form
pub fn draw_registration(frame: &mut Frame, area: Rect, app: &App) {
    let inner = panel(frame, area, "Request an account", area.height);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),                // Fields
            Constraint::Length(BUTTON_HEIGHT), // Submit
            Constraint::Length(1),             // Help
        ])
        .margin(1)
        .split(inner);

    let form = &app.state.registration_form;
    let view = FormView {
        form,
        fields: RegistrationField::ALL,
        focus: app.state.focus.index(),
        option_cursor: app.state.option_cursor,
    };
    draw_form(frame, chunks[0], &view, |_| Vec::new());

    draw_submit_button(
        frame,
        chunks[1],
        "Send request",
        form.blocks_submit(REGISTRATION_REQUIRED),
        app.store.user.is_loading,
    );
    draw_help_text(
        frame,
        chunks[2],
        "An administrator reviews the request before you can sign in.",
    );
}
