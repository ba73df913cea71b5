//! Multi-step application forms

use super::components::BUTTON_HEIGHT;
use super::forms::{draw_form, draw_help_text, draw_submit_button, FormView};
use crate::app::{application_options, App};
use crate::state::forms::{
    Choice, FormFields, FormState, PublicApplicationField, APPLICATION_REQUIRED,
    APPLICATION_STEPS, PUBLIC_APPLICATION_REQUIRED, PUBLIC_APPLICATION_STEPS,
};
use crate::state::wizard::Wizard;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Step indicator: `1 About the project ─ 2 Problem ─ 3 Context`
fn step_line<F>(wizard: &Wizard, steps: &[(&str, &[F])]) -> Line<'static> {
    let mut spans = Vec::new();
    for (idx, step) in wizard.steps().into_iter().enumerate() {
        if idx > 0 {
            spans.push(Span::styled(" ─ ", Style::default().fg(Color::DarkGray)));
        }
        let name = steps
            .get(idx)
            .map(|(name, _)| name.to_string())
            .unwrap_or(step.name);
        let style = if step.active {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else if step.id < wizard.active_step() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!("{} {}", step.id, name), style));
    }
    Line::from(spans)
}

/// Shared frame of both wizards
#[allow(clippy::too_many_arguments)]
fn draw_wizard<F: FormFields>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    form: &FormState<F>,
    steps: &[(&str, &[F])],
    required: &[F],
    options: impl Fn(F) -> Vec<Choice>,
    app: &App,
) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),             // Steps
            Constraint::Min(3),                // Fields
            Constraint::Length(BUTTON_HEIGHT), // Submit
            Constraint::Length(1),             // Help
        ])
        .margin(1)
        .split(inner);

    let wizard = &app.state.wizard;
    frame.render_widget(Paragraph::new(step_line(wizard, steps)), chunks[0]);

    let fields: &[F] = steps
        .get(wizard.active_step() - 1)
        .map(|(_, fields)| *fields)
        .unwrap_or(&[]);
    let view = FormView {
        form,
        fields,
        focus: app.state.focus.index(),
        option_cursor: app.state.option_cursor,
    };
    draw_form(frame, chunks[1], &view, options);

    if wizard.is_last() {
        draw_submit_button(
            frame,
            chunks[2],
            "Submit application",
            form.blocks_submit(required),
            app.store.application.is_loading,
        );
        draw_help_text(frame, chunks[3], "PgUp: previous step");
    } else {
        draw_help_text(
            frame,
            chunks[3],
            &format!(
                "Step {} of {}. PgDn or Ctrl+S: next step, PgUp: previous step",
                wizard.active_step(),
                wizard.total_steps()
            ),
        );
    }
}

/// Draw the application wizard of a signed-in user
pub fn draw_new_application(frame: &mut Frame, area: Rect, app: &App) {
    let institutes = app.institute_choices();
    draw_wizard(
        frame,
        area,
        "New application",
        &app.state.application_form,
        APPLICATION_STEPS,
        APPLICATION_REQUIRED,
        |field| application_options(field, &institutes),
        app,
    );
}

/// Draw the application wizard available without an account
pub fn draw_public_application(frame: &mut Frame, area: Rect, app: &App) {
    let institutes = app.institute_choices();
    draw_wizard(
        frame,
        area,
        "Submit a project",
        &app.state.public_form,
        PUBLIC_APPLICATION_STEPS,
        PUBLIC_APPLICATION_REQUIRED,
        |field| match field {
            PublicApplicationField::TargetInstitutes => institutes.clone(),
            _ => Vec::new(),
        },
        app,
    );
}
