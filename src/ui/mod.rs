//! UI module for rendering the TUI

mod applications;
mod auth;
mod components;
mod control;
mod coordination;
mod forms;
mod home;
mod layout;
mod widgets;
mod wizard;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

pub use widgets::render_scrollable_list;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (header_area, main_area) = layout::create_layout(frame.area());
    layout::draw_header(frame, header_area, app);

    match app.state.current_view {
        View::Login => auth::draw_login(frame, main_area, app),
        View::Registration => auth::draw_registration(frame, main_area, app),
        View::PublicApplication => wizard::draw_public_application(frame, main_area, app),
        View::Home => home::draw(frame, main_area, app),
        View::MyApplications => applications::draw_list(frame, main_area, app),
        View::ApplicationDetail => applications::draw_detail(frame, main_area, app),
        View::NewApplication => wizard::draw_new_application(frame, main_area, app),
        View::Coordination => coordination::draw_list(frame, main_area, app),
        View::CoordinationDetail => coordination::draw_detail(frame, main_area, app),
        View::Control => control::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, app);

    // Errors are modal and drawn above everything else
    if let Some(error) = app.state.current_error() {
        components::render_error_dialog(frame, error, app.state.queued_errors());
    }
}
