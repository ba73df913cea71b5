//! Submit button shared by every form

use crate::platform::SUBMIT_SHORTCUT;
use crate::ui::components::render_button;
use ratatui::{layout::Rect, Frame};

/// Draw the submit button. It reads "Sending..." while a request is in flight
/// and is greyed out while the form's gate blocks submission.
pub fn draw_submit_button(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    is_blocked: bool,
    is_loading: bool,
) {
    let content = if is_loading {
        "Sending...".to_string()
    } else {
        format!("{label} ({SUBMIT_SHORTCUT})")
    };
    render_button(frame, area, &content, !is_blocked, !is_blocked && !is_loading);
}
