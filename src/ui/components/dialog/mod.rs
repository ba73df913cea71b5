//! Dialog components for TUI

mod base;
mod confirm_dialog;
mod error_dialog;

pub use base::centered_rect;
pub use confirm_dialog::render_decision_dialog;
pub use error_dialog::render_error_dialog;
