//! Form rendering module
//!
//! - `field_renderer`: single fields and scrolling field stacks
//! - `submit`: the submit button with its gate

mod field_renderer;
mod submit;

pub use field_renderer::{draw_field_with_value, draw_form, draw_help_text, FormView};
pub use submit::draw_submit_button;
