//! Application state module

mod app_state;
pub mod forms;
pub mod models;
pub mod text;
pub mod wizard;

pub use app_state::*;
