//! Form domain layer
//!
//! Typed field keys, validation schemas and the value/error state shared by
//! every form in the client. Concrete forms live in `definitions`.

mod definitions;
mod field;
mod form_state;
mod validation;

pub use definitions::*;
pub use field::{filter_items, Choice, FieldFocus, FieldValue, FormFields, Searchable, SelectOption};
pub use form_state::{should_block_submit, FormState};
pub use validation::{email_format, required, Rule, Schema};
