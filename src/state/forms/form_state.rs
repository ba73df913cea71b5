//! Generic form state engine

use super::field::{FieldValue, FormFields};
use super::validation::Schema;
use std::collections::HashMap;

/// Values and per-field errors of a mounted form.
///
/// Text changes go through [`FormState::set_value`], which re-validates the
/// touched field. Toggles and selections bypass validation.
#[derive(Debug, Clone)]
pub struct FormState<F: FormFields> {
    values: HashMap<F, FieldValue>,
    errors: HashMap<F, String>,
    schema: Schema<F>,
}

impl<F: FormFields> FormState<F> {
    /// Mount a form with every field at its declared initial value
    pub fn new(schema: Schema<F>) -> Self {
        let values = F::ALL.iter().map(|&f| (f, f.initial())).collect();
        Self::with_values(values, schema)
    }

    pub fn with_values(values: HashMap<F, FieldValue>, schema: Schema<F>) -> Self {
        Self {
            values,
            errors: HashMap::new(),
            schema,
        }
    }

    pub fn values(&self) -> &HashMap<F, FieldValue> {
        &self.values
    }

    pub fn errors(&self) -> &HashMap<F, String> {
        &self.errors
    }

    pub fn value(&self, field: F) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Text value of a field (empty when unset or not text)
    pub fn text(&self, field: F) -> &str {
        self.values.get(&field).map(FieldValue::as_text).unwrap_or("")
    }

    pub fn flag(&self, field: F) -> bool {
        self.values.get(&field).is_some_and(FieldValue::as_flag)
    }

    /// Current error for a field; empty strings count as no error
    pub fn error(&self, field: F) -> Option<&str> {
        self.errors
            .get(&field)
            .map(String::as_str)
            .filter(|e| !e.is_empty())
    }

    /// Store a text value and validate it
    pub fn set_value(&mut self, field: F, value: impl Into<String>) {
        let value = value.into();
        self.validate_field(field, &value);
        self.values.insert(field, FieldValue::Text(value));
    }

    /// Apply the field's rules in order; the first failure sets the error.
    /// Fields without rules are left untouched.
    pub fn validate_field(&mut self, field: F, value: &str) {
        if !self.schema.contains(field) {
            return;
        }
        let message = self
            .schema
            .first_failure(field, value)
            .map(str::to_string)
            .unwrap_or_default();
        self.errors.insert(field, message);
    }

    /// Run validation over the current text of the given fields
    pub fn validate_fields(&mut self, fields: &[F]) {
        for &field in fields {
            let value = self.text(field).to_string();
            self.validate_field(field, &value);
        }
    }

    /// Flip a boolean field
    pub fn set_checked(&mut self, field: F) {
        let current = self.flag(field);
        self.values.insert(field, FieldValue::Flag(!current));
    }

    /// Replace a field with a non-text value without validation
    pub fn set_selected(&mut self, field: F, value: FieldValue) {
        self.values.insert(field, value);
    }

    /// Bulk replace values without validation (form population)
    pub fn set_values(&mut self, values: impl IntoIterator<Item = (F, FieldValue)>) {
        self.values.extend(values);
    }

    /// Append a typed character to a text field
    pub fn push_char(&mut self, field: F, c: char) {
        let mut value = self.text(field).to_string();
        value.push(c);
        self.set_value(field, value);
    }

    /// Remove the last character of a text field
    pub fn pop_char(&mut self, field: F) {
        let mut value = self.text(field).to_string();
        value.pop();
        self.set_value(field, value);
    }

    /// Whether the submit control should be disabled
    pub fn blocks_submit(&self, required: &[F]) -> bool {
        should_block_submit(&self.values, &self.errors, required)
    }

    /// Whether a subset of fields (a wizard step) is complete and error free
    pub fn is_subset_valid(&self, fields: &[F], required: &[F]) -> bool {
        let required_in_subset: Vec<F> = required
            .iter()
            .copied()
            .filter(|f| fields.contains(f))
            .collect();
        let missing = required_in_subset
            .iter()
            .any(|f| !self.values.get(f).is_some_and(FieldValue::is_filled));
        let has_error = fields.iter().any(|&f| self.error(f).is_some());
        !missing && !has_error
    }
}

/// Submission gate over a value/error snapshot.
///
/// Blocks when any required field is unfilled or any field carries a
/// non-empty error.
pub fn should_block_submit<F: FormFields>(
    values: &HashMap<F, FieldValue>,
    errors: &HashMap<F, String>,
    required: &[F],
) -> bool {
    let missing = required
        .iter()
        .any(|f| !values.get(f).is_some_and(FieldValue::is_filled));
    let has_error = errors.values().any(|e| !e.is_empty());
    missing || has_error
}
