//! Form field value objects

use std::fmt::Debug;
use std::hash::Hash;

/// A selectable option as shown in select and multi-select fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Anything that can populate a select field.
///
/// Catalog entries (institutes, roles, departments, project levels) expose a
/// stable value and a human label instead of being looked up by key name.
pub trait SelectOption {
    fn option_value(&self) -> String;
    fn option_label(&self) -> String;

    fn to_choice(&self) -> Choice {
        Choice::new(self.option_value(), self.option_label())
    }
}

impl SelectOption for Choice {
    fn option_value(&self) -> String {
        self.value.clone()
    }

    fn option_label(&self) -> String {
        self.label.clone()
    }
}

/// Capability of list items that a text filter can match
///
/// Each item names the text it is searched by instead of the filter looking
/// up a field by key name.
pub trait Searchable {
    fn search_text(&self) -> &str;

    /// Case-insensitive substring match; an empty query matches everything
    fn matches(&self, query: &str) -> bool {
        self.search_text()
            .to_lowercase()
            .contains(&query.to_lowercase())
    }
}

/// Items matching `query`, keeping their order
pub fn filter_items<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    items.iter().filter(|item| item.matches(query)).collect()
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Choice(Option<Choice>),
    Choices(Vec<Choice>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Get the text value (empty for non-text fields)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    pub fn as_flag(&self) -> bool {
        matches!(self, FieldValue::Flag(true))
    }

    pub fn as_choice(&self) -> Option<&Choice> {
        match self {
            FieldValue::Choice(choice) => choice.as_ref(),
            _ => None,
        }
    }

    pub fn as_choices(&self) -> &[Choice] {
        match self {
            FieldValue::Choices(choices) => choices,
            _ => &[],
        }
    }

    /// Whether the value counts as provided for a required field
    pub fn is_filled(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.trim().is_empty(),
            FieldValue::Flag(b) => *b,
            FieldValue::Choice(choice) => choice.is_some(),
            FieldValue::Choices(choices) => !choices.is_empty(),
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Flag(true) => "[x] yes".to_string(),
            FieldValue::Flag(false) => "[ ] no".to_string(),
            FieldValue::Choice(Some(choice)) => choice.label.clone(),
            FieldValue::Choice(None) => String::new(),
            FieldValue::Choices(choices) => choices
                .iter()
                .map(|c| c.label.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Strongly typed field keys of a form
pub trait FormFields: Copy + Eq + Hash + Debug + 'static {
    /// Every field in display order
    const ALL: &'static [Self];

    /// Wire name of the field (also used as the comment field code)
    fn name(self) -> &'static str;

    fn label(self) -> &'static str;

    fn is_multiline(self) -> bool {
        false
    }

    /// Value a freshly mounted form starts with
    fn initial(self) -> FieldValue {
        FieldValue::default()
    }
}

/// Focus cursor over a list of fields, wrapping at both ends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldFocus {
    index: usize,
}

impl FieldFocus {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn next(&mut self, count: usize) {
        if count > 0 {
            self.index = (self.index + 1) % count;
        }
    }

    pub fn prev(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        if self.index == 0 {
            self.index = count - 1;
        } else {
            self.index -= 1;
        }
    }

    /// Field under the cursor, clamping a stale index
    pub fn current<F: Copy>(&self, fields: &[F]) -> Option<F> {
        if fields.is_empty() {
            return None;
        }
        fields.get(self.index.min(fields.len() - 1)).copied()
    }
}
