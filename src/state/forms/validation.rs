//! Field validation rules and schemas

use super::field::FormFields;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// A single predicate over a field's text value with its error message
#[derive(Clone, Copy)]
pub struct Rule {
    validate: fn(&str) -> bool,
    message: &'static str,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("message", &self.message).finish()
    }
}

impl Rule {
    pub const fn new(validate: fn(&str) -> bool, message: &'static str) -> Self {
        Self { validate, message }
    }

    pub fn check(&self, value: &str) -> bool {
        (self.validate)(value)
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

/// Value must contain something other than whitespace
pub const fn required(message: &'static str) -> Rule {
    Rule::new(is_present, message)
}

/// Value must look like an email address
pub const fn email_format(message: &'static str) -> Rule {
    Rule::new(is_email, message)
}

fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

fn is_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

/// Ordered rule lists keyed by field
#[derive(Debug, Clone)]
pub struct Schema<F: FormFields> {
    rules: HashMap<F, Vec<Rule>>,
}

impl<F: FormFields> Default for Schema<F> {
    fn default() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }
}

impl<F: FormFields> Schema<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append rules for a field; order of declaration is evaluation order
    pub fn field(mut self, field: F, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.entry(field).or_default().extend(rules);
        self
    }

    pub fn rules_for(&self, field: F) -> Option<&[Rule]> {
        self.rules.get(&field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: F) -> bool {
        self.rules.contains_key(&field)
    }

    /// Message of the first failing rule, `None` when all pass or the field
    /// has no rules
    pub fn first_failure(&self, field: F, value: &str) -> Option<&'static str> {
        self.rules_for(field)?
            .iter()
            .find(|rule| !rule.check(value))
            .map(Rule::message)
    }
}
