//! Declarative form validation.
//!
//! A [`Schema`] lists the rules per field. Validation never stops at the
//! first failure: every field is checked and the result maps each failing
//! field to one message, ready to be shown next to its input.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is hard coded");
}

/// Anything a schema can read field values from.
pub trait Fields {
    /// `None` when the field wasn't submitted at all.
    fn value(&self, field: &str) -> Option<&str>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rule {
    /// Present and not empty.
    Required(&'static str),
    /// Looks like an email address. Empty values pass, pair with `Required`.
    Email(&'static str),
    /// At least this many characters.
    Min(usize, &'static str),
    /// Same value as another field. A missing value passes.
    Matches {
        field: &'static str,
        message: &'static str,
    },
    /// Required only when another field is filled in.
    RequiredWith {
        field: &'static str,
        message: &'static str,
    },
}

impl Rule {
    fn check(&self, value: Option<&str>, data: &dyn Fields) -> Result<(), &'static str> {
        let ok = match self {
            Rule::Required(_) => value.is_some_and(|value| !value.is_empty()),
            Rule::Email(_) => match value {
                None | Some("") => true,
                Some(value) => EMAIL.is_match(value),
            },
            Rule::Min(min, _) => match value {
                None => true,
                Some(value) => value.chars().count() >= *min,
            },
            Rule::Matches { field, .. } => match value {
                None => true,
                Some(value) => value == data.value(field).unwrap_or_default(),
            },
            Rule::RequiredWith { field, .. } => {
                let other_filled = data.value(field).is_some_and(|other| !other.is_empty());
                !other_filled || value.is_some_and(|value| !value.is_empty())
            }
        };

        if ok {
            Ok(())
        } else {
            Err(self.message())
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Rule::Required(message)
            | Rule::Email(message)
            | Rule::Min(_, message)
            | Rule::Matches { message, .. }
            | Rule::RequiredWith { message, .. } => *message,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Schema {
    fields: Vec<(&'static str, Vec<Rule>)>,
}

impl Schema {
    pub fn new() -> Schema {
        Schema::default()
    }

    pub fn field(mut self, name: &'static str, rules: impl IntoIterator<Item = Rule>) -> Schema {
        self.fields.push((name, rules.into_iter().collect()));
        self
    }

    pub fn validate(&self, data: &dyn Fields) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for (name, rules) in &self.fields {
            let value = data.value(name);
            for rule in rules {
                if let Err(message) = rule.check(value, data) {
                    // Later failures on the same field win
                    errors.insert(name, message);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Field name to message.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    pub fn insert(&mut self, field: &str, message: &str) {
        self.0.insert(field.to_string(), message.to_string());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for ValidationErrors {}
