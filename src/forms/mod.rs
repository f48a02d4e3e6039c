//! Form submission pipeline.
//!
//! A [`FormSchema`] lists fields, each with its validation checks and its
//! sanitizers. Processing a submission always runs both: violations are
//! collected per field in declaration order, and every field value is
//! sanitized whether or not it passed. [`Submission::gate`] then decides
//! between persisting and re-rendering the form.
//!
//! ```rust,ignore
//! let schema = FormSchema::new().field(
//!     Field::new("first_name")
//!         .check(Rule::Required, "First name must be specified.")
//!         .sanitize(Sanitizer::Trim),
//! );
//! match schema.process(&raw).gate() {
//!     Outcome::Accepted(form) => { /* persist, redirect */ }
//!     Outcome::Rejected(form) => { /* render form.values() and form.violations() */ }
//! }
//! ```

pub mod author;
pub mod book;
pub mod rules;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

pub use rules::{Rule, Sanitizer};

/// Raw urlencoded form body. Keys may repeat (e.g. checkbox groups).
#[derive(Debug, Clone, Default)]
pub struct RawForm {
    fields: IndexMap<String, Vec<String>>,
}

impl RawForm {
    /// First value submitted for a field
    pub fn first(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values submitted for a field
    pub fn all(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl From<Vec<(String, String)>> for RawForm {
    fn from(pairs: Vec<(String, String)>) -> Self {
        let mut fields: IndexMap<String, Vec<String>> = IndexMap::new();
        for (name, value) in pairs {
            fields.entry(name).or_default().push(value);
        }
        Self { fields }
    }
}

/// A field value after sanitization
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Date(Option<NaiveDate>),
}

/// One failed check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: &'static str,
    /// The submitted value that failed
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct Check {
    pub rule: Rule,
    pub message: &'static str,
}

/// Declaration of one form field
#[derive(Debug, Clone)]
pub struct Field {
    name: &'static str,
    multiple: bool,
    optional: bool,
    checks: Vec<Check>,
    sanitizers: Vec<Sanitizer>,
}

impl Field {
    /// A single-valued field
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            multiple: false,
            optional: false,
            checks: Vec::new(),
            sanitizers: Vec::new(),
        }
    }

    /// A field that may be submitted several times; checks run on every value
    pub fn multiple(name: &'static str) -> Self {
        Self {
            multiple: true,
            ..Self::new(name)
        }
    }

    /// Skip the checks when the submitted value is empty
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn check(mut self, rule: Rule, message: &'static str) -> Self {
        self.checks.push(Check { rule, message });
        self
    }

    pub fn sanitize(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizers.push(sanitizer);
        self
    }

    fn validate(&self, raw: &RawForm, violations: &mut Vec<Violation>) {
        let values: Vec<&str> = if self.multiple {
            raw.all(self.name).iter().map(String::as_str).collect()
        } else {
            vec![raw.first(self.name).unwrap_or("")]
        };

        for value in values {
            if self.optional && value.is_empty() {
                continue;
            }
            for check in &self.checks {
                if !check.rule.accepts(value) {
                    violations.push(Violation {
                        field: self.name,
                        message: check.message,
                        value: value.to_string(),
                    });
                }
            }
        }
    }

    fn sanitized(&self, raw: &RawForm) -> FieldValue {
        let initial = if self.multiple {
            FieldValue::List(raw.all(self.name).to_vec())
        } else {
            FieldValue::Text(raw.first(self.name).unwrap_or("").to_string())
        };
        self.sanitizers
            .iter()
            .fold(initial, |value, sanitizer| sanitizer.apply(value))
    }
}

/// Ordered list of field declarations
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: Vec<Field>,
}

impl FormSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Validate and sanitize every declared field. Undeclared keys are ignored.
    pub fn process(&self, raw: &RawForm) -> Submission {
        let mut violations = Vec::new();
        let mut values = IndexMap::with_capacity(self.fields.len());

        for field in &self.fields {
            field.validate(raw, &mut violations);
            values.insert(field.name, field.sanitized(raw));
        }

        Submission { values, violations }
    }
}

/// Sanitized values of a submission together with its violations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    values: IndexMap<&'static str, FieldValue>,
    violations: Vec<Violation>,
}

/// Result of the validation gate
#[derive(Debug)]
pub enum Outcome {
    /// No violations: safe to build and persist the entity
    Accepted(Submission),
    /// Re-render the form with the sanitized values and messages
    Rejected(Submission),
}

impl Submission {
    pub fn gate(self) -> Outcome {
        if self.violations.is_empty() {
            Outcome::Accepted(self)
        } else {
            Outcome::Rejected(self)
        }
    }

    pub fn values(&self) -> &IndexMap<&'static str, FieldValue> {
        &self.values
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Sanitized text of a single-valued field, empty if absent
    pub fn text(&self, name: &str) -> &str {
        match self.values.get(name) {
            Some(FieldValue::Text(s)) => s.as_str(),
            _ => "",
        }
    }

    pub fn date(&self, name: &str) -> Option<NaiveDate> {
        match self.values.get(name) {
            Some(FieldValue::Date(d)) => *d,
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> &[String] {
        match self.values.get(name) {
            Some(FieldValue::List(values)) => values.as_slice(),
            _ => &[],
        }
    }
}
