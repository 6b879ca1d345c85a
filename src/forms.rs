//! # Form Data and Validation
//!
//! This module holds the form representation used by every mutating handler
//! and the validation rules that run against it.
//!
//! ## How it fits together
//! A `Form` is created fresh per request from the submitted key/value pairs
//! (a field may carry repeated values; lookups return the first one). The
//! handler then calls validation rules, each of which may append messages to
//! the form's `errors`, and finally checks `is_valid()`. An invalid form is
//! re-rendered with its errors at status 200; validation failures are a
//! display concern, never an HTTP error.
//!
//! ## Rule semantics
//! Rules only read the form's values and append to its errors, so they are
//! independent of each other: invocation order affects message order, never
//! validity. A blank value short-circuits every rule except `required`, so a
//! missing field collects one "cannot be blank" message instead of a pile of
//! length/pattern complaints on top of it.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Sanity-checking pattern for email addresses, compiled once.
///
/// This is the RFC 5322 inspired pattern recommended by the W3C for the HTML
/// email input type. It deliberately stops short of full RFC compliance.
pub static EMAIL_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        "^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?\
         (?:\\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is a valid regex")
});

/// Validation error messages keyed by field name.
///
/// A field can accumulate several messages; they are kept in the order the
/// rules added them. Templates usually show only the first.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct FormErrors(HashMap<String, Vec<String>>);

impl FormErrors {
    /// Append an error message for the given field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    /// The first error message for a field, if any.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|messages| messages.first()).map(String::as_str)
    }

    /// All messages for a field, in the order they were added.
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Submitted form data plus accumulated validation errors.
///
/// The values mapping is built once from the request body and never mutated
/// afterwards; validation rules only write to `errors`. This explicit
/// composition (values next to errors, lookups delegated by hand) keeps the
/// form's two lifecycles visible: immutable input, mutable verdict.
#[derive(Debug, Clone)]
pub struct Form {
    values: HashMap<String, Vec<String>>,
    pub errors: FormErrors,
}

impl Form {
    /// Build a form from submitted key/value pairs.
    ///
    /// Repeated fields are legal; every submitted value is retained in
    /// submission order and `get` returns the first.
    pub fn new(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for (field, value) in pairs {
            values.entry(field).or_default().push(value);
        }
        Self { values, errors: FormErrors::default() }
    }

    /// An empty form, used when displaying a blank page.
    pub fn empty() -> Self {
        Self::new([])
    }

    /// The first submitted value for a field, or "" if the field is absent.
    pub fn get(&self, field: &str) -> &str {
        self.values
            .get(field)
            .and_then(|values| values.first())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Check that the given fields are present and not blank (after
    /// trimming). A blank field gets "This field cannot be blank".
    pub fn required(&mut self, fields: &[&str]) {
        for field in fields {
            if self.get(field).trim().is_empty() {
                self.errors.add(field, "This field cannot be blank");
            }
        }
    }

    /// Check that a field contains at most `max` characters (code points,
    /// not bytes). Empty values are skipped; `required` owns that case.
    pub fn max_length(&mut self, field: &str, max: usize) {
        let value = self.get(field);
        if value.is_empty() {
            return;
        }
        if value.chars().count() > max {
            self.errors.add(
                field,
                format!("This field is too long (maximum is {max} characters)"),
            );
        }
    }

    /// Check that a field contains at least `min` characters (code points).
    /// Empty values are skipped.
    pub fn min_length(&mut self, field: &str, min: usize) {
        let value = self.get(field);
        if value.is_empty() {
            return;
        }
        if value.chars().count() < min {
            self.errors.add(
                field,
                format!("This field is too short (minimum is {min} characters)"),
            );
        }
    }

    /// Check that a field exactly equals one of the permitted values. No
    /// trimming or case folding happens here; "7 " is not "7". Empty values
    /// are skipped.
    pub fn permitted_values(&mut self, field: &str, permitted: &[&str]) {
        let value = self.get(field);
        if value.is_empty() {
            return;
        }
        if !permitted.contains(&value) {
            self.errors.add(field, "This field is invalid");
        }
    }

    /// Check that a field matches the given pattern. Empty values are
    /// skipped.
    pub fn matches_pattern(&mut self, field: &str, pattern: &Regex) {
        let value = self.get(field);
        if value.is_empty() {
            return;
        }
        if !pattern.is_match(value) {
            self.errors.add(field, "This field is invalid");
        }
    }

    /// True iff no field has accumulated any error.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

// Templates see a form as two flat maps: `values` (first submitted value per
// field, for re-populating inputs) and `errors` (all messages per field).
impl Serialize for Form {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let values: HashMap<&str, &str> = self
            .values
            .iter()
            .map(|(field, values)| {
                (field.as_str(), values.first().map(String::as_str).unwrap_or(""))
            })
            .collect();

        let mut form = serializer.serialize_struct("Form", 2)?;
        form.serialize_field("values", &values)?;
        form.serialize_field("errors", &self.errors)?;
        form.end()
    }
}
