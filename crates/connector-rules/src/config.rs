//! Read access to connector configurations.
//!
//! Rules compare values by their string form, so a configuration only has to
//! answer "is this field present" and "what is its text".

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde_json::{Map, Value};

/// A connector configuration as seen by the evaluator.
pub trait ConfigLookup {
    /// Whether `name` is present, regardless of its value.
    fn contains_field(&self, name: &str) -> bool;

    /// String form of the value of `name`, if present.
    fn field_text(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// String form of a JSON value as used in rule comparisons.
///
/// Strings compare by content, so `"true"` and `true` are the same value, as
/// are `"5"` and `5`. `null` renders as `null`; arrays and objects as compact
/// JSON.
pub fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text),
        other => Cow::Owned(other.to_string()),
    }
}

impl ConfigLookup for Map<String, Value> {
    fn contains_field(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn field_text(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(value_text)
    }
}

impl ConfigLookup for BTreeMap<String, Value> {
    fn contains_field(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn field_text(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(value_text)
    }
}

impl ConfigLookup for BTreeMap<String, String> {
    fn contains_field(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn field_text(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(value.as_str()))
    }
}

impl<S: BuildHasher> ConfigLookup for HashMap<String, String, S> {
    fn contains_field(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn field_text(&self, name: &str) -> Option<Cow<'_, str>> {
        self.get(name).map(|value| Cow::Borrowed(value.as_str()))
    }
}
