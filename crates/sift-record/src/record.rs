//! Flat records loaded from JSON.
//!
//! A record maps field names to string values. Nested objects are flattened
//! into dotted names:
//!
//! ```json
//! {"id": "a1", "author": {"name": "Ann"}, "tags": ["rust", "cli"], "year": 2001}
//! ```
//!
//! becomes `id = [a1]`, `author.name = [Ann]`, `tags = [rust, cli]` and
//! `year = [2001]`. Nulls are dropped.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use log::debug;
use serde_json::{Map, Value};

use crate::RecordError;

/// A record with named, multi-valued fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    /// Field name to values, in name order.
    fields: BTreeMap<String, Vec<String>>,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from a JSON object.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let mut record = Self::new();
        record.flatten_object("", object);
        record
    }

    /// Appends a value to a field, creating the field if needed.
    pub fn push(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(value.into());
    }

    /// Builder form of [`Record::push`].
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(field, value);
        self
    }

    /// Values of a field, if present.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// First value of a field.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(|values| values.first()).map(String::as_str)
    }

    /// Whether the record has the field, or any field nested under it.
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field) || self.nested_under(field).next().is_some()
    }

    /// Iterates over all fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Values of the field and of every field nested under it.
    pub fn values_under<'s>(&'s self, field: &str) -> impl Iterator<Item = &'s str> {
        self.fields
            .get(field)
            .into_iter()
            .flatten()
            .chain(self.nested_under(field).flat_map(|(_, values)| values))
            .map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields whose dotted name starts with `field.`.
    fn nested_under<'s>(
        &'s self,
        field: &str,
    ) -> impl Iterator<Item = (&'s String, &'s Vec<String>)> {
        self.fields.iter().filter(move |(name, _)| {
            name.strip_prefix(field)
                .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    /// Adds every member of an object under `prefix`.
    fn flatten_object(&mut self, prefix: &str, object: &Map<String, Value>) {
        for (key, value) in object {
            let name = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}.{key}")
            };
            self.flatten_value(&name, value);
        }
    }

    /// Adds a value under `name`, descending into arrays and objects.
    fn flatten_value(&mut self, name: &str, value: &Value) {
        match value {
            Value::Null => {}
            Value::Bool(b) => self.push(name, b.to_string()),
            Value::Number(n) => self.push(name, n.to_string()),
            Value::String(s) => self.push(name, s.as_str()),
            Value::Array(items) => {
                for item in items {
                    self.flatten_value(name, item);
                }
            }
            Value::Object(object) => self.flatten_object(name, object),
        }
    }
}

/// Parses records from JSON text.
///
/// Accepts a single object or an array of objects. The `path` parameter is
/// used for error reporting.
pub fn parse_records(contents: &str, path: &Path) -> Result<Vec<Record>, RecordError> {
    let value: Value = serde_json::from_str(contents).map_err(|source| RecordError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let not_an_object = |index| RecordError::NotAnObject {
        path: path.to_path_buf(),
        index,
    };

    match value {
        Value::Object(object) => Ok(vec![Record::from_object(&object)]),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.as_object()
                    .map(Record::from_object)
                    .ok_or_else(|| not_an_object(index))
            })
            .collect(),
        _ => Err(not_an_object(0)),
    }
}

/// Loads records from a JSON file.
pub fn load_records(path: &Path) -> Result<Vec<Record>, RecordError> {
    let contents = fs::read_to_string(path).map_err(|source| RecordError::Read {
        path: PathBuf::from(path),
        source,
    })?;
    let records = parse_records(&contents, path)?;
    debug!("loaded {} record(s) from {}", records.len(), path.display());
    Ok(records)
}
