// Records: mapping entities whose handles alias on copy

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("record has no field '{field}'")]
    MissingField { field: String },

    #[error("field '{field}' holds {found}, not a number")]
    NotNumeric { field: String, found: String },

    #[error("incrementing field '{field}' overflows")]
    Overflow { field: String },
}

/// A single field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(n) => write!(f, "{}", n),
            FieldValue::Text(s) => {
                // Prefer a quote character the text does not contain.
                let quote = ['\'', '"', '`']
                    .into_iter()
                    .find(|q| !s.contains(*q))
                    .unwrap_or('\'');
                write!(f, "{}", quote)?;
                for c in s.chars() {
                    match c {
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        c if c == quote => write!(f, "\\{}", c)?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "{}", quote)
            }
        }
    }
}

type Fields = Vec<(String, FieldValue)>;

/// Shared handle to an insertion-ordered set of named fields.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: Rc<RefCell<Fields>>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.fields
            .borrow()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    /// Replaces the field in place, or appends it when it does not exist yet.
    pub fn set(&self, name: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        let mut fields = self.fields.borrow_mut();
        match fields.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => fields.push((name.to_string(), value)),
        }
    }

    /// Adds one to a numeric field and returns the new value.
    pub fn increment(&self, name: &str) -> Result<i64, RecordError> {
        let mut fields = self.fields.borrow_mut();
        let (_, slot) = fields
            .iter_mut()
            .find(|(key, _)| key == name)
            .ok_or_else(|| RecordError::MissingField {
                field: name.to_string(),
            })?;

        match slot {
            FieldValue::Number(n) => {
                *n = n.checked_add(1).ok_or_else(|| RecordError::Overflow {
                    field: name.to_string(),
                })?;
                Ok(*n)
            }
            other => Err(RecordError::NotNumeric {
                field: name.to_string(),
                found: other.to_string(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.borrow().is_empty()
    }

    /// True when both handles point at the same storage.
    pub fn ptr_eq(a: &Record, b: &Record) -> bool {
        Rc::ptr_eq(&a.fields, &b.fields)
    }

    /// Number of live handles onto this record's storage.
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.fields)
    }

    /// Deep copy with its own storage. Writes to the result are not seen here.
    pub fn detached(&self) -> Record {
        Record {
            fields: Rc::new(RefCell::new(self.fields.borrow().clone())),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self.fields.borrow();
        if fields.is_empty() {
            return write!(f, "{{}}");
        }

        write!(f, "{{ ")?;
        for (i, (name, value)) in fields.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, " }}")
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let fields = self.fields.borrow();
        let mut map = serializer.serialize_map(Some(fields.len()))?;
        for (name, value) in fields.iter() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
