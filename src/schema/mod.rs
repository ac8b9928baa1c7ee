//! Resource records and the attribute-map validator.
//!
//! Raw attribute maps pass through an ordered cast pipeline
//! (cast, default, require) and come out as typed records or as a
//! [`ValidationError`] naming every offending field. Parsing is pure:
//! no I/O, no mutable intermediate state. List input is validated
//! element-wise and the first failing element aborts the whole batch.

use std::fmt;

use serde_json::{Map, Value};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub mod bucket;
pub mod object;
pub mod options;

pub use bucket::{Bucket, SizeLimit, SizeUnit};
pub use object::StorageObject;
pub use options::{
    FileOptions, ListV2Options, ResizeMode, SearchOptions, SortBy, SortOrder, TransformOptions,
};

/// Loosely-typed attribute map accepted by the validators.
pub type Attributes = Map<String, Value>;

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub(crate) fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

/// Structured validation failure enumerating every offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

impl ValidationError {
    pub(crate) fn new(fields: Vec<FieldError>) -> Self {
        Self { fields }
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid attributes: ")?;
        for (idx, field) in self.fields.iter().enumerate() {
            if idx > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

// --- field cast helpers --------------------------------------------------

pub(crate) fn opt_string(attrs: &Attributes, key: &str) -> Result<Option<String>, FieldError> {
    match attrs.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(FieldError::new(key, "must be a string")),
    }
}

pub(crate) fn opt_bool(attrs: &Attributes, key: &str) -> Result<Option<bool>, FieldError> {
    match attrs.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(FieldError::new(key, "must be a boolean")),
    }
}

pub(crate) fn opt_u64(attrs: &Attributes, key: &str) -> Result<Option<u64>, FieldError> {
    match attrs.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| FieldError::new(key, "must be a non-negative integer")),
        Some(_) => Err(FieldError::new(key, "must be a non-negative integer")),
    }
}

pub(crate) fn opt_string_list(
    attrs: &Attributes,
    key: &str,
) -> Result<Option<Vec<String>>, FieldError> {
    match attrs.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => out.push(s.clone()),
                    _ => return Err(FieldError::new(key, "must be a list of strings")),
                }
            }
            Ok(Some(out))
        }
        Some(_) => Err(FieldError::new(key, "must be a list of strings")),
    }
}

pub(crate) fn opt_timestamp(
    attrs: &Attributes,
    key: &str,
) -> Result<Option<OffsetDateTime>, FieldError> {
    match opt_string(attrs, key)? {
        None => Ok(None),
        Some(raw) => OffsetDateTime::parse(&raw, &Rfc3339)
            .map(Some)
            .map_err(|_| FieldError::new(key, "must be an RFC 3339 timestamp")),
    }
}

/// Push the error side of a cast onto `errors`, keeping the value side.
pub(crate) fn checked<T>(
    errors: &mut Vec<FieldError>,
    cast: Result<Option<T>, FieldError>,
) -> Option<T> {
    match cast {
        Ok(value) => value,
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

pub(crate) fn require_object<'a>(
    value: &'a Value,
    what: &str,
) -> Result<&'a Attributes, ValidationError> {
    match value {
        Value::Object(attrs) => Ok(attrs),
        _ => Err(ValidationError::new(vec![FieldError::new(
            what,
            "must be an object",
        )])),
    }
}

/// Element-wise list validation. A single failing element aborts the
/// whole batch and surfaces that element's failure.
pub(crate) fn parse_list<T>(
    value: &Value,
    what: &str,
    parse: impl Fn(&Value) -> Result<T, ValidationError>,
) -> Result<Vec<T>, ValidationError> {
    match value {
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(parse(item)?);
            }
            Ok(out)
        }
        _ => Err(ValidationError::new(vec![FieldError::new(
            what,
            "must be a list",
        )])),
    }
}
