//! Bucket records and size-limit parsing.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use time::OffsetDateTime;

use super::{
    checked, opt_bool, opt_string, opt_string_list, opt_timestamp, parse_list, require_object,
    Attributes, FieldError, ValidationError,
};

/// Unit for a bucket size limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    Byte,
    Megabyte,
    Gigabyte,
    Terabyte,
}

impl SizeUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            SizeUnit::Byte => "B",
            SizeUnit::Megabyte => "MB",
            SizeUnit::Gigabyte => "GB",
            SizeUnit::Terabyte => "TB",
        }
    }

    pub fn byte_factor(&self) -> u64 {
        match self {
            SizeUnit::Byte => 1,
            SizeUnit::Megabyte => 1024 * 1024,
            SizeUnit::Gigabyte => 1024 * 1024 * 1024,
            SizeUnit::Terabyte => 1024 * 1024 * 1024 * 1024,
        }
    }
}

/// Maximum object size accepted by a bucket.
///
/// Wire encoding is canonical: plain bytes encode as a bare number,
/// every other unit as `<size><suffix>` (e.g. `"10MB"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimit {
    pub size: u64,
    pub unit: SizeUnit,
}

impl SizeLimit {
    /// Parse a count-plus-suffix string. Unknown suffixes fall back to
    /// bytes; the size must be positive.
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        let digits_end = input
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(input.len());
        let (digits, suffix) = input.split_at(digits_end);
        let size: u64 = digits
            .parse()
            .map_err(|_| "must start with an integer size".to_string())?;
        if size == 0 {
            return Err("must be positive".to_string());
        }
        let unit = match suffix.trim().to_ascii_uppercase().as_str() {
            "" | "B" => SizeUnit::Byte,
            "MB" => SizeUnit::Megabyte,
            "GB" => SizeUnit::Gigabyte,
            "TB" => SizeUnit::Terabyte,
            _ => SizeUnit::Byte,
        };
        Ok(Self { size, unit })
    }

    pub fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(size) if size > 0 => Ok(Self {
                    size,
                    unit: SizeUnit::Byte,
                }),
                _ => Err("must be a positive integer".to_string()),
            },
            Value::String(s) => Self::parse(s),
            _ => Err("must be an integer byte count or a string like \"10MB\"".to_string()),
        }
    }

    pub fn as_bytes(&self) -> u64 {
        self.size.saturating_mul(self.unit.byte_factor())
    }
}

impl fmt::Display for SizeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            SizeUnit::Byte => write!(f, "{}", self.size),
            unit => write!(f, "{}{}", self.size, unit.suffix()),
        }
    }
}

impl Serialize for SizeLimit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.unit {
            SizeUnit::Byte => serializer.serialize_u64(self.size),
            _ => serializer.serialize_str(&self.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for SizeLimit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        SizeLimit::from_value(&value).map_err(serde::de::Error::custom)
    }
}

/// A storage bucket record.
///
/// Constructed transiently by the validator on every parse; nothing in
/// the crate keeps bucket records alive across calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Service-assigned identifier, immutable after creation.
    pub id: String,
    /// Display name; falls back to the id when absent.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub public: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size_limit: Option<SizeLimit>,
    /// Ordered, wildcard-capable MIME-type patterns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_mime_types: Option<Vec<String>>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<OffsetDateTime>,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

impl Bucket {
    /// Validate a raw attribute map into a bucket record.
    ///
    /// Cast order: string/boolean/size casts first, then `name`
    /// defaults to `id` and `public` to false, then required fields
    /// are enforced.
    pub fn from_attrs(attrs: &Attributes) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();

        let id = checked(&mut errors, opt_string(attrs, "id"));
        let name = checked(&mut errors, opt_string(attrs, "name"));
        let owner = checked(&mut errors, opt_string(attrs, "owner"));
        let public = checked(&mut errors, opt_bool(attrs, "public")).unwrap_or(false);
        let file_size_limit = match attrs.get("file_size_limit") {
            None | Some(Value::Null) => None,
            Some(value) => match SizeLimit::from_value(value) {
                Ok(limit) => Some(limit),
                Err(reason) => {
                    errors.push(FieldError::new("file_size_limit", reason));
                    None
                }
            },
        };
        let allowed_mime_types = checked(&mut errors, opt_string_list(attrs, "allowed_mime_types"));
        let created_at = checked(&mut errors, opt_timestamp(attrs, "created_at"));
        let updated_at = checked(&mut errors, opt_timestamp(attrs, "updated_at"));

        let name = match name {
            Some(name) if name.is_empty() => {
                errors.push(FieldError::new("name", "must not be empty"));
                None
            }
            Some(name) => Some(name),
            None => id.clone(),
        };
        let id = match id {
            Some(id) if id.is_empty() => {
                errors.push(FieldError::new("id", "must not be empty"));
                None
            }
            Some(id) => Some(id),
            None => {
                errors.push(FieldError::new("id", "is required"));
                None
            }
        };

        if let (Some(id), Some(name)) = (id, name) {
            if errors.is_empty() {
                return Ok(Bucket {
                    id,
                    name,
                    owner,
                    public,
                    file_size_limit,
                    allowed_mime_types,
                    created_at,
                    updated_at,
                });
            }
        }
        Err(ValidationError::new(errors))
    }

    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        Self::from_attrs(require_object(value, "bucket")?)
    }

    pub fn list_from_value(value: &Value) -> Result<Vec<Self>, ValidationError> {
        parse_list(value, "buckets", Self::from_value)
    }
}
