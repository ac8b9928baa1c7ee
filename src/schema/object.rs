//! Stored object records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use super::{
    checked, opt_string, opt_timestamp, parse_list, require_object, Attributes, FieldError,
    ValidationError,
};
use crate::path;

/// A stored object record.
///
/// The bucket back-reference is an id only — resolving the full bucket
/// is a separate, explicit call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageObject {
    pub id: String,
    /// Object key within its bucket; serialized as `name` on the wire.
    /// Normalized on parse: no leading/trailing/duplicate slashes.
    #[serde(rename = "name")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Free-form metadata attached at upload time.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
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
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_accessed_at: Option<OffsetDateTime>,
}

impl StorageObject {
    /// Validate a raw attribute map into an object record. Only `id`
    /// is required; the key is normalized as it is cast.
    pub fn from_attrs(attrs: &Attributes) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();

        let id = checked(&mut errors, opt_string(attrs, "id"));
        let raw_path = checked(&mut errors, opt_string(attrs, "name"));
        let bucket_id = checked(&mut errors, opt_string(attrs, "bucket_id"));
        let owner = checked(&mut errors, opt_string(attrs, "owner"));
        let metadata = match attrs.get("metadata") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => {
                errors.push(FieldError::new("metadata", "must be an object"));
                Map::new()
            }
        };
        let created_at = checked(&mut errors, opt_timestamp(attrs, "created_at"));
        let updated_at = checked(&mut errors, opt_timestamp(attrs, "updated_at"));
        let last_accessed_at = checked(&mut errors, opt_timestamp(attrs, "last_accessed_at"));

        let id = match id {
            Some(id) if !id.is_empty() => Some(id),
            _ => {
                errors.push(FieldError::new("id", "is required"));
                None
            }
        };

        match id {
            Some(id) if errors.is_empty() => Ok(StorageObject {
                id,
                path: path::normalize_key(raw_path.as_deref().unwrap_or_default()),
                bucket_id,
                owner,
                metadata,
                created_at,
                updated_at,
                last_accessed_at,
            }),
            _ => Err(ValidationError::new(errors)),
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        Self::from_attrs(require_object(value, "object")?)
    }

    pub fn list_from_value(value: &Value) -> Result<Vec<Self>, ValidationError> {
        parse_list(value, "objects", Self::from_value)
    }
}
