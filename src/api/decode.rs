//! Success-body decoding strategies.

use bytes::Bytes;
use serde_json::Value;

use crate::error::StorageError;
use crate::schema::{Bucket, StorageObject};

/// How a successful response body is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Parse as generic JSON, optionally guarded by an entity check.
    Json { check: Option<EntityCheck> },
    /// Hand the bytes back unmodified (binary payloads).
    Raw,
}

/// Entity schema used as a decode-time guard.
///
/// A passing check does not change what the caller receives — the
/// generic JSON comes back either way. Only a failing check aborts
/// decoding, since a structurally valid body that does not match the
/// expected entity does not belong to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityCheck {
    Bucket,
    BucketList,
    Object,
    ObjectList,
}

impl EntityCheck {
    fn describe(&self) -> &'static str {
        match self {
            EntityCheck::Bucket => "bucket",
            EntityCheck::BucketList => "bucket list",
            EntityCheck::Object => "object",
            EntityCheck::ObjectList => "object list",
        }
    }
}

/// Decoded response payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Bytes(Bytes),
}

impl Payload {
    pub fn into_json(self) -> Result<Value, StorageError> {
        match self {
            Payload::Json(value) => Ok(value),
            Payload::Bytes(_) => Err(StorageError::Decode(
                "expected a JSON response body".to_string(),
            )),
        }
    }

    pub fn into_bytes(self) -> Result<Bytes, StorageError> {
        match self {
            Payload::Bytes(bytes) => Ok(bytes),
            Payload::Json(_) => Err(StorageError::Decode(
                "expected a binary response body".to_string(),
            )),
        }
    }
}

/// Decode a successful response body under the given policy.
///
/// A structurally malformed body is a hard decode error, distinct from
/// an entity-check failure.
pub fn decode_body(policy: &DecodePolicy, body: Bytes) -> Result<Payload, StorageError> {
    match policy {
        DecodePolicy::Raw => Ok(Payload::Bytes(body)),
        DecodePolicy::Json { check } => {
            let value: Value = serde_json::from_slice(&body).map_err(|err| {
                StorageError::Decode(format!("response body is not valid JSON: {err}"))
            })?;
            if let Some(check) = check {
                verify(check, &value)?;
            }
            Ok(Payload::Json(value))
        }
    }
}

fn verify(check: &EntityCheck, value: &Value) -> Result<(), StorageError> {
    let outcome = match check {
        EntityCheck::Bucket => Bucket::from_value(value).map(|_| ()),
        EntityCheck::BucketList => Bucket::list_from_value(value).map(|_| ()),
        EntityCheck::Object => StorageObject::from_value(value).map(|_| ()),
        EntityCheck::ObjectList => StorageObject::list_from_value(value).map(|_| ()),
    };
    outcome.map_err(|err| {
        StorageError::Decode(format!(
            "response body is not a valid {}: {}",
            check.describe(),
            err
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(raw: &str) -> Bytes {
        Bytes::copy_from_slice(raw.as_bytes())
    }

    #[test]
    fn test_empty_list_decodes() {
        let payload = decode_body(
            &DecodePolicy::Json {
                check: Some(EntityCheck::BucketList),
            },
            body("[]"),
        )
        .unwrap();
        assert_eq!(payload, Payload::Json(serde_json::json!([])));
    }

    #[test]
    fn test_check_success_still_returns_generic_json() {
        let payload = decode_body(
            &DecodePolicy::Json {
                check: Some(EntityCheck::Bucket),
            },
            body(r#"{"id":"avatars","public":true,"extra":"kept"}"#),
        )
        .unwrap();
        // the validated record is not what comes back: the raw JSON is,
        // unknown fields included
        let value = payload.into_json().unwrap();
        assert_eq!(value.get("extra"), Some(&serde_json::json!("kept")));
    }

    #[test]
    fn test_check_failure_aborts_decoding() {
        let err = decode_body(
            &DecodePolicy::Json {
                check: Some(EntityCheck::Bucket),
            },
            body(r#"{"message":"created"}"#),
        )
        .unwrap_err();
        assert!(matches!(err, StorageError::Decode(_)));
    }

    #[test]
    fn test_malformed_json_is_a_decode_error() {
        let err = decode_body(&DecodePolicy::Json { check: None }, body("{not json")).unwrap_err();
        assert!(matches!(err, StorageError::Decode(_)));
    }

    #[test]
    fn test_raw_passthrough() {
        let payload = decode_body(&DecodePolicy::Raw, body("{not json")).unwrap();
        assert_eq!(payload.into_bytes().unwrap(), Bytes::from_static(b"{not json"));
    }

    #[test]
    fn test_no_check_accepts_any_shape() {
        let payload =
            decode_body(&DecodePolicy::Json { check: None }, body(r#"{"name":"avatars"}"#))
                .unwrap();
        assert_eq!(payload, Payload::Json(serde_json::json!({"name": "avatars"})));
    }
}
