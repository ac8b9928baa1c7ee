//! Options records: list/search parameters, image transforms, and
//! upload settings. These only shape requests — none of them persist.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{checked, opt_bool, opt_string, opt_u64, Attributes, FieldError, ValidationError};

const DEFAULT_LIMIT: u32 = 100;
const QUALITY_MIN: u8 = 20;
const QUALITY_MAX: u8 = 100;
const DEFAULT_QUALITY: u8 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// Sort specification for offset-based listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortBy {
    pub column: String,
    pub order: SortOrder,
}

impl Default for SortBy {
    fn default() -> Self {
        Self {
            column: "name".to_string(),
            order: SortOrder::Asc,
        }
    }
}

/// Offset-based list parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOptions {
    pub limit: u32,
    pub offset: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    pub sort_by: SortBy,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
            search: None,
            sort_by: SortBy::default(),
        }
    }
}

impl SearchOptions {
    pub fn from_attrs(attrs: &Attributes) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();

        let limit = cast_u32(&mut errors, attrs, "limit").unwrap_or(DEFAULT_LIMIT);
        let offset = cast_u32(&mut errors, attrs, "offset").unwrap_or(0);
        let search = checked(&mut errors, opt_string(attrs, "search"));
        let sort_by = match attrs.get("sort_by") {
            None | Some(Value::Null) => SortBy::default(),
            Some(Value::Object(sort)) => {
                let column = checked(&mut errors, opt_string(sort, "column"))
                    .unwrap_or_else(|| "name".to_string());
                let order = match opt_string(sort, "order") {
                    Ok(None) => SortOrder::Asc,
                    Ok(Some(raw)) => match raw.as_str() {
                        "asc" => SortOrder::Asc,
                        "desc" => SortOrder::Desc,
                        _ => {
                            errors.push(FieldError::new("sort_by.order", "must be asc or desc"));
                            SortOrder::Asc
                        }
                    },
                    Err(err) => {
                        errors.push(err);
                        SortOrder::Asc
                    }
                };
                SortBy { column, order }
            }
            Some(_) => {
                errors.push(FieldError::new("sort_by", "must be an object"));
                SortBy::default()
            }
        };

        if errors.is_empty() {
            Ok(Self {
                limit,
                offset,
                search,
                sort_by,
            })
        } else {
            Err(ValidationError::new(errors))
        }
    }
}

/// Cursor-based list parameters: O(1) page retrieval through an opaque
/// continuation token instead of a numeric offset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListV2Options {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
    pub with_delimiter: bool,
}

impl Default for ListV2Options {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            cursor: None,
            with_delimiter: false,
        }
    }
}

impl ListV2Options {
    pub fn from_attrs(attrs: &Attributes) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();
        let limit = cast_u32(&mut errors, attrs, "limit").unwrap_or(DEFAULT_LIMIT);
        let cursor = checked(&mut errors, opt_string(attrs, "cursor"));
        let with_delimiter =
            checked(&mut errors, opt_bool(attrs, "with_delimiter")).unwrap_or(false);
        if errors.is_empty() {
            Ok(Self {
                limit,
                cursor,
                with_delimiter,
            })
        } else {
            Err(ValidationError::new(errors))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeMode {
    #[default]
    Cover,
    Contain,
    Fill,
}

impl ResizeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeMode::Cover => "cover",
            ResizeMode::Contain => "contain",
            ResizeMode::Fill => "fill",
        }
    }
}

/// Image-rendering parameters applied at download time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub resize: ResizeMode,
    pub quality: u8,
    pub format: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            resize: ResizeMode::Cover,
            quality: DEFAULT_QUALITY,
            format: "origin".to_string(),
        }
    }
}

impl TransformOptions {
    pub fn from_attrs(attrs: &Attributes) -> Result<Self, ValidationError> {
        let mut errors = Vec::new();

        let width = cast_u32(&mut errors, attrs, "width");
        let height = cast_u32(&mut errors, attrs, "height");
        let resize = match opt_string(attrs, "resize") {
            Ok(None) => ResizeMode::Cover,
            Ok(Some(raw)) => match raw.as_str() {
                "cover" => ResizeMode::Cover,
                "contain" => ResizeMode::Contain,
                "fill" => ResizeMode::Fill,
                _ => {
                    errors.push(FieldError::new("resize", "must be cover, contain or fill"));
                    ResizeMode::Cover
                }
            },
            Err(err) => {
                errors.push(err);
                ResizeMode::Cover
            }
        };
        let quality = match checked(&mut errors, opt_u64(attrs, "quality")) {
            None => DEFAULT_QUALITY,
            Some(raw) if (QUALITY_MIN as u64..=QUALITY_MAX as u64).contains(&raw) => raw as u8,
            Some(_) => {
                errors.push(FieldError::new("quality", "must be between 20 and 100"));
                DEFAULT_QUALITY
            }
        };
        let format =
            checked(&mut errors, opt_string(attrs, "format")).unwrap_or_else(|| "origin".into());

        if errors.is_empty() {
            Ok(Self {
                width,
                height,
                resize,
                quality,
                format,
            })
        } else {
            Err(ValidationError::new(errors))
        }
    }

    /// Range checks for options built directly rather than cast from
    /// an attribute map.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if (QUALITY_MIN..=QUALITY_MAX).contains(&self.quality) {
            Ok(())
        } else {
            Err(ValidationError::new(vec![FieldError::new(
                "quality",
                "must be between 20 and 100",
            )]))
        }
    }

    /// Flatten into query pairs for the image-render endpoints.
    /// Absent dimensions are omitted, not encoded as empty.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(width) = self.width {
            pairs.push(("width".to_string(), width.to_string()));
        }
        if let Some(height) = self.height {
            pairs.push(("height".to_string(), height.to_string()));
        }
        pairs.push(("resize".to_string(), self.resize.as_str().to_string()));
        pairs.push(("quality".to_string(), self.quality.to_string()));
        pairs.push(("format".to_string(), self.format.clone()));
        pairs
    }
}

/// Upload settings; drives the headers of upload requests.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOptions {
    /// Cache lifetime in seconds, sent as `cache-control: max-age=<n>`.
    pub cache_control: String,
    pub content_type: String,
    /// Sent as the `x-upsert` header.
    pub upsert: bool,
    /// Free-form metadata, sent base64-encoded in `x-metadata`.
    pub metadata: Map<String, Value>,
    /// Extra headers merged into the request.
    pub headers: HashMap<String, String>,
}

impl Default for FileOptions {
    fn default() -> Self {
        Self {
            cache_control: "3600".to_string(),
            content_type: "text/plain;charset=UTF-8".to_string(),
            upsert: false,
            metadata: Map::new(),
            headers: HashMap::new(),
        }
    }
}

fn cast_u32(errors: &mut Vec<FieldError>, attrs: &Attributes, key: &str) -> Option<u32> {
    match opt_u64(attrs, key) {
        Ok(None) => None,
        Ok(Some(raw)) => match u32::try_from(raw) {
            Ok(value) => Some(value),
            Err(_) => {
                errors.push(FieldError::new(key, "is out of range"));
                None
            }
        },
        Err(err) => {
            errors.push(err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn attrs(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            other => panic!("fixture must be an object, got {other:?}"),
        }
    }

    #[test]
    fn test_search_defaults() {
        let options = SearchOptions::default();
        assert_eq!(options.limit, 100);
        assert_eq!(options.offset, 0);
        assert_eq!(options.sort_by.column, "name");
        assert_eq!(options.sort_by.order, SortOrder::Asc);
    }

    #[test]
    fn test_search_body_shape() {
        let body = serde_json::to_value(SearchOptions::default()).unwrap();
        assert_eq!(
            body,
            json!({"limit": 100, "offset": 0, "sort_by": {"column": "name", "order": "asc"}})
        );
    }

    #[test]
    fn test_search_from_attrs_casts_sort() {
        let options = SearchOptions::from_attrs(&attrs(json!({
            "limit": 10,
            "sort_by": {"column": "updated_at", "order": "desc"},
        })))
        .unwrap();
        assert_eq!(options.limit, 10);
        assert_eq!(options.sort_by.order, SortOrder::Desc);
    }

    #[test]
    fn test_search_rejects_unknown_order() {
        let err = SearchOptions::from_attrs(&attrs(json!({
            "sort_by": {"order": "sideways"},
        })))
        .unwrap_err();
        assert!(err.field_names().contains(&"sort_by.order"));
    }

    #[test]
    fn test_list_v2_defaults() {
        let options = ListV2Options::default();
        assert_eq!(options.limit, 100);
        assert!(options.cursor.is_none());
        assert!(!options.with_delimiter);
    }

    #[test]
    fn test_transform_defaults_and_query() {
        let options = TransformOptions::default();
        assert_eq!(options.quality, 80);
        assert_eq!(options.format, "origin");
        let pairs = options.to_query_pairs();
        assert!(!pairs.iter().any(|(key, _)| key == "width"));
        assert!(pairs.contains(&("resize".to_string(), "cover".to_string())));
    }

    #[test]
    fn test_transform_quality_range() {
        let err = TransformOptions::from_attrs(&attrs(json!({"quality": 10}))).unwrap_err();
        assert!(err.field_names().contains(&"quality"));

        let options = TransformOptions {
            quality: 19,
            ..TransformOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_transform_resize_cast() {
        let options = TransformOptions::from_attrs(&attrs(json!({"resize": "fill"}))).unwrap();
        assert_eq!(options.resize, ResizeMode::Fill);
        assert!(TransformOptions::from_attrs(&attrs(json!({"resize": "stretch"}))).is_err());
    }

    #[test]
    fn test_file_options_defaults() {
        let options = FileOptions::default();
        assert_eq!(options.cache_control, "3600");
        assert_eq!(options.content_type, "text/plain;charset=UTF-8");
        assert!(!options.upsert);
    }
}
