use http::Method;
use serde::Serialize;
use url::Url;

use crate::api::{ApiRequest, MessageResponse, RequestDescriptor};
use crate::error::StorageError;
use crate::path;
use crate::schema::SizeLimit;

/// Update the mutable subset of a bucket (`PUT /bucket/{id}`).
///
/// The id and name are immutable after creation; only visibility,
/// limits, MIME patterns, and the bucket type can change.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateBucketRequest {
    #[serde(skip)]
    pub id: String,
    pub public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size_limit: Option<SizeLimit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mime_types: Option<Vec<String>>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub bucket_type: Option<String>,
}

impl ApiRequest for UpdateBucketRequest {
    type Response = MessageResponse;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        let url = path::endpoint_url(base_url, &format!("bucket/{}", self.id))?;
        let body = serde_json::to_value(&self)?;
        Ok(RequestDescriptor::new(url).method(Method::PUT).json(body))
    }
}
