use http::{HeaderName, HeaderValue, Method};
use serde::Deserialize;
use url::Url;

use super::upload::UPSERT_HEADER;
use crate::api::{ApiRequest, RequestDescriptor};
use crate::error::StorageError;
use crate::path;

/// Sign a one-shot upload URL
/// (`POST /object/upload/sign/{bucket}/{path}`).
#[derive(Debug, Clone)]
pub struct CreateSignedUploadUrlRequest {
    pub bucket_id: String,
    pub path: String,
    pub upsert: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignedUploadUrlResponse {
    /// Relative upload URL carrying the token in its query string.
    pub url: String,
}

impl ApiRequest for CreateSignedUploadUrlRequest {
    type Response = SignedUploadUrlResponse;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        let url = path::endpoint_url(
            base_url,
            &path::object_route("object/upload/sign", &self.bucket_id, &self.path),
        )?;
        Ok(RequestDescriptor::new(url).method(Method::POST).header(
            HeaderName::from_static(UPSERT_HEADER),
            HeaderValue::from_static(if self.upsert { "true" } else { "false" }),
        ))
    }
}
