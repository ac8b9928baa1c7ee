use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use bytes::Bytes;
use http::{header, HeaderMap, HeaderName, HeaderValue, Method};
use serde::Deserialize;
use url::Url;

use crate::api::{ApiRequest, RequestDescriptor};
use crate::error::StorageError;
use crate::path;
use crate::schema::FileOptions;

pub(crate) const UPSERT_HEADER: &str = "x-upsert";
const METADATA_HEADER: &str = "x-metadata";

/// Upload an object body (`POST /object/{bucket}/{path}`).
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub bucket_id: String,
    pub path: String,
    pub body: Bytes,
    pub options: FileOptions,
}

/// Service acknowledgement for an upload.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "Id", default)]
    pub id: Option<String>,
    #[serde(rename = "Key", default)]
    pub key: Option<String>,
}

impl ApiRequest for UploadRequest {
    type Response = UploadResponse;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        let url = path::endpoint_url(
            base_url,
            &path::object_route("object", &self.bucket_id, &self.path),
        )?;
        Ok(RequestDescriptor::new(url)
            .method(Method::POST)
            .headers(&upload_headers(&self.options)?)
            .bytes(self.body))
    }
}

/// Upload against a previously signed URL
/// (`PUT /object/upload/sign/{bucket}/{path}?token=…`).
#[derive(Debug, Clone)]
pub struct UploadToSignedUrlRequest {
    pub bucket_id: String,
    pub path: String,
    pub token: String,
    pub body: Bytes,
    pub options: FileOptions,
}

impl ApiRequest for UploadToSignedUrlRequest {
    type Response = UploadResponse;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        let url = path::endpoint_url(
            base_url,
            &path::object_route("object/upload/sign", &self.bucket_id, &self.path),
        )?;
        Ok(RequestDescriptor::new(url)
            .method(Method::PUT)
            .query("token", self.token)
            .headers(&upload_headers(&self.options)?)
            .bytes(self.body))
    }
}

/// Headers driven by [`FileOptions`]: cache lifetime, content type,
/// the upsert flag, base64-encoded JSON metadata, and any extra
/// headers the caller supplied.
fn upload_headers(options: &FileOptions) -> Result<HeaderMap, StorageError> {
    let mut headers = HeaderMap::new();
    let cache_control = HeaderValue::try_from(format!("max-age={}", options.cache_control))
        .map_err(|_| StorageError::InvalidHeader(header::CACHE_CONTROL.to_string()))?;
    headers.insert(header::CACHE_CONTROL, cache_control);
    let content_type = HeaderValue::try_from(options.content_type.as_str())
        .map_err(|_| StorageError::InvalidHeader(header::CONTENT_TYPE.to_string()))?;
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(
        HeaderName::from_static(UPSERT_HEADER),
        HeaderValue::from_static(if options.upsert { "true" } else { "false" }),
    );
    if !options.metadata.is_empty() {
        let encoded = STANDARD.encode(serde_json::to_vec(&options.metadata)?);
        let value = HeaderValue::try_from(encoded)
            .map_err(|_| StorageError::InvalidHeader(METADATA_HEADER.to_string()))?;
        headers.insert(HeaderName::from_static(METADATA_HEADER), value);
    }
    for (name, value) in &options.headers {
        let header_name = HeaderName::try_from(name.as_str())
            .map_err(|_| StorageError::InvalidHeader(name.clone()))?;
        let header_value = HeaderValue::try_from(value.as_str())
            .map_err(|_| StorageError::InvalidHeader(name.clone()))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}
