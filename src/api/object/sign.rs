use http::Method;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::{ApiRequest, RequestDescriptor};
use crate::error::StorageError;
use crate::path;
use crate::schema::TransformOptions;

/// Sign a time-limited download URL for one object
/// (`POST /object/sign/{bucket}/{path}`).
#[derive(Debug, Clone, Serialize)]
pub struct CreateSignedUrlRequest {
    #[serde(skip)]
    pub bucket_id: String,
    #[serde(skip)]
    pub path: String,
    #[serde(rename = "expiresIn")]
    pub expires_in: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformOptions>,
}

/// The service answers with a relative URL; the access token rides in
/// its query string.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    pub signed_url: String,
}

impl ApiRequest for CreateSignedUrlRequest {
    type Response = SignedUrlResponse;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        if let Some(transform) = &self.transform {
            transform.validate()?;
        }
        let url = path::endpoint_url(
            base_url,
            &path::object_route("object/sign", &self.bucket_id, &self.path),
        )?;
        let body = serde_json::to_value(&self)?;
        Ok(RequestDescriptor::new(url).method(Method::POST).json(body))
    }
}

/// Sign several keys in one call (`POST /object/sign/{bucket}`).
#[derive(Debug, Clone, Serialize)]
pub struct CreateSignedUrlsRequest {
    #[serde(skip)]
    pub bucket_id: String,
    #[serde(rename = "expiresIn")]
    pub expires_in: u64,
    pub paths: Vec<String>,
}

/// Per-path outcome of a batch signing call; failed entries carry an
/// error message instead of a URL.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedUrlEntry {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(rename = "signedURL", default)]
    pub signed_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiRequest for CreateSignedUrlsRequest {
    type Response = Vec<SignedUrlEntry>;

    fn descriptor(mut self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        let url = path::endpoint_url(base_url, &format!("object/sign/{}", self.bucket_id))?;
        self.paths = self
            .paths
            .iter()
            .map(|key| path::normalize_key(key))
            .collect();
        let body = serde_json::to_value(&self)?;
        Ok(RequestDescriptor::new(url).method(Method::POST).json(body))
    }
}
