use http::Method;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::{ApiRequest, MessageResponse, RequestDescriptor};
use crate::error::StorageError;
use crate::path;

/// Shared body for move and copy (`POST /object/move` / `/object/copy`).
#[derive(Debug, Clone, Serialize)]
pub struct MovePayload {
    pub bucket_id: String,
    pub source_key: String,
    pub destination_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_bucket: Option<String>,
}

impl MovePayload {
    fn normalized(mut self) -> Self {
        self.source_key = path::normalize_key(&self.source_key);
        self.destination_key = path::normalize_key(&self.destination_key);
        self
    }
}

/// Move an object to a new key, optionally across buckets.
#[derive(Debug, Clone)]
pub struct MoveObjectRequest {
    pub payload: MovePayload,
}

impl ApiRequest for MoveObjectRequest {
    type Response = MessageResponse;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        let body = serde_json::to_value(self.payload.normalized())?;
        Ok(
            RequestDescriptor::new(path::endpoint_url(base_url, "object/move")?)
                .method(Method::POST)
                .json(body),
        )
    }
}

/// Copy an object to a new key, optionally across buckets.
#[derive(Debug, Clone)]
pub struct CopyObjectRequest {
    pub payload: MovePayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CopyResponse {
    #[serde(rename = "Key", default)]
    pub key: Option<String>,
}

impl ApiRequest for CopyObjectRequest {
    type Response = CopyResponse;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        let body = serde_json::to_value(self.payload.normalized())?;
        Ok(
            RequestDescriptor::new(path::endpoint_url(base_url, "object/copy")?)
                .method(Method::POST)
                .json(body),
        )
    }
}
