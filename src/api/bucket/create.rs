use http::Method;
use serde::Deserialize;
use url::Url;

use crate::api::{ApiRequest, RequestDescriptor};
use crate::error::StorageError;
use crate::path;
use crate::schema::{Attributes, Bucket};

/// Create a bucket from a raw attribute map (`POST /bucket`).
///
/// The map goes through the bucket validator before any request is
/// built; a failed validation never reaches the network.
#[derive(Debug, Clone)]
pub struct CreateBucketRequest {
    pub attrs: Attributes,
}

/// Create responses are not full bucket records — the service echoes
/// the name only, so the body is decoded as raw passthrough JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBucketResponse {
    pub name: String,
}

impl ApiRequest for CreateBucketRequest {
    type Response = CreateBucketResponse;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        let bucket = Bucket::from_attrs(&self.attrs)?;
        let body = serde_json::to_value(&bucket)?;
        Ok(RequestDescriptor::new(path::endpoint_url(base_url, "bucket")?)
            .method(Method::POST)
            .json(body))
    }
}
