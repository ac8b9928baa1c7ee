use http::Method;
use url::Url;

use crate::api::{ApiRequest, MessageResponse, RequestDescriptor};
use crate::error::StorageError;
use crate::path;

/// Remove every object from a bucket without deleting the bucket
/// itself (`POST /bucket/{id}/empty`).
#[derive(Debug, Clone)]
pub struct EmptyBucketRequest {
    pub id: String,
}

impl ApiRequest for EmptyBucketRequest {
    type Response = MessageResponse;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        let url = path::endpoint_url(base_url, &format!("bucket/{}/empty", self.id))?;
        Ok(RequestDescriptor::new(url).method(Method::POST))
    }
}
