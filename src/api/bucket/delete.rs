use http::Method;
use url::Url;

use crate::api::{ApiRequest, MessageResponse, RequestDescriptor};
use crate::error::StorageError;
use crate::path;

/// Delete a bucket (`DELETE /bucket/{id}`). The service rejects the
/// call with a conflict unless the bucket is already empty.
#[derive(Debug, Clone)]
pub struct DeleteBucketRequest {
    pub id: String,
}

impl ApiRequest for DeleteBucketRequest {
    type Response = MessageResponse;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        let url = path::endpoint_url(base_url, &format!("bucket/{}", self.id))?;
        Ok(RequestDescriptor::new(url).method(Method::DELETE))
    }
}
