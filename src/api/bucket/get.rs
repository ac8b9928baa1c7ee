use url::Url;

use crate::api::{ApiRequest, DecodePolicy, EntityCheck, RequestDescriptor};
use crate::error::StorageError;
use crate::path;
use crate::schema::Bucket;

/// Fetch a single bucket record (`GET /bucket/{id}`).
#[derive(Debug, Clone)]
pub struct GetBucketRequest {
    pub id: String,
}

impl ApiRequest for GetBucketRequest {
    type Response = Bucket;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        let url = path::endpoint_url(base_url, &format!("bucket/{}", self.id))?;
        Ok(RequestDescriptor::new(url).decode(DecodePolicy::Json {
            check: Some(EntityCheck::Bucket),
        }))
    }
}
