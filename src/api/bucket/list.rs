use url::Url;

use crate::api::{ApiRequest, DecodePolicy, EntityCheck, RequestDescriptor};
use crate::error::StorageError;
use crate::path;
use crate::schema::Bucket;

/// List every bucket visible to the client (`GET /bucket`).
#[derive(Debug, Clone, Default)]
pub struct ListBucketsRequest;

impl ApiRequest for ListBucketsRequest {
    type Response = Vec<Bucket>;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        Ok(RequestDescriptor::new(path::endpoint_url(base_url, "bucket")?).decode(
            DecodePolicy::Json {
                check: Some(EntityCheck::BucketList),
            },
        ))
    }
}
