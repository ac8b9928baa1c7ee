use http::Method;
use serde::Serialize;
use url::Url;

use crate::api::{ApiRequest, DecodePolicy, EntityCheck, RequestDescriptor};
use crate::error::StorageError;
use crate::path;
use crate::schema::{SearchOptions, StorageObject};

/// Offset-based object listing (`POST /object/list/{bucket}`).
///
/// The prefix is sent exactly as given — a trailing slash is
/// meaningful to the service.
#[derive(Debug, Clone, Serialize)]
pub struct ListObjectsRequest {
    #[serde(skip)]
    pub bucket_id: String,
    pub prefix: String,
    #[serde(flatten)]
    pub options: SearchOptions,
}

impl ApiRequest for ListObjectsRequest {
    type Response = Vec<StorageObject>;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        let url = path::endpoint_url(base_url, &format!("object/list/{}", self.bucket_id))?;
        let body = serde_json::to_value(&self)?;
        Ok(RequestDescriptor::new(url)
            .method(Method::POST)
            .json(body)
            .decode(DecodePolicy::Json {
                check: Some(EntityCheck::ObjectList),
            }))
    }
}
