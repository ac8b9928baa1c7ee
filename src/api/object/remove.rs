use http::Method;
use serde_json::json;
use url::Url;

use crate::api::{ApiRequest, DecodePolicy, EntityCheck, RequestDescriptor};
use crate::error::StorageError;
use crate::path;
use crate::schema::StorageObject;

/// Delete a batch of objects (`DELETE /object/{bucket}`). The response
/// lists the records that were removed.
#[derive(Debug, Clone)]
pub struct RemoveObjectsRequest {
    pub bucket_id: String,
    pub prefixes: Vec<String>,
}

impl ApiRequest for RemoveObjectsRequest {
    type Response = Vec<StorageObject>;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        let url = path::endpoint_url(base_url, &format!("object/{}", self.bucket_id))?;
        let prefixes: Vec<String> = self
            .prefixes
            .iter()
            .map(|prefix| path::normalize_key(prefix))
            .collect();
        Ok(RequestDescriptor::new(url)
            .method(Method::DELETE)
            .json(json!({ "prefixes": prefixes }))
            .decode(DecodePolicy::Json {
                check: Some(EntityCheck::ObjectList),
            }))
    }
}
