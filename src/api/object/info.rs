use url::Url;

use crate::api::{ApiRequest, DecodePolicy, EntityCheck, RequestDescriptor};
use crate::error::StorageError;
use crate::path;
use crate::schema::StorageObject;

/// Fetch object metadata without its body
/// (`GET /object/info/{bucket}/{path}`). The key may be a wildcard
/// pattern, resolved server-side.
#[derive(Debug, Clone)]
pub struct GetObjectInfoRequest {
    pub bucket_id: String,
    pub path: String,
}

impl ApiRequest for GetObjectInfoRequest {
    type Response = StorageObject;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        let url = path::endpoint_url(
            base_url,
            &path::object_route("object/info", &self.bucket_id, &self.path),
        )?;
        Ok(RequestDescriptor::new(url).decode(DecodePolicy::Json {
            check: Some(EntityCheck::Object),
        }))
    }
}
