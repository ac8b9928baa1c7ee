use http::Method;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::{ApiRequest, RequestDescriptor};
use crate::error::StorageError;
use crate::path;
use crate::schema::{ListV2Options, StorageObject};

/// Cursor-based object listing (`POST /object/list-v2/{bucket}`).
#[derive(Debug, Clone, Serialize)]
pub struct ListObjectsV2Request {
    #[serde(skip)]
    pub bucket_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(flatten)]
    pub options: ListV2Options,
}

/// One page of a cursor-based listing. `next_cursor` is opaque; hand
/// it back unchanged to fetch the next page.
#[derive(Debug, Clone, Deserialize)]
pub struct ListObjectsV2Response {
    #[serde(default)]
    pub objects: Vec<StorageObject>,
    /// Grouped prefixes, present when delimiter grouping was on.
    #[serde(default)]
    pub folders: Vec<String>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_next: bool,
}

impl ApiRequest for ListObjectsV2Request {
    type Response = ListObjectsV2Response;

    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError> {
        let url = path::endpoint_url(base_url, &format!("object/list-v2/{}", self.bucket_id))?;
        let body = serde_json::to_value(&self)?;
        Ok(RequestDescriptor::new(url).method(Method::POST).json(body))
    }
}
