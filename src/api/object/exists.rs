use http::Method;
use url::Url;

use crate::api::{DecodePolicy, RequestDescriptor};
use crate::error::StorageError;
use crate::path;

/// Status-only existence probe (`HEAD /object/{bucket}/{path}`).
///
/// No trait impl: the response has no body, so the caller inspects the
/// dispatch outcome directly.
pub fn descriptor(
    base_url: &Url,
    bucket_id: &str,
    key: &str,
) -> Result<RequestDescriptor, StorageError> {
    let url = path::endpoint_url(base_url, &path::object_route("object", bucket_id, key))?;
    Ok(RequestDescriptor::new(url)
        .method(Method::HEAD)
        .decode(DecodePolicy::Raw))
}
