use http::header;
use url::Url;

use crate::api::{DecodePolicy, RequestDescriptor};
use crate::error::StorageError;
use crate::path;
use crate::schema::TransformOptions;

/// Descriptor for an authenticated download (`GET
/// /object/{bucket}/{path}`). Transformed requests go through the
/// image-render endpoint with the transform flattened into the query
/// string. The `accept` header is derived from the key's extension.
pub fn descriptor(
    base_url: &Url,
    bucket_id: &str,
    key: &str,
    transform: Option<&TransformOptions>,
) -> Result<RequestDescriptor, StorageError> {
    let accept = mime_guess::from_path(path::normalize_key(key)).first_or_octet_stream();
    let descriptor = match transform {
        None => {
            let url = path::endpoint_url(base_url, &path::object_route("object", bucket_id, key))?;
            RequestDescriptor::new(url)
        }
        Some(options) => {
            options.validate()?;
            let url = path::endpoint_url(
                base_url,
                &path::object_route("render/image/authenticated", bucket_id, key),
            )?;
            RequestDescriptor::new(url).query_pairs(options.to_query_pairs())
        }
    };
    descriptor
        .try_header(header::ACCEPT.as_str(), accept.as_ref())
        .map(|descriptor| descriptor.decode(DecodePolicy::Raw))
}

/// Options for client-side public URL rendering.
#[derive(Debug, Clone, Default)]
pub struct PublicUrlOptions {
    /// Adds a `download` query flag; a non-empty value becomes the
    /// suggested filename.
    pub download: Option<String>,
    pub transform: Option<TransformOptions>,
}

/// Compose the public URL for an object. Client-side only — no request
/// is issued.
pub fn public_url(
    base_url: &Url,
    bucket_id: &str,
    key: &str,
    options: &PublicUrlOptions,
) -> Result<Url, StorageError> {
    let route = match &options.transform {
        None => path::object_route("object/public", bucket_id, key),
        Some(_) => path::object_route("render/image/public", bucket_id, key),
    };
    let mut url = path::endpoint_url(base_url, &route)?;
    let mut pairs = Vec::new();
    if let Some(transform) = &options.transform {
        transform.validate()?;
        pairs.extend(transform.to_query_pairs());
    }
    if let Some(filename) = &options.download {
        pairs.push(("download".to_string(), filename.clone()));
    }
    if !pairs.is_empty() {
        let mut serializer = url.query_pairs_mut();
        for (key, value) in &pairs {
            serializer.append_pair(key, value);
        }
    }
    Ok(url)
}
