//! User-facing surface: bucket operations on [`StorageClient`] and
//! per-bucket object operations on [`ObjectApi`]. Every method is a
//! thin composition over the pipeline — build a request, dispatch it,
//! hand back the typed result.

use bytes::Bytes;
use url::Url;

use crate::api::bucket::{
    CreateBucketRequest, CreateBucketResponse, DeleteBucketRequest, EmptyBucketRequest,
    GetBucketRequest, ListBucketsRequest, UpdateBucketRequest,
};
use crate::api::object::{
    download, exists, CopyObjectRequest, CopyResponse, CreateSignedUploadUrlRequest,
    CreateSignedUrlRequest, CreateSignedUrlsRequest, GetObjectInfoRequest, ListObjectsRequest,
    ListObjectsV2Request, ListObjectsV2Response, MoveObjectRequest, MovePayload, PublicUrlOptions,
    RemoveObjectsRequest, SignedUrlEntry, UploadRequest, UploadResponse, UploadToSignedUrlRequest,
};
use crate::api::{ApiClient, MessageResponse};
use crate::error::{ErrorKind, StorageError};
use crate::schema::{
    Attributes, Bucket, FileOptions, ListV2Options, SearchOptions, StorageObject, TransformOptions,
};
use crate::transfer::Transfer;

/// Entry point for the storage API.
#[derive(Debug, Clone)]
pub struct StorageClient {
    api: ApiClient,
}

impl StorageClient {
    /// Connect to a storage endpoint with the default transport.
    pub fn new(base_url: Url, service_key: &str) -> Result<Self, StorageError> {
        Ok(Self {
            api: ApiClient::new(base_url, service_key)?,
        })
    }

    /// Connect over a caller-configured transport (timeouts, pooling,
    /// proxies all live there).
    pub fn with_transport(
        http: reqwest::Client,
        base_url: Url,
        service_key: &str,
    ) -> Result<Self, StorageError> {
        Ok(Self {
            api: ApiClient::with_transport(http, base_url, service_key)?,
        })
    }

    /// The underlying pipeline client, for callers composing their own
    /// operations.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn list_buckets(&self) -> Result<Vec<Bucket>, StorageError> {
        self.api.call(ListBucketsRequest).await
    }

    pub async fn get_bucket(&self, id: &str) -> Result<Bucket, StorageError> {
        self.api
            .call(GetBucketRequest { id: id.to_string() })
            .await
    }

    /// Create a bucket from a raw attribute map. Validation runs
    /// before any request is built; a rejected map never reaches the
    /// network.
    pub async fn create_bucket(
        &self,
        attrs: Attributes,
    ) -> Result<CreateBucketResponse, StorageError> {
        self.api.call(CreateBucketRequest { attrs }).await
    }

    pub async fn update_bucket(
        &self,
        request: UpdateBucketRequest,
    ) -> Result<MessageResponse, StorageError> {
        self.api.call(request).await
    }

    pub async fn empty_bucket(&self, id: &str) -> Result<MessageResponse, StorageError> {
        self.api
            .call(EmptyBucketRequest { id: id.to_string() })
            .await
    }

    pub async fn delete_bucket(&self, id: &str) -> Result<MessageResponse, StorageError> {
        self.api
            .call(DeleteBucketRequest { id: id.to_string() })
            .await
    }

    /// Object operations scoped to one bucket.
    pub fn objects(&self, bucket_id: &str) -> ObjectApi<'_> {
        ObjectApi {
            api: &self.api,
            bucket_id: bucket_id.to_string(),
        }
    }
}

/// A time-limited, token-bearing URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    pub url: Url,
    pub token: String,
}

impl SignedUrl {
    /// Resolve the service's relative signed URL against the client
    /// base and pull the token out of its query string.
    pub fn from_relative(base_url: &Url, relative: &str) -> Result<Self, StorageError> {
        let url = crate::path::endpoint_url(base_url, relative)?;
        let token = url
            .query_pairs()
            .find(|(name, _)| name == "token")
            .map(|(_, value)| value.into_owned())
            .ok_or_else(|| StorageError::Decode("signed URL carries no token".to_string()))?;
        Ok(Self { url, token })
    }
}

/// Object operations for a single bucket.
///
/// Holds the bucket id only — never a bucket record; resolving the
/// bucket itself is an explicit [`StorageClient::get_bucket`] call.
#[derive(Debug, Clone)]
pub struct ObjectApi<'a> {
    api: &'a ApiClient,
    bucket_id: String,
}

impl ObjectApi<'_> {
    pub fn bucket_id(&self) -> &str {
        &self.bucket_id
    }

    pub async fn upload(
        &self,
        path: &str,
        body: Bytes,
        options: FileOptions,
    ) -> Result<UploadResponse, StorageError> {
        self.api
            .call(UploadRequest {
                bucket_id: self.bucket_id.clone(),
                path: path.to_string(),
                body,
                options,
            })
            .await
    }

    pub async fn upload_to_signed_url(
        &self,
        path: &str,
        token: &str,
        body: Bytes,
        options: FileOptions,
    ) -> Result<UploadResponse, StorageError> {
        self.api
            .call(UploadToSignedUrlRequest {
                bucket_id: self.bucket_id.clone(),
                path: path.to_string(),
                token: token.to_string(),
                body,
                options,
            })
            .await
    }

    pub async fn move_object(
        &self,
        source_key: &str,
        destination_key: &str,
        destination_bucket: Option<&str>,
    ) -> Result<MessageResponse, StorageError> {
        self.api
            .call(MoveObjectRequest {
                payload: self.transfer_payload(source_key, destination_key, destination_bucket),
            })
            .await
    }

    pub async fn copy_object(
        &self,
        source_key: &str,
        destination_key: &str,
        destination_bucket: Option<&str>,
    ) -> Result<CopyResponse, StorageError> {
        self.api
            .call(CopyObjectRequest {
                payload: self.transfer_payload(source_key, destination_key, destination_bucket),
            })
            .await
    }

    pub async fn info(&self, path: &str) -> Result<StorageObject, StorageError> {
        self.api
            .call(GetObjectInfoRequest {
                bucket_id: self.bucket_id.clone(),
                path: path.to_string(),
            })
            .await
    }

    /// Existence probe. Only a not-found outcome maps to `false`;
    /// every other error propagates.
    pub async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let descriptor = exists::descriptor(self.api.base_url(), &self.bucket_id, path)?;
        match self.api.dispatch(descriptor).await {
            Ok(_) => Ok(true),
            Err(err) if err.kind() == Some(ErrorKind::NotFound) => Ok(false),
            Err(err) => Err(err),
        }
    }

    pub async fn list(
        &self,
        prefix: &str,
        options: SearchOptions,
    ) -> Result<Vec<StorageObject>, StorageError> {
        self.api
            .call(ListObjectsRequest {
                bucket_id: self.bucket_id.clone(),
                prefix: prefix.to_string(),
                options,
            })
            .await
    }

    pub async fn list_v2(
        &self,
        prefix: Option<&str>,
        options: ListV2Options,
    ) -> Result<ListObjectsV2Response, StorageError> {
        self.api
            .call(ListObjectsV2Request {
                bucket_id: self.bucket_id.clone(),
                prefix: prefix.map(str::to_string),
                options,
            })
            .await
    }

    pub async fn remove(&self, prefixes: Vec<String>) -> Result<Vec<StorageObject>, StorageError> {
        self.api
            .call(RemoveObjectsRequest {
                bucket_id: self.bucket_id.clone(),
                prefixes,
            })
            .await
    }

    pub async fn create_signed_url(
        &self,
        path: &str,
        expires_in: u64,
        transform: Option<TransformOptions>,
    ) -> Result<SignedUrl, StorageError> {
        let response = self
            .api
            .call(CreateSignedUrlRequest {
                bucket_id: self.bucket_id.clone(),
                path: path.to_string(),
                expires_in,
                transform,
            })
            .await?;
        SignedUrl::from_relative(self.api.base_url(), &response.signed_url)
    }

    pub async fn create_signed_urls(
        &self,
        paths: Vec<String>,
        expires_in: u64,
    ) -> Result<Vec<SignedUrlEntry>, StorageError> {
        self.api
            .call(CreateSignedUrlsRequest {
                bucket_id: self.bucket_id.clone(),
                expires_in,
                paths,
            })
            .await
    }

    pub async fn create_signed_upload_url(
        &self,
        path: &str,
        upsert: bool,
    ) -> Result<SignedUrl, StorageError> {
        let response = self
            .api
            .call(CreateSignedUploadUrlRequest {
                bucket_id: self.bucket_id.clone(),
                path: path.to_string(),
                upsert,
            })
            .await?;
        SignedUrl::from_relative(self.api.base_url(), &response.url)
    }

    /// Buffer a whole object into memory.
    pub async fn download(&self, path: &str) -> Result<Bytes, StorageError> {
        let mut transfer = self.download_stream(path, None).await?;
        transfer.collect().await
    }

    /// Stream an object lazily. Transformed variants go through the
    /// image-render endpoint.
    pub async fn download_stream(
        &self,
        path: &str,
        transform: Option<&TransformOptions>,
    ) -> Result<Transfer, StorageError> {
        let descriptor =
            download::descriptor(self.api.base_url(), &self.bucket_id, path, transform)?;
        self.api.stream(descriptor).await
    }

    /// Compose the public URL for an object — client-side only.
    pub fn public_url(
        &self,
        path: &str,
        options: &PublicUrlOptions,
    ) -> Result<Url, StorageError> {
        download::public_url(self.api.base_url(), &self.bucket_id, path, options)
    }

    fn transfer_payload(
        &self,
        source_key: &str,
        destination_key: &str,
        destination_bucket: Option<&str>,
    ) -> MovePayload {
        MovePayload {
            bucket_id: self.bucket_id.clone(),
            source_key: source_key.to_string(),
            destination_key: destination_key.to_string(),
            destination_bucket: destination_bucket.map(str::to_string),
        }
    }
}
