//! Typed client for the Cask object storage REST API.
//!
//! Buckets and objects are managed through typed operations over a
//! shared request pipeline: validated attribute maps become request
//! bodies, per-operation descriptors pick their own decode and
//! error-parsing strategies, and large downloads stream lazily with
//! early-termination hooks.
//!
//! ```no_run
//! use cask_storage::prelude::*;
//! use url::Url;
//!
//! # async fn run() -> Result<(), StorageError> {
//! let base = Url::parse("http://localhost:8000/storage/v1")?;
//! let client = StorageClient::new(base, "service-key")?;
//!
//! let buckets = client.list_buckets().await?;
//! println!("{} buckets", buckets.len());
//!
//! let avatars = client.objects("avatars");
//! let body = avatars.download("me.png").await?;
//! println!("{} bytes", body.len());
//! # Ok(())
//! # }
//! ```

/**
 * The generic request/response pipeline: descriptors, decoding
 * strategies, error mapping, the dispatching client, and one module
 * per wire operation.
 */
pub mod api;
/**
 * Typed errors. Failures are values; nothing panics across the API
 * boundary.
 */
pub mod error;
/**
 * Canonical request paths and query-string assembly.
 */
pub mod path;
/**
 * Resource records and the attribute-map validator.
 */
pub mod schema;
/**
 * The user-facing client surface.
 */
pub mod storage;
/**
 * Lazy, single-pass streaming for large downloads.
 */
pub mod transfer;

pub mod prelude {
    pub use crate::api::{ApiClient, ApiRequest, MessageResponse, Payload, RequestDescriptor};
    pub use crate::error::{ErrorKind, StorageError};
    pub use crate::schema::{
        Attributes, Bucket, FileOptions, ListV2Options, SearchOptions, SizeLimit, SizeUnit,
        StorageObject, TransformOptions,
    };
    pub use crate::storage::{ObjectApi, SignedUrl, StorageClient};
    pub use crate::transfer::{Consumed, Transfer, TransferState};
}
