//! Object operations, one module per wire call.

pub mod download;
pub mod exists;
pub mod info;
pub mod list;
pub mod list_v2;
pub mod move_copy;
pub mod remove;
pub mod sign;
pub mod sign_upload;
pub mod upload;

pub use download::PublicUrlOptions;
pub use info::GetObjectInfoRequest;
pub use list::ListObjectsRequest;
pub use list_v2::{ListObjectsV2Request, ListObjectsV2Response};
pub use move_copy::{CopyObjectRequest, CopyResponse, MoveObjectRequest, MovePayload};
pub use remove::RemoveObjectsRequest;
pub use sign::{
    CreateSignedUrlRequest, CreateSignedUrlsRequest, SignedUrlEntry, SignedUrlResponse,
};
pub use sign_upload::{CreateSignedUploadUrlRequest, SignedUploadUrlResponse};
pub use upload::{UploadRequest, UploadResponse, UploadToSignedUrlRequest};
