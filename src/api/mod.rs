//! The generic request/response pipeline shared by every operation:
//! request descriptors, body decoding, error mapping, and the client
//! that dispatches them. Concrete operations live in [`bucket`] and
//! [`object`], one module per wire call.

pub mod bucket;
pub mod client;
pub mod decode;
pub mod descriptor;
pub mod object;

pub use client::ApiClient;
pub use decode::{decode_body, DecodePolicy, EntityCheck, Payload};
pub use descriptor::{Body, RequestDescriptor};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::error::StorageError;

/// One wire operation: builds its request descriptor and interprets
/// the decoded payload.
///
/// Implementations live next to their request/response types, one
/// module per operation.
pub trait ApiRequest {
    type Response: DeserializeOwned;

    /// Turn the request into a ready-to-send descriptor. Validation
    /// failures surface here, before anything touches the network.
    fn descriptor(self, base_url: &Url) -> Result<RequestDescriptor, StorageError>;

    /// Interpret the decoded payload as the operation's response type.
    fn from_payload(payload: Payload) -> Result<Self::Response, StorageError> {
        let value = payload.into_json()?;
        serde_json::from_value(value).map_err(|err| StorageError::Decode(err.to_string()))
    }
}

/// Plain acknowledgement body (`{"message": ...}`).
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
