//! The client that dispatches request descriptors.

use futures::TryStreamExt;
use http::header;
use http::HeaderValue;
use reqwest::Client;
use url::Url;

use super::decode::{decode_body, Payload};
use super::descriptor::{Body, RequestDescriptor};
use super::ApiRequest;
use crate::error::{map_error_response, RequestContext, StorageError};
use crate::transfer::Transfer;

/// Dispatches request descriptors over an injected HTTP transport.
///
/// The transport is a constructor parameter with a default — timeouts,
/// pooling, and retry policy all live in the `reqwest::Client` the
/// caller provides. The client holds no per-call state; every call
/// builds its descriptor, sends it, and decodes the result in one
/// logical step.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
    auth: HeaderValue,
}

impl ApiClient {
    /// Client with a default transport.
    pub fn new(base_url: Url, service_key: &str) -> Result<Self, StorageError> {
        let http = Client::builder().build()?;
        Self::with_transport(http, base_url, service_key)
    }

    /// Client over a caller-supplied transport.
    pub fn with_transport(
        http: Client,
        base_url: Url,
        service_key: &str,
    ) -> Result<Self, StorageError> {
        let mut auth = HeaderValue::try_from(format!("Bearer {service_key}"))
            .map_err(|_| StorageError::InvalidHeader(header::AUTHORIZATION.to_string()))?;
        auth.set_sensitive(true);
        Ok(Self {
            base_url,
            http,
            auth,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Run one typed operation through the pipeline.
    pub async fn call<T: ApiRequest>(&self, request: T) -> Result<T::Response, StorageError> {
        let descriptor = request.descriptor(&self.base_url)?;
        let payload = self.dispatch(descriptor).await?;
        T::from_payload(payload)
    }

    /// Dispatch a descriptor and decode the buffered response body.
    ///
    /// Success responses go through the descriptor's decode policy;
    /// everything else is mapped once by the error parser.
    pub async fn dispatch(&self, descriptor: RequestDescriptor) -> Result<Payload, StorageError> {
        let context = RequestContext {
            method: descriptor.method.clone(),
            url: descriptor.full_url(),
        };
        let response = self.send(&descriptor).await?;
        let status = response.status();
        let body = response.bytes().await?;
        if status.is_success() {
            decode_body(&descriptor.decode, body)
        } else {
            Err(map_error_response(
                descriptor.error_parser,
                status,
                &body,
                context,
            ))
        }
    }

    /// Dispatch a descriptor for a large binary resource, returning a
    /// lazy transfer instead of a buffered body.
    pub async fn stream(&self, descriptor: RequestDescriptor) -> Result<Transfer, StorageError> {
        let context = RequestContext {
            method: descriptor.method.clone(),
            url: descriptor.full_url(),
        };
        let response = self.send(&descriptor).await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await?;
            return Err(map_error_response(
                descriptor.error_parser,
                status,
                &body,
                context,
            ));
        }
        let headers = response.headers().clone();
        let chunks = response
            .bytes_stream()
            .map_err(|err| StorageError::Interrupted(err.to_string()));
        Ok(Transfer::new(status, headers, Box::pin(chunks)))
    }

    async fn send(&self, descriptor: &RequestDescriptor) -> Result<reqwest::Response, StorageError> {
        let url = descriptor.full_url();
        tracing::debug!(method = %descriptor.method, url = %url, "dispatching storage request");
        let mut builder = self
            .http
            .request(descriptor.method.clone(), url)
            .header(header::AUTHORIZATION, self.auth.clone())
            .headers(descriptor.headers.clone());
        builder = match &descriptor.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Bytes(bytes) => builder.body(bytes.clone()),
        };
        Ok(builder.send().await?)
    }
}
