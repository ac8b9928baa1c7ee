//! Immutable-after-dispatch request descriptors.

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::Value;
use url::Url;

use super::decode::DecodePolicy;
use crate::error::{ErrorParser, StorageError};

/// Request body attached to a descriptor.
#[derive(Debug, Clone)]
pub enum Body {
    Empty,
    /// JSON-encoded at dispatch (the default encoder).
    Json(Value),
    /// Raw bytes, sent as-is (uploads).
    Bytes(Bytes),
}

/// Description of one outbound call: method, target, headers, query,
/// body, and the decode/error strategies chosen at construction time.
///
/// Pure configuration — no connection or socket state lives here, and
/// the descriptor's contract ends at "ready to send". Dispatch consumes
/// the descriptor, so nothing can mutate it afterwards.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Body,
    pub decode: DecodePolicy,
    pub error_parser: ErrorParser,
}

impl RequestDescriptor {
    /// A GET descriptor with generic JSON decoding and the service
    /// error parser.
    pub fn new(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: Body::Empty,
            decode: DecodePolicy::Json { check: None },
            error_parser: ErrorParser::StorageApi,
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add one header. Later calls merge into the existing map.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Parse and add one header from string parts.
    pub fn try_header(self, name: &str, value: &str) -> Result<Self, StorageError> {
        let header_name = HeaderName::try_from(name)
            .map_err(|_| StorageError::InvalidHeader(name.to_string()))?;
        let header_value = HeaderValue::try_from(value)
            .map_err(|_| StorageError::InvalidHeader(name.to_string()))?;
        Ok(self.header(header_name, header_value))
    }

    /// Merge a whole header map: same-named entries are replaced, the
    /// rest are kept.
    pub fn headers(mut self, headers: &HeaderMap) -> Self {
        for (name, value) in headers {
            self.headers.insert(name.clone(), value.clone());
        }
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn query_pairs(mut self, pairs: Vec<(String, String)>) -> Self {
        self.query.extend(pairs);
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Body::Json(body);
        self
    }

    pub fn bytes(mut self, body: Bytes) -> Self {
        self.body = Body::Bytes(body);
        self
    }

    pub fn decode(mut self, policy: DecodePolicy) -> Self {
        self.decode = policy;
        self
    }

    pub fn error_parser(mut self, parser: ErrorParser) -> Self {
        self.error_parser = parser;
        self
    }

    /// Target URL with query parameters applied.
    pub fn full_url(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            let mut serializer = url.query_pairs_mut();
            for (key, value) in &self.query {
                serializer.append_pair(key, value);
            }
        }
        url
    }
}
