//! Service client abstraction
//!
//! Every instance operation talks to the database service through a
//! [`ServiceClient`]. The trait is the only seam between request building and
//! the transport, so connection handling, authentication headers and timeouts
//! live entirely in the implementation (see [`HttpServiceClient`] for the
//! default `reqwest` one).
//!
//! [`HttpServiceClient`]: crate::http::HttpServiceClient

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Insertion-ordered JSON object used for every request payload
pub type JsonMap = serde_json::Map<String, Value>;

/// Response headers, keyed by lowercase header name
pub type Headers = BTreeMap<String, String>;

/// HTTP verbs used by the instance API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Status codes accepted when the caller does not override them
    #[must_use]
    pub fn default_ok_codes(self) -> &'static [u16] {
        match self {
            Method::Get => &[200],
            Method::Post | Method::Put => &[201, 202],
            Method::Delete => &[202, 204],
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-request options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOpts {
    /// Status codes treated as success. `None` means the method default.
    pub ok_codes: Option<Vec<u16>>,
}

impl RequestOpts {
    /// Accept exactly the given status codes
    #[must_use]
    pub fn ok_codes(codes: &[u16]) -> Self {
        Self {
            ok_codes: Some(codes.to_vec()),
        }
    }

    /// Resolve the accepted status codes for `method`
    #[must_use]
    pub fn accepted_codes(&self, method: Method) -> Vec<u16> {
        match &self.ok_codes {
            Some(codes) => codes.clone(),
            None => method.default_ok_codes().to_vec(),
        }
    }
}

/// A single request against the database service
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
    pub opts: RequestOpts,
}

/// Decoded response from the database service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Headers,
    /// `None` when the service sent an empty body
    pub body: Option<Value>,
}

/// Transport capability consumed by the instance operations
///
/// Implementations issue exactly one HTTP exchange per [`request`] call, check
/// the status against [`RequestOpts::accepted_codes`] and decode the JSON body.
/// Retries, if any, are the implementation's business.
///
/// [`request`]: ServiceClient::request
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// Base URL of the database service, always ending in `/`
    fn endpoint(&self) -> &str;

    /// Send one request and decode the response
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse>;

    /// Join path segments onto the service endpoint
    fn service_url(&self, parts: &[&str]) -> String {
        format!("{}{}", self.endpoint(), parts.join("/"))
    }

    async fn get(&self, url: &str, opts: Option<RequestOpts>) -> Result<ApiResponse> {
        self.request(ApiRequest {
            method: Method::Get,
            url: url.to_string(),
            body: None,
            opts: opts.unwrap_or_default(),
        })
        .await
    }

    async fn post(
        &self,
        url: &str,
        body: Option<Value>,
        opts: Option<RequestOpts>,
    ) -> Result<ApiResponse> {
        self.request(ApiRequest {
            method: Method::Post,
            url: url.to_string(),
            body,
            opts: opts.unwrap_or_default(),
        })
        .await
    }

    async fn put(&self, url: &str, body: Value, opts: Option<RequestOpts>) -> Result<ApiResponse> {
        self.request(ApiRequest {
            method: Method::Put,
            url: url.to_string(),
            body: Some(body),
            opts: opts.unwrap_or_default(),
        })
        .await
    }

    async fn delete(&self, url: &str, opts: Option<RequestOpts>) -> Result<ApiResponse> {
        self.request(ApiRequest {
            method: Method::Delete,
            url: url.to_string(),
            body: None,
            opts: opts.unwrap_or_default(),
        })
        .await
    }
}

/// Serialize a value that must come out as a JSON object
pub(crate) fn to_json_map<T: Serialize + ?Sized>(value: &T) -> Result<JsonMap> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::invalid_input(
            "request body",
            other,
            "must serialize to a JSON object",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records requests instead of sending them
    struct RecordingClient {
        seen: Mutex<Vec<ApiRequest>>,
    }

    #[async_trait]
    impl ServiceClient for RecordingClient {
        fn endpoint(&self) -> &str {
            "http://localhost:8779/v1.0/tenant/"
        }

        async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
            self.seen.lock().unwrap().push(request);
            Ok(ApiResponse {
                status: 200,
                ..Default::default()
            })
        }
    }

    #[test]
    fn test_default_ok_codes() {
        assert_eq!(Method::Get.default_ok_codes(), &[200]);
        assert_eq!(Method::Post.default_ok_codes(), &[201, 202]);
        assert_eq!(Method::Put.default_ok_codes(), &[201, 202]);
        assert_eq!(Method::Delete.default_ok_codes(), &[202, 204]);
    }

    #[test]
    fn test_request_opts_override() {
        let opts = RequestOpts::ok_codes(&[200]);
        assert_eq!(opts.accepted_codes(Method::Post), vec![200]);
        assert_eq!(
            RequestOpts::default().accepted_codes(Method::Delete),
            vec![202, 204]
        );
    }

    #[test]
    fn test_service_url_joins_parts() {
        let client = RecordingClient {
            seen: Mutex::new(Vec::new()),
        };
        assert_eq!(
            client.service_url(&["instances", "abc", "action"]),
            "http://localhost:8779/v1.0/tenant/instances/abc/action"
        );
    }

    #[tokio::test]
    async fn test_verb_helpers_build_requests() {
        let client = RecordingClient {
            seen: Mutex::new(Vec::new()),
        };
        client
            .put("http://x/instances/1", json!({"instance": {}}), None)
            .await
            .unwrap();
        client.delete("http://x/instances/1", None).await.unwrap();

        let seen = client.seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::Put);
        assert_eq!(seen[0].body, Some(json!({"instance": {}})));
        assert_eq!(seen[1].method, Method::Delete);
        assert!(seen[1].body.is_none());
        assert_eq!(seen[1].opts, RequestOpts::default());
    }

    #[test]
    fn test_to_json_map_rejects_non_objects() {
        let err = to_json_map(&vec![1, 2]).unwrap_err();
        assert!(err.is_validation());

        let map = to_json_map(&json!({"a": 1})).unwrap();
        assert_eq!(map["a"], 1);
    }
}
