//! services/app/src/adapters/http.rs
//!
//! This module contains the adapter for the remote resource API.
//! It implements the `RemoteTransport` port from the `core` crate using `reqwest`.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde_json::Value;
use study_aid_core::{
    ports::{PortError, PortResult, RemoteTransport},
    remote::{ApiRequest, ApiResponse, HttpMethod},
};
use tracing::debug;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that sends `ApiRequest`s to the study service over HTTP.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Creates a new `ReqwestTransport`. Request paths are appended to `base_url`.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

//=========================================================================================
// `RemoteTransport` Trait Implementation
//=========================================================================================

#[async_trait]
impl RemoteTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> PortResult<ApiResponse> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };
        let url = self.url(&request.path);
        debug!("{} {}", method, url);

        let mut builder = self.client.request(method, &url).query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| PortError::RemoteUnavailable(e.to_string()))?;
        let status = response.status().as_u16();

        // An empty or non-JSON body is not an error here; the caller decides.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PortError::RemoteUnavailable(e.to_string()))?;
        let body = serde_json::from_slice::<Value>(&bytes).ok();

        Ok(ApiResponse { status, body })
    }
}
