//! crates/study_aid_core/src/remote.rs
//!
//! Request/response types exchanged with the `RemoteTransport` port, and the
//! `ResponseEnvelope` that every response body is decoded into exactly once.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ports::{PortError, PortResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A request against the remote resource API, relative to its base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        let mut request = Self::new(HttpMethod::Post, path);
        request.body = Some(body);
        request
    }

    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn bearer(self, token: Option<&str>) -> Self {
        match token {
            Some(token) => self.header("authorization", &format!("Bearer {}", token)),
            None => self,
        }
    }
}

/// A response as it arrived. `body` is `None` when it was empty or not JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn envelope(self) -> ResponseEnvelope {
        ResponseEnvelope::decode(self.body)
    }
}

/// The shapes a response body can take.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    /// `{ "items": [...] }`
    Items(Vec<Value>),
    /// `{ "item": {...} }`
    Item(Value),
    /// `{ "error": "..." }`
    Error(String),
    /// Anything else, including an absent body (`Value::Null`).
    Bare(Value),
}

impl ResponseEnvelope {
    pub fn decode(body: Option<Value>) -> Self {
        let Some(mut value) = body else {
            return ResponseEnvelope::Bare(Value::Null);
        };
        if let Some(object) = value.as_object_mut() {
            if let Some(Value::Array(items)) = object.get_mut("items") {
                return ResponseEnvelope::Items(std::mem::take(items));
            }
            if let Some(item) = object.get_mut("item") {
                return ResponseEnvelope::Item(item.take());
            }
            if let Some(Value::String(message)) = object.get("error") {
                return ResponseEnvelope::Error(message.clone());
            }
        }
        ResponseEnvelope::Bare(value)
    }

    /// Decodes an `items` list. Any other shape, or any item that does not decode, is malformed.
    pub fn into_items<T: DeserializeOwned>(self) -> PortResult<Vec<T>> {
        match self {
            ResponseEnvelope::Items(items) => items
                .into_iter()
                .map(|item| {
                    serde_json::from_value(item)
                        .map_err(|e| PortError::MalformedResponse(e.to_string()))
                })
                .collect(),
            other => Err(PortError::MalformedResponse(format!(
                "expected an items list, got {}",
                other.shape()
            ))),
        }
    }

    /// Decodes a single payload, wrapped in `item` or bare.
    pub fn into_item<T: DeserializeOwned>(self) -> PortResult<T> {
        match self {
            ResponseEnvelope::Item(value) | ResponseEnvelope::Bare(value) => {
                serde_json::from_value(value)
                    .map_err(|e| PortError::MalformedResponse(e.to_string()))
            }
            other => Err(PortError::MalformedResponse(format!(
                "expected a single item, got {}",
                other.shape()
            ))),
        }
    }

    fn shape(&self) -> &'static str {
        match self {
            ResponseEnvelope::Items(_) => "an items list",
            ResponseEnvelope::Item(_) => "a single item",
            ResponseEnvelope::Error(_) => "an error object",
            ResponseEnvelope::Bare(Value::Null) => "an empty body",
            ResponseEnvelope::Bare(_) => "a bare payload",
        }
    }
}
