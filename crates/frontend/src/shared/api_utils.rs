//! API utilities for frontend-backend communication
//!
//! The REST API is the only I/O of the app; everything here is a thin layer
//! over `gloo_net` that maps failures into [`ApiError`].

use std::collections::BTreeMap;

use contracts::shared::list::{ListQuery, ListResponse};
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::shared::form_errors::{transform_response_body, FieldKey, FormErrorMap, PathSegment};

/// Port the API listens on, next to the host serving the app
pub const API_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Network(String),
    #[error("Failed to encode request: {0}")]
    Encode(String),
    #[error("HTTP error: {status}")]
    Http { status: u16 },
    /// HTTP 400 with a validation error body
    #[error("Some fields are not valid")]
    Validation(Value),
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Error tree for a form. Validation bodies are normalized with
    /// `get_key`; any other failure becomes the form-level message.
    pub fn form_errors(
        &self,
        get_key: &dyn Fn(&[PathSegment]) -> Option<FieldKey>,
    ) -> FormErrorMap {
        let fallback = || FormErrorMap {
            non_field_error: Some(self.to_string()),
            fields: BTreeMap::new(),
        };
        match self {
            ApiError::Validation(body) => {
                transform_response_body(body, get_key).unwrap_or_else(fallback)
            }
            _ => fallback(),
        }
    }
}

/// Get the base URL for API requests
///
/// Built from the current window location with [`API_PORT`], e.g.
/// "http://localhost:8000". Empty if there is no window.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:{}", protocol, hostname, API_PORT)
}

/// Build a full API URL from a path starting with "/api/"
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Query string of a list request
pub fn list_query_string<F: Serialize>(query: &ListQuery<F>) -> Result<String, ApiError> {
    serde_qs::to_string(query).map_err(|e| ApiError::Encode(e.to_string()))
}

/// GET one page of a list endpoint
pub async fn fetch_list<F, T>(path: &str, query: &ListQuery<F>) -> Result<ListResponse<T>, ApiError>
where
    F: Serialize,
    T: DeserializeOwned,
{
    let url = format!("{}?{}", api_url(path), list_query_string(query)?);
    log::debug!("GET {}", url);

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    read_json(response).await
}

/// POST a JSON body and decode the JSON answer
pub async fn post_json<B, R>(path: &str, body: &B) -> Result<R, ApiError>
where
    B: Serialize,
    R: DeserializeOwned,
{
    let url = api_url(path);
    log::debug!("POST {}", url);

    let response = Request::post(&url)
        .json(body)
        .map_err(|e| ApiError::Encode(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    read_json(response).await
}

async fn read_json<R: DeserializeOwned>(response: Response) -> Result<R, ApiError> {
    let status = response.status();
    if response.ok() {
        return response
            .json::<R>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()));
    }

    if status == 400 {
        let body: Value = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        log::warn!("validation failed: {}", body);
        return Err(ApiError::Validation(body));
    }

    log::error!("HTTP error: {}", status);
    Err(ApiError::Http { status })
}
