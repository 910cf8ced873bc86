//! Body parsing utilities for HTTP requests
//!
//! Provides bounded body collection and parsing for JSON, form-urlencoded and
//! query-string data. Parse failures are binding errors and surface as a single
//! validation message.

use crate::error::FrameworkError;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use serde::de::DeserializeOwned;

/// Collect the full body from an Incoming stream, refusing more than `limit` bytes
pub async fn collect_body(body: Incoming, limit: usize) -> Result<Bytes, FrameworkError> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(FrameworkError::domain(
            format!("Request body exceeds {} bytes", limit),
            413,
        )),
        Err(e) => Err(FrameworkError::domain(
            format!("Failed to read request body: {}", e),
            400,
        )),
    }
}

/// Parse bytes as JSON into the target type
pub fn parse_json<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, FrameworkError> {
    serde_json::from_slice(bytes).map_err(|e| {
        FrameworkError::validation("body", format!("The request body is not valid JSON: {}", e))
    })
}

/// Parse bytes as form-urlencoded into the target type
pub fn parse_form<T: DeserializeOwned>(bytes: &Bytes) -> Result<T, FrameworkError> {
    serde_urlencoded::from_bytes(bytes).map_err(|e| {
        FrameworkError::validation("body", format!("The form body is invalid: {}", e))
    })
}

/// Parse a raw query string into the target type
pub fn parse_query<T: DeserializeOwned>(query: &str) -> Result<T, FrameworkError> {
    serde_urlencoded::from_str(query).map_err(|e| {
        FrameworkError::validation("query", format!("The query string is invalid: {}", e))
    })
}
