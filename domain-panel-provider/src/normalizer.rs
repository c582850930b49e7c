//! Response envelope normalization
//!
//! The domain-list endpoint is versioned independently of its consumers and
//! has answered with two shapes over time:
//!
//! 1. `{ "data": [ ...records ] }` (possibly with other keys such as `success`)
//! 2. `[ ...records ]`
//!
//! Shapes are tried in that order. Only a single level of `data` is unwrapped:
//! `{ "data": { "data": [...] } }` is rejected as malformed.

use serde_json::Value;

use crate::error::{ProviderError, Result};
use crate::types::DomainRecord;
use crate::utils::log_sanitizer::truncate_for_log;

/// A recognised response envelope, before its records are decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    /// An object with a present, non-null `data` property.
    Wrapped(Value),
    /// A bare JSON array.
    Bare(Vec<Value>),
}

impl ResponseEnvelope {
    /// Classify a parsed body. Returns `None` for unrecognised shapes.
    #[must_use]
    pub fn classify(body: Value) -> Option<Self> {
        match body {
            Value::Object(mut map) => match map.remove("data") {
                None | Some(Value::Null) => None,
                Some(data) => Some(Self::Wrapped(data)),
            },
            Value::Array(items) => Some(Self::Bare(items)),
            _ => None,
        }
    }

    /// Decode the record list carried by this envelope.
    pub fn into_records(self, endpoint: &str) -> Result<Vec<DomainRecord>> {
        let list = match self {
            Self::Wrapped(Value::Array(items)) | Self::Bare(items) => items,
            Self::Wrapped(other) => {
                return Err(malformed(
                    endpoint,
                    format!("`data` is not a record list (found {})", kind_of(&other)),
                ));
            }
        };

        list.into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item)
                    .map_err(|e| malformed(endpoint, format!("record #{index}: {e}")))
            })
            .collect()
    }
}

/// Normalize an already-parsed JSON body into domain records.
pub fn normalize_value(body: Value, endpoint: &str) -> Result<Vec<DomainRecord>> {
    let found = kind_of(&body);
    ResponseEnvelope::classify(body)
        .ok_or_else(|| {
            malformed(
                endpoint,
                format!("expected `{{data: [...]}}` or `[...]`, found {found}"),
            )
        })?
        .into_records(endpoint)
}

/// Normalize a raw response body into domain records.
pub fn normalize_body(body: &str, endpoint: &str) -> Result<Vec<DomainRecord>> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        log::error!("[{endpoint}] JSON parse failed: {e}");
        log::error!("[{endpoint}] Raw response: {}", truncate_for_log(body));
        malformed(endpoint, format!("body is not JSON: {e}"))
    })?;

    let records = normalize_value(value, endpoint)?;
    log::debug!("[{endpoint}] Normalized {} domain records", records.len());
    Ok(records)
}

fn malformed(endpoint: &str, detail: String) -> ProviderError {
    ProviderError::MalformedResponse {
        endpoint: endpoint.to_string(),
        detail,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
