//! Generic HTTP client tools
//!
//! Sends a prepared request, logs it, and turns the outcome into either the
//! response text or a [`ProviderError::NetworkError`].
//!
//! # design principles
//! - **Status is checked before the body is interpreted** - a non-2xx answer
//!   never reaches the normalizer
//! - **No retries** - a failed request is terminal for the current attempt;
//!   scheduling the next attempt belongs to the caller
//! - **No extra timeout** - the transport's own defaults apply

use reqwest::RequestBuilder;

use crate::error::{ProviderError, Result};
use crate::utils::log_sanitizer::truncate_for_log;

/// HTTP tool function set
pub struct HttpUtils;

impl HttpUtils {
    /// Performs an HTTP request and returns the body of a 2xx response
    ///
    /// # Arguments
    /// * `request_builder` - configured request constructor
    /// * `method_name` - request method name (for logs)
    /// * `endpoint` - endpoint URL (for logs and errors)
    ///
    /// # Returns
    /// * `Ok(response_text)` - body of a 2xx response
    /// * `Err(ProviderError::NetworkError)` - transport failure or non-2xx status
    pub async fn execute_request(
        request_builder: RequestBuilder,
        method_name: &str,
        endpoint: &str,
    ) -> Result<String> {
        log::debug!("{method_name} {endpoint}");

        let response = request_builder
            .send()
            .await
            .map_err(|e| transport_error(endpoint, &e))?;

        let status = response.status();
        log::debug!("[{endpoint}] Response Status: {status}");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!(
                "[{endpoint}] HTTP {}: {}",
                status.as_u16(),
                truncate_for_log(&body)
            );
            return Err(ProviderError::NetworkError {
                endpoint: endpoint.to_string(),
                status: Some(status.as_u16()),
                detail: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                endpoint: endpoint.to_string(),
                status: None,
                detail: format!("Failed to read response body: {e}"),
            })?;

        log::debug!(
            "[{endpoint}] Response Body: {}",
            truncate_for_log(&response_text)
        );

        Ok(response_text)
    }
}

fn transport_error(endpoint: &str, e: &reqwest::Error) -> ProviderError {
    let detail = if e.is_timeout() {
        format!("request timed out: {e}")
    } else if e.is_connect() {
        format!("connection failed: {e}")
    } else {
        e.to_string()
    };
    log::error!("[{endpoint}] {detail}");
    ProviderError::NetworkError {
        endpoint: endpoint.to_string(),
        status: None,
        detail,
    }
}
