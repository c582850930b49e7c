use serde::{Deserialize, Serialize};

/// Unified error type for domain-list API operations.
///
/// Each variant carries the `endpoint` that produced it, plus variant-specific
/// context. All variants are serializable for structured error reporting.
///
/// Neither variant is retried by this crate. A failed fetch is terminal for the
/// current attempt; callers decide when to try again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// The request never produced a usable response: connection failure,
    /// transport timeout, unreadable body, or a non-2xx HTTP status.
    NetworkError {
        /// Endpoint that was requested.
        endpoint: String,
        /// HTTP status code, when the server answered with a non-2xx status.
        status: Option<u16>,
        /// Error details.
        detail: String,
    },

    /// The response body was not one of the recognised envelope shapes.
    MalformedResponse {
        /// Endpoint that was requested.
        endpoint: String,
        /// Details about what did not match.
        detail: String,
    },

    /// The configured endpoint could not be turned into a request URL.
    InvalidEndpoint {
        /// The rejected endpoint text.
        endpoint: String,
        /// Why it was rejected.
        detail: String,
    },
}

impl ProviderError {
    /// 是否为预期行为（服务端返回错误状态、数据格式不匹配等），用于日志分级。
    ///
    /// 返回 `true` 时应使用 `warn` 级别，`false` 时使用 `error` 级别。
    /// **新增变体时请同步更新此方法。**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NetworkError {
                status: Some(_),
                ..
            } | Self::MalformedResponse { .. }
        )
    }

    /// HTTP status code carried by a non-2xx failure.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NetworkError { status, .. } => *status,
            _ => None,
        }
    }

    /// Endpoint the failed request targeted.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        match self {
            Self::NetworkError { endpoint, .. }
            | Self::MalformedResponse { endpoint, .. }
            | Self::InvalidEndpoint { endpoint, .. } => endpoint,
        }
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError {
                endpoint,
                status: Some(code),
                detail,
            } => {
                write!(f, "[{endpoint}] Network error (HTTP {code}): {detail}")
            }
            Self::NetworkError {
                endpoint,
                status: None,
                detail,
            } => {
                write!(f, "[{endpoint}] Network error: {detail}")
            }
            Self::MalformedResponse { endpoint, detail } => {
                write!(f, "[{endpoint}] Malformed response: {detail}")
            }
            Self::InvalidEndpoint { endpoint, detail } => {
                write!(f, "[{endpoint}] Invalid endpoint: {detail}")
            }
        }
    }
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;
