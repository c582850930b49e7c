//! HTTP 域名列表数据源

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::normalizer::normalize_body;
use crate::traits::DomainApi;
use crate::types::DomainRecord;

/// Public domain-list path, relative to the API base URL.
pub const DOMAINS_PATH: &str = "/api/v1/domains?scope=public";

/// [`DomainApi`] backed by `GET {base_url}/api/v1/domains?scope=public`.
#[derive(Debug, Clone)]
pub struct HttpDomainApi {
    client: Client,
    endpoint: String,
}

impl HttpDomainApi {
    /// Create a client for the given API base URL (scheme and host, optional
    /// path prefix).
    pub fn new(base_url: &str) -> Result<Self> {
        let endpoint = Self::build_endpoint(base_url)?;
        let client = Client::builder()
            .user_agent(concat!("domain-panel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::InvalidEndpoint {
                endpoint: endpoint.clone(),
                detail: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, endpoint })
    }

    fn build_endpoint(base_url: &str) -> Result<String> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let endpoint = format!("{trimmed}{DOMAINS_PATH}");

        let url = Url::parse(&endpoint).map_err(|e| ProviderError::InvalidEndpoint {
            endpoint: base_url.to_string(),
            detail: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProviderError::InvalidEndpoint {
                endpoint: base_url.to_string(),
                detail: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        Ok(endpoint)
    }
}

#[async_trait]
impl DomainApi for HttpDomainApi {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn list_domains(&self) -> Result<Vec<DomainRecord>> {
        let body =
            HttpUtils::execute_request(self.client.get(&self.endpoint), "GET", &self.endpoint)
                .await?;
        normalize_body(&body, &self.endpoint)
    }
}
