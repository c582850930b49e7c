//! Domain API factory functions.

use std::sync::Arc;

use crate::api::HttpDomainApi;
use crate::error::Result;
use crate::traits::DomainApi;

/// Creates a [`DomainApi`] for the given API base URL.
///
/// The returned client is wrapped in `Arc<dyn DomainApi>` for easy sharing
/// across async tasks.
///
/// # Examples
///
/// ```rust,no_run
/// use domain_panel_provider::{DomainApi, create_domain_api};
///
/// let api = create_domain_api("https://status.example.com").unwrap();
/// assert!(api.endpoint().ends_with("/api/v1/domains?scope=public"));
/// ```
pub fn create_domain_api(base_url: &str) -> Result<Arc<dyn DomainApi>> {
    Ok(Arc::new(HttpDomainApi::new(base_url)?))
}
