//! # domain-panel-provider
//!
//! Client for the public domain-list API consumed by the domain status panel.
//!
//! ## What it covers
//!
//! - Wire types: [`DomainRecord`], [`BillingInfo`], [`DomainStatus`]
//! - Response normalization: the endpoint may answer with `{ "data": [...] }`
//!   or a bare `[...]`; see [`normalizer`]
//! - HTTP transport: [`HttpDomainApi`] behind the [`DomainApi`] trait
//!
//! ## Feature Flags
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)*: Use the platform's native TLS implementation.
//! - **`rustls`**: Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use domain_panel_provider::{create_domain_api, DomainApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = create_domain_api("https://status.example.com")?;
//!
//!     for domain in api.list_domains().await?.iter().filter(|d| d.is_eligible()) {
//!         println!("{} expires in {:?} days", domain.name, domain.expires_in_days);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::NetworkError`]: transport failure or non-2xx status
//! - [`ProviderError::MalformedResponse`]: body shape not recognised
//!
//! Nothing is retried here; the caller decides when to fetch again.

mod api;
mod error;
mod factory;
mod http_client;
pub mod normalizer;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export factory functions
pub use factory::create_domain_api;

// Re-export the data source trait and its HTTP implementation
pub use api::{DOMAINS_PATH, HttpDomainApi};
pub use traits::DomainApi;

// Re-export types
pub use normalizer::ResponseEnvelope;
pub use types::{BillingInfo, DomainRecord, DomainStatus};

// Re-export utils module
pub use utils::date;
