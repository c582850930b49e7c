//! Domain API implementations.

mod http;

pub use http::{DOMAINS_PATH, HttpDomainApi};
