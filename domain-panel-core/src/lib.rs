//! Domain Panel Core Library
//!
//! Platform-independent logic of the domain status panel:
//! - Polling cache of the domain list (`PollingCache`)
//! - Urgency derivation from days-to-expiry (`urgency`)
//! - Cross-context view-mode coordination (`ViewModeStore`)
//! - Presentation model for the inline and grid layouts (`PanelService`)
//!
//! Storage and host details are abstracted through traits, so the same core runs
//! in a terminal front-end, a desktop shell or a test harness.

pub mod config;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod urgency;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::{PanelSettings, ShellOverrides};
pub use error::{CoreError, CoreResult};
pub use services::{PanelService, PollingCache, ServiceContext, ViewModeStore};
pub use traits::{PreferenceStore, ViewportProbe};
