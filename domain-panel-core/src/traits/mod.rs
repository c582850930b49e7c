//! Storage and host abstraction trait definition

mod preference_store;
mod viewport;

pub use preference_store::{
    ChangeHub, ContextId, InMemoryPreferenceStore, InMemoryPreferences, PreferenceStore,
    StorageChange, StorageEvents,
};
pub use viewport::{SharedViewport, ViewportProbe};

// Re-export the data source trait
pub use domain_panel_provider::DomainApi;
