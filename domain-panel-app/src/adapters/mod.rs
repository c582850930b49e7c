//! Storage adapters for the terminal front-end.

mod json_file_preference_store;

pub use json_file_preference_store::{JsonFilePreferenceStore, DEFAULT_WATCH_INTERVAL};
