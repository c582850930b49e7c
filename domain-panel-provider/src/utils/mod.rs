//! Utility modules.

/// Calendar-date parsing for free-form billing dates.
pub mod date;

/// Log sanitization utilities to keep response bodies out of logs.
pub mod log_sanitizer;

/// Lenient Serde helpers for loosely typed wire fields.
pub mod wire;
