//! Log sanitization utilities
//!
//! Response bodies can be large and may carry billing notes; only a prefix
//! is ever written to debug/error logs.

/// Maximum number of characters to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Truncate a string for safe logging.
///
/// Returns the original string if it has at most `TRUNCATE_LIMIT` characters,
/// otherwise the first `TRUNCATE_LIMIT` characters followed by a marker with
/// the total byte length.
pub fn truncate_for_log(s: &str) -> String {
    match s.char_indices().nth(TRUNCATE_LIMIT) {
        None => s.to_string(),
        Some((cut, _)) => format!("{}... [truncated, total {} bytes]", &s[..cut], s.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_unchanged() {
        let body = r#"{"data":[]}"#;
        assert_eq!(truncate_for_log(body), body);
    }

    #[test]
    fn body_at_limit_unchanged() {
        let body = "x".repeat(TRUNCATE_LIMIT);
        assert_eq!(truncate_for_log(&body), body);
    }

    #[test]
    fn long_body_truncated_with_total() {
        let body = "x".repeat(TRUNCATE_LIMIT + 10);
        let logged = truncate_for_log(&body);
        assert!(logged.starts_with(&"x".repeat(TRUNCATE_LIMIT)));
        assert!(logged.ends_with(&format!("total {} bytes]", TRUNCATE_LIMIT + 10)));
    }

    #[test]
    fn multibyte_body_cut_on_char_boundary() {
        let body = "域".repeat(TRUNCATE_LIMIT + 1);
        let logged = truncate_for_log(&body);
        assert!(logged.starts_with(&"域".repeat(TRUNCATE_LIMIT)));
        assert!(logged.contains("[truncated"));
    }
}
