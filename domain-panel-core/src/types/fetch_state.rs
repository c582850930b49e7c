use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::CoreError;

/// Observable state of one cached query.
///
/// `data` survives a failed refetch, so consumers can keep showing the last
/// good snapshot next to the error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchState<T> {
    /// Last successful snapshot.
    pub data: Option<T>,
    /// A fetch is running and there is nothing to show yet.
    pub is_loading: bool,
    /// Failure of the most recent fetch, cleared by the next success.
    pub error: Option<CoreError>,
    /// When `data` was last replaced.
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
            updated_at: None,
        }
    }
}

impl<T> FetchState<T> {
    /// Loading with no data to show.
    #[must_use]
    pub fn is_initial_load(&self) -> bool {
        self.is_loading && self.data.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_load_only_without_data() {
        let mut state = FetchState::<Vec<u8>>::default();
        assert!(!state.is_initial_load());

        state.is_loading = true;
        assert!(state.is_initial_load());

        state.data = Some(vec![1]);
        assert!(!state.is_initial_load());
    }
}
