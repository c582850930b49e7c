use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Panel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Compact list.
    Inline,
    /// Cards.
    #[default]
    Grid,
}

impl ViewMode {
    /// 存储值 `"1"` 为 inline，其余一律为 grid
    #[must_use]
    pub fn from_storage_value(raw: &str) -> Self {
        if raw == "1" {
            Self::Inline
        } else {
            Self::Grid
        }
    }

    #[must_use]
    pub fn storage_value(self) -> &'static str {
        match self {
            Self::Inline => "1",
            Self::Grid => "0",
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Grid => "grid",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(Self::Inline),
            "grid" => Ok(Self::Grid),
            other => Err(CoreError::ValidationError(format!(
                "unknown view mode '{other}', expected 'inline' or 'grid'"
            ))),
        }
    }
}
