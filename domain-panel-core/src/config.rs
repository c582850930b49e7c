//! 运行时配置快照
//!
//! 宿主注入的开关（[`ShellOverrides`]）与面板常量（[`PanelSettings`]）在构造时
//! 一次性传入，核心层不做任何全局查找。

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// 默认插画资源路径
pub const DEFAULT_ILLUSTRATION: &str = "/animated-man.webp";

/// Host-injected presentation flags.
///
/// Treated as an immutable snapshot for the lifetime of a panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShellOverrides {
    /// Always show the inline layout on wide viewports, whatever is stored.
    pub force_inline: bool,
    /// Hide the illustration next to the grid.
    pub disable_illustration: bool,
    /// Replacement illustration path.
    pub custom_illustration: Option<String>,
    /// Background image; an empty string counts as unset.
    pub custom_background_image: Option<String>,
}

impl ShellOverrides {
    /// Effective background image, if any.
    #[must_use]
    pub fn background_image(&self) -> Option<&str> {
        self.custom_background_image
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    /// Cards are rendered translucent when a background image shows through.
    #[must_use]
    pub fn translucent_cards(&self) -> bool {
        self.background_image().is_some()
    }

    /// Illustration to show, or `None` when disabled.
    #[must_use]
    pub fn illustration(&self) -> Option<&str> {
        if self.disable_illustration {
            return None;
        }
        Some(
            self.custom_illustration
                .as_deref()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(DEFAULT_ILLUSTRATION),
        )
    }
}

/// Fixed panel parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSettings {
    /// Logical cache key of the domain list.
    pub query_key: String,
    /// Polling period.
    pub refresh_interval: Duration,
    /// Viewports narrower than this keep their current view mode.
    pub mobile_breakpoint: u32,
    /// Preference key holding the view mode.
    pub view_mode_key: String,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            query_key: "domains".to_string(),
            refresh_interval: Duration::from_millis(3_600_000),
            mobile_breakpoint: 768,
            view_mode_key: "inline".to_string(),
        }
    }
}
