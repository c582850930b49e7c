//! 业务逻辑服务层

mod panel_service;
mod polling_cache;
mod view_mode_store;

pub use panel_service::{eligible, PanelService};
pub use polling_cache::PollingCache;
pub use view_mode_store::{ViewModeStore, VIEW_MODE_CHANGE_EVENT};

use std::sync::Arc;

use domain_panel_provider::DomainApi;

use crate::config::{PanelSettings, ShellOverrides};
use crate::traits::{PreferenceStore, ViewportProbe};

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入平台特定的存储实现和宿主配置快照。
pub struct ServiceContext {
    /// 域名列表数据源
    pub domain_api: Arc<dyn DomainApi>,
    /// 偏好存储（视图模式）
    pub preference_store: Arc<dyn PreferenceStore>,
    /// 视口宽度
    pub viewport: Arc<dyn ViewportProbe>,
    /// 宿主注入的开关，构造后不可变
    pub overrides: ShellOverrides,
    /// 面板常量
    pub settings: PanelSettings,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        domain_api: Arc<dyn DomainApi>,
        preference_store: Arc<dyn PreferenceStore>,
        viewport: Arc<dyn ViewportProbe>,
        overrides: ShellOverrides,
        settings: PanelSettings,
    ) -> Self {
        Self {
            domain_api,
            preference_store,
            viewport,
            overrides,
            settings,
        }
    }
}
