//! 类型定义模块

mod fetch_state;
mod panel;
mod view_mode;

pub use fetch_state::FetchState;
pub use panel::{DomainCard, NoteTag, PanelView, TagColor, PLACEHOLDER, UNKNOWN_REGISTRAR};
pub use view_mode::ViewMode;

// Re-export provider 库的公共类型
pub use domain_panel_provider::{BillingInfo, DomainRecord, DomainStatus};
