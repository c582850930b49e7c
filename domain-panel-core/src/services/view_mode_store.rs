//! 视图模式协调
//!
//! 同一上下文内的写入（`view-mode-change`）与其他上下文的写入（存储事件）
//! 都汇入同一个处理函数，保证所有订阅者看到同一个结果。

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::CoreResult;
use crate::services::ServiceContext;
use crate::traits::StorageChange;
use crate::types::ViewMode;

/// Name of the same-context change notification.
pub const VIEW_MODE_CHANGE_EVENT: &str = "view-mode-change";

/// Shared inline/grid preference.
pub struct ViewModeStore {
    ctx: Arc<ServiceContext>,
    mode: watch::Sender<ViewMode>,
}

impl ViewModeStore {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        let (mode, _) = watch::channel(ViewMode::default());
        Self { ctx, mode }
    }

    /// Current effective mode.
    pub fn mode(&self) -> ViewMode {
        *self.mode.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewMode> {
        self.mode.subscribe()
    }

    /// 首次求值
    pub async fn init(&self) -> CoreResult<ViewMode> {
        self.handle_change().await
    }

    /// Persist a new preference and apply it to this context right away.
    ///
    /// Other contexts pick the write up through their storage listener.
    pub async fn set_mode(&self, mode: ViewMode) -> CoreResult<ViewMode> {
        let key = &self.ctx.settings.view_mode_key;
        self.ctx
            .preference_store
            .set(key, mode.storage_value())
            .await?;
        log::debug!("{VIEW_MODE_CHANGE_EVENT}: {key} = {}", mode.storage_value());
        self.handle_change().await
    }

    /// Apply a change made by another context.
    ///
    /// Returns `None` when the change concerns another key.
    pub async fn handle_storage_change(
        &self,
        change: &StorageChange,
    ) -> CoreResult<Option<ViewMode>> {
        if let Some(key) = change.key.as_deref() {
            if key != self.ctx.settings.view_mode_key {
                return Ok(None);
            }
        }
        log::debug!(
            "storage change from {} ({:?} -> {:?})",
            change.origin,
            change.old_value,
            change.new_value
        );
        self.handle_change().await.map(Some)
    }

    /// Evaluate the effective mode without applying it.
    ///
    /// 1. Narrow viewport: keep the current mode.
    /// 2. `force_inline`: inline.
    /// 3. Stored preference.
    /// 4. Grid.
    pub async fn resolve(&self) -> CoreResult<ViewMode> {
        let current = self.mode();
        if self.ctx.viewport.width() < self.ctx.settings.mobile_breakpoint {
            return Ok(current);
        }
        if self.ctx.overrides.force_inline {
            return Ok(ViewMode::Inline);
        }
        let stored = self
            .ctx
            .preference_store
            .get(&self.ctx.settings.view_mode_key)
            .await?;
        Ok(stored
            .as_deref()
            .map_or(ViewMode::Grid, ViewMode::from_storage_value))
    }

    async fn handle_change(&self) -> CoreResult<ViewMode> {
        let next = self.resolve().await?;
        let changed = self.mode.send_if_modified(|mode| {
            if *mode == next {
                false
            } else {
                *mode = next;
                true
            }
        });
        if changed {
            log::debug!("view mode is now {next}");
        }
        Ok(next)
    }

    /// 监听其他上下文的写入
    ///
    /// 订阅在调用时立即建立；任务只持有弱引用。
    pub fn spawn_storage_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let mut events = self.ctx.preference_store.external_changes();
        let weak = Arc::downgrade(self);
        tokio::spawn(async move {
            while let Some(change) = events.recv().await {
                let Some(store) = weak.upgrade() else {
                    break;
                };
                if let Err(e) = store.handle_storage_change(&change).await {
                    if e.is_expected() {
                        log::warn!("Failed to apply storage change: {e}");
                    } else {
                        log::error!("Failed to apply storage change: {e}");
                    }
                }
            }
            log::debug!("storage listener stopped");
        })
    }
}
