//! 域名列表轮询缓存
//!
//! 单一 key 的 stale-while-revalidate 缓存：同一时刻最多一个请求在途，
//! 失败时保留上一次成功的数据，关闭后到达的结果直接丢弃。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError};

use chrono::Utc;
use futures::future::{BoxFuture, FutureExt, Shared};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::{CoreError, CoreResult};
use crate::services::ServiceContext;
use crate::types::{DomainRecord, FetchState};

type FetchFuture = Shared<BoxFuture<'static, CoreResult<()>>>;

/// Cache of the domain list, shared by every consumer of the panel.
pub struct PollingCache {
    ctx: Arc<ServiceContext>,
    state: watch::Sender<FetchState<Vec<DomainRecord>>>,
    in_flight: Mutex<Option<FetchFuture>>,
    closed: AtomicBool,
    poller: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl PollingCache {
    /// 创建缓存（不会立即请求）
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Arc<Self> {
        let (state, _) = watch::channel(FetchState::default());
        Arc::new(Self {
            ctx,
            state,
            in_flight: Mutex::new(None),
            closed: AtomicBool::new(false),
            poller: std::sync::Mutex::new(None),
        })
    }

    /// Logical key of the cached query.
    pub fn key(&self) -> &str {
        &self.ctx.settings.query_key
    }

    /// Current snapshot.
    pub fn state(&self) -> FetchState<Vec<DomainRecord>> {
        self.state.borrow().clone()
    }

    /// Observe every state change.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<Vec<DomainRecord>>> {
        self.state.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// 首次挂载：没有缓存且没有在途请求时才发起请求，不等待结果
    pub async fn mount(self: &Arc<Self>) {
        if self.is_closed() {
            return;
        }
        let mut slot = self.in_flight.lock().await;
        if slot.is_some() || self.state.borrow().data.is_some() {
            log::debug!("[{}] mount: served from cache", self.key());
            return;
        }
        self.start_fetch(&mut slot);
    }

    /// Fetch now, or join the request already in flight, and wait for it.
    pub async fn refetch(self: &Arc<Self>) -> CoreResult<()> {
        if self.is_closed() {
            log::debug!("[{}] refetch ignored, cache is shut down", self.key());
            return Ok(());
        }
        let fetch = self.join_or_start().await;
        fetch.await
    }

    /// Start (or join) a fetch without waiting for it.
    pub async fn refresh_in_background(self: &Arc<Self>) {
        if !self.is_closed() {
            drop(self.join_or_start().await);
        }
    }

    /// 启动定时轮询
    ///
    /// 轮询任务只持有弱引用；缓存被释放或关闭后任务自行结束。
    pub fn start_polling(self: &Arc<Self>) {
        if self.is_closed() {
            return;
        }
        let period = self.ctx.settings.refresh_interval;
        if period.is_zero() {
            log::warn!("[{}] refresh interval is zero, polling disabled", self.key());
            return;
        }

        let weak = Arc::downgrade(self);
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(cache) = weak.upgrade() else {
                    break;
                };
                if cache.is_closed() {
                    break;
                }
                log::debug!("[{}] polling tick", cache.key());
                cache.refresh_in_background().await;
            }
        });

        let previous = self
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// 停止轮询；之后到达的请求结果不再写入状态
    pub fn shutdown(&self) {
        // 在状态写锁内置位，与 update_state 串行
        self.state.send_if_modified(|_| {
            self.closed.store(true, Ordering::Release);
            false
        });
        self.stop_polling();
        log::debug!("[{}] cache shut down", self.key());
    }

    fn stop_polling(&self) {
        let handle = self
            .poller
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }

    async fn join_or_start(self: &Arc<Self>) -> FetchFuture {
        let mut slot = self.in_flight.lock().await;
        if let Some(fetch) = slot.as_ref() {
            log::debug!("[{}] joining in-flight request", self.key());
            return fetch.clone();
        }
        self.start_fetch(&mut slot)
    }

    fn start_fetch(self: &Arc<Self>, slot: &mut Option<FetchFuture>) -> FetchFuture {
        self.update_state(|state| {
            if state.data.is_none() && !state.is_loading {
                state.is_loading = true;
                true
            } else {
                false
            }
        });

        let this = Arc::clone(self);
        let fetch: FetchFuture = async move { this.run_fetch().await }.boxed().shared();
        *slot = Some(fetch.clone());
        // 请求独立推进，调用方是否等待都不影响结果落地
        tokio::spawn(fetch.clone());
        fetch
    }

    async fn run_fetch(self: Arc<Self>) -> CoreResult<()> {
        log::debug!(
            "[{}] GET {}",
            self.key(),
            self.ctx.domain_api.endpoint()
        );
        let result = self
            .ctx
            .domain_api
            .list_domains()
            .await
            .map_err(CoreError::from);

        let mut slot = self.in_flight.lock().await;
        slot.take();

        let (applied, outcome) = match result {
            Ok(records) => {
                log::debug!("[{}] fetched {} record(s)", self.key(), records.len());
                let applied = self.update_state(|state| {
                    state.data = Some(records);
                    state.error = None;
                    state.is_loading = false;
                    state.updated_at = Some(Utc::now());
                    true
                });
                (applied, Ok(()))
            }
            Err(err) => {
                if err.is_expected() {
                    log::warn!("[{}] fetch failed: {err}", self.key());
                } else {
                    log::error!("[{}] fetch failed: {err}", self.key());
                }
                let applied = self.update_state(|state| {
                    state.error = Some(err.clone());
                    state.is_loading = false;
                    true
                });
                (applied, Err(err))
            }
        };
        if !applied {
            log::debug!("[{}] discarding result that arrived after shutdown", self.key());
        }
        outcome
    }

    /// Apply `modify` unless the cache is shut down; returns whether it ran.
    ///
    /// The closed flag is read under the state lock, which `shutdown` also takes.
    fn update_state(
        &self,
        modify: impl FnOnce(&mut FetchState<Vec<DomainRecord>>) -> bool,
    ) -> bool {
        let mut ran = false;
        self.state.send_if_modified(|state| {
            if self.is_closed() {
                return false;
            }
            ran = true;
            modify(state)
        });
        ran
    }
}

impl Drop for PollingCache {
    fn drop(&mut self) {
        self.stop_polling();
    }
}
