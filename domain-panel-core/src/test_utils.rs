//! 测试辅助模块
//!
//! 提供 mock 实现和便捷的测试工厂方法。

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use domain_panel_provider::{DomainApi, DomainRecord, DomainStatus, ProviderError};
use tokio::sync::Semaphore;

use crate::config::{PanelSettings, ShellOverrides};
use crate::services::ServiceContext;
use crate::traits::{InMemoryPreferenceStore, PreferenceStore, SharedViewport};

pub const TEST_ENDPOINT: &str = "http://mock/api/v1/domains?scope=public";

// ===== MockDomainApi =====

type Scripted = domain_panel_provider::Result<Vec<DomainRecord>>;

/// Scripted data source: responses are served in order, the last one repeats.
pub struct MockDomainApi {
    responses: Mutex<VecDeque<Scripted>>,
    calls: AtomicUsize,
    /// 如果 Some，每次请求需要先拿到一个许可（用于让请求停在半空中）
    gate: Option<Semaphore>,
}

impl MockDomainApi {
    pub fn new(responses: Vec<Scripted>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    /// Requests block until [`release`](Self::release) is called.
    pub fn gated(responses: Vec<Scripted>) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new(responses)
        }
    }

    pub fn release(&self, requests: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(requests);
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> Scripted {
        let mut responses = self.responses.lock().unwrap();
        if responses.len() > 1 {
            responses.pop_front().unwrap()
        } else {
            responses.front().cloned().unwrap_or_else(|| Ok(Vec::new()))
        }
    }
}

#[async_trait]
impl DomainApi for MockDomainApi {
    fn endpoint(&self) -> &str {
        TEST_ENDPOINT
    }

    async fn list_domains(&self) -> domain_panel_provider::Result<Vec<DomainRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.next_response()
    }
}

// ===== 数据工厂 =====

pub fn record(id: u64, name: &str, status: DomainStatus, days: Option<i64>) -> DomainRecord {
    DomainRecord {
        id,
        name: name.to_string(),
        status,
        billing_info: None,
        expires_in_days: days,
    }
}

pub fn http_error(status: u16) -> ProviderError {
    ProviderError::NetworkError {
        endpoint: TEST_ENDPOINT.to_string(),
        status: Some(status),
        detail: "mock failure".to_string(),
    }
}

// ===== 上下文工厂 =====

pub struct TestContext {
    pub ctx: Arc<ServiceContext>,
    pub api: Arc<MockDomainApi>,
    pub viewport: SharedViewport,
}

pub fn context_with(
    api: MockDomainApi,
    store: Arc<dyn PreferenceStore>,
    width: u32,
    overrides: ShellOverrides,
) -> TestContext {
    let api = Arc::new(api);
    let viewport = SharedViewport::new(width);
    let ctx = Arc::new(ServiceContext::new(
        api.clone(),
        store,
        Arc::new(viewport.clone()),
        overrides,
        PanelSettings::default(),
    ));
    TestContext { ctx, api, viewport }
}

pub fn context(api: MockDomainApi) -> TestContext {
    context_with(
        api,
        Arc::new(InMemoryPreferenceStore::new()),
        1280,
        ShellOverrides::default(),
    )
}

/// Let spawned tasks run until they block.
pub async fn settle() {
    for _ in 0..20 {
        tokio::task::yield_now().await;
    }
}
