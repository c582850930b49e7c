//! Platform-agnostic application bootstrap for the domain status panel.
//!
//! Provides `PanelState` (service container with start/shutdown lifecycle),
//! `PanelStateBuilder` (adapter injection) and the JSON configuration loader.

pub mod adapters;
pub mod config;

use std::sync::{Arc, Mutex, PoisonError};

use domain_panel_core::config::{PanelSettings, ShellOverrides};
use domain_panel_core::error::{CoreError, CoreResult};
use domain_panel_core::services::{PanelService, PollingCache, ServiceContext, ViewModeStore};
use domain_panel_core::traits::{
    DomainApi, InMemoryPreferenceStore, PreferenceStore, SharedViewport, ViewportProbe,
};
use domain_panel_core::types::PanelView;
use tokio::task::JoinHandle;

/// 未注入视口时假定的宽度（桌面布局）
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

/// Platform-agnostic application state.
///
/// Holds all services and the `ServiceContext`. Every frontend constructs this
/// once at startup via `PanelStateBuilder`.
pub struct PanelState {
    /// Service context (holds all adapters and the configuration snapshot)
    pub ctx: Arc<ServiceContext>,
    /// Domain list cache
    pub domain_cache: Arc<PollingCache>,
    /// View mode store
    pub view_mode: Arc<ViewModeStore>,
    /// Presentation model
    pub panel_service: PanelService,
    storage_listener: Mutex<Option<JoinHandle<()>>>,
}

impl PanelState {
    /// Run the startup sequence: view mode → storage listener → first fetch → polling.
    pub async fn start(&self) {
        match self.view_mode.init().await {
            Ok(mode) => log::info!("View mode: {mode}"),
            Err(e) if e.is_expected() => log::warn!("Failed to read view mode, using default: {e}"),
            Err(e) => log::error!("Failed to read view mode, using default: {e}"),
        }

        let listener = self.view_mode.spawn_storage_listener();
        if let Some(previous) = self
            .storage_listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(listener)
        {
            previous.abort();
        }

        self.domain_cache.mount().await;
        self.domain_cache.start_polling();
        log::info!(
            "Polling {} every {:?}",
            self.ctx.domain_api.endpoint(),
            self.ctx.settings.refresh_interval
        );
    }

    /// What the panel shows right now.
    pub fn current_view(&self) -> PanelView {
        self.panel_service
            .view(&self.domain_cache.state(), self.view_mode.mode())
    }

    /// Eligible domain count for the overview tile.
    pub fn total_domains(&self) -> usize {
        PanelService::eligible_count(&self.domain_cache.state())
    }

    /// Stop polling and listening. Results still in flight are discarded.
    pub fn shutdown(&self) {
        self.domain_cache.shutdown();
        if let Some(listener) = self
            .storage_listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            listener.abort();
        }
        log::info!("Panel shut down");
    }
}

/// Builder for constructing `PanelState` with platform-specific adapters.
///
/// # Required adapters
/// - `domain_api`: where the domain list comes from
///
/// # Optional
/// - `preference_store`: defaults to `InMemoryPreferenceStore`
/// - `viewport`: defaults to a fixed 1280px viewport
/// - `overrides` / `settings`: default snapshots
pub struct PanelStateBuilder {
    domain_api: Option<Arc<dyn DomainApi>>,
    preference_store: Option<Arc<dyn PreferenceStore>>,
    viewport: Option<Arc<dyn ViewportProbe>>,
    overrides: ShellOverrides,
    settings: PanelSettings,
}

impl PanelStateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            domain_api: None,
            preference_store: None,
            viewport: None,
            overrides: ShellOverrides::default(),
            settings: PanelSettings::default(),
        }
    }

    #[must_use]
    pub fn domain_api(mut self, api: Arc<dyn DomainApi>) -> Self {
        self.domain_api = Some(api);
        self
    }

    #[must_use]
    pub fn preference_store(mut self, store: Arc<dyn PreferenceStore>) -> Self {
        self.preference_store = Some(store);
        self
    }

    #[must_use]
    pub fn viewport(mut self, viewport: Arc<dyn ViewportProbe>) -> Self {
        self.viewport = Some(viewport);
        self
    }

    #[must_use]
    pub fn overrides(mut self, overrides: ShellOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    #[must_use]
    pub fn settings(mut self, settings: PanelSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the `PanelState`.
    ///
    /// # Errors
    /// Returns `CoreError::ValidationError` if required adapters are missing.
    pub fn build(self) -> CoreResult<PanelState> {
        let domain_api = self
            .domain_api
            .ok_or_else(|| CoreError::ValidationError("domain_api is required".to_string()))?;
        let preference_store = self
            .preference_store
            .unwrap_or_else(|| Arc::new(InMemoryPreferenceStore::new()));
        let viewport = self
            .viewport
            .unwrap_or_else(|| Arc::new(SharedViewport::new(DEFAULT_VIEWPORT_WIDTH)));

        let ctx = Arc::new(ServiceContext::new(
            domain_api,
            preference_store,
            viewport,
            self.overrides,
            self.settings,
        ));

        let domain_cache = PollingCache::new(Arc::clone(&ctx));
        let view_mode = Arc::new(ViewModeStore::new(Arc::clone(&ctx)));
        let panel_service = PanelService::new(Arc::clone(&ctx));

        Ok(PanelState {
            ctx,
            domain_cache,
            view_mode,
            panel_service,
            storage_listener: Mutex::new(None),
        })
    }
}

impl Default for PanelStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
