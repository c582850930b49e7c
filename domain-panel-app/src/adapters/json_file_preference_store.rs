//! JSON file-based preference store
//!
//! Preferences live in a flat JSON object (`{"inline": "1"}`). Every read goes to
//! the file. Writes made through this process are announced to its other
//! contexts immediately; writes made by other processes are picked up by a
//! background task that rescans the file and announces each key that differs
//! from what this process last saw.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use domain_panel_core::error::{CoreError, CoreResult};
use domain_panel_core::traits::{
    ChangeHub, ContextId, PreferenceStore, StorageChange, StorageEvents,
};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

const MAX_STORE_FILE_SIZE: u64 = 1024 * 1024; // 1MB

/// 默认的文件重新扫描间隔
pub const DEFAULT_WATCH_INTERVAL: Duration = Duration::from_secs(1);

type Preferences = BTreeMap<String, String>;

struct FileArea {
    path: PathBuf,
    /// 本进程最后一次看到的文件内容；同时串行化读-改-写
    seen: Mutex<Option<Preferences>>,
    hub: ChangeHub,
    /// Origin of changes found on disk; never equal to a store context.
    disk_origin: ContextId,
    watch_interval: Duration,
    watcher: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl FileArea {
    async fn load(&self) -> CoreResult<Preferences> {
        let path = &self.path;
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Preferences::new()),
            Err(e) => {
                return Err(CoreError::StorageError(format!(
                    "Failed to read preference file metadata: {e}"
                )))
            }
        };

        if metadata.len() > MAX_STORE_FILE_SIZE {
            return Err(CoreError::StorageError(format!(
                "Preference file too large: {} bytes (max: {MAX_STORE_FILE_SIZE} bytes)",
                metadata.len()
            )));
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to read preference file: {e}")))?;
        if content.trim().is_empty() {
            return Ok(Preferences::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| CoreError::SerializationError(format!("Invalid preference file: {e}")))
    }

    /// 先写临时文件再重命名，避免读到半截内容
    async fn persist(&self, prefs: &Preferences) -> CoreResult<()> {
        let path = &self.path;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                CoreError::StorageError(format!("Failed to create preference directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(prefs)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to write preference file: {e}")))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| CoreError::StorageError(format!("Failed to replace preference file: {e}")))
    }

    /// Compare the file with the last seen content and announce what changed.
    ///
    /// The first scan only records a baseline.
    async fn scan(&self) {
        let mut seen = self.seen.lock().await;
        let current = match self.load().await {
            Ok(prefs) => prefs,
            Err(e) => {
                log::debug!("Preference file scan skipped: {e}");
                return;
            }
        };

        let previous = seen.replace(current);
        let (Some(previous), Some(current)) = (previous, seen.as_ref()) else {
            return;
        };
        for change in diff(&previous, current, self.disk_origin) {
            log::debug!(
                "Preference '{}' changed on disk",
                change.key.as_deref().unwrap_or_default()
            );
            self.hub.publish(change);
        }
    }

    fn ensure_watcher(self: &Arc<Self>) {
        let mut slot = self.watcher.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return;
        }
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            log::warn!("No async runtime, changes made by other processes will not be reported");
            return;
        };

        let weak = Arc::downgrade(self);
        let period = self.watch_interval;
        *slot = Some(runtime.spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(area) = weak.upgrade() else {
                    break;
                };
                area.scan().await;
            }
        }));
    }
}

impl Drop for FileArea {
    fn drop(&mut self) {
        if let Some(watcher) = self
            .watcher
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            watcher.abort();
        }
    }
}

/// Per-key changes between two snapshots, in key order.
fn diff(previous: &Preferences, current: &Preferences, origin: ContextId) -> Vec<StorageChange> {
    let keys: BTreeSet<&String> = previous.keys().chain(current.keys()).collect();
    keys.into_iter()
        .filter_map(|key| {
            let old_value = previous.get(key);
            let new_value = current.get(key);
            (old_value != new_value).then(|| StorageChange {
                key: Some(key.clone()),
                old_value: old_value.cloned(),
                new_value: new_value.cloned(),
                origin,
            })
        })
        .collect()
}

/// Preference store persisted to a JSON file.
///
/// Clones made with [`open_context`](Self::open_context) share the file and
/// notify each other of their writes. Separate instances on the same path,
/// including ones in other processes, see each other's writes through the file
/// scan started by [`external_changes`](PreferenceStore::external_changes).
#[derive(Clone)]
pub struct JsonFilePreferenceStore {
    area: Arc<FileArea>,
    context: ContextId,
}

impl JsonFilePreferenceStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_watch_interval(path, DEFAULT_WATCH_INTERVAL)
    }

    /// Same as [`new`](Self::new) with a custom file scan interval.
    #[must_use]
    pub fn with_watch_interval(path: impl Into<PathBuf>, watch_interval: Duration) -> Self {
        let path = path.into();
        log::debug!("Preference file: {}", path.display());
        Self {
            area: Arc::new(FileArea {
                path,
                seen: Mutex::new(None),
                hub: ChangeHub::new(),
                disk_origin: ContextId::new(),
                watch_interval,
                watcher: std::sync::Mutex::new(None),
            }),
            context: ContextId::new(),
        }
    }

    /// Another context on the same file.
    #[must_use]
    pub fn open_context(&self) -> Self {
        Self {
            area: Arc::clone(&self.area),
            context: ContextId::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.area.path
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    async fn read(&self) -> CoreResult<Preferences> {
        let mut seen = self.area.seen.lock().await;
        let prefs = self.area.load().await?;
        *seen = Some(prefs.clone());
        Ok(prefs)
    }

    async fn update(&self, key: &str, value: Option<&str>) -> CoreResult<()> {
        let mut seen = self.area.seen.lock().await;

        let mut prefs = self.area.load().await?;
        let old_value = match value {
            Some(v) => prefs.insert(key.to_string(), v.to_string()),
            None => prefs.remove(key),
        };
        let new_value = value.map(str::to_string);
        if old_value == new_value {
            *seen = Some(prefs);
            return Ok(());
        }

        self.area.persist(&prefs).await?;
        *seen = Some(prefs);
        self.area.hub.publish(StorageChange {
            key: Some(key.to_string()),
            old_value,
            new_value,
            origin: self.context,
        });
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for JsonFilePreferenceStore {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.read().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.update(key, Some(value)).await
    }

    async fn remove(&self, key: &str) -> CoreResult<()> {
        self.update(key, None).await
    }

    fn external_changes(&self) -> StorageEvents {
        let events = self.area.hub.subscribe(self.context);
        self.area.ensure_watcher();
        events
    }
}
