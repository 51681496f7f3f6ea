//! On-disk TTL cache for registry lookups and command results
//!
//! The store is a single JSON object keyed by package name or command
//! string. It is re-read on every access, so changes made by another
//! process are picked up, and every write rewrites the whole file.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::CACHE_TTL_MS;
use crate::version::error::CacheError;

/// Contents of the cache file
pub type CacheData = IndexMap<String, CacheEntry>;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// One cached value with its timestamps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CacheEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exec_result: Option<serde_json::Value>,
    /// ISO 8601 time the value was computed
    pub date: String,
    pub format_date: String,
    /// Expiry as epoch milliseconds
    pub expired_date: i64,
    pub expired_format_date: String,
}

/// Entry field a cached value is kept in
#[derive(Debug, Clone, Copy)]
enum EntryField {
    Version,
    ExecResult,
}

impl EntryField {
    fn read<T: DeserializeOwned>(self, entry: CacheEntry) -> Option<T> {
        let value = match self {
            EntryField::Version => entry.version.map(serde_json::Value::String),
            EntryField::ExecResult => entry.exec_result,
        }?;
        serde_json::from_value(value).ok()
    }
}

pub struct ExecCache {
    path: PathBuf,
    disabled: bool,
    ttl_ms: i64,
    clock: Clock,
    write_lock: Mutex<()>,
}

impl ExecCache {
    /// Open the cache at `path`, creating an empty store if needed.
    ///
    /// When `disabled` is set every lookup counts as expired, but computed
    /// values are still written.
    pub fn init(path: &Path, disabled: bool) -> Result<Self, CacheError> {
        let cache = Self {
            path: path.to_path_buf(),
            disabled,
            ttl_ms: CACHE_TTL_MS,
            clock: Arc::new(Utc::now),
            write_lock: Mutex::new(()),
        };

        cache.ensure_store()?;
        info!("Cache initialized at {:?} (disabled: {})", path, disabled);

        Ok(cache)
    }

    pub fn with_ttl(mut self, ttl_ms: i64) -> Self {
        self.ttl_ms = ttl_ms;
        self
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_store(&self) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        if !self.path.exists() {
            std::fs::write(&self.path, "{}")?;
        }

        Ok(())
    }

    /// Read the whole store, resetting it when it is missing or corrupt.
    pub fn read_all(&self) -> CacheData {
        if let Err(e) = self.ensure_store() {
            warn!("Failed to create cache store {:?}: {}", self.path, e);
            return CacheData::new();
        }

        let parsed = std::fs::read_to_string(&self.path)
            .map_err(CacheError::from)
            .and_then(|content| Ok(serde_json::from_str::<CacheData>(&content)?));

        match parsed {
            Ok(data) => data,
            Err(e) => {
                warn!("Cache store {:?} is unreadable, resetting: {}", self.path, e);
                let _ = self
                    .write_store("{}")
                    .inspect_err(|e| warn!("Failed to reset cache store: {}", e));
                CacheData::new()
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        self.read_all().shift_remove(key)
    }

    pub fn is_expired(&self, key: &str) -> bool {
        self.is_entry_expired(self.get(key).as_ref())
    }

    fn is_entry_expired(&self, entry: Option<&CacheEntry>) -> bool {
        if self.disabled {
            return true;
        }

        match entry {
            Some(entry) if entry.expired_date > 0 => {
                (self.clock)().timestamp_millis() > entry.expired_date
            }
            _ => true,
        }
    }

    /// Return the cached value for `key`, or compute and store it.
    ///
    /// The value lives in the entry's `execResult` field. Errors from
    /// `compute` propagate untouched; failing to persist the result only
    /// logs a warning.
    pub async fn get_or_compute<T, F, Fut, E>(&self, key: &str, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.cached(key, EntryField::ExecResult, compute).await
    }

    /// Like [`ExecCache::get_or_compute`], but keyed by package name with
    /// the value kept in the entry's `version` field.
    pub async fn package_version<F, Fut, E>(&self, package_name: &str, compute: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        self.cached(package_name, EntryField::Version, compute).await
    }

    async fn cached<T, F, Fut, E>(&self, key: &str, field: EntryField, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let entry = self.get(key);

        if !self.is_entry_expired(entry.as_ref())
            && let Some(value) = entry.and_then(|e| field.read::<T>(e))
        {
            debug!("Cache hit: {}", key);
            return Ok(value);
        }

        debug!("Cache miss: {}", key);
        let value = compute().await?;

        match serde_json::to_value(&value) {
            Ok(json) => self.store(key, field, json),
            Err(e) => warn!("Failed to serialize cache value for {}: {}", key, e),
        }

        Ok(value)
    }

    fn store(&self, key: &str, field: EntryField, value: serde_json::Value) {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let now = (self.clock)();
        let expired_at = now + chrono::Duration::milliseconds(self.ttl_ms);
        let (version, exec_result) = match field {
            EntryField::Version => (value.as_str().map(str::to_string), None),
            EntryField::ExecResult => (None, Some(value)),
        };

        let mut data = self.read_all();
        data.insert(
            key.to_string(),
            CacheEntry {
                version,
                exec_result,
                date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
                format_date: format_local(now),
                expired_date: expired_at.timestamp_millis(),
                expired_format_date: format_local(expired_at),
            },
        );

        let written = serde_json::to_string_pretty(&data)
            .map_err(CacheError::from)
            .and_then(|content| self.write_store(&content));

        match written {
            Ok(()) => debug!("Cached {} until {}", key, expired_at),
            Err(e) => warn!("Failed to write cache entry {}: {}", key, e),
        }
    }

    /// Replace the store through a sibling file so readers never see a
    /// partial write.
    fn write_store(&self, content: &str) -> Result<(), CacheError> {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        std::fs::write(&staging, content)?;
        std::fs::rename(&staging, &self.path)?;
        Ok(())
    }

    /// Delete the cache file.
    pub fn remove(&self) -> Result<(), CacheError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
            info!("Removed cache store {:?}", self.path);
        }
        Ok(())
    }
}

fn format_local(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format("%a %b %d %Y %H:%M:%S GMT%z")
        .to_string()
}
