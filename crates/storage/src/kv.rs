//! Project-scoped key-value store
//!
//! Each project owns exactly one JSON document, stored in sled under
//! `{namespace}:{project_id}`. Writes replace the whole document; concurrent
//! read-modify-write cycles go through [`KvStore::update`], which retries on
//! compare-and-swap conflicts.

use serde::{de::DeserializeOwned, Serialize};
use sled::Db;
use thiserror::Error;

/// Project document store errors
#[derive(Debug, Error)]
pub enum KvError {
    /// Sled database error
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Project id cannot be used as a key
    #[error("Invalid project id: {0:?}")]
    InvalidKey(String),
}

/// Result type for project document operations
pub type Result<T> = std::result::Result<T, KvError>;

/// Location and tuning of the sled database
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Database path
    pub path: String,
    /// Prefix of every project key
    pub namespace: String,
    /// Page cache size in bytes
    pub cache_capacity: u64,
    /// Enable compression
    pub use_compression: bool,
    /// Background flush period; `None` leaves flushing to explicit calls
    pub flush_every_ms: Option<u64>,
    /// Discard the database when it is dropped
    pub temporary: bool,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            path: "design_extensions.db".to_string(),
            namespace: "theme".to_string(),
            cache_capacity: 16 * 1024 * 1024, // 16MB
            use_compression: true,
            flush_every_ms: Some(500),
            temporary: false,
        }
    }
}

impl KvConfig {
    /// Configuration for a database at `path`
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into(), ..Default::default() }
    }

    /// Set the key namespace
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the page cache size
    pub fn cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    /// Compress stored documents
    pub fn use_compression(mut self, enabled: bool) -> Self {
        self.use_compression = enabled;
        self
    }

    /// Set the background flush period
    pub fn flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.flush_every_ms = ms;
        self
    }

    /// Keep the database only for the lifetime of the store
    pub fn temporary(mut self, temporary: bool) -> Self {
        self.temporary = temporary;
        self
    }
}

/// One JSON document per project
pub struct KvStore {
    db: Db,
    namespace: String,
    flush_every_ms: Option<u64>,
}

impl KvStore {
    /// Open a store
    pub fn open(config: KvConfig) -> Result<Self> {
        let mut db_config = sled::Config::new()
            .cache_capacity(config.cache_capacity)
            .use_compression(config.use_compression);

        db_config = if config.temporary {
            db_config.temporary(true)
        } else {
            db_config.path(&config.path)
        };

        // sled defaults to a 500ms period, so `None` has to be set explicitly
        db_config = db_config.flush_every_ms(config.flush_every_ms);

        let db = db_config.open()?;
        tracing::info!(
            "Opened key-value store (namespace {}, flush every {:?} ms)",
            config.namespace,
            config.flush_every_ms
        );

        Ok(Self { db, namespace: config.namespace, flush_every_ms: config.flush_every_ms })
    }

    /// Background flush period the database was opened with
    pub fn flush_every_ms(&self) -> Option<u64> {
        self.flush_every_ms
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        Self::open(KvConfig::default().temporary(true))
    }

    fn key(&self, project_id: &str) -> Result<String> {
        if project_id.trim().is_empty() || project_id.contains(':') {
            return Err(KvError::InvalidKey(project_id.to_string()));
        }
        Ok(format!("{}:{}", self.namespace, project_id))
    }

    fn prefix(&self) -> String {
        format!("{}:", self.namespace)
    }

    /// Read a project's document
    pub fn get<T>(&self, project_id: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.db.get(self.key(project_id)?.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Replace a project's document
    pub fn set<T>(&self, project_id: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.db.insert(self.key(project_id)?.as_bytes(), bytes)?;
        Ok(())
    }

    /// Read, transform and write a project's document atomically.
    ///
    /// `f` may run more than once when another writer gets in between.
    pub fn update<T, F>(&self, project_id: &str, mut f: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnMut(Option<T>) -> T,
    {
        let key = self.key(project_id)?;
        loop {
            let current = self.db.get(key.as_bytes())?;
            let previous = current
                .as_ref()
                .map(|bytes| serde_json::from_slice::<T>(bytes))
                .transpose()?;

            let next = f(previous);
            let bytes = serde_json::to_vec(&next)?;

            match self.db.compare_and_swap(key.as_bytes(), current, Some(bytes))? {
                Ok(()) => return Ok(next),
                Err(_) => {
                    tracing::debug!("Concurrent write to {}, retrying update", key);
                }
            }
        }
    }

    /// Remove a project's document
    pub fn remove(&self, project_id: &str) -> Result<bool> {
        Ok(self.db.remove(self.key(project_id)?.as_bytes())?.is_some())
    }

    /// Check if a project has a document
    pub fn contains(&self, project_id: &str) -> Result<bool> {
        Ok(self.db.contains_key(self.key(project_id)?.as_bytes())?)
    }

    /// Every project with a document, in key order
    pub fn project_ids(&self) -> Result<Vec<String>> {
        let prefix = self.prefix();
        let mut ids = Vec::new();

        for item in self.db.scan_prefix(prefix.as_bytes()) {
            let (key, _) = item?;
            if let Ok(key) = std::str::from_utf8(&key) {
                if let Some(id) = key.strip_prefix(&prefix) {
                    ids.push(id.to_string());
                }
            }
        }

        Ok(ids)
    }

    /// Write pending documents to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Number of stored documents in this namespace
    pub fn len(&self) -> usize {
        self.db.scan_prefix(self.prefix().as_bytes()).count()
    }

    /// Check if no document is stored in this namespace
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export every document of the namespace as JSON
    pub fn export(&self) -> Result<Vec<(String, serde_json::Value)>> {
        let mut data = Vec::new();
        for project_id in self.project_ids()? {
            if let Some(value) = self.get::<serde_json::Value>(&project_id)? {
                data.push((project_id, value));
            }
        }
        Ok(data)
    }

    /// Import documents, replacing existing ones
    pub fn import(&self, data: &[(String, serde_json::Value)]) -> Result<usize> {
        for (project_id, value) in data {
            self.set(project_id, value)?;
        }
        tracing::info!("Imported {} project documents", data.len());
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Counter {
        writes: u32,
    }

    #[test]
    fn test_empty_store() {
        let kv = KvStore::in_memory().unwrap();
        assert!(kv.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let kv = KvStore::in_memory().unwrap();
        kv.set("project-a", &json!({"withDarkMode": true})).unwrap();

        let value: Option<serde_json::Value> = kv.get("project-a").unwrap();
        assert_eq!(value, Some(json!({"withDarkMode": true})));

        let missing: Option<serde_json::Value> = kv.get("project-b").unwrap();
        assert_eq!(missing, None);
    }

    #[test]
    fn test_invalid_project_ids() {
        let kv = KvStore::in_memory().unwrap();
        assert!(matches!(kv.set("", &1), Err(KvError::InvalidKey(_))));
        assert!(matches!(kv.get::<u32>("a:b"), Err(KvError::InvalidKey(_))));
    }

    #[test]
    fn test_remove_and_contains() {
        let kv = KvStore::in_memory().unwrap();
        kv.set("project-a", &1).unwrap();
        assert!(kv.contains("project-a").unwrap());
        assert!(kv.remove("project-a").unwrap());
        assert!(!kv.remove("project-a").unwrap());
        assert!(!kv.contains("project-a").unwrap());
    }

    #[test]
    fn test_update() {
        let kv = KvStore::in_memory().unwrap();
        let first = kv
            .update("project-a", |prev: Option<Counter>| Counter { writes: prev.map_or(1, |c| c.writes + 1) })
            .unwrap();
        assert_eq!(first.writes, 1);

        let second = kv
            .update("project-a", |prev: Option<Counter>| Counter { writes: prev.map_or(1, |c| c.writes + 1) })
            .unwrap();
        assert_eq!(second.writes, 2);
        assert_eq!(kv.get::<Counter>("project-a").unwrap(), Some(second));
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let kv = KvStore::open(KvConfig::default().temporary(true).namespace("theme")).unwrap();
        kv.set("b", &2).unwrap();
        kv.set("a", &1).unwrap();
        assert_eq!(kv.project_ids().unwrap(), vec!["a", "b"]);
        assert_eq!(kv.len(), 2);
    }

    #[test]
    fn test_export_import() {
        let kv = KvStore::in_memory().unwrap();
        kv.set("project-a", &json!({"colors": []})).unwrap();
        kv.set("project-b", &json!({"dimensions": []})).unwrap();

        let exported = kv.export().unwrap();
        assert_eq!(exported.len(), 2);

        let kv2 = KvStore::in_memory().unwrap();
        assert_eq!(kv2.import(&exported).unwrap(), 2);
        assert_eq!(kv2.get::<serde_json::Value>("project-b").unwrap(), Some(json!({"dimensions": []})));
    }

    #[test]
    fn test_flush_period_reaches_the_database() {
        let kv = KvStore::open(KvConfig::default().temporary(true).flush_every_ms(None)).unwrap();
        assert_eq!(kv.flush_every_ms(), None);
        assert_eq!(KvStore::in_memory().unwrap().flush_every_ms(), Some(500));
    }

    #[test]
    fn test_explicit_flush_without_background_flushing() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("kv.db");
        let config = KvConfig::new(path.to_string_lossy()).flush_every_ms(None);

        {
            let kv = KvStore::open(config.clone()).unwrap();
            kv.set("project-a", &json!({"withDarkMode": true})).unwrap();
            kv.flush().unwrap();
        }

        let kv = KvStore::open(config).unwrap();
        assert_eq!(kv.get::<serde_json::Value>("project-a").unwrap(), Some(json!({"withDarkMode": true})));
    }

    #[test]
    fn test_kv_config_builder() {
        let config = KvConfig::new("test.db")
            .namespace("dex")
            .cache_capacity(8 * 1024 * 1024)
            .use_compression(false)
            .flush_every_ms(None);

        assert_eq!(config.path, "test.db");
        assert_eq!(config.namespace, "dex");
        assert_eq!(config.cache_capacity, 8 * 1024 * 1024);
        assert!(!config.use_compression);
        assert_eq!(config.flush_every_ms, None);
        assert!(!config.temporary);
    }
}
