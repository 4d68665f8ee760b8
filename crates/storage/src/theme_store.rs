//! Project theme store
//!
//! Themes are stored one document per project, with metadata recording which
//! environment last wrote them and when. Every write replaces whole
//! collections; there are no partial token updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use design_tokens::model::{colors_from_modes, dimensions_from_map, Payload};
use design_tokens::{AllowedGroups, BorderToken, FontToken, Theme};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::kv::{KvConfig, KvError, KvStore};

/// Environment URL used when a request names none
pub const DEFAULT_ENVIRONMENT_URL: &str = "https://uniform.app";

/// Theme store error types
#[derive(Debug, Error)]
pub enum ThemeStoreError {
    /// Underlying key-value store error
    #[error("Storage error: {0}")]
    Kv(#[from] KvError),

    /// Blocking storage task failed
    #[error("Storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Result type for theme store operations
pub type Result<T> = std::result::Result<T, ThemeStoreError>;

// =============================================================================
// Stored Documents
// =============================================================================

/// Write metadata kept next to a theme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaData {
    /// Environment of the last writer
    pub environment: String,
    /// Time of the last write
    pub last_updated: DateTime<Utc>,
}

/// Theme document as persisted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredTheme {
    /// Theme collections
    #[serde(flatten)]
    pub theme: Theme,
    /// Write metadata
    #[serde(rename = "metaData", default, skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<MetaData>,
}

// =============================================================================
// Environments
// =============================================================================

/// Environment URL for a request: the explicit base URL, or the canary or
/// production host
pub fn environment_url(base_url: Option<&str>, env: Option<&str>) -> String {
    match (base_url.filter(|u| !u.is_empty()), env) {
        (Some(base_url), _) => base_url.to_string(),
        (None, Some("canary")) => "https://canary.uniform.app".to_string(),
        (None, _) => DEFAULT_ENVIRONMENT_URL.to_string(),
    }
}

fn hostname(url: &str) -> Option<&str> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host = authority.rsplit('@').next()?;
    // IPv6 literals keep their brackets
    let host = if host.starts_with('[') {
        &host[..=host.find(']')?]
    } else {
        host.split(':').next()?
    };
    (!host.is_empty()).then_some(host)
}

/// Environment name for a URL; empty when the URL cannot be parsed
pub fn environment_from_url(url: &str) -> String {
    let Some(host) = hostname(url) else {
        return String::new();
    };

    if host.starts_with("localhost") {
        return "localhost".to_string();
    }

    match host {
        "uniform.app" => "production".to_string(),
        "canary.uniform.app" => "canary".to_string(),
        _ => host.replace(".uniform.app", ""),
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Per-project theme persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThemeRepository: Send + Sync {
    /// Theme of a project; `None` when the project was never configured
    async fn get_theme(&self, project_id: &str) -> Result<Option<Theme>>;

    /// Replace a project's theme, recording the writing environment
    async fn set_theme(&self, project_id: &str, theme: Theme, environment_url: &str) -> Result<()>;
}

/// Theme store configuration
#[derive(Debug, Clone)]
pub struct ThemeStoreConfig {
    /// Key-value store settings
    pub kv: KvConfig,
}

impl Default for ThemeStoreConfig {
    fn default() -> Self {
        Self { kv: KvConfig::default().namespace("theme") }
    }
}

impl ThemeStoreConfig {
    /// Create a configuration with a database path
    pub fn new(path: impl Into<String>) -> Self {
        Self { kv: KvConfig::new(path).namespace("theme") }
    }

    /// Replace the key-value settings
    pub fn kv(mut self, kv: KvConfig) -> Self {
        self.kv = kv;
        self
    }
}

/// [`ThemeRepository`] over the sled key-value store
#[derive(Clone)]
pub struct ThemeStore {
    kv: Arc<KvStore>,
}

impl ThemeStore {
    /// Open a store
    pub fn open(config: ThemeStoreConfig) -> Result<Self> {
        Ok(Self { kv: Arc::new(KvStore::open(config.kv)?) })
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        Ok(Self { kv: Arc::new(KvStore::in_memory()?) })
    }

    /// Wrap an existing key-value store
    pub fn with_kv(kv: Arc<KvStore>) -> Self {
        Self { kv }
    }

    /// Stored document of a project, metadata included
    pub async fn get_stored(&self, project_id: &str) -> Result<Option<StoredTheme>> {
        let kv = Arc::clone(&self.kv);
        let project_id = project_id.to_string();
        let stored = tokio::task::spawn_blocking(move || kv.get::<StoredTheme>(&project_id)).await??;
        Ok(stored)
    }

    /// Every configured project
    pub async fn project_ids(&self) -> Result<Vec<String>> {
        let kv = Arc::clone(&self.kv);
        Ok(tokio::task::spawn_blocking(move || kv.project_ids()).await??)
    }

    /// Flush pending writes to disk
    pub async fn flush(&self) -> Result<()> {
        let kv = Arc::clone(&self.kv);
        Ok(tokio::task::spawn_blocking(move || kv.flush()).await??)
    }
}

#[async_trait]
impl ThemeRepository for ThemeStore {
    async fn get_theme(&self, project_id: &str) -> Result<Option<Theme>> {
        let stored = self.get_stored(project_id).await?;
        tracing::debug!("Loaded theme for project {} (found: {})", project_id, stored.is_some());
        Ok(stored.map(|stored| stored.theme))
    }

    async fn set_theme(&self, project_id: &str, theme: Theme, environment_url: &str) -> Result<()> {
        let kv = Arc::clone(&self.kv);
        let key = project_id.to_string();
        let environment = environment_from_url(environment_url);

        let stored = tokio::task::spawn_blocking(move || {
            kv.update(&key, |previous: Option<StoredTheme>| {
                let previous_environment = previous
                    .and_then(|stored| stored.meta_data)
                    .map(|meta| meta.environment)
                    .unwrap_or_default();
                StoredTheme {
                    theme: theme.clone(),
                    meta_data: Some(MetaData {
                        environment: if environment.is_empty() {
                            previous_environment
                        } else {
                            environment.clone()
                        },
                        last_updated: Utc::now(),
                    }),
                }
            })
        })
        .await??;

        tracing::info!(
            "Saved theme for project {} from environment {:?}",
            project_id,
            stored.meta_data.map(|meta| meta.environment).unwrap_or_default()
        );
        Ok(())
    }
}

// =============================================================================
// Collection Replacement
// =============================================================================

async fn modify_theme<R, F>(repository: &R, project_id: &str, environment_url: &str, modify: F) -> Result<Theme>
where
    R: ThemeRepository + ?Sized,
    F: FnOnce(&mut Theme) + Send,
{
    let mut theme = repository.get_theme(project_id).await?.unwrap_or_default();
    modify(&mut theme);
    repository.set_theme(project_id, theme.clone(), environment_url).await?;
    Ok(theme)
}

/// Replace the colors from a `mode -> key -> value` payload. Dark mode is
/// enabled exactly when the payload has a dark mode.
pub async fn replace_colors<R>(
    repository: &R,
    project_id: &str,
    colors: &Payload,
    environment_url: &str,
) -> Result<Theme>
where
    R: ThemeRepository + ?Sized,
{
    let colors = colors_from_modes(colors);
    modify_theme(repository, project_id, environment_url, |theme| theme.replace_colors(colors)).await
}

/// Replace the dimensions from a `key -> value` payload, keeping its order
pub async fn replace_dimensions<R>(
    repository: &R,
    project_id: &str,
    dimensions: &Payload,
    environment_url: &str,
) -> Result<Theme>
where
    R: ThemeRepository + ?Sized,
{
    let dimensions = dimensions_from_map(dimensions);
    modify_theme(repository, project_id, environment_url, |theme| theme.dimensions = dimensions).await
}

/// Replace the borders
pub async fn replace_borders<R>(
    repository: &R,
    project_id: &str,
    borders: Vec<BorderToken>,
    environment_url: &str,
) -> Result<Theme>
where
    R: ThemeRepository + ?Sized,
{
    modify_theme(repository, project_id, environment_url, |theme| theme.borders = borders).await
}

/// Replace the fonts
pub async fn replace_fonts<R>(
    repository: &R,
    project_id: &str,
    fonts: Vec<FontToken>,
    environment_url: &str,
) -> Result<Theme>
where
    R: ThemeRepository + ?Sized,
{
    modify_theme(repository, project_id, environment_url, |theme| theme.fonts = fonts).await
}

/// Set or clear the default font
pub async fn set_default_font<R>(
    repository: &R,
    project_id: &str,
    default_font: Option<String>,
    environment_url: &str,
) -> Result<Theme>
where
    R: ThemeRepository + ?Sized,
{
    modify_theme(repository, project_id, environment_url, |theme| theme.default_font = default_font).await
}

/// Replace the group opt-ins
pub async fn set_allowed_groups<R>(
    repository: &R,
    project_id: &str,
    allowed_group: AllowedGroups,
    environment_url: &str,
) -> Result<Theme>
where
    R: ThemeRepository + ?Sized,
{
    modify_theme(repository, project_id, environment_url, |theme| theme.allowed_group = allowed_group).await
}
