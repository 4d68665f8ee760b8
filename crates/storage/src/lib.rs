//! Storage layer for Design Extensions
//!
//! This crate provides the sled-backed key-value store and the per-project
//! theme store built on it.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kv;
pub mod theme_store;

pub use kv::{KvConfig, KvError, KvStore};
pub use theme_store::{
    environment_from_url, environment_url, MetaData, StoredTheme, ThemeRepository, ThemeStore,
    ThemeStoreConfig, ThemeStoreError, DEFAULT_ENVIRONMENT_URL,
};
