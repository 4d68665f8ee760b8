//! Token groups
//!
//! A token's group is the key prefix before its first `-`: `button-primary`
//! belongs to `button`, `background` to the default group. A project opts into
//! named groups; every token whose group was not opted into is shown in the
//! default group, whatever its own prefix.

use lru::LruCache;
use parking_lot::Mutex;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::model::Token;

/// Name under which the default group is presented and selected
pub const DEFAULT_GROUP_NAME: &str = "general";

/// Stock color groups
pub const ALLOW_COLOR_GROUP: &[&str] = &["button", "text"];

/// Stock dimension groups
pub const ALLOW_DIMENSION_GROUP: &[&str] = &["badge", "button", "container", "spacer", "table"];

/// Group of a key: the prefix before the first `-`, or `""`
pub fn group_of(key: &str) -> &str {
    key.split_once('-').map(|(group, _)| group).unwrap_or("")
}

/// Name shown for a key inside the selected group.
///
/// The `group-` prefix is dropped only when the key belongs to the selected
/// group; keys from other groups keep their prefix so they stay distinguishable.
pub fn display_name(key: &str, selected_group: Option<&str>) -> String {
    let selected = selected_group.unwrap_or(DEFAULT_GROUP_NAME);
    match key.split_once('-') {
        Some((group, name)) if group == selected => name.to_string(),
        _ => key.to_string(),
    }
}

/// Tokens bucketed by allowed group, borrowing from the collection
#[derive(Debug)]
pub struct TokenGroups<'t, T> {
    /// Allowed groups in configuration order, each with its tokens in collection order
    pub groups: Vec<(String, Vec<&'t T>)>,
    /// Every token not claimed by an allowed group
    pub default: Vec<&'t T>,
}

impl<'t, T> TokenGroups<'t, T> {
    /// Tokens of one group; the default group name maps to the default bucket
    pub fn get(&self, group: &str) -> Option<&[&'t T]> {
        if group == DEFAULT_GROUP_NAME {
            return Some(&self.default);
        }
        self.groups
            .iter()
            .find(|(name, _)| name == group)
            .map(|(_, tokens)| tokens.as_slice())
    }
}

/// Partition a collection by the allowed groups
pub fn partition_by_group<'t, T: Token>(
    tokens: &'t [T],
    allowed_groups: &[String],
) -> TokenGroups<'t, T> {
    let mut groups: Vec<(String, Vec<&'t T>)> =
        allowed_groups.iter().map(|g| (g.clone(), Vec::new())).collect();
    let mut default = Vec::new();

    for token in tokens {
        let group = group_of(token.key());
        match groups.iter_mut().find(|(name, _)| name == group) {
            Some((_, bucket)) => bucket.push(token),
            None => default.push(token),
        }
    }

    TokenGroups { groups, default }
}

/// Tokens shown for a group selection.
///
/// With a named group selected, the tokens whose key starts with `group-`;
/// otherwise (nothing or the default group selected) every token whose group is
/// not one of the allowed groups.
pub fn filter_by_group_or_default<'t, T: Token>(
    tokens: &'t [T],
    selected_group: Option<&str>,
    allowed_groups: &[String],
) -> Vec<&'t T> {
    match selected_group.filter(|g| !g.is_empty() && *g != DEFAULT_GROUP_NAME) {
        Some(group) => {
            let prefix = format!("{}-", group);
            tokens.iter().filter(|t| t.key().starts_with(&prefix)).collect()
        }
        None => tokens
            .iter()
            .filter(|t| !allowed_groups.iter().any(|g| g == group_of(t.key())))
            .collect(),
    }
}

/// Group classifier configuration
#[derive(Debug, Clone)]
pub struct GroupConfig {
    /// Groups a project opted into
    pub allowed_groups: Vec<String>,
    /// Number of partitions remembered per classifier
    pub cache_capacity: usize,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self { allowed_groups: Vec::new(), cache_capacity: 32 }
    }
}

impl GroupConfig {
    /// Configuration with explicit allowed groups
    pub fn new(allowed_groups: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed_groups: allowed_groups.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Stock color groups
    pub fn colors() -> Self {
        Self::new(ALLOW_COLOR_GROUP.iter().copied())
    }

    /// Stock dimension groups
    pub fn dimensions() -> Self {
        Self::new(ALLOW_DIMENSION_GROUP.iter().copied())
    }

    /// Set the partition cache capacity
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }
}

/// Key-only partition produced by [`GroupClassifier::partition`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPartition {
    /// Allowed groups with their keys
    pub groups: Vec<(String, Vec<String>)>,
    /// Keys of the default group
    pub default: Vec<String>,
}

impl GroupPartition {
    /// Keys of one group; the default group name maps to the default bucket
    pub fn keys(&self, group: &str) -> &[String] {
        if group == DEFAULT_GROUP_NAME {
            return &self.default;
        }
        self.groups
            .iter()
            .find(|(name, _)| name == group)
            .map(|(_, keys)| keys.as_slice())
            .unwrap_or(&[])
    }

    /// Groups that contain at least one key
    pub fn non_empty_groups(&self) -> Vec<&str> {
        self.groups
            .iter()
            .filter(|(_, keys)| !keys.is_empty())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Group classifier bound to one set of allowed groups.
///
/// Partitions are pure functions of the ordered key list, so they are cached by
/// a hash of that list.
pub struct GroupClassifier {
    config: GroupConfig,
    cache: Mutex<LruCache<u64, Arc<GroupPartition>>>,
}

impl GroupClassifier {
    /// Create a classifier
    pub fn new(config: GroupConfig) -> Self {
        let capacity = NonZeroUsize::new(config.cache_capacity).unwrap_or(NonZeroUsize::MIN);
        Self { config, cache: Mutex::new(LruCache::new(capacity)) }
    }

    /// Classifier configuration
    pub fn config(&self) -> &GroupConfig {
        &self.config
    }

    /// Allowed groups
    pub fn allowed_groups(&self) -> &[String] {
        &self.config.allowed_groups
    }

    /// Partition a collection, reusing the cached result for an identical key list
    pub fn partition<T: Token>(&self, tokens: &[T]) -> Arc<GroupPartition> {
        let keys: Vec<&str> = tokens.iter().map(Token::key).collect();
        self.partition_keys(&keys)
    }

    /// Partition a key list
    pub fn partition_keys(&self, keys: &[&str]) -> Arc<GroupPartition> {
        let mut hasher = DefaultHasher::new();
        keys.hash(&mut hasher);
        let cache_key = hasher.finish();

        let mut cache = self.cache.lock();
        if let Some(hit) = cache.get(&cache_key) {
            tracing::debug!("Group partition cache hit for {} keys", keys.len());
            return Arc::clone(hit);
        }

        let mut groups: Vec<(String, Vec<String>)> =
            self.config.allowed_groups.iter().map(|g| (g.clone(), Vec::new())).collect();
        let mut default = Vec::new();
        for key in keys {
            let group = group_of(key);
            match groups.iter_mut().find(|(name, _)| name == group) {
                Some((_, bucket)) => bucket.push(key.to_string()),
                None => default.push(key.to_string()),
            }
        }

        let partition = Arc::new(GroupPartition { groups, default });
        cache.put(cache_key, Arc::clone(&partition));
        partition
    }

    /// Tokens shown for a group selection.
    ///
    /// Allowed groups and the default group are read from the cached partition.
    /// A group that is no longer allowed falls back to the `group-` prefix match.
    pub fn filter<'t, T: Token>(&self, tokens: &'t [T], selected_group: Option<&str>) -> Vec<&'t T> {
        let group = selected_group
            .filter(|g| !g.is_empty() && *g != DEFAULT_GROUP_NAME)
            .unwrap_or(DEFAULT_GROUP_NAME);
        if !self.is_known_group(group) {
            return filter_by_group_or_default(tokens, Some(group), &self.config.allowed_groups);
        }

        let partition = self.partition(tokens);
        let keys = partition.keys(group);
        tokens
            .iter()
            .filter(|token| keys.iter().any(|key| key == token.key()))
            .collect()
    }

    /// Number of partitions currently cached
    pub fn cached_partitions(&self) -> usize {
        self.cache.lock().len()
    }

    /// Whether a stored group selection still names an allowed group
    pub fn is_known_group(&self, group: &str) -> bool {
        group == DEFAULT_GROUP_NAME || self.config.allowed_groups.iter().any(|g| g == group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColorToken, DimensionToken};

    fn dims(keys: &[&str]) -> Vec<DimensionToken> {
        keys.iter().map(|k| DimensionToken::new(*k, "1px")).collect()
    }

    fn allowed(groups: &[&str]) -> Vec<String> {
        groups.iter().map(|g| g.to_string()).collect()
    }

    #[test]
    fn test_group_of() {
        assert_eq!(group_of("button-primary"), "button");
        assert_eq!(group_of("background"), "");
        assert_eq!(group_of("text-heading-lg"), "text");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("button-primary", Some("button")), "primary");
        assert_eq!(display_name("text-primary", Some("button")), "text-primary");
        assert_eq!(display_name("background", None), "background");
        assert_eq!(display_name("general-surface", None), "surface");
        assert_eq!(display_name("button", Some("button")), "button");
    }

    #[test]
    fn test_partition_by_group() {
        let tokens = dims(&["spacer-sm", "gap", "button-md", "spacer-lg", "card-pad"]);
        let groups = partition_by_group(&tokens, &allowed(&["spacer", "button"]));

        let spacer: Vec<&str> = groups.get("spacer").unwrap().iter().map(|t| t.key()).collect();
        assert_eq!(spacer, vec!["spacer-sm", "spacer-lg"]);
        let default: Vec<&str> = groups.default.iter().map(|t| t.key()).collect();
        assert_eq!(default, vec!["gap", "card-pad"]);
        assert_eq!(groups.get(DEFAULT_GROUP_NAME).unwrap().len(), 2);
        assert!(groups.get("badge").is_none());
    }

    #[test]
    fn test_filter_by_group_or_default() {
        let tokens = dims(&["spacer-sm", "spacers", "gap", "button-md", "card-pad"]);
        let allowed = allowed(&["spacer", "button"]);

        let selected: Vec<&str> = filter_by_group_or_default(&tokens, Some("spacer"), &allowed)
            .iter()
            .map(|t| t.key())
            .collect();
        assert_eq!(selected, vec!["spacer-sm"]);

        let default: Vec<&str> = filter_by_group_or_default(&tokens, None, &allowed)
            .iter()
            .map(|t| t.key())
            .collect();
        assert_eq!(default, vec!["spacers", "gap", "card-pad"]);

        let general = filter_by_group_or_default(&tokens, Some(DEFAULT_GROUP_NAME), &allowed);
        assert_eq!(general.len(), 3);
    }

    #[test]
    fn test_classifier_caches_partitions() {
        let classifier = GroupClassifier::new(GroupConfig::colors());
        let colors = vec![
            ColorToken::new("button-primary"),
            ColorToken::new("background"),
            ColorToken::new("text-body"),
        ];

        let first = classifier.partition(&colors);
        let second = classifier.partition(&colors);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.keys("button"), ["button-primary".to_string()]);
        assert_eq!(first.keys(DEFAULT_GROUP_NAME), ["background".to_string()]);
        assert_eq!(first.non_empty_groups(), vec!["button", "text"]);

        let changed = classifier.partition(&colors[..2]);
        assert!(!Arc::ptr_eq(&first, &changed));
        assert!(changed.keys("text").is_empty());
    }

    #[test]
    fn test_filter_reuses_cached_partition() {
        let classifier = GroupClassifier::new(GroupConfig::dimensions());
        let tokens = dims(&["spacer-sm", "gap", "spacer-lg", "legacy-x"]);
        assert_eq!(classifier.cached_partitions(), 0);

        let spacers: Vec<&str> = classifier.filter(&tokens, Some("spacer")).iter().map(|t| t.key()).collect();
        assert_eq!(spacers, vec!["spacer-sm", "spacer-lg"]);
        let default: Vec<&str> = classifier.filter(&tokens, None).iter().map(|t| t.key()).collect();
        assert_eq!(default, vec!["gap", "legacy-x"]);
        assert_eq!(classifier.cached_partitions(), 1);

        // A stale group selection still matches by prefix
        let legacy: Vec<&str> = classifier.filter(&tokens, Some("legacy")).iter().map(|t| t.key()).collect();
        assert_eq!(legacy, vec!["legacy-x"]);

        for group in [None, Some("spacer"), Some("legacy"), Some(DEFAULT_GROUP_NAME)] {
            let cached: Vec<&str> = classifier.filter(&tokens, group).iter().map(|t| t.key()).collect();
            let direct: Vec<&str> = filter_by_group_or_default(&tokens, group, classifier.allowed_groups())
                .iter()
                .map(|t| t.key())
                .collect();
            assert_eq!(cached, direct, "{group:?}");
        }
    }

    #[test]
    fn test_known_groups() {
        let classifier = GroupClassifier::new(GroupConfig::dimensions().cache_capacity(0));
        assert!(classifier.is_known_group("spacer"));
        assert!(classifier.is_known_group(DEFAULT_GROUP_NAME));
        assert!(!classifier.is_known_group("legacy"));
        assert_eq!(classifier.allowed_groups().len(), 5);
    }
}
