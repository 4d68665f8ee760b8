//! Design tokens for Design Extensions
//!
//! This crate holds the per-project theme model and everything derived from it:
//! alias resolution, group classification, CSS variable emission, design-token
//! file import and theme validation.
//!
//! # Modules
//!
//! - [`model`] - Theme aggregate and the color, dimension, border and font tokens
//! - [`alias`] - Alias detection and resolution to CSS variable references
//! - [`groups`] - Key-prefix groups and the cached group classifier
//! - [`css`] - Stylesheet emission and resolved token maps
//! - [`import`] - W3C design-token document import
//! - [`fonts`] - Google font helpers and legacy font upgrades
//! - [`validation`] - Key, group name, color and theme validators
//!
//! # Example
//!
//! ```rust
//! use design_tokens::{alias, css, ColorToken, Theme};
//!
//! let mut theme = Theme::new();
//! theme.colors.push(ColorToken::new("button-primary").with_mode("light", "#001C6C"));
//! theme.colors.push(ColorToken::new("background").with_mode("light", "{button-primary}"));
//!
//! assert_eq!(alias::to_css_variable_expression("{button-primary}"), "var(--button-primary)");
//! assert!(css::theme_css(&theme).contains("--background: var(--button-primary);"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod alias;
pub mod css;
pub mod fonts;
pub mod groups;
pub mod import;
pub mod model;
pub mod validation;

// Re-export commonly used types
pub use alias::{is_alias, resolve_reference, to_css_variable_expression, TokenValue};

pub use groups::{
    display_name, filter_by_group_or_default, group_of, partition_by_group, GroupClassifier,
    GroupConfig, GroupPartition, TokenGroups, DEFAULT_GROUP_NAME,
};

pub use model::{
    AllowedGroups, BorderToken, BorderValue, ColorMode, ColorToken, DimensionToken, FontToken,
    Theme, Token, TokenKind,
};

pub use validation::{validate_keys, validate_theme, ThemeIssue};
