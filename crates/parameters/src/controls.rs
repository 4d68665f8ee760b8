//! Parameter types and their host configuration
//!
//! The host stores one configuration object per parameter. Its fields are
//! shared across the five parameter types; each type reads the ones it uses.

use design_tokens::{GroupClassifier, GroupConfig, Theme, TokenKind, DEFAULT_GROUP_NAME};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::merger::MergerConfig;
use crate::options::{options_from_tokens, ControlVariant, KeyValueItem, OptionItem};
use crate::viewport::{self, ParamValue, SlotValue};

// =============================================================================
// Parameter Types
// =============================================================================

/// Parameter types registered with the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Pick one color token
    ColorPalette,
    /// Margin and padding per side
    SpaceControl,
    /// Slider over steps or custom values
    Slider,
    /// Pick one of a few custom options
    SegmentedControl,
    /// Pick one token of a configured type
    TokenSelector,
}

impl ParameterKind {
    /// Every parameter type
    pub const ALL: [ParameterKind; 5] = [
        ParameterKind::ColorPalette,
        ParameterKind::SpaceControl,
        ParameterKind::Slider,
        ParameterKind::SegmentedControl,
        ParameterKind::TokenSelector,
    ];

    /// Type id registered with the host
    pub fn type_id(&self) -> &'static str {
        match self {
            ParameterKind::ColorPalette => "dex-color-palette-parameter",
            ParameterKind::SpaceControl => "dex-space-control-parameter",
            ParameterKind::Slider => "dex-slider-control-parameter",
            ParameterKind::SegmentedControl => "dex-segmented-control-parameter",
            ParameterKind::TokenSelector => "dex-token-selector-parameter",
        }
    }

    /// Name used in validation messages
    pub fn control_name(&self) -> &'static str {
        match self {
            ParameterKind::ColorPalette => "Color Palette",
            ParameterKind::SpaceControl => "Space Control",
            ParameterKind::Slider => "Slider",
            ParameterKind::SegmentedControl => "Segmented Control",
            ParameterKind::TokenSelector => "Token Selector",
        }
    }

    /// Whether the parameter can store per-viewport values
    pub fn supports_view_port(&self) -> bool {
        !matches!(self, ParameterKind::ColorPalette)
    }
}

impl std::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.type_id())
    }
}

impl std::str::FromStr for ParameterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParameterKind::ALL
            .into_iter()
            .find(|kind| kind.type_id() == s)
            .ok_or_else(|| format!("Unknown parameter type: {}", s))
    }
}

/// How a slider produces values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SliderType {
    /// Numbers between min and max with a unit
    #[default]
    Steps,
    /// Configured option values
    Custom,
}

impl std::str::FromStr for SliderType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "steps" => Ok(SliderType::Steps),
            "custom" => Ok(SliderType::Custom),
            _ => Err(format!("Unknown slider type: {}", s)),
        }
    }
}

/// Upper bound on the number of values a steps slider offers
pub const MAX_SLIDER_STEPS: usize = 1000;

/// Slider settings with the stock defaults filled in
#[derive(Debug, Clone, PartialEq)]
pub struct SliderConfig {
    /// Lowest step
    pub min_value: f64,
    /// Highest step
    pub max_value: f64,
    /// Distance between steps
    pub step: f64,
    /// Unit appended to step values
    pub units: String,
    /// Value source
    pub slider_type: SliderType,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self { min_value: 0.0, max_value: 10.0, step: 1.0, units: "px".to_string(), slider_type: SliderType::Steps }
    }
}

impl SliderConfig {
    /// Stored value for a step
    pub fn format_step(&self, value: f64) -> String {
        format!("{}{}", value, self.units)
    }

    /// Every step value from min to max. Empty when the range is invalid or
    /// would produce more than [`MAX_SLIDER_STEPS`] values.
    pub fn steps(&self) -> Vec<String> {
        let bounds = [self.min_value, self.max_value, self.step];
        if bounds.iter().any(|v| !v.is_finite()) || self.step <= 0.0 || self.max_value < self.min_value {
            return Vec::new();
        }
        let span = ((self.max_value - self.min_value) / self.step).floor();
        if !span.is_finite() || span >= MAX_SLIDER_STEPS as f64 {
            tracing::warn!(
                "Slider range {}..{} by {} exceeds {} steps",
                self.min_value,
                self.max_value,
                self.step,
                MAX_SLIDER_STEPS
            );
            return Vec::new();
        }
        let count = span as usize;
        (0..=count)
            .map(|index| self.format_step(self.min_value + index as f64 * self.step))
            .collect()
    }
}

// =============================================================================
// Host Configuration
// =============================================================================

/// Parameter configuration as stored by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterConfig {
    /// Whether a value must be selected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Slider minimum
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    /// Slider maximum
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    /// Slider step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Slider unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    /// Slider type or space control variant
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub control_type: Option<String>,
    /// Whether values are stored per viewport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_view_port: Option<bool>,
    /// Group the offered tokens come from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_group: Option<String>,
    /// Token type of a token selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_token_type: Option<TokenKind>,
    /// Color allow-list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_colors: Option<Vec<String>>,
    /// Dimension allow-list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_dimensions: Option<Vec<String>>,
    /// Token selector allow-list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_tokens: Option<Vec<String>>,
    /// Custom options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<KeyValueItem>>,
    /// Default value, single or per viewport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl ParameterConfig {
    /// Whether a value must be selected
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    /// Whether values are stored per viewport
    pub fn with_view_port(&self) -> bool {
        self.with_view_port.unwrap_or(false)
    }

    /// Merger configuration for this parameter
    pub fn merger_config(&self) -> MergerConfig {
        MergerConfig::new(self.with_view_port())
    }

    /// Selected group; the default group and an empty selection read as none
    pub fn selected_group(&self) -> Option<&str> {
        self.selected_group
            .as_deref()
            .filter(|group| !group.is_empty() && *group != DEFAULT_GROUP_NAME)
    }

    /// Configured custom options
    pub fn options(&self) -> &[KeyValueItem] {
        self.options.as_deref().unwrap_or_default()
    }

    /// Slider settings
    pub fn slider(&self) -> SliderConfig {
        let stock = SliderConfig::default();
        SliderConfig {
            min_value: self.min_value.unwrap_or(stock.min_value),
            max_value: self.max_value.unwrap_or(stock.max_value),
            step: self.step.unwrap_or(stock.step),
            units: self.units.clone().unwrap_or(stock.units),
            slider_type: self
                .control_type
                .as_deref()
                .and_then(|t| t.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Space control variant
    pub fn space_variant(&self) -> ControlVariant {
        self.control_type
            .as_deref()
            .and_then(|t| t.parse().ok())
            .unwrap_or_default()
    }

    /// Configured default as a typed value
    pub fn default_value<T: SlotValue>(&self) -> viewport::Result<ParamValue<T>> {
        ParamValue::from_host(self.default_value.as_ref())
    }

    /// Store a new default
    pub fn set_default_value<T: SlotValue>(&mut self, value: &ParamValue<T>) -> viewport::Result<()> {
        self.default_value = value.to_host()?;
        Ok(())
    }

    /// Select a group. Allow-lists and the default refer to the old group's
    /// tokens, so they are dropped.
    pub fn select_group(&mut self, group: &str) {
        self.selected_group = if group == DEFAULT_GROUP_NAME || group.is_empty() {
            None
        } else {
            Some(group.to_string())
        };
        self.allow_colors = None;
        self.allow_dimensions = None;
        self.allow_tokens = None;
        self.default_value = None;
    }

    /// Token selector configuration reset to its token type alone
    pub fn cleared_token_selector(&self) -> ParameterConfig {
        ParameterConfig { selected_token_type: self.selected_token_type, ..Default::default() }
    }
}

// =============================================================================
// Color Palette
// =============================================================================

/// Selecting the selected color again clears the selection
pub fn toggle_color_selection(current: Option<&str>, selected: &str) -> Option<String> {
    match current {
        Some(current) if current == selected => None,
        _ => Some(selected.to_string()),
    }
}

// =============================================================================
// Token Selector
// =============================================================================

/// Problem with a stored token selector configuration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigIssue {
    /// The selected group is no longer allowed for the token type
    #[error("Selected Group: {0}")]
    InvalidGroup(String),

    /// Default values that are no longer offered
    #[error("Default Value: {}", .0.join(", "))]
    InvalidDefaultValue(Vec<String>),
}

/// A theme with one group classifier per token collection.
///
/// Build it once per loaded theme so repeated option lookups reuse the cached
/// group partitions.
pub struct TokenCatalog {
    theme: Theme,
    colors: GroupClassifier,
    dimensions: GroupClassifier,
    ungrouped: GroupClassifier,
}

impl TokenCatalog {
    /// Classifiers for a theme's allowed groups
    pub fn new(theme: Theme) -> Self {
        Self {
            colors: GroupClassifier::new(GroupConfig::new(theme.allowed_color_groups())),
            dimensions: GroupClassifier::new(GroupConfig::new(theme.allowed_dimension_groups())),
            ungrouped: GroupClassifier::new(GroupConfig::default()),
            theme,
        }
    }

    /// Catalogued theme
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Classifier for a token type; fonts and borders have no groups
    pub fn classifier(&self, kind: TokenKind) -> &GroupClassifier {
        match kind {
            TokenKind::Color => &self.colors,
            TokenKind::Dimension => &self.dimensions,
            TokenKind::Font | TokenKind::Border => &self.ungrouped,
        }
    }

    /// Groups a selector can offer for a token type: the default group when it
    /// has tokens, then every allowed group that has tokens
    pub fn group_names(&self, kind: TokenKind) -> Vec<String> {
        let partition = match kind {
            TokenKind::Color => self.colors.partition(&self.theme.colors),
            TokenKind::Dimension => self.dimensions.partition(&self.theme.dimensions),
            TokenKind::Font | TokenKind::Border => return Vec::new(),
        };

        let mut names = Vec::new();
        if !partition.default.is_empty() {
            names.push(DEFAULT_GROUP_NAME.to_string());
        }
        names.extend(partition.non_empty_groups().into_iter().map(str::to_string));
        names
    }
}

/// Options a token selector offers
pub fn token_selector_options(config: &ParameterConfig, catalog: &TokenCatalog) -> Vec<OptionItem> {
    let allow_tokens = config.allow_tokens.as_deref().unwrap_or_default();
    let group = config.selected_group();
    let theme = catalog.theme();

    match config.selected_token_type {
        Some(kind @ TokenKind::Color) => {
            options_from_tokens(&theme.colors, allow_tokens, group, catalog.classifier(kind))
        }
        Some(kind @ TokenKind::Dimension) => {
            options_from_tokens(&theme.dimensions, allow_tokens, group, catalog.classifier(kind))
        }
        Some(kind @ TokenKind::Font) => {
            options_from_tokens(&theme.fonts, allow_tokens, None, catalog.classifier(kind))
        }
        Some(kind @ TokenKind::Border) => {
            options_from_tokens(&theme.borders, allow_tokens, None, catalog.classifier(kind))
        }
        None => Vec::new(),
    }
}

fn default_values(default: Option<&Value>) -> Vec<String> {
    match default {
        Some(Value::String(value)) => vec![value.clone()],
        Some(Value::Object(map)) => map
            .values()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

/// Problems that block editing a token selector until its configuration is reset
pub fn token_selector_issues(config: &ParameterConfig, catalog: &TokenCatalog) -> Vec<ConfigIssue> {
    let mut issues = Vec::new();

    if let (Some(group), Some(kind @ (TokenKind::Color | TokenKind::Dimension))) =
        (config.selected_group(), config.selected_token_type)
    {
        if !catalog.classifier(kind).is_known_group(group) {
            issues.push(ConfigIssue::InvalidGroup(group.to_string()));
        }
    }

    let options = token_selector_options(config, catalog);
    let defaults: Vec<String> = default_values(config.default_value.as_ref())
        .into_iter()
        .filter(|value| !value.is_empty())
        .collect();
    if !defaults.iter().all(|value| options.iter().any(|o| &o.value == value)) {
        issues.push(ConfigIssue::InvalidDefaultValue(defaults));
    }

    if !issues.is_empty() {
        tracing::warn!("Token selector configuration needs a reset: {} issues", issues.len());
    }
    issues
}
