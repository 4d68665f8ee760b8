//! Theme data model
//!
//! A theme is the per-project aggregate of color, dimension, border and font
//! tokens. Collections are ordered and every token carries a key that is unique
//! within its collection. Token values are kept exactly as stored: aliases such
//! as `{button-primary}` are never flattened into literals.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::groups::{ALLOW_COLOR_GROUP, ALLOW_DIMENSION_GROUP};

// =============================================================================
// Token Kinds
// =============================================================================

/// The four token collections a theme carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Color tokens, one value per color mode
    Color,
    /// Size/dimension tokens
    Dimension,
    /// Font tokens
    Font,
    /// Composite border tokens
    Border,
}

impl TokenKind {
    /// Type name used by design-token documents (`$type`)
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Color => "color",
            TokenKind::Dimension => "dimension",
            TokenKind::Font => "font",
            TokenKind::Border => "border",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Color => write!(f, "Color"),
            TokenKind::Dimension => write!(f, "Dimension"),
            TokenKind::Font => write!(f, "Font"),
            TokenKind::Border => write!(f, "Border"),
        }
    }
}

impl std::str::FromStr for TokenKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "color" => Ok(TokenKind::Color),
            "dimension" => Ok(TokenKind::Dimension),
            "font" => Ok(TokenKind::Font),
            "border" => Ok(TokenKind::Border),
            _ => Err(format!("Unknown token type: {}", s)),
        }
    }
}

/// Color modes known to the editor. Other mode names are stored verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Light mode, emitted under `:root`
    Light,
    /// Dark mode, emitted under `.dark`
    Dark,
}

impl ColorMode {
    /// Mode name as stored on a color token
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

/// Mode emitted under the `:root` selector
pub const ROOT_COLOR_SCHEME_KEY: ColorMode = ColorMode::Light;

// =============================================================================
// Stock Defaults
// =============================================================================

/// Stock values used when a new token is added or an imported value is unusable
pub mod defaults {
    /// Light mode color for a new color token
    pub const COLOR_LIGHT: &str = "#FFFFFF";
    /// Dark mode color for a new color token
    pub const COLOR_DARK: &str = "#000000";
    /// Value of a new dimension token
    pub const DIMENSION: &str = "0px";
    /// Border color
    pub const BORDER_COLOR: &str = "#000000";
    /// Border width
    pub const BORDER_WIDTH: &str = "1px";
    /// Border radius
    pub const BORDER_RADIUS: &str = "0px";
    /// Border style
    pub const BORDER_STYLE: &str = "solid";
}

// =============================================================================
// Tokens
// =============================================================================

/// Behaviour shared by every token collection entry
pub trait Token {
    /// Which collection this token belongs to
    const KIND: TokenKind;

    /// Unique key within the collection
    fn key(&self) -> &str;

    /// Every raw value carried by the token, literal or alias
    fn raw_values(&self) -> Vec<&str>;
}

/// A color token: one value per color mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorToken {
    /// Token key
    #[serde(rename = "colorKey")]
    pub key: String,

    /// Mode name (`light`, `dark`, ...) to color literal or alias
    #[serde(flatten)]
    pub modes: BTreeMap<String, String>,
}

impl ColorToken {
    /// Create a color token with the stock light and dark values
    pub fn new(key: impl Into<String>) -> Self {
        let mut modes = BTreeMap::new();
        modes.insert(ColorMode::Light.as_str().to_string(), defaults::COLOR_LIGHT.to_string());
        modes.insert(ColorMode::Dark.as_str().to_string(), defaults::COLOR_DARK.to_string());
        Self { key: key.into(), modes }
    }

    /// Set the value for a mode
    pub fn with_mode(mut self, mode: impl Into<String>, value: impl Into<String>) -> Self {
        self.modes.insert(mode.into(), value.into());
        self
    }

    /// Value for a mode, if present
    pub fn value(&self, mode: &str) -> Option<&str> {
        self.modes.get(mode).map(String::as_str)
    }
}

impl Token for ColorToken {
    const KIND: TokenKind = TokenKind::Color;

    fn key(&self) -> &str {
        &self.key
    }

    fn raw_values(&self) -> Vec<&str> {
        self.modes.values().map(String::as_str).collect()
    }
}

/// A dimension token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionToken {
    /// Token key
    #[serde(rename = "dimensionKey")]
    pub key: String,

    /// Dimension literal (`8px`, `1rem`) or alias
    pub value: String,
}

impl DimensionToken {
    /// Create a dimension token
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

impl Token for DimensionToken {
    const KIND: TokenKind = TokenKind::Dimension;

    fn key(&self) -> &str {
        &self.key
    }

    fn raw_values(&self) -> Vec<&str> {
        vec![&self.value]
    }
}

/// Composite border value; every field is independently a literal or an alias
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderValue {
    /// Border color
    pub color: String,
    /// Border width
    pub width: String,
    /// Border radius
    pub radius: String,
    /// Border style (`solid`, `dashed`, ...)
    pub style: String,
}

impl Default for BorderValue {
    fn default() -> Self {
        Self {
            color: defaults::BORDER_COLOR.to_string(),
            width: defaults::BORDER_WIDTH.to_string(),
            radius: defaults::BORDER_RADIUS.to_string(),
            style: defaults::BORDER_STYLE.to_string(),
        }
    }
}

/// A border token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderToken {
    /// Token key
    #[serde(rename = "borderKey")]
    pub key: String,

    /// Border fields
    pub value: BorderValue,
}

impl BorderToken {
    /// Create a border token
    pub fn new(key: impl Into<String>, value: BorderValue) -> Self {
        Self { key: key.into(), value }
    }
}

impl Token for BorderToken {
    const KIND: TokenKind = TokenKind::Border;

    fn key(&self) -> &str {
        &self.key
    }

    fn raw_values(&self) -> Vec<&str> {
        vec![&self.value.color, &self.value.width, &self.value.radius, &self.value.style]
    }
}

/// A font token. An empty value marks a custom font supplied by the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontToken {
    /// Token key
    #[serde(rename = "fontKey")]
    pub key: String,

    /// Google font family spec, or empty for a custom font
    #[serde(default)]
    pub value: String,
}

impl FontToken {
    /// Create a font token
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }

    /// Whether the font is provided outside of Google Fonts
    pub fn is_custom(&self) -> bool {
        self.value.is_empty()
    }
}

impl Token for FontToken {
    const KIND: TokenKind = TokenKind::Font;

    fn key(&self) -> &str {
        &self.key
    }

    fn raw_values(&self) -> Vec<&str> {
        vec![&self.value]
    }
}

// =============================================================================
// Theme
// =============================================================================

/// Groups a project opted into for scoped parameter configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedGroups {
    /// Allowed color groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Vec<String>>,

    /// Allowed dimension groups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<Vec<String>>,
}

/// Root aggregate stored per project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Whether dark mode values are edited and emitted
    #[serde(default)]
    pub with_dark_mode: bool,

    /// Color tokens
    #[serde(default)]
    pub colors: Vec<ColorToken>,

    /// Dimension tokens
    #[serde(default)]
    pub dimensions: Vec<DimensionToken>,

    /// Font tokens; legacy plain-string entries are upgraded on read
    #[serde(default, deserialize_with = "crate::fonts::deserialize_fonts")]
    pub fonts: Vec<FontToken>,

    /// Border tokens
    #[serde(default)]
    pub borders: Vec<BorderToken>,

    /// Key of the font used when a parameter has no explicit font
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_font: Option<String>,

    /// Group opt-ins
    #[serde(default)]
    pub allowed_group: AllowedGroups,
}

fn collect_keys<T: Token>(tokens: &[T]) -> Vec<&str> {
    tokens.iter().map(Token::key).collect()
}

impl Theme {
    /// Create an empty theme
    pub fn new() -> Self {
        Self::default()
    }

    /// Color token keys in collection order
    pub fn color_keys(&self) -> Vec<&str> {
        collect_keys(&self.colors)
    }

    /// Dimension token keys in collection order
    pub fn dimension_keys(&self) -> Vec<&str> {
        collect_keys(&self.dimensions)
    }

    /// Border token keys in collection order
    pub fn border_keys(&self) -> Vec<&str> {
        collect_keys(&self.borders)
    }

    /// Font token keys in collection order
    pub fn font_keys(&self) -> Vec<&str> {
        collect_keys(&self.fonts)
    }

    /// Allowed color groups, falling back to the stock groups
    pub fn allowed_color_groups(&self) -> Vec<String> {
        match &self.allowed_group.color {
            Some(groups) => groups.clone(),
            None => ALLOW_COLOR_GROUP.iter().map(|g| g.to_string()).collect(),
        }
    }

    /// Allowed dimension groups, falling back to the stock groups
    pub fn allowed_dimension_groups(&self) -> Vec<String> {
        match &self.allowed_group.dimension {
            Some(groups) => groups.clone(),
            None => ALLOW_DIMENSION_GROUP.iter().map(|g| g.to_string()).collect(),
        }
    }

    /// Dark mode flag, optionally overridden by a host-supplied `"true"`/`"false"`
    pub fn is_dark_mode_enabled(&self, override_flag: Option<&str>) -> bool {
        match override_flag {
            Some(flag) => flag == "true",
            None => self.with_dark_mode,
        }
    }

    /// Replace the color collection. Dark mode follows the presence of a `dark` mode.
    pub fn replace_colors(&mut self, colors: Vec<ColorToken>) {
        self.with_dark_mode =
            colors.iter().any(|c| c.modes.contains_key(ColorMode::Dark.as_str()));
        self.colors = colors;
    }
}

// =============================================================================
// Collection Builders
// =============================================================================

/// Host payloads are JSON objects; their key order is the collection order
pub type Payload = Map<String, Value>;

fn payload_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Build color tokens from a `mode -> key -> value` payload.
///
/// Keys are taken in first-seen order across modes. A key missing from a mode
/// gets an empty value for that mode. Modes that are not objects are skipped.
pub fn colors_from_modes(data: &Payload) -> Vec<ColorToken> {
    let modes: Vec<(&String, &Payload)> = data
        .iter()
        .filter_map(|(mode, values)| values.as_object().map(|values| (mode, values)))
        .collect();

    let mut keys: Vec<&String> = Vec::new();
    for (_, values) in &modes {
        for key in values.keys() {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }

    keys.into_iter()
        .map(|key| ColorToken {
            key: key.clone(),
            modes: modes
                .iter()
                .map(|(mode, values)| {
                    ((*mode).clone(), values.get(key).map(payload_text).unwrap_or_default())
                })
                .collect(),
        })
        .collect()
}

/// Build dimension tokens from a `key -> value` payload, in payload order
pub fn dimensions_from_map(data: &Payload) -> Vec<DimensionToken> {
    data.iter()
        .map(|(key, value)| DimensionToken::new(key.clone(), payload_text(value)))
        .collect()
}

/// Build border tokens from a `key -> border` payload
pub fn borders_from_map<'a>(
    data: impl IntoIterator<Item = (&'a String, &'a BorderValue)>,
) -> Vec<BorderToken> {
    data.into_iter()
        .map(|(key, value)| BorderToken::new(key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_kind_from_str() {
        assert_eq!("color".parse::<TokenKind>().unwrap(), TokenKind::Color);
        assert_eq!("BORDER".parse::<TokenKind>().unwrap(), TokenKind::Border);
        assert!("shadow".parse::<TokenKind>().is_err());
        assert_eq!(TokenKind::Dimension.as_str(), "dimension");
        assert_eq!(TokenKind::Font.to_string(), "Font");
    }

    #[test]
    fn test_color_token_wire_format() {
        let token = ColorToken::new("button-primary").with_mode("light", "#001C6C");
        let value = serde_json::to_value(&token).unwrap();
        assert_eq!(value, json!({"colorKey": "button-primary", "light": "#001C6C", "dark": "#000000"}));

        let parsed: ColorToken = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.value("light"), Some("#001C6C"));
        assert_eq!(parsed.value("sepia"), None);
    }

    #[test]
    fn test_theme_deserialize_partial_record() {
        let theme: Theme = serde_json::from_value(json!({
            "dimensions": [{"dimensionKey": "spacer-sm", "value": "4px"}],
            "borders": [{
                "borderKey": "card",
                "value": {"color": "{button-primary}", "width": "1px", "radius": "4px", "style": "solid"}
            }],
            "allowedGroup": {"color": ["brand"]}
        }))
        .unwrap();

        assert!(!theme.with_dark_mode);
        assert!(theme.colors.is_empty());
        assert_eq!(theme.dimension_keys(), vec!["spacer-sm"]);
        assert_eq!(theme.border_keys(), vec!["card"]);
        assert_eq!(theme.allowed_color_groups(), vec!["brand".to_string()]);
        assert_eq!(theme.allowed_dimension_groups().len(), ALLOW_DIMENSION_GROUP.len());
    }

    #[test]
    fn test_dark_mode_override() {
        let theme = Theme { with_dark_mode: true, ..Default::default() };
        assert!(theme.is_dark_mode_enabled(None));
        assert!(!theme.is_dark_mode_enabled(Some("false")));
        assert!(Theme::new().is_dark_mode_enabled(Some("true")));
    }

    #[test]
    fn test_colors_from_modes() {
        let data = json!({
            "light": {"text": "#111", "background": "#FFF"},
            "dark": {"background": "#000", "accent": "#FA0"}
        });

        let colors = colors_from_modes(data.as_object().unwrap());
        let keys: Vec<&str> = colors.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["text", "background", "accent"]);

        let text = &colors[0];
        assert_eq!(text.value("dark"), Some(""));
        assert_eq!(text.value("light"), Some("#111"));

        let mut theme = Theme::new();
        theme.replace_colors(colors);
        assert!(theme.with_dark_mode);
    }

    #[test]
    fn test_dimensions_keep_payload_order() {
        let data = json!({"spacer-xl": "32px", "spacer-sm": "4px", "gap": 8});
        let dimensions = dimensions_from_map(data.as_object().unwrap());
        let keys: Vec<&str> = dimensions.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["spacer-xl", "spacer-sm", "gap"]);
        assert_eq!(dimensions[2].value, "8");
    }

    #[test]
    fn test_border_defaults() {
        let border = BorderValue::default();
        assert_eq!(border.color, "#000000");
        assert_eq!(border.width, "1px");
        assert_eq!(border.radius, "0px");
        assert_eq!(border.style, "solid");
        let token = BorderToken::new("card", border);
        assert_eq!(token.raw_values().len(), 4);
    }
}
