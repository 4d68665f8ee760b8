//! Theme validation
//!
//! Validators report problems as values; nothing here fails with an error. A
//! theme with any [`ThemeIssue`] must not be saved.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;
use thiserror::Error;

use crate::alias::is_alias;
use crate::fonts::is_reserved_font_key;
use crate::model::{Theme, Token, TokenKind};

/// Pattern every token key must match
pub const KEY_PATTERN: &str = r"^[a-zA-Z0-9]+(?:-[a-zA-Z0-9]+)*$";

/// Pattern every group name must match
pub const GROUP_NAME_PATTERN: &str = r"^[a-z0-9_]+(\s?[a-z0-9_]+)*(\s?)?$";

fn key_regex() -> &'static Regex {
    static KEY_REGEX: OnceLock<Regex> = OnceLock::new();
    KEY_REGEX.get_or_init(|| Regex::new(KEY_PATTERN).unwrap())
}

fn group_name_regex() -> &'static Regex {
    static GROUP_NAME_REGEX: OnceLock<Regex> = OnceLock::new();
    GROUP_NAME_REGEX.get_or_init(|| Regex::new(GROUP_NAME_PATTERN).unwrap())
}

fn color_function_regex() -> &'static Regex {
    static COLOR_FN_REGEX: OnceLock<Regex> = OnceLock::new();
    COLOR_FN_REGEX.get_or_init(|| {
        Regex::new(r"^(?i)(rgba?|hsla?|hwb|lab|lch|oklab|oklch)\(\s*[-+0-9.%a-z\s,/]+\)$").unwrap()
    })
}

/// Whether a key has the `word(-word)*` shape
pub fn is_valid_key(key: &str) -> bool {
    key_regex().is_match(key)
}

/// `true` when every key is well-formed and no key repeats
pub fn validate_keys<S: AsRef<str>>(keys: &[S]) -> bool {
    let mut seen = HashSet::with_capacity(keys.len());
    keys.iter().all(|key| is_valid_key(key.as_ref()) && seen.insert(key.as_ref()))
}

/// Whether a group name is acceptable
pub fn validate_group_name(name: &str) -> bool {
    group_name_regex().is_match(name)
}

const NAMED_COLORS: &[&str] = &[
    "aliceblue", "antiquewhite", "aqua", "aquamarine", "azure", "beige", "bisque", "black",
    "blanchedalmond", "blue", "blueviolet", "brown", "burlywood", "cadetblue", "chartreuse",
    "chocolate", "coral", "cornflowerblue", "cornsilk", "crimson", "cyan", "darkblue", "darkcyan",
    "darkgoldenrod", "darkgray", "darkgreen", "darkgrey", "darkkhaki", "darkmagenta",
    "darkolivegreen", "darkorange", "darkorchid", "darkred", "darksalmon", "darkseagreen",
    "darkslateblue", "darkslategray", "darkslategrey", "darkturquoise", "darkviolet", "deeppink",
    "deepskyblue", "dimgray", "dimgrey", "dodgerblue", "firebrick", "floralwhite", "forestgreen",
    "fuchsia", "gainsboro", "ghostwhite", "gold", "goldenrod", "gray", "green", "greenyellow",
    "grey", "honeydew", "hotpink", "indianred", "indigo", "ivory", "khaki", "lavender",
    "lavenderblush", "lawngreen", "lemonchiffon", "lightblue", "lightcoral", "lightcyan",
    "lightgoldenrodyellow", "lightgray", "lightgreen", "lightgrey", "lightpink", "lightsalmon",
    "lightseagreen", "lightskyblue", "lightslategray", "lightslategrey", "lightsteelblue",
    "lightyellow", "lime", "limegreen", "linen", "magenta", "maroon", "mediumaquamarine",
    "mediumblue", "mediumorchid", "mediumpurple", "mediumseagreen", "mediumslateblue",
    "mediumspringgreen", "mediumturquoise", "mediumvioletred", "midnightblue", "mintcream",
    "mistyrose", "moccasin", "navajowhite", "navy", "oldlace", "olive", "olivedrab", "orange",
    "orangered", "orchid", "palegoldenrod", "palegreen", "paleturquoise", "palevioletred",
    "papayawhip", "peachpuff", "peru", "pink", "plum", "powderblue", "purple", "rebeccapurple",
    "red", "rosybrown", "royalblue", "saddlebrown", "salmon", "sandybrown", "seagreen", "seashell",
    "sienna", "silver", "skyblue", "slateblue", "slategray", "slategrey", "snow", "springgreen",
    "steelblue", "tan", "teal", "thistle", "tomato", "transparent", "turquoise", "violet", "wheat",
    "white", "whitesmoke", "yellow", "yellowgreen",
];

/// Whether a literal parses as a CSS color. Aliases are accepted as-is.
pub fn is_valid_color(value: &str) -> bool {
    let value = value.trim();
    if is_alias(value) {
        return true;
    }

    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 4 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }

    let lower = value.to_ascii_lowercase();
    NAMED_COLORS.contains(&lower.as_str()) || color_function_regex().is_match(value)
}

/// `true` when every color value is usable
pub fn validate_color_values<S: AsRef<str>>(values: &[S]) -> bool {
    values.iter().all(|value| is_valid_color(value.as_ref()))
}

/// A problem that blocks saving a theme
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ThemeIssue {
    /// Key does not have the `word(-word)*` shape
    #[error("{kind} key '{key}' is invalid: use letters and digits separated by single dashes")]
    InvalidKey {
        /// Collection
        kind: TokenKind,
        /// Offending key
        key: String,
    },

    /// Key appears more than once in a collection
    #[error("{kind} key '{key}' is used more than once")]
    DuplicateKey {
        /// Collection
        kind: TokenKind,
        /// Offending key
        key: String,
    },

    /// Key is reserved
    #[error("{kind} key '{key}' is reserved")]
    ReservedKey {
        /// Collection
        kind: TokenKind,
        /// Offending key
        key: String,
    },

    /// Literal color that does not parse
    #[error("Color '{key}' has an invalid {mode} value '{value}'")]
    InvalidColor {
        /// Color key
        key: String,
        /// Color mode
        mode: String,
        /// Offending value
        value: String,
    },

    /// Default font names a font that is not in the collection
    #[error("Default font '{0}' is not defined")]
    MissingDefaultFont(String),
}

/// Key problems of one collection, in collection order
pub fn key_issues<T: Token>(tokens: &[T]) -> Vec<ThemeIssue> {
    let mut seen = HashSet::new();
    let mut issues = Vec::new();

    for token in tokens {
        let key = token.key();
        if !is_valid_key(key) {
            issues.push(ThemeIssue::InvalidKey { kind: T::KIND, key: key.to_string() });
        } else if T::KIND == TokenKind::Font && is_reserved_font_key(key) {
            issues.push(ThemeIssue::ReservedKey { kind: T::KIND, key: key.to_string() });
        }
        if !seen.insert(key) {
            issues.push(ThemeIssue::DuplicateKey { kind: T::KIND, key: key.to_string() });
        }
    }

    issues
}

/// Every problem that blocks saving the theme
pub fn validate_theme(theme: &Theme) -> Vec<ThemeIssue> {
    let mut issues = key_issues(&theme.colors);
    issues.extend(key_issues(&theme.dimensions));
    issues.extend(key_issues(&theme.borders));
    issues.extend(key_issues(&theme.fonts));

    for token in &theme.colors {
        for (mode, value) in &token.modes {
            if !value.is_empty() && !is_valid_color(value) {
                issues.push(ThemeIssue::InvalidColor {
                    key: token.key.clone(),
                    mode: mode.clone(),
                    value: value.clone(),
                });
            }
        }
    }

    if let Some(default_font) = &theme.default_font {
        if !theme.fonts.iter().any(|font| &font.key == default_font) {
            issues.push(ThemeIssue::MissingDefaultFont(default_font.clone()));
        }
    }

    if !issues.is_empty() {
        tracing::warn!("Theme has {} blocking issues", issues.len());
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ColorToken, DimensionToken, FontToken};

    #[test]
    fn test_key_format() {
        assert!(is_valid_key("button-primary"));
        assert!(is_valid_key("H1"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("button--primary"));
        assert!(!is_valid_key("-button"));
        assert!(!is_valid_key("button-"));
        assert!(!is_valid_key("button_primary"));
        assert!(!is_valid_key("button primary"));
    }

    #[test]
    fn test_validate_keys() {
        assert!(validate_keys(&["a", "b-c", "d1"]));
        assert!(!validate_keys(&["a", "b", "a"]));
        assert!(!validate_keys(&["a", "b c"]));
        assert!(validate_keys::<&str>(&[]));
        assert!(validate_keys(&["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_group_names() {
        assert!(validate_group_name("button"));
        assert!(validate_group_name("call to action"));
        assert!(validate_group_name("cta_1 "));
        assert!(!validate_group_name("Button"));
        assert!(!validate_group_name("two  spaces"));
        assert!(!validate_group_name(""));
    }

    #[test]
    fn test_color_values() {
        for value in ["#FFF", "#001C6C", "#001C6C80", "rebeccapurple", "rgb(0, 28, 108)",
            "hsla(220 100% 20% / 0.5)", "{button-primary}", "Transparent"]
        {
            assert!(is_valid_color(value), "{value}");
        }
        for value in ["#GGG", "#12345", "notacolor", "rgb(", ""] {
            assert!(!is_valid_color(value), "{value}");
        }
        assert!(validate_color_values(&["#000", "white"]));
        assert!(!validate_color_values(&["#000", "nope"]));
    }

    #[test]
    fn test_key_issues() {
        let dims = vec![
            DimensionToken::new("gap", "4px"),
            DimensionToken::new("bad key", "4px"),
            DimensionToken::new("gap", "8px"),
        ];
        let issues = key_issues(&dims);
        assert_eq!(
            issues,
            vec![
                ThemeIssue::InvalidKey { kind: TokenKind::Dimension, key: "bad key".to_string() },
                ThemeIssue::DuplicateKey { kind: TokenKind::Dimension, key: "gap".to_string() },
            ]
        );
    }

    #[test]
    fn test_validate_theme() {
        let theme = Theme {
            colors: vec![ColorToken::new("brand").with_mode("light", "blurple")],
            fonts: vec![FontToken::new("default", "Inter")],
            default_font: Some("inter".to_string()),
            ..Default::default()
        };

        let issues = validate_theme(&theme);
        assert_eq!(issues.len(), 3);
        assert!(issues.contains(&ThemeIssue::ReservedKey {
            kind: TokenKind::Font,
            key: "default".to_string()
        }));
        assert!(issues.contains(&ThemeIssue::MissingDefaultFont("inter".to_string())));
        assert_eq!(
            issues[1].to_string(),
            "Color 'brand' has an invalid light value 'blurple'"
        );

        assert!(validate_theme(&Theme::new()).is_empty());
    }
}
