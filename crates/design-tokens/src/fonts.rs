//! Font tokens
//!
//! Fonts are either Google fonts (the value holds the family spec, e.g.
//! `Open Sans:wght@400;700`) or custom fonts supplied by the site (empty value).
//! Early themes stored fonts as plain strings, Google fonts marked with a `_GF_`
//! suffix; those entries are upgraded when a theme is read.

use serde::{Deserialize, Deserializer};

use crate::model::FontToken;

/// Suffix marking a Google font in legacy string entries
pub const GF_SUFFIX: &str = "_GF_";

/// Font keys that can never be used for a token
pub const RESERVED_FONT_KEYS: &[&str] = &["default"];

/// Google Fonts stylesheet URL for a family spec
pub fn font_url(font: &str) -> String {
    format!(
        "https://fonts.googleapis.com/css2?family={}&display=swap",
        font.replace(' ', "+")
    )
}

/// Family name of a family spec (text before the first `:`)
pub fn font_family_name(font: &str) -> &str {
    font.split(':').next().unwrap_or(font)
}

/// Token key derived from a family spec
pub fn font_key(font: &str) -> String {
    font_family_name(font).to_lowercase().replace(' ', "-")
}

/// Upgrade a legacy string entry to a token
pub fn upgrade_legacy_font(value: &str) -> FontToken {
    FontToken {
        key: font_key(value),
        value: if value.ends_with(GF_SUFFIX) {
            value.replace(GF_SUFFIX, "")
        } else {
            String::new()
        },
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredFont {
    Token(FontToken),
    Legacy(String),
}

/// Deserialize a font collection that may mix tokens and legacy strings
pub fn deserialize_fonts<'de, D>(deserializer: D) -> Result<Vec<FontToken>, D::Error>
where
    D: Deserializer<'de>,
{
    let stored = Option::<Vec<StoredFont>>::deserialize(deserializer)?;
    Ok(stored
        .unwrap_or_default()
        .into_iter()
        .map(|font| match font {
            StoredFont::Token(token) => token,
            StoredFont::Legacy(value) => upgrade_legacy_font(&value),
        })
        .collect())
}

/// Position of a font key in the collection
pub fn index_of_font(font_key: Option<&str>, fonts: &[FontToken]) -> Option<usize> {
    let key = font_key?;
    fonts.iter().position(|font| font.key == key)
}

/// Font key at a position
pub fn font_at(index: Option<usize>, fonts: &[FontToken]) -> Option<&str> {
    index.and_then(|i| fonts.get(i)).map(|font| font.key.as_str())
}

/// Whether a font key is reserved
pub fn is_reserved_font_key(key: &str) -> bool {
    RESERVED_FONT_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Theme;
    use serde_json::json;

    #[test]
    fn test_font_url() {
        assert_eq!(
            font_url("Open Sans:wght@400"),
            "https://fonts.googleapis.com/css2?family=Open+Sans:wght@400&display=swap"
        );
    }

    #[test]
    fn test_font_key_and_family() {
        assert_eq!(font_family_name("Open Sans:wght@400;700"), "Open Sans");
        assert_eq!(font_family_name("Roboto"), "Roboto");
        assert_eq!(font_key("Open Sans:wght@400;700"), "open-sans");
    }

    #[test]
    fn test_upgrade_legacy_font() {
        let google = upgrade_legacy_font("Open Sans_GF_");
        assert_eq!(google.key, "open-sans_gf_");
        assert_eq!(google.value, "Open Sans");

        let custom = upgrade_legacy_font("Brand Serif");
        assert_eq!(custom.key, "brand-serif");
        assert!(custom.is_custom());
    }

    #[test]
    fn test_theme_reads_mixed_fonts() {
        let theme: Theme = serde_json::from_value(json!({
            "fonts": ["Brand Serif", {"fontKey": "inter", "value": "Inter"}],
            "defaultFont": "inter"
        }))
        .unwrap();

        assert_eq!(theme.font_keys(), vec!["brand-serif", "inter"]);
        assert_eq!(index_of_font(theme.default_font.as_deref(), &theme.fonts), Some(1));
        assert_eq!(font_at(Some(0), &theme.fonts), Some("brand-serif"));
        assert_eq!(font_at(Some(5), &theme.fonts), None);
        assert_eq!(index_of_font(None, &theme.fonts), None);
    }

    #[test]
    fn test_null_fonts_read_as_empty() {
        let theme: Theme = serde_json::from_value(json!({"fonts": null})).unwrap();
        assert!(theme.fonts.is_empty());
    }

    #[test]
    fn test_reserved_keys() {
        assert!(is_reserved_font_key("default"));
        assert!(!is_reserved_font_key("inter"));
    }
}
