//! Option lists offered by the controls

use design_tokens::{display_name, GroupClassifier, Token};
use serde::{Deserialize, Serialize};

/// Selectable option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    /// Text shown to editors
    pub label: String,
    /// Stable identity within the list
    pub key: String,
    /// Stored value
    pub value: String,
}

/// Configured option of a custom list, as stored in the parameter config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValueItem {
    /// Optional label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Option name
    pub key: String,
    /// Stored value
    pub value: String,
    /// Identity assigned by the list editor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unique_id: Option<String>,
}

impl KeyValueItem {
    /// Create an item
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into(), ..Default::default() }
    }
}

/// Source of a space control's options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlVariant {
    /// Dimension tokens of the theme
    #[default]
    Dimensions,
    /// Configured key/value pairs
    Custom,
    /// Free values with a CSS unit
    Units,
}

impl ControlVariant {
    /// Every variant, in the order offered to editors
    pub const ALL: [ControlVariant; 3] = [ControlVariant::Dimensions, ControlVariant::Custom, ControlVariant::Units];

    /// Stored name
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlVariant::Dimensions => "dimensions",
            ControlVariant::Custom => "custom",
            ControlVariant::Units => "units",
        }
    }

    /// Label shown to editors
    pub fn label(&self) -> &'static str {
        match self {
            ControlVariant::Dimensions => "Dimensions",
            ControlVariant::Custom => "Custom options",
            ControlVariant::Units => "Units",
        }
    }
}

impl std::str::FromStr for ControlVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dimensions" => Ok(ControlVariant::Dimensions),
            "custom" => Ok(ControlVariant::Custom),
            "units" => Ok(ControlVariant::Units),
            _ => Err(format!("Unknown control variant: {}", s)),
        }
    }
}

/// Tokens a control offers.
///
/// A non-empty allow-list wins over group filtering. Labels drop the selected
/// group's prefix.
pub fn filter_tokens<'t, T: Token>(
    tokens: &'t [T],
    allow_tokens: &[String],
    selected_group: Option<&str>,
    classifier: &GroupClassifier,
) -> Vec<&'t T> {
    if allow_tokens.is_empty() {
        classifier.filter(tokens, selected_group)
    } else {
        tokens
            .iter()
            .filter(|token| allow_tokens.iter().any(|allowed| allowed == token.key()))
            .collect()
    }
}

/// Options for a token collection
pub fn options_from_tokens<T: Token>(
    tokens: &[T],
    allow_tokens: &[String],
    selected_group: Option<&str>,
    classifier: &GroupClassifier,
) -> Vec<OptionItem> {
    filter_tokens(tokens, allow_tokens, selected_group, classifier)
        .into_iter()
        .map(|token| OptionItem {
            label: display_name(token.key(), selected_group),
            key: token.key().to_string(),
            value: token.key().to_string(),
        })
        .collect()
}

/// Options of a space control. Keys carry the list index so repeated values
/// stay distinct.
pub fn space_control_options<T: Token>(
    variant: ControlVariant,
    tokens: &[T],
    allow_tokens: &[String],
    selected_group: Option<&str>,
    custom: &[KeyValueItem],
    classifier: &GroupClassifier,
) -> Vec<OptionItem> {
    match variant {
        ControlVariant::Dimensions => filter_tokens(tokens, allow_tokens, selected_group, classifier)
            .into_iter()
            .enumerate()
            .map(|(index, token)| OptionItem {
                label: display_name(token.key(), selected_group),
                key: format!("{}-{}", token.key(), index),
                value: token.key().to_string(),
            })
            .collect(),
        ControlVariant::Custom => custom
            .iter()
            .enumerate()
            .map(|(index, item)| OptionItem {
                label: item.key.clone(),
                key: format!("{}-{}", item.key, index),
                value: item.value.clone(),
            })
            .collect(),
        ControlVariant::Units => Vec::new(),
    }
}

/// Options of a segmented control or a custom slider
pub fn custom_options(items: &[KeyValueItem]) -> Vec<OptionItem> {
    items
        .iter()
        .map(|item| OptionItem {
            label: item.label.clone().filter(|l| !l.is_empty()).unwrap_or_else(|| item.key.clone()),
            key: item.key.clone(),
            value: item.value.clone(),
        })
        .collect()
}

/// Placeholder for the next option of a list
pub fn add_new_option(index: usize) -> KeyValueItem {
    KeyValueItem::new(format!("option-{}", index + 1), format!("value-{}", index + 1))
}

/// Toggle one key in an allow-list.
///
/// An empty allow-list allows everything, so the first toggle allows every
/// available key except the toggled one.
pub fn toggle_allowed_token(allow_tokens: &[String], available: &[&str], key: &str) -> Vec<String> {
    if allow_tokens.is_empty() {
        return available.iter().filter(|k| **k != key).map(|k| k.to_string()).collect();
    }

    if allow_tokens.iter().any(|allowed| allowed == key) {
        allow_tokens.iter().filter(|allowed| *allowed != key).cloned().collect()
    } else {
        let mut next = allow_tokens.to_vec();
        next.push(key.to_string());
        next
    }
}

/// Drop allow-list entries that are no longer available. `None` when nothing changed.
pub fn prune_allowed_tokens(allow_tokens: &[String], available: &[&str]) -> Option<Vec<String>> {
    let pruned: Vec<String> = allow_tokens
        .iter()
        .filter(|allowed| available.contains(&allowed.as_str()))
        .cloned()
        .collect();

    if pruned.len() == allow_tokens.len() {
        None
    } else {
        tracing::debug!("Pruned {} stale allowed tokens", allow_tokens.len() - pruned.len());
        Some(pruned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use design_tokens::{DimensionToken, GroupConfig};

    fn dims(keys: &[&str]) -> Vec<DimensionToken> {
        keys.iter().map(|k| DimensionToken::new(*k, "4px")).collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_options_from_tokens_by_group() {
        let classifier = GroupClassifier::new(GroupConfig::dimensions());
        let tokens = dims(&["spacer-sm", "spacer-lg", "gap", "button-pad"]);

        let options = options_from_tokens(&tokens, &[], Some("spacer"), &classifier);
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["sm", "lg"]);
        assert_eq!(options[0].value, "spacer-sm");

        let options = options_from_tokens(&tokens, &[], None, &classifier);
        let values: Vec<&str> = options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["gap"]);
    }

    #[test]
    fn test_allow_list_wins() {
        let classifier = GroupClassifier::new(GroupConfig::dimensions());
        let tokens = dims(&["spacer-sm", "spacer-lg", "gap"]);
        let options = options_from_tokens(&tokens, &strings(&["spacer-lg", "gap"]), Some("spacer"), &classifier);
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["lg", "gap"]);
    }

    #[test]
    fn test_space_control_options() {
        let classifier = GroupClassifier::new(GroupConfig::dimensions());
        let tokens = dims(&["spacer-sm", "spacer-lg"]);

        let options = space_control_options(ControlVariant::Dimensions, &tokens, &[], Some("spacer"), &[], &classifier);
        assert_eq!(options[1].key, "spacer-lg-1");

        let custom = vec![KeyValueItem::new("Small", "4px"), KeyValueItem::new("Small", "6px")];
        let options = space_control_options(ControlVariant::Custom, &tokens, &[], None, &custom, &classifier);
        assert_eq!(options[0].key, "Small-0");
        assert_eq!(options[1].key, "Small-1");
        assert_eq!(options[1].value, "6px");

        assert!(space_control_options(ControlVariant::Units, &tokens, &[], None, &custom, &classifier).is_empty());
    }

    #[test]
    fn test_custom_options_prefer_label() {
        let mut item = KeyValueItem::new("left", "flex-start");
        item.label = Some("Left".to_string());
        let options = custom_options(&[item, KeyValueItem::new("right", "flex-end")]);
        assert_eq!(options[0].label, "Left");
        assert_eq!(options[1].label, "right");
    }

    #[test]
    fn test_add_new_option() {
        assert_eq!(add_new_option(0), KeyValueItem::new("option-1", "value-1"));
        assert_eq!(add_new_option(2).key, "option-3");
    }

    #[test]
    fn test_toggle_allowed_token() {
        let available = ["a", "b", "c"];
        assert_eq!(toggle_allowed_token(&[], &available, "b"), strings(&["a", "c"]));
        assert_eq!(toggle_allowed_token(&strings(&["a", "c"]), &available, "c"), strings(&["a"]));
        assert_eq!(toggle_allowed_token(&strings(&["a"]), &available, "b"), strings(&["a", "b"]));
    }

    #[test]
    fn test_prune_allowed_tokens() {
        assert_eq!(prune_allowed_tokens(&strings(&["a", "b"]), &["a", "b"]), None);
        assert_eq!(prune_allowed_tokens(&strings(&["a", "x"]), &["a", "b"]), Some(strings(&["a"])));
    }

    #[test]
    fn test_control_variant_names() {
        assert_eq!("custom".parse::<ControlVariant>().unwrap(), ControlVariant::Custom);
        assert!("other".parse::<ControlVariant>().is_err());
        assert_eq!(ControlVariant::default().label(), "Dimensions");
        assert_eq!(serde_json::to_string(&ControlVariant::Units).unwrap(), "\"units\"");
    }
}
