//! Stale value detection
//!
//! Stored selections can outlive the options they point at: a token gets
//! renamed, a custom option is removed, a slider switches from steps to custom
//! values. Such values are reported, never replaced, so the editor decides
//! whether to reset them.

use crate::controls::SliderType;
use crate::options::OptionItem;
use crate::viewport::{ParamValue, SliderValue, SlotValue, SpaceValue};

/// CSS units a free space value may end with
pub const UNITS: &[&str] = &["px", "%", "em", "rem", "auto", "-"];

/// Outcome of re-checking stored selections
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every selection is still offered
    Valid,
    /// Selections that are no longer offered; the value needs an explicit reset
    Unexpected(Vec<String>),
}

impl Selection {
    /// Whether the value can be edited as-is
    pub fn is_valid(&self) -> bool {
        matches!(self, Selection::Valid)
    }

    fn from_unexpected(unexpected: Vec<String>) -> Self {
        if unexpected.is_empty() {
            Selection::Valid
        } else {
            tracing::warn!("Unexpected parameter configuration: {}", unexpected.join(", "));
            Selection::Unexpected(unexpected)
        }
    }
}

/// Values of an option list
pub fn option_values(options: &[OptionItem]) -> Vec<&str> {
    options.iter().map(|option| option.value.as_str()).collect()
}

/// Re-check every selection, scalar or per slot, against the valid values
pub fn check_selections<T: SlotValue>(value: &ParamValue<T>, valid_values: &[&str]) -> Selection {
    let unexpected = value
        .selections()
        .into_iter()
        .filter(|selection| !valid_values.contains(&selection.as_str()))
        .collect();
    Selection::from_unexpected(unexpected)
}

/// Whether one slider value fits the slider configuration
pub fn is_valid_slider_value(value: &SliderValue, slider_type: SliderType, units: &str, options: &[OptionItem]) -> bool {
    if SlotValue::is_empty(value) {
        return true;
    }

    let text = value.as_text();
    if text.contains("NaN") {
        return false;
    }

    match slider_type {
        SliderType::Steps => text.contains(units),
        SliderType::Custom => options.iter().any(|option| option.value == text),
    }
}

/// Re-check a slider value
pub fn check_slider_value(
    value: &ParamValue<SliderValue>,
    slider_type: SliderType,
    units: &str,
    options: &[OptionItem],
) -> Selection {
    let mut unexpected: Vec<String> = Vec::new();
    let mut check = |slot: &SliderValue| {
        if !is_valid_slider_value(slot, slider_type, units, options) {
            unexpected.push(slot.as_text());
        }
    };

    match value {
        ParamValue::Unset => {}
        ParamValue::Scalar(slot) => check(slot),
        ParamValue::PerViewport(record) => record.iter().filter_map(|(_, slot)| slot).for_each(check),
    }
    Selection::from_unexpected(unexpected)
}

/// Whether a free space value ends with a known unit
pub fn has_unit(value: &str) -> bool {
    UNITS.iter().any(|unit| value.ends_with(unit))
}

/// Re-check a space value. Without options every property needs a unit;
/// with options every property must be one of them.
pub fn check_space_value(value: &ParamValue<SpaceValue>, options: &[OptionItem]) -> Selection {
    if !options.is_empty() {
        return check_selections(value, &option_values(options));
    }

    let unexpected = value
        .selections()
        .into_iter()
        .filter(|selection| !has_unit(selection))
        .collect();
    Selection::from_unexpected(unexpected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{SpaceProperty, ViewPort};

    fn option(value: &str) -> OptionItem {
        OptionItem { label: value.to_string(), key: value.to_string(), value: value.to_string() }
    }

    #[test]
    fn test_check_selections_per_viewport() {
        let value = ParamValue::PerViewport(ViewPort {
            desktop: Some("spacer-sm".to_string()),
            tablet: Some("spacer-old".to_string()),
            mobile: None,
        });
        assert_eq!(
            check_selections(&value, &["spacer-sm", "spacer-lg"]),
            Selection::Unexpected(vec!["spacer-old".to_string()])
        );
        assert!(check_selections(&value, &["spacer-sm", "spacer-old"]).is_valid());
        assert!(check_selections::<String>(&ParamValue::Unset, &[]).is_valid());
        assert!(check_selections(&ParamValue::Scalar(String::new()), &[]).is_valid());
    }

    #[test]
    fn test_slider_steps_need_unit() {
        assert!(is_valid_slider_value(&SliderValue::Text("4px".to_string()), SliderType::Steps, "px", &[]));
        assert!(!is_valid_slider_value(&SliderValue::Text("4rem".to_string()), SliderType::Steps, "px", &[]));
        assert!(!is_valid_slider_value(&SliderValue::Text("NaNpx".to_string()), SliderType::Steps, "px", &[]));
        assert!(is_valid_slider_value(&SliderValue::empty(), SliderType::Custom, "px", &[]));
    }

    #[test]
    fn test_slider_custom_needs_option() {
        let options = vec![option("small"), option("large")];
        let value = ParamValue::PerViewport(ViewPort {
            desktop: Some(SliderValue::Text("large".to_string())),
            tablet: Some(SliderValue::Text("medium".to_string())),
            mobile: None,
        });
        assert_eq!(
            check_slider_value(&value, SliderType::Custom, "px", &options),
            Selection::Unexpected(vec!["medium".to_string()])
        );
    }

    #[test]
    fn test_space_units() {
        let value = ParamValue::Scalar(
            SpaceValue::new()
                .with(SpaceProperty::MarginTop, "4px")
                .with(SpaceProperty::MarginLeft, "auto")
                .with(SpaceProperty::PaddingTop, "4"),
        );
        assert_eq!(check_space_value(&value, &[]), Selection::Unexpected(vec!["4".to_string()]));
        assert!(has_unit("-"));
        assert!(has_unit("50%"));
    }

    #[test]
    fn test_space_options() {
        let value = ParamValue::Scalar(SpaceValue::new().with(SpaceProperty::MarginTop, "spacer-sm"));
        assert!(check_space_value(&value, &[option("spacer-sm")]).is_valid());
        assert!(!check_space_value(&value, &[option("spacer-lg")]).is_valid());
    }
}
