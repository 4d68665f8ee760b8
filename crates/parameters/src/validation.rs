//! Option list and required-value validation
//!
//! Results are plain values handed back to the host; nothing here fails.

use serde::{Deserialize, Serialize};

use crate::options::KeyValueItem;
use crate::viewport::{ParamValue, SlotValue, Viewport};

/// Message for an option without a value
pub const VALUE_REQUIRED: &str = "Value is required";

/// Message for an option whose value is repeated
pub const VALUES_MUST_BE_UNIQUE: &str = "Values must be unique";

/// Validation outcome reported to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Whether the value may be saved
    pub is_valid: bool,
    /// Reason shown when invalid
    #[serde(rename = "validationMessage", default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResult {
    /// Valid result
    pub fn valid() -> Self {
        Self { is_valid: true, message: None }
    }

    /// Invalid result with a message
    pub fn invalid(message: impl Into<String>) -> Self {
        Self { is_valid: false, message: Some(message.into()) }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

/// Error for one option of a list, positioned like the option
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionError {
    /// Key error; empty when the key is fine
    pub key: String,
    /// Value error
    pub value: String,
}

impl OptionError {
    fn value(message: &str) -> Self {
        Self { key: String::new(), value: message.to_string() }
    }
}

/// Errors for an option list, one entry per option
pub fn validate_options(options: &[KeyValueItem]) -> Vec<Option<OptionError>> {
    options
        .iter()
        .map(|option| {
            if option.value.is_empty() {
                return Some(OptionError::value(VALUE_REQUIRED));
            }
            let occurrences = options.iter().filter(|o| o.value == option.value).count();
            if occurrences > 1 {
                return Some(OptionError::value(VALUES_MUST_BE_UNIQUE));
            }
            None
        })
        .collect()
}

/// Whether an option list can be saved
pub fn has_option_errors(errors: &[Option<OptionError>]) -> bool {
    errors.iter().any(Option::is_some)
}

/// Required-value check for a control.
///
/// A single value must not be empty. A per-viewport value needs every slot;
/// the first empty slot in `tab_order` is reported.
pub fn validate_required<T: SlotValue>(
    value: &ParamValue<T>,
    control_name: &str,
    tab_order: &[Viewport],
) -> ValidationResult {
    match value {
        ParamValue::Unset => ValidationResult::invalid(format!("The {} value must be selected", control_name)),
        ParamValue::Scalar(value) if value.is_empty() => {
            ValidationResult::invalid(format!("The {} value must be selected", control_name))
        }
        ParamValue::Scalar(_) => ValidationResult::valid(),
        ParamValue::PerViewport(record) => {
            let missing = tab_order
                .iter()
                .find(|viewport| record.get(**viewport).map_or(true, SlotValue::is_empty));
            match missing {
                Some(viewport) => ValidationResult::invalid(format!(
                    "The {} value for {} must be selected",
                    control_name,
                    viewport.tab_name()
                )),
                None => ValidationResult::valid(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{SpaceProperty, SpaceValue, ViewPort};

    const TABS: [Viewport; 3] = [Viewport::Mobile, Viewport::Tablet, Viewport::Desktop];

    #[test]
    fn test_validate_options_duplicates() {
        let errors = validate_options(&[KeyValueItem::new("a", "x"), KeyValueItem::new("b", "x")]);
        let expected = Some(OptionError { key: String::new(), value: "Values must be unique".to_string() });
        assert_eq!(errors, vec![expected.clone(), expected]);
        assert!(has_option_errors(&errors));
    }

    #[test]
    fn test_validate_options_required() {
        let errors = validate_options(&[
            KeyValueItem::new("a", ""),
            KeyValueItem::new("b", "y"),
            KeyValueItem::new("c", ""),
        ]);
        assert_eq!(errors[0].as_ref().map(|e| e.value.as_str()), Some(VALUE_REQUIRED));
        assert_eq!(errors[1], None);
        assert_eq!(errors[2].as_ref().map(|e| e.value.as_str()), Some(VALUE_REQUIRED));

        assert!(!has_option_errors(&validate_options(&[KeyValueItem::new("a", "1")])));
        assert!(validate_options(&[]).is_empty());
    }

    #[test]
    fn test_required_scalar() {
        let result = validate_required(&ParamValue::Scalar(String::new()), "Segmented Control", &TABS);
        assert_eq!(result, ValidationResult::invalid("The Segmented Control value must be selected"));
        assert!(validate_required(&ParamValue::Scalar("a".to_string()), "Segmented Control", &TABS).is_valid);
        assert!(!validate_required::<String>(&ParamValue::Unset, "Segmented Control", &TABS).is_valid);
    }

    #[test]
    fn test_required_reports_first_empty_tab() {
        let value = ParamValue::PerViewport(ViewPort {
            desktop: None,
            tablet: Some(SpaceValue::new()),
            mobile: Some(SpaceValue::new().with(SpaceProperty::MarginTop, "1px")),
        });
        let result = validate_required(&value, "Space Control", &TABS);
        assert_eq!(result.message.as_deref(), Some("The Space Control value for Tablet must be selected"));

        let full = ParamValue::PerViewport(ViewPort::broadcast(&"a".to_string()));
        assert_eq!(validate_required(&full, "Segmented Control", &TABS), ValidationResult::valid());
    }

    #[test]
    fn test_validation_result_serialization() {
        let json = serde_json::to_value(ValidationResult::invalid("nope")).unwrap();
        assert_eq!(json, serde_json::json!({"isValid": false, "validationMessage": "nope"}));
        let json = serde_json::to_value(ValidationResult::valid()).unwrap();
        assert_eq!(json, serde_json::json!({"isValid": true}));
    }
}
