//! Parameter editing sessions
//!
//! A session owns the value of one parameter while it is being edited. Every
//! editor action goes through the host's value channel as a reducer: the
//! previous value goes in, the new value and an optional validation result come
//! out. The last write wins.

use serde::Serialize;
use serde_json::Value;

use crate::controls::{ParameterConfig, ParameterKind};
use crate::merger::ResponsiveMerger;
use crate::validation::{validate_required, ValidationResult};
use crate::viewport::{self, ParamValue, SlotValue, Viewport};

/// Editor action on a parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction<T> {
    /// Edit one slot, or the whole value
    Set {
        /// Slot to edit; `None` edits the whole value
        viewport: Option<Viewport>,
        /// Edited value
        value: T,
    },
    /// Restore one slot, or the whole value, from the default
    ResetToDefault(Option<Viewport>),
    /// Restore every slot from the default
    ResetAll,
    /// Store the empty value in one slot, or clear the whole value
    Unset(Option<Viewport>),
    /// Remove the stored value
    Clear,
}

/// Result of a reducer passed to the host
#[derive(Debug, Clone, PartialEq)]
pub struct ValueUpdate<T> {
    /// Value to store
    pub new_value: ParamValue<T>,
    /// Validation for required parameters
    pub validation: Option<ValidationResult>,
}

/// [`ValueUpdate`] in the host's JSON shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostUpdate {
    /// Value to store; absent clears the parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
    /// Validation result
    #[serde(rename = "options", skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
}

impl<T: SlotValue> ValueUpdate<T> {
    /// Convert for the host
    pub fn to_host(&self) -> viewport::Result<HostUpdate> {
        Ok(HostUpdate { new_value: self.new_value.to_host()?, validation: self.validation.clone() })
    }
}

/// Editing session of one parameter
#[derive(Debug, Clone)]
pub struct ParameterSession<T> {
    kind: ParameterKind,
    merger: ResponsiveMerger<T>,
    value: ParamValue<T>,
    required: bool,
    mounted_with_view_port: Option<bool>,
}

impl<T: SlotValue> ParameterSession<T> {
    /// Create a session from the stored configuration and value
    pub fn new(kind: ParameterKind, config: &ParameterConfig, value: ParamValue<T>) -> viewport::Result<Self> {
        let default = config.default_value()?;
        Ok(Self {
            kind,
            merger: ResponsiveMerger::new(config.merger_config(), default),
            value,
            required: config.is_required(),
            mounted_with_view_port: None,
        })
    }

    /// Create a session from the host's untyped value
    pub fn from_host(kind: ParameterKind, config: &ParameterConfig, value: Option<&Value>) -> viewport::Result<Self> {
        Self::new(kind, config, ParamValue::from_host(value)?)
    }

    /// Parameter type
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// Current value
    pub fn value(&self) -> &ParamValue<T> {
        &self.value
    }

    /// Current value in the host's shape
    pub fn to_host(&self) -> viewport::Result<Option<Value>> {
        self.value.to_host()
    }

    /// Merger bound to this parameter
    pub fn merger(&self) -> &ResponsiveMerger<T> {
        &self.merger
    }

    /// Validation for a value when the parameter is required
    pub fn validate(&self, value: &ParamValue<T>) -> Option<ValidationResult> {
        self.required
            .then(|| validate_required(value, self.kind.control_name(), &self.merger.config().tab_order))
    }

    /// Normalize the value for the viewport mode.
    ///
    /// Runs only when the mode differs from the last mount, so remounting with
    /// the same mode leaves the value alone. Returns the update sent to the host.
    pub fn mount(&mut self, with_view_port: bool) -> Option<ValueUpdate<T>> {
        if self.mounted_with_view_port == Some(with_view_port) {
            return None;
        }
        self.mounted_with_view_port = Some(with_view_port);
        self.merger.set_with_view_port(with_view_port && self.kind.supports_view_port());

        tracing::debug!(
            "Mounting {} with view port {}",
            self.kind.type_id(),
            with_view_port
        );
        Some(self.update(|merger, previous| merger.normalize(previous)))
    }

    /// Apply a reducer to the current value
    pub fn update<F>(&mut self, reducer: F) -> ValueUpdate<T>
    where
        F: FnOnce(&ResponsiveMerger<T>, &ParamValue<T>) -> ParamValue<T>,
    {
        let new_value = reducer(&self.merger, &self.value);
        let validation = self.validate(&new_value);
        self.value = new_value.clone();
        ValueUpdate { new_value, validation }
    }

    /// Apply an editor action
    pub fn apply(&mut self, action: EditorAction<T>) -> ValueUpdate<T> {
        self.update(|merger, previous| match action {
            EditorAction::Set { viewport, value } => merger.set(previous, viewport, value),
            EditorAction::ResetToDefault(viewport) => merger.reset_to_default(previous, viewport),
            EditorAction::ResetAll => merger.reset_all(),
            EditorAction::Unset(viewport) => merger.unset(previous, viewport),
            EditorAction::Clear => merger.clear(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{SpaceProperty, SpaceValue, ViewPort};
    use serde_json::json;

    fn config(value: Value) -> ParameterConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_mount_normalizes_once_per_mode() {
        let config = config(json!({"withViewPort": true, "defaultValue": {"desktop": "8px", "tablet": "8px", "mobile": "8px"}}));
        let mut session =
            ParameterSession::<String>::from_host(ParameterKind::SegmentedControl, &config, Some(&json!("10px"))).unwrap();

        let update = session.mount(true).unwrap();
        assert_eq!(update.new_value, ParamValue::PerViewport(ViewPort::broadcast(&"10px".to_string())));
        assert!(session.mount(true).is_none());

        let update = session.mount(false).unwrap();
        assert_eq!(update.new_value, ParamValue::Scalar("10px".to_string()));
    }

    #[test]
    fn test_required_validation_on_each_update() {
        let config = config(json!({"withViewPort": true, "required": true}));
        let mut session =
            ParameterSession::<SpaceValue>::new(ParameterKind::SpaceControl, &config, ParamValue::Unset).unwrap();
        session.mount(true);

        let update = session.apply(EditorAction::Set {
            viewport: Some(Viewport::Mobile),
            value: SpaceValue::new().with(SpaceProperty::MarginTop, "4px"),
        });
        let validation = update.validation.unwrap();
        assert!(!validation.is_valid);
        assert_eq!(
            validation.message.as_deref(),
            Some("The Space Control value for Tablet must be selected")
        );
    }

    #[test]
    fn test_apply_actions() {
        let config = config(json!({"withViewPort": true, "defaultValue": {"desktop": "a", "tablet": "b", "mobile": "c"}}));
        let mut session = ParameterSession::<String>::new(ParameterKind::Slider, &config, ParamValue::Unset).unwrap();
        session.mount(true);

        session.apply(EditorAction::Set { viewport: Some(Viewport::Tablet), value: "x".to_string() });
        session.apply(EditorAction::Unset(Some(Viewport::Tablet)));
        let update = session.apply(EditorAction::ResetToDefault(Some(Viewport::Tablet)));
        let ParamValue::PerViewport(record) = update.new_value else { panic!("expected per-viewport") };
        assert_eq!(record.tablet.as_deref(), Some("b"));
        assert!(update.validation.is_none());

        session.apply(EditorAction::Clear);
        assert_eq!(session.value(), &ParamValue::Unset);
        assert_eq!(session.to_host().unwrap(), None);
    }

    #[test]
    fn test_color_palette_ignores_view_port() {
        let mut session =
            ParameterSession::<String>::new(ParameterKind::ColorPalette, &ParameterConfig::default(), ParamValue::Scalar("brand".to_string()))
                .unwrap();
        let update = session.mount(true).unwrap();
        assert_eq!(update.new_value, ParamValue::Scalar("brand".to_string()));
    }

    #[test]
    fn test_host_update_shape() {
        let update = ValueUpdate {
            new_value: ParamValue::Scalar("a".to_string()),
            validation: Some(ValidationResult::valid()),
        };
        assert_eq!(
            serde_json::to_value(update.to_host().unwrap()).unwrap(),
            json!({"newValue": "a", "options": {"isValid": true}})
        );
    }
}
