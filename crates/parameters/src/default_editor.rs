//! Default value editing
//!
//! Configuration pages edit a preview of the parameter's default before saving
//! it. Unlike parameter values, an unset preview slot is removed rather than
//! holding the empty value: a default either provides a slot or it does not.

use crate::controls::ParameterConfig;
use crate::merger::{is_save_as_default_enabled, MergerConfig, ResponsiveMerger};
use crate::viewport::{self, ParamValue, SlotValue, ViewPort, Viewport};

/// Preview of a parameter default
#[derive(Debug, Clone)]
pub struct DefaultValueEditor<T> {
    saved: ResponsiveMerger<T>,
    preview: ParamValue<T>,
}

impl<T: SlotValue> DefaultValueEditor<T> {
    /// Start editing a saved default
    pub fn new(with_view_port: bool, saved: ParamValue<T>) -> Self {
        Self { preview: saved.clone(), saved: ResponsiveMerger::new(MergerConfig::new(with_view_port), saved) }
    }

    /// Start editing the default stored in a parameter configuration
    pub fn from_config(config: &ParameterConfig) -> viewport::Result<Self> {
        Ok(Self::new(config.with_view_port(), config.default_value()?))
    }

    /// Saved default
    pub fn saved(&self) -> &ParamValue<T> {
        self.saved.default_value()
    }

    /// Edited default
    pub fn preview(&self) -> &ParamValue<T> {
        &self.preview
    }

    /// Reload after the saved default changed elsewhere
    pub fn reload(&mut self, saved: ParamValue<T>) {
        self.preview = saved.clone();
        self.saved.set_default(saved);
    }

    /// Edit one slot, or the whole preview. Empty slot edits are ignored; a
    /// whole edit of a per-viewport preview goes into every slot.
    pub fn change(&mut self, value: T, viewport: Option<Viewport>) {
        self.preview = match (viewport, &self.preview) {
            (Some(viewport), previous) => {
                let mut record = match previous {
                    ParamValue::PerViewport(record) => record.clone(),
                    _ => ViewPort::new(),
                };
                if !value.is_empty() {
                    let merged = T::merge(record.get(viewport), value);
                    record.set(viewport, Some(merged));
                }
                ParamValue::PerViewport(record)
            }
            (None, ParamValue::PerViewport(record)) if value.is_empty() => ParamValue::PerViewport(record.clone()),
            (None, ParamValue::PerViewport(record)) => ParamValue::PerViewport(ViewPort::from_fn(|viewport| {
                Some(T::merge(record.get(viewport), value.clone()))
            })),
            (None, ParamValue::Scalar(previous)) => ParamValue::Scalar(T::merge(Some(previous), value)),
            (None, ParamValue::Unset) => ParamValue::Scalar(T::merge(None, value)),
        };
    }

    /// Restore one slot, or the whole preview, from the saved default
    pub fn reset(&mut self, viewport: Option<Viewport>) {
        self.preview = match viewport {
            Some(viewport) => {
                let mut record = match &self.preview {
                    ParamValue::PerViewport(record) => record.clone(),
                    _ => ViewPort::new(),
                };
                record.set(viewport, self.saved.default_slot(viewport));
                ParamValue::PerViewport(record)
            }
            None => self.saved.default_value().clone(),
        };
    }

    /// Restore every slot from the saved default
    pub fn reset_all(&mut self) {
        self.preview = ParamValue::PerViewport(ViewPort::from_fn(|viewport| self.saved.default_slot(viewport)));
    }

    /// Remove one slot, or the whole preview
    pub fn unset(&mut self, viewport: Option<Viewport>) {
        self.preview = match (viewport, &self.preview) {
            (Some(viewport), ParamValue::PerViewport(record)) => {
                let mut record = record.clone();
                record.set(viewport, None);
                ParamValue::PerViewport(record)
            }
            (Some(_), _) => ParamValue::PerViewport(ViewPort::new()),
            (None, _) => ParamValue::Unset,
        };
    }

    /// Whether the preview differs from the saved default
    pub fn is_save_as_default_enabled(&self) -> bool {
        is_save_as_default_enabled(&self.preview, self.saved.default_value())
    }

    /// Write the preview into a parameter configuration
    pub fn save(&mut self, config: &mut ParameterConfig) -> viewport::Result<()> {
        config.set_default_value(&self.preview)?;
        self.saved.set_default(self.preview.clone());
        tracing::info!("Saved parameter default ({})", self.preview.state_name());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{SpaceProperty, SpaceValue};
    use serde_json::json;

    fn saved() -> ParamValue<String> {
        ParamValue::PerViewport(ViewPort {
            desktop: Some("8px".to_string()),
            tablet: Some("4px".to_string()),
            mobile: None,
        })
    }

    #[test]
    fn test_change_and_save_enabled() {
        let mut editor = DefaultValueEditor::new(true, saved());
        assert!(!editor.is_save_as_default_enabled());

        editor.change("2px".to_string(), Some(Viewport::Mobile));
        assert!(editor.is_save_as_default_enabled());

        editor.reset(Some(Viewport::Mobile));
        assert!(!editor.is_save_as_default_enabled());
    }

    #[test]
    fn test_empty_slot_edit_is_ignored() {
        let mut editor = DefaultValueEditor::new(true, saved());
        editor.change(String::new(), Some(Viewport::Desktop));
        assert_eq!(editor.preview(), &saved());
    }

    #[test]
    fn test_unset_removes_slot() {
        let mut editor = DefaultValueEditor::new(true, saved());
        editor.unset(Some(Viewport::Tablet));
        let ParamValue::PerViewport(record) = editor.preview() else { panic!("expected per-viewport") };
        assert_eq!(record.tablet, None);
        assert_eq!(record.desktop.as_deref(), Some("8px"));

        editor.unset(None);
        assert_eq!(editor.preview(), &ParamValue::Unset);
        editor.reset_all();
        assert_eq!(editor.preview(), &saved());
    }

    #[test]
    fn test_whole_change_keeps_viewport_shape() {
        let mut editor = DefaultValueEditor::new(true, saved());
        editor.change("2px".to_string(), None);
        assert_eq!(editor.preview(), &ParamValue::PerViewport(ViewPort::broadcast(&"2px".to_string())));

        let mut editor = DefaultValueEditor::new(true, saved());
        editor.change(String::new(), None);
        assert_eq!(editor.preview(), &saved());
    }

    #[test]
    fn test_structured_change_merges() {
        let saved = ParamValue::Scalar(SpaceValue::new().with(SpaceProperty::MarginTop, "1px"));
        let mut editor = DefaultValueEditor::new(false, saved);
        editor.change(SpaceValue::new().with(SpaceProperty::MarginBottom, "2px"), None);
        let ParamValue::Scalar(value) = editor.preview() else { panic!("expected scalar") };
        assert_eq!(value.get(SpaceProperty::MarginTop), Some("1px"));
        assert_eq!(value.get(SpaceProperty::MarginBottom), Some("2px"));
    }

    #[test]
    fn test_save_writes_config() {
        let mut config = ParameterConfig { with_view_port: Some(false), ..Default::default() };
        let mut editor = DefaultValueEditor::<String>::from_config(&config).unwrap();
        assert!(!editor.is_save_as_default_enabled());

        editor.change("brand".to_string(), None);
        editor.save(&mut config).unwrap();
        assert_eq!(config.default_value, Some(json!("brand")));
        assert!(!editor.is_save_as_default_enabled());
    }
}
