//! Responsive value merger
//!
//! Every responsive control shares the same transitions between the
//! [`ParamValue`] states. The merger holds the parameter's configured default and
//! turns each editor action into a new value; it never mutates its input and
//! never drops a viewport slot it was not asked to touch.

use crate::viewport::{ParamValue, SlotValue, ViewPort, Viewport};

/// Merger configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergerConfig {
    /// Whether the parameter stores one value per viewport
    pub with_view_port: bool,
    /// Slot kept when a per-viewport value collapses to a single value
    pub canonical_viewport: Viewport,
    /// Order viewport tabs are presented and validated in
    pub tab_order: [Viewport; 3],
}

impl Default for MergerConfig {
    fn default() -> Self {
        Self {
            with_view_port: false,
            canonical_viewport: Viewport::Desktop,
            tab_order: [Viewport::Mobile, Viewport::Tablet, Viewport::Desktop],
        }
    }
}

impl MergerConfig {
    /// Create a configuration
    pub fn new(with_view_port: bool) -> Self {
        Self { with_view_port, ..Default::default() }
    }

    /// Set the collapse slot
    pub fn canonical_viewport(mut self, viewport: Viewport) -> Self {
        self.canonical_viewport = viewport;
        self
    }

    /// Set the tab order
    pub fn tab_order(mut self, order: [Viewport; 3]) -> Self {
        self.tab_order = order;
        self
    }
}

/// Reducers over one parameter's value and default
#[derive(Debug, Clone)]
pub struct ResponsiveMerger<T> {
    config: MergerConfig,
    default: ParamValue<T>,
}

impl<T: SlotValue> ResponsiveMerger<T> {
    /// Create a merger for a parameter default
    pub fn new(config: MergerConfig, default: ParamValue<T>) -> Self {
        Self { config, default }
    }

    /// Get the configuration
    pub fn config(&self) -> &MergerConfig {
        &self.config
    }

    /// Configured default
    pub fn default_value(&self) -> &ParamValue<T> {
        &self.default
    }

    /// Replace the configured default
    pub fn set_default(&mut self, default: ParamValue<T>) {
        self.default = default;
    }

    /// Switch the viewport mode; the caller normalizes afterwards
    pub fn set_with_view_port(&mut self, with_view_port: bool) {
        self.config.with_view_port = with_view_port;
    }

    /// Default for one slot: the slot itself, or the whole scalar default
    pub fn default_slot(&self, viewport: Viewport) -> Option<T> {
        match &self.default {
            ParamValue::Unset => None,
            ParamValue::Scalar(value) => Some(value.clone()),
            ParamValue::PerViewport(record) => record.get(viewport).cloned(),
        }
    }

    /// Default as a single value, collapsing a per-viewport default
    pub fn default_scalar(&self) -> Option<T> {
        match &self.default {
            ParamValue::Unset => None,
            ParamValue::Scalar(value) => Some(value.clone()),
            ParamValue::PerViewport(record) => record.get(self.config.canonical_viewport).cloned(),
        }
    }

    /// Default spread over every slot
    fn default_record(&self) -> ViewPort<T> {
        ViewPort::from_fn(|viewport| self.default_slot(viewport))
    }

    /// Previous value as a per-viewport record, broadcasting a single value
    fn as_record(&self, previous: &ParamValue<T>) -> ViewPort<T> {
        match previous {
            ParamValue::Unset => ViewPort::new(),
            ParamValue::Scalar(value) => ViewPort::broadcast(value),
            ParamValue::PerViewport(record) => record.clone(),
        }
    }

    /// Bring a value into the shape the viewport mode expects.
    ///
    /// With viewports, a single value is broadcast and a missing value takes the
    /// default's slots. Without, a per-viewport value collapses to the canonical
    /// slot, or to the default when that slot is empty. Applying it twice changes
    /// nothing.
    pub fn normalize(&self, value: &ParamValue<T>) -> ParamValue<T> {
        let normalized = match (self.config.with_view_port, value) {
            (true, ParamValue::Scalar(scalar)) => ParamValue::PerViewport(ViewPort::broadcast(scalar)),
            (true, ParamValue::Unset) => {
                let record = self.default_record();
                if record.is_empty() {
                    ParamValue::Unset
                } else {
                    ParamValue::PerViewport(record)
                }
            }
            (false, ParamValue::PerViewport(record)) => {
                match record.get(self.config.canonical_viewport).cloned().or_else(|| self.default_scalar()) {
                    Some(scalar) => ParamValue::Scalar(scalar),
                    None => ParamValue::Unset,
                }
            }
            (_, value) => value.clone(),
        };

        if normalized.state_name() != value.state_name() {
            tracing::debug!(
                "Normalized parameter value from {} to {}",
                value.state_name(),
                normalized.state_name()
            );
        }
        normalized
    }

    /// Apply an edit, to one slot or to the whole value
    pub fn set(&self, previous: &ParamValue<T>, viewport: Option<Viewport>, next: T) -> ParamValue<T> {
        match (viewport, previous) {
            (Some(viewport), previous) => {
                let mut record = self.as_record(previous);
                let merged = T::merge(record.get(viewport), next);
                record.set(viewport, Some(merged));
                ParamValue::PerViewport(record)
            }
            (None, ParamValue::Unset) => ParamValue::Scalar(T::merge(None, next)),
            (None, ParamValue::Scalar(value)) => ParamValue::Scalar(T::merge(Some(value), next)),
            (None, ParamValue::PerViewport(record)) => ParamValue::PerViewport(ViewPort::from_fn(|viewport| {
                Some(T::merge(record.get(viewport), next.clone()))
            })),
        }
    }

    /// Restore one slot, or the whole value, from the default
    pub fn reset_to_default(&self, previous: &ParamValue<T>, viewport: Option<Viewport>) -> ParamValue<T> {
        match viewport {
            Some(viewport) => {
                let mut record = self.as_record(previous);
                record.set(viewport, self.default_slot(viewport));
                ParamValue::PerViewport(record)
            }
            None => self.default.clone(),
        }
    }

    /// Every slot from the default
    pub fn reset_all(&self) -> ParamValue<T> {
        if self.config.with_view_port {
            ParamValue::PerViewport(self.default_record())
        } else {
            self.default.clone()
        }
    }

    /// Store the empty value in one slot, or clear the whole value.
    ///
    /// An unset slot holds the empty value, which is not the same as a slot with
    /// no value: rendering does not fall back to the default for it.
    pub fn unset(&self, previous: &ParamValue<T>, viewport: Option<Viewport>) -> ParamValue<T> {
        match viewport {
            Some(viewport) => {
                let mut record = self.as_record(previous);
                record.set(viewport, Some(T::empty()));
                ParamValue::PerViewport(record)
            }
            None => ParamValue::Scalar(T::empty()),
        }
    }

    /// Remove the stored value
    pub fn clear(&self) -> ParamValue<T> {
        ParamValue::Unset
    }
}

/// Whether an edited default differs from the saved one.
///
/// `false` when both are missing or empty, or when their host representations
/// are equal.
pub fn is_save_as_default_enabled<T: SlotValue>(preview: &ParamValue<T>, default: &ParamValue<T>) -> bool {
    if preview.is_absent() && default.is_absent() {
        return false;
    }
    !preview.structurally_eq(default)
}
