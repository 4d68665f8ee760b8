//! Responsive values
//!
//! A parameter value is either a single value or one value per viewport. The
//! host stores both shapes as untyped JSON; this module turns that JSON into
//! [`ParamValue`] once, at the boundary, so the merger never has to guess the
//! shape again.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors converting host values
#[derive(Debug, Error)]
pub enum ValueShapeError {
    /// A scalar value did not match the parameter's value type
    #[error("Invalid parameter value: {0}")]
    InvalidValue(#[source] serde_json::Error),

    /// A viewport slot did not match the parameter's value type
    #[error("Invalid value for {viewport}: {source}")]
    InvalidSlot {
        /// Offending slot
        viewport: Viewport,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be serialized for the host
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for value conversions
pub type Result<T> = std::result::Result<T, ValueShapeError>;

// =============================================================================
// Viewports
// =============================================================================

/// Breakpoint a responsive slot applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    /// Desktop breakpoint
    Desktop,
    /// Tablet breakpoint
    Tablet,
    /// Mobile breakpoint
    Mobile,
}

impl Viewport {
    /// Every viewport
    pub const ALL: [Viewport; 3] = [Viewport::Desktop, Viewport::Tablet, Viewport::Mobile];

    /// Key used in stored values
    pub fn as_str(&self) -> &'static str {
        match self {
            Viewport::Desktop => "desktop",
            Viewport::Tablet => "tablet",
            Viewport::Mobile => "mobile",
        }
    }

    /// Tab label shown to editors
    pub fn tab_name(&self) -> &'static str {
        match self {
            Viewport::Desktop => "Desktop",
            Viewport::Tablet => "Tablet",
            Viewport::Mobile => "Mobile",
        }
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tab_name())
    }
}

impl std::str::FromStr for Viewport {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "desktop" => Ok(Viewport::Desktop),
            "tablet" => Ok(Viewport::Tablet),
            "mobile" => Ok(Viewport::Mobile),
            _ => Err(format!("Unknown viewport: {}", s)),
        }
    }
}

/// One optional value per viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewPort<T> {
    /// Desktop slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desktop: Option<T>,
    /// Tablet slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<T>,
    /// Mobile slot
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<T>,
}

impl<T> Default for ViewPort<T> {
    fn default() -> Self {
        Self { desktop: None, tablet: None, mobile: None }
    }
}

impl<T> ViewPort<T> {
    /// Empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record slot by slot
    pub fn from_fn(mut slot: impl FnMut(Viewport) -> Option<T>) -> Self {
        Self {
            desktop: slot(Viewport::Desktop),
            tablet: slot(Viewport::Tablet),
            mobile: slot(Viewport::Mobile),
        }
    }

    /// Slot value
    pub fn get(&self, viewport: Viewport) -> Option<&T> {
        match viewport {
            Viewport::Desktop => self.desktop.as_ref(),
            Viewport::Tablet => self.tablet.as_ref(),
            Viewport::Mobile => self.mobile.as_ref(),
        }
    }

    /// Mutable slot
    pub fn slot_mut(&mut self, viewport: Viewport) -> &mut Option<T> {
        match viewport {
            Viewport::Desktop => &mut self.desktop,
            Viewport::Tablet => &mut self.tablet,
            Viewport::Mobile => &mut self.mobile,
        }
    }

    /// Replace a slot
    pub fn set(&mut self, viewport: Viewport, value: Option<T>) {
        *self.slot_mut(viewport) = value;
    }

    /// Slots in desktop, tablet, mobile order
    pub fn iter(&self) -> impl Iterator<Item = (Viewport, Option<&T>)> {
        Viewport::ALL.into_iter().map(move |viewport| (viewport, self.get(viewport)))
    }

    /// Whether no slot holds a value
    pub fn is_empty(&self) -> bool {
        self.desktop.is_none() && self.tablet.is_none() && self.mobile.is_none()
    }
}

impl<T: Clone> ViewPort<T> {
    /// The same value in every slot
    pub fn broadcast(value: &T) -> Self {
        Self::from_fn(|_| Some(value.clone()))
    }
}

// =============================================================================
// Slot Values
// =============================================================================

/// A value type a parameter can store, alone or per viewport
pub trait SlotValue: Clone + PartialEq + std::fmt::Debug + Serialize + DeserializeOwned {
    /// The cleared value: `""` for simple values, `{}` for structured ones
    fn empty() -> Self;

    /// Whether the value is cleared
    fn is_empty(&self) -> bool;

    /// Combine an edit with the previous value. Simple values are replaced.
    fn merge(previous: Option<&Self>, next: Self) -> Self {
        let _ = previous;
        next
    }

    /// Option values this value selects, for stale-value checks
    fn selections(&self) -> Vec<String>;
}

impl SlotValue for String {
    fn empty() -> Self {
        String::new()
    }

    fn is_empty(&self) -> bool {
        str::is_empty(self)
    }

    fn selections(&self) -> Vec<String> {
        if str::is_empty(self) {
            Vec::new()
        } else {
            vec![self.clone()]
        }
    }
}

/// Slider value: a number of steps or a text value (`8px`, an option value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SliderValue {
    /// Numeric value
    Number(f64),
    /// Text value
    Text(String),
}

impl SliderValue {
    /// Value as text
    pub fn as_text(&self) -> String {
        match self {
            SliderValue::Number(n) => n.to_string(),
            SliderValue::Text(s) => s.clone(),
        }
    }
}

impl SlotValue for SliderValue {
    fn empty() -> Self {
        SliderValue::Text(String::new())
    }

    fn is_empty(&self) -> bool {
        matches!(self, SliderValue::Text(s) if s.is_empty())
    }

    fn selections(&self) -> Vec<String> {
        if SlotValue::is_empty(self) {
            Vec::new()
        } else {
            vec![self.as_text()]
        }
    }
}

/// Individually editable sides of a space control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpaceProperty {
    /// `marginTop`
    MarginTop,
    /// `marginRight`
    MarginRight,
    /// `marginBottom`
    MarginBottom,
    /// `marginLeft`
    MarginLeft,
    /// `paddingTop`
    PaddingTop,
    /// `paddingRight`
    PaddingRight,
    /// `paddingBottom`
    PaddingBottom,
    /// `paddingLeft`
    PaddingLeft,
}

impl SpaceProperty {
    /// Every property
    pub const ALL: [SpaceProperty; 8] = [
        SpaceProperty::MarginTop,
        SpaceProperty::MarginRight,
        SpaceProperty::MarginBottom,
        SpaceProperty::MarginLeft,
        SpaceProperty::PaddingTop,
        SpaceProperty::PaddingRight,
        SpaceProperty::PaddingBottom,
        SpaceProperty::PaddingLeft,
    ];

    /// Stored property name
    pub fn as_str(&self) -> &'static str {
        match self {
            SpaceProperty::MarginTop => "marginTop",
            SpaceProperty::MarginRight => "marginRight",
            SpaceProperty::MarginBottom => "marginBottom",
            SpaceProperty::MarginLeft => "marginLeft",
            SpaceProperty::PaddingTop => "paddingTop",
            SpaceProperty::PaddingRight => "paddingRight",
            SpaceProperty::PaddingBottom => "paddingBottom",
            SpaceProperty::PaddingLeft => "paddingLeft",
        }
    }
}

/// Margin and padding values of a space control, keyed by property name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpaceValue(pub BTreeMap<String, String>);

impl SpaceValue {
    /// Empty value
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one property
    pub fn with(mut self, property: SpaceProperty, value: impl Into<String>) -> Self {
        self.0.insert(property.as_str().to_string(), value.into());
        self
    }

    /// Value of one property
    pub fn get(&self, property: SpaceProperty) -> Option<&str> {
        self.0.get(property.as_str()).map(String::as_str)
    }
}

impl SlotValue for SpaceValue {
    fn empty() -> Self {
        SpaceValue::default()
    }

    fn is_empty(&self) -> bool {
        self.0.values().all(String::is_empty)
    }

    /// Properties left out of `next` keep their previous non-empty value;
    /// properties set to an empty value in `next` are removed.
    fn merge(previous: Option<&Self>, next: Self) -> Self {
        let mut merged: BTreeMap<String, String> = previous
            .map(|prev| {
                prev.0
                    .iter()
                    .filter(|(key, value)| !value.is_empty() && !next.0.contains_key(*key))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        merged.extend(next.0.into_iter().filter(|(_, value)| !value.is_empty()));
        SpaceValue(merged)
    }

    fn selections(&self) -> Vec<String> {
        self.0.values().filter(|v| !v.is_empty()).cloned().collect()
    }
}

// =============================================================================
// Parameter Values
// =============================================================================

/// Stored value of a parameter
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ParamValue<T> {
    /// Nothing stored
    #[default]
    Unset,
    /// Single value for every viewport
    Scalar(T),
    /// One value per viewport
    PerViewport(ViewPort<T>),
}

fn is_viewport_record(map: &serde_json::Map<String, Value>) -> bool {
    !map.is_empty() && map.keys().all(|key| key.parse::<Viewport>().is_ok())
}

impl<T: SlotValue> ParamValue<T> {
    /// Convert a host value.
    ///
    /// `null`/absent is [`ParamValue::Unset`]. A non-empty object whose keys are
    /// all viewport names is per-viewport. `{}` is a cleared structured value
    /// when the value type accepts it, otherwise an empty per-viewport record.
    pub fn from_host(value: Option<&Value>) -> Result<Self> {
        let value = match value {
            None | Some(Value::Null) => return Ok(ParamValue::Unset),
            Some(value) => value,
        };

        if let Value::Object(map) = value {
            if is_viewport_record(map) {
                let mut record = ViewPort::new();
                for (key, slot) in map {
                    let Ok(viewport) = key.parse::<Viewport>() else { continue };
                    if slot.is_null() {
                        continue;
                    }
                    let parsed = T::deserialize(slot)
                        .map_err(|source| ValueShapeError::InvalidSlot { viewport, source })?;
                    record.set(viewport, Some(parsed));
                }
                return Ok(ParamValue::PerViewport(record));
            }

            if map.is_empty() {
                return Ok(match T::deserialize(value) {
                    Ok(empty) => ParamValue::Scalar(empty),
                    Err(_) => ParamValue::PerViewport(ViewPort::new()),
                });
            }
        }

        T::deserialize(value)
            .map(ParamValue::Scalar)
            .map_err(ValueShapeError::InvalidValue)
    }

    /// Convert back to the host representation
    pub fn to_host(&self) -> Result<Option<Value>> {
        Ok(match self {
            ParamValue::Unset => None,
            ParamValue::Scalar(value) => Some(serde_json::to_value(value)?),
            ParamValue::PerViewport(record) => Some(serde_json::to_value(record)?),
        })
    }

    /// Nothing stored, or a cleared scalar
    pub fn is_absent(&self) -> bool {
        match self {
            ParamValue::Unset => true,
            ParamValue::Scalar(value) => value.is_empty(),
            ParamValue::PerViewport(_) => false,
        }
    }

    /// Equality of the host representations
    pub fn structurally_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ParamValue::Scalar(a), ParamValue::Scalar(b)) => a == b,
            _ => match (self.to_host(), other.to_host()) {
                (Ok(a), Ok(b)) => a == b,
                _ => false,
            },
        }
    }

    /// Every non-empty selection, scalar or per slot
    pub fn selections(&self) -> Vec<String> {
        let mut selections: Vec<String> = Vec::new();
        let mut push = |value: &T| {
            for selection in value.selections() {
                if !selections.contains(&selection) {
                    selections.push(selection);
                }
            }
        };

        match self {
            ParamValue::Unset => {}
            ParamValue::Scalar(value) => push(value),
            ParamValue::PerViewport(record) => {
                for (_, slot) in record.iter() {
                    if let Some(value) = slot {
                        push(value);
                    }
                }
            }
        }
        selections
    }

    /// Short state name for logs
    pub fn state_name(&self) -> &'static str {
        match self {
            ParamValue::Unset => "unset",
            ParamValue::Scalar(_) => "scalar",
            ParamValue::PerViewport(_) => "per-viewport",
        }
    }
}
