//! Parameter controls for Design Extensions
//!
//! Every control stores either a single value or one value per viewport
//! (desktop, tablet, mobile) and shares the same editing transitions against a
//! configured default.
//!
//! # Modules
//!
//! - [`viewport`] - Viewports, the tagged responsive value and host conversion
//! - [`merger`] - Normalize, set, reset and unset reducers
//! - [`session`] - Editing session bound to the host value channel
//! - [`default_editor`] - Preview editor for parameter defaults
//! - [`options`] - Option lists offered by the controls
//! - [`stale`] - Detection of selections that are no longer offered
//! - [`validation`] - Option list and required-value validation
//! - [`controls`] - Parameter types and their host configuration
//!
//! # Example
//!
//! ```rust
//! use parameters::{MergerConfig, ParamValue, ResponsiveMerger, ViewPort, Viewport};
//!
//! let default = ParamValue::PerViewport(ViewPort::broadcast(&"8px".to_string()));
//! let merger = ResponsiveMerger::new(MergerConfig::new(true), default);
//!
//! let value = merger.normalize(&ParamValue::Scalar("10px".to_string()));
//! let value = merger.unset(&value, Some(Viewport::Tablet));
//! let value = merger.reset_to_default(&value, Some(Viewport::Tablet));
//!
//! let ParamValue::PerViewport(record) = value else { unreachable!() };
//! assert_eq!(record.desktop.as_deref(), Some("10px"));
//! assert_eq!(record.tablet.as_deref(), Some("8px"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod controls;
pub mod default_editor;
pub mod merger;
pub mod options;
pub mod session;
pub mod stale;
pub mod validation;
pub mod viewport;

// Re-export commonly used types
pub use controls::{
    ConfigIssue, ParameterConfig, ParameterKind, SliderConfig, SliderType, TokenCatalog, MAX_SLIDER_STEPS,
};
pub use default_editor::DefaultValueEditor;
pub use merger::{is_save_as_default_enabled, MergerConfig, ResponsiveMerger};
pub use options::{ControlVariant, KeyValueItem, OptionItem};
pub use session::{EditorAction, HostUpdate, ParameterSession, ValueUpdate};
pub use stale::{check_selections, Selection, UNITS};
pub use validation::{validate_options, validate_required, OptionError, ValidationResult};
pub use viewport::{
    ParamValue, SliderValue, SlotValue, SpaceProperty, SpaceValue, ValueShapeError, ViewPort, Viewport,
};
