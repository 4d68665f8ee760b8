//! Design Extensions
//!
//! Per-project design-token themes and the responsive parameter controls that
//! expose them.
//!
//! - [`design_tokens`] - Theme model, aliases, groups, CSS, import, validation
//! - [`parameters`] - Viewport values, merger reducers, controls and validators
//! - [`storage`] - Key-value store and project theme store

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use design_tokens;
pub use parameters;
pub use storage;

use design_tokens::{css, validate_theme, Theme, ThemeIssue};
use storage::{ThemeRepository, ThemeStoreError};

/// Commonly used items from every crate
pub mod prelude {
    pub use design_tokens::{
        alias, css, ColorToken, DimensionToken, GroupClassifier, GroupConfig, Theme, TokenKind,
    };
    pub use parameters::{
        EditorAction, MergerConfig, ParamValue, ParameterConfig, ParameterKind, ParameterSession,
        ResponsiveMerger, TokenCatalog, ViewPort, Viewport,
    };
    pub use storage::{ThemeRepository, ThemeStore, ThemeStoreConfig};
}

/// Outcome of saving a theme
#[derive(Debug)]
pub enum SaveOutcome {
    /// The theme was written
    Saved,
    /// The theme has blocking issues and was not written
    Rejected(Vec<ThemeIssue>),
}

/// Validate a theme and store it when it has no blocking issues
pub async fn save_theme<R>(
    repository: &R,
    project_id: &str,
    theme: Theme,
    environment_url: &str,
) -> Result<SaveOutcome, ThemeStoreError>
where
    R: ThemeRepository + ?Sized,
{
    let issues = validate_theme(&theme);
    if !issues.is_empty() {
        return Ok(SaveOutcome::Rejected(issues));
    }
    repository.set_theme(project_id, theme, environment_url).await?;
    Ok(SaveOutcome::Saved)
}

/// Stylesheet for a project's theme; `None` when the project was never configured
pub async fn project_css<R>(repository: &R, project_id: &str) -> Result<Option<String>, ThemeStoreError>
where
    R: ThemeRepository + ?Sized,
{
    Ok(repository.get_theme(project_id).await?.map(|theme| css::theme_css(&theme)))
}
