//! CSS variable emission
//!
//! Every token becomes a custom property named after its key. Alias values are
//! emitted as `var(--target)`, so chains are resolved by the browser. Colors get
//! one rule per mode: the light mode under `:root`, every other mode under a
//! class selector named after the mode (`.dark`).

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::alias::{resolve_reference, to_css_variable_expression};
use crate::model::{
    BorderToken, BorderValue, ColorMode, ColorToken, DimensionToken, Theme, ROOT_COLOR_SCHEME_KEY,
};

/// Selector a color mode is emitted under
pub fn mode_selector(mode: &str) -> String {
    if mode == ROOT_COLOR_SCHEME_KEY.as_str() {
        ":root".to_string()
    } else {
        format!(".{}", mode)
    }
}

fn write_rule(css: &mut String, selector: &str, declarations: &[(&str, String)]) {
    let _ = writeln!(css, "{} {{", selector);
    for (name, value) in declarations {
        let _ = writeln!(css, "\t--{}: {};", name, value);
    }
    let _ = writeln!(css, "}}");
}

/// Modes present across the collection, root mode first
fn collect_modes(colors: &[ColorToken]) -> Vec<&str> {
    let mut modes: Vec<&str> = Vec::new();
    for token in colors {
        for mode in token.modes.keys() {
            if !modes.contains(&mode.as_str()) {
                modes.push(mode);
            }
        }
    }
    modes.sort_by_key(|mode| (*mode != ROOT_COLOR_SCHEME_KEY.as_str(), *mode));
    modes
}

/// Stylesheet text for a color collection; empty when there is nothing to emit
pub fn color_tokens_css(colors: &[ColorToken]) -> String {
    let mut css = String::new();
    for mode in collect_modes(colors) {
        let declarations: Vec<(&str, String)> = colors
            .iter()
            .filter_map(|token| {
                token
                    .value(mode)
                    .map(|value| (token.key.as_str(), to_css_variable_expression(value).into_owned()))
            })
            .collect();
        write_rule(&mut css, &mode_selector(mode), &declarations);
    }
    css
}

/// Stylesheet text for a dimension collection; empty when there is nothing to emit
pub fn dimension_tokens_css(dimensions: &[DimensionToken]) -> String {
    if dimensions.is_empty() {
        return String::new();
    }

    let declarations: Vec<(&str, String)> = dimensions
        .iter()
        .map(|token| (token.key.as_str(), to_css_variable_expression(&token.value).into_owned()))
        .collect();

    let mut css = String::new();
    write_rule(&mut css, ":root", &declarations);
    css
}

/// Stylesheet text for a whole theme. Dark values are left out when dark mode is off.
pub fn theme_css(theme: &Theme) -> String {
    let colors: Vec<ColorToken> = if theme.with_dark_mode {
        theme.colors.clone()
    } else {
        theme
            .colors
            .iter()
            .map(|token| {
                let mut token = token.clone();
                token.modes.remove(ColorMode::Dark.as_str());
                token
            })
            .collect()
    };

    let mut css = color_tokens_css(&colors);
    css.push_str(&dimension_tokens_css(&theme.dimensions));
    tracing::debug!(
        "Emitted {} bytes of theme CSS for {} colors and {} dimensions",
        css.len(),
        theme.colors.len(),
        theme.dimensions.len()
    );
    css
}

/// Wrap stylesheet text for direct injection into a page
pub fn style_tag(css: &str) -> String {
    if css.is_empty() {
        String::new()
    } else {
        format!("<style>{}</style>", css)
    }
}

// =============================================================================
// Resolved Token Maps
// =============================================================================

/// `mode -> key -> value` with aliases shown as bracketed references.
/// The dark mode is left out unless `dark_mode_enabled`.
pub fn formatted_color_tokens(
    colors: &[ColorToken],
    dark_mode_enabled: bool,
) -> BTreeMap<String, BTreeMap<String, String>> {
    let mut formatted: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
    for token in colors {
        for (mode, value) in &token.modes {
            if mode == ColorMode::Dark.as_str() && !dark_mode_enabled {
                continue;
            }
            formatted
                .entry(mode.clone())
                .or_default()
                .insert(token.key.clone(), resolve_reference(value, true).into_owned());
        }
    }
    formatted
}

/// `key -> value` with aliases shown as bracketed references
pub fn formatted_dimension_tokens(dimensions: &[DimensionToken]) -> BTreeMap<String, String> {
    dimensions
        .iter()
        .map(|token| (token.key.clone(), resolve_reference(&token.value, true).into_owned()))
        .collect()
}

/// `key -> border` with every field shown as a bracketed reference when aliased
pub fn formatted_border_tokens(borders: &[BorderToken]) -> BTreeMap<String, BorderValue> {
    borders
        .iter()
        .map(|token| {
            let value = &token.value;
            (
                token.key.clone(),
                BorderValue {
                    color: resolve_reference(&value.color, true).into_owned(),
                    width: resolve_reference(&value.width, true).into_owned(),
                    radius: resolve_reference(&value.radius, true).into_owned(),
                    style: resolve_reference(&value.style, true).into_owned(),
                },
            )
        })
        .collect()
}

/// Inline `border` shorthand for a border token value
pub fn border_shorthand(value: &BorderValue) -> String {
    format!(
        "{} {} {}",
        to_css_variable_expression(&value.width),
        to_css_variable_expression(&value.style),
        to_css_variable_expression(&value.color)
    )
}
