//! Alias resolution
//!
//! A token value is either a literal (`#001C6C`, `8px`) or an alias reference to
//! another token written as `{other-key}`. Alias paths may use dot notation
//! (`{group.name}`), CSS variable names use dashes, so resolution rewrites every
//! `.` as `-`.
//!
//! Resolution yields a *reference*, never the referenced token's value. Chains
//! are followed by the consumer's CSS engine through nested `var()` lookups; a
//! reference to a missing key or a cycle degrades to the CSS initial value there.

use std::borrow::Cow;

/// Returns `true` when the value is an alias reference
///
/// # Example
///
/// ```rust
/// use design_tokens::alias::is_alias;
///
/// assert!(is_alias("{button-primary}"));
/// assert!(!is_alias("#001C6C"));
/// ```
pub fn is_alias(value: &str) -> bool {
    !value.is_empty() && value.starts_with('{') && value.ends_with('}')
}

/// Resolve an alias to the referenced key, keeping the braces when asked to.
/// Literals are returned unchanged.
pub fn resolve_reference(value: &str, with_brackets: bool) -> Cow<'_, str> {
    if !is_alias(value) {
        return Cow::Borrowed(value);
    }

    let reference = value.replace('.', "-");
    if with_brackets {
        Cow::Owned(reference)
    } else {
        Cow::Owned(reference.replace(['{', '}'], ""))
    }
}

/// CSS expression for a token value: `var(--key)` for aliases, the literal otherwise
pub fn to_css_variable_expression(value: &str) -> Cow<'_, str> {
    if is_alias(value) {
        Cow::Owned(format!("var(--{})", resolve_reference(value, false)))
    } else {
        Cow::Borrowed(value)
    }
}

/// Token key named by a `var(--key)` expression
pub fn token_name_from_var(value: &str) -> String {
    value.replace("var(--", "").replace(')', "")
}

/// A token value classified as alias or literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenValue<'a> {
    /// Reference to another token, stored with braces
    Alias(&'a str),
    /// Concrete value
    Literal(&'a str),
}

impl<'a> TokenValue<'a> {
    /// Classify a raw stored value
    pub fn parse(value: &'a str) -> Self {
        if is_alias(value) {
            TokenValue::Alias(value)
        } else {
            TokenValue::Literal(value)
        }
    }

    /// Whether this is an alias
    pub fn is_alias(&self) -> bool {
        matches!(self, TokenValue::Alias(_))
    }

    /// Referenced key for aliases (dash form, no braces)
    pub fn reference(&self) -> Option<String> {
        match *self {
            TokenValue::Alias(raw) => Some(resolve_reference(raw, false).into_owned()),
            TokenValue::Literal(_) => None,
        }
    }

    /// Text shown in an editor row: the bracketed reference or the literal
    pub fn display(&self) -> Cow<'a, str> {
        match *self {
            TokenValue::Alias(raw) => resolve_reference(raw, true),
            TokenValue::Literal(raw) => Cow::Borrowed(raw),
        }
    }

    /// CSS expression for the value
    pub fn css(&self) -> Cow<'a, str> {
        match *self {
            TokenValue::Alias(raw) | TokenValue::Literal(raw) => to_css_variable_expression(raw),
        }
    }
}

/// Build an alias value pointing at `key`
pub fn alias_to(key: &str) -> String {
    format!("{{{}}}", key)
}
