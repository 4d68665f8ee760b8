//! Design-token file import
//!
//! Reads W3C design-token documents (`$type` / `$value`, with the older
//! `type` / `value` spelling also accepted) and flattens the tokens of one type
//! into dash-joined keys: `{"button": {"primary": {...}}}` becomes
//! `button-primary`. A `$type` on a group applies to every token below it.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{
    defaults, BorderToken, BorderValue, ColorMode, ColorToken, DimensionToken, TokenKind,
};

/// Import error types
#[derive(Debug, Error)]
pub enum ImportError {
    /// The document root is not a JSON object
    #[error("Design tokens document must be a JSON object")]
    NotAnObject,

    /// The document is not valid JSON
    #[error("Invalid design tokens document: {0}")]
    Parse(#[from] serde_json::Error),

    /// The token type cannot be imported from files
    #[error("Unsupported token type: {0}")]
    UnsupportedType(TokenKind),
}

/// Result type for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Imported value, shaped by the token type
#[derive(Debug, Clone, PartialEq)]
pub enum ImportedValue {
    /// Color or dimension value
    Simple(String),
    /// Border fields as found in the document
    Composite(Map<String, Value>),
}

/// A token found in a document
#[derive(Debug, Clone, PartialEq)]
pub struct DesignToken {
    /// Flattened key
    pub key: String,
    /// Raw value
    pub value: ImportedValue,
    /// Token type
    pub kind: TokenKind,
}

/// Replace whitespace and underscores with dashes
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_whitespace() || c == '_' { '-' } else { c })
        .collect()
}

fn declared_type(node: &Map<String, Value>) -> Option<&str> {
    node.get("$type").or_else(|| node.get("type")).and_then(Value::as_str)
}

fn declared_value(node: &Map<String, Value>) -> Option<&Value> {
    node.get("$value")
        .or_else(|| node.get("value"))
        .filter(|v| !v.is_null() && *v != &Value::Bool(false) && *v != &Value::String(String::new()))
}

fn token_value(value: &Value, kind: TokenKind) -> ImportedValue {
    match kind {
        TokenKind::Color | TokenKind::Dimension => ImportedValue::Simple(match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => String::new(),
        }),
        TokenKind::Border => match value {
            Value::Object(map) => ImportedValue::Composite(map.clone()),
            _ => ImportedValue::Composite(Map::new()),
        },
        TokenKind::Font => ImportedValue::Simple(String::new()),
    }
}

fn walk(
    group: &Map<String, Value>,
    kind: TokenKind,
    inherited: bool,
    prefix: &str,
    tokens: &mut Vec<DesignToken>,
) {
    for (key, node) in group {
        let Value::Object(node) = node else { continue };

        let is_kind = match declared_type(node) {
            Some(declared) => declared == kind.as_str(),
            None => inherited,
        };
        let key = format!("{}{}", prefix, normalize_key(key));

        match declared_value(node) {
            Some(value) if is_kind => tokens.push(DesignToken {
                key,
                value: token_value(value, kind),
                kind,
            }),
            _ => walk(node, kind, is_kind, &format!("{}-", key), tokens),
        }
    }
}

/// Collect every token of `kind` from a parsed document
pub fn transform_design_tokens(document: &Value, kind: TokenKind) -> Result<Vec<DesignToken>> {
    let Value::Object(root) = document else {
        return Err(ImportError::NotAnObject);
    };

    let mut tokens = Vec::new();
    walk(root, kind, false, "", &mut tokens);
    tracing::info!("Imported {} {} tokens", tokens.len(), kind.as_str());
    Ok(tokens)
}

/// Parse a document and collect every token of `kind`
pub fn parse_design_tokens(source: &str, kind: TokenKind) -> Result<Vec<DesignToken>> {
    let document: Value = serde_json::from_str(source)?;
    transform_design_tokens(&document, kind)
}

fn field(map: &Map<String, Value>, name: &str, fallback: &str) -> String {
    map.get(name)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

impl DesignToken {
    /// Value as a simple string, using `fallback` for composite values
    pub fn simple_value(&self, fallback: &str) -> String {
        match &self.value {
            ImportedValue::Simple(value) => value.clone(),
            ImportedValue::Composite(_) => fallback.to_string(),
        }
    }

    /// Border value, filling missing fields with the stock border
    pub fn border_value(&self) -> BorderValue {
        match &self.value {
            ImportedValue::Composite(map) => BorderValue {
                color: field(map, "color", defaults::BORDER_COLOR),
                width: field(map, "width", defaults::BORDER_WIDTH),
                radius: field(map, "radius", defaults::BORDER_RADIUS),
                style: field(map, "style", defaults::BORDER_STYLE),
            },
            ImportedValue::Simple(_) => BorderValue::default(),
        }
    }
}

/// Imported tokens as color tokens; the imported value becomes the `mode` value
pub fn into_color_tokens(tokens: &[DesignToken], mode: ColorMode) -> Vec<ColorToken> {
    tokens
        .iter()
        .map(|token| {
            ColorToken::new(token.key.clone())
                .with_mode(mode.as_str(), token.simple_value(defaults::COLOR_LIGHT))
        })
        .collect()
}

/// Imported tokens as dimension tokens
pub fn into_dimension_tokens(tokens: &[DesignToken]) -> Vec<DimensionToken> {
    tokens
        .iter()
        .map(|token| DimensionToken::new(token.key.clone(), token.simple_value(defaults::DIMENSION)))
        .collect()
}

/// Imported tokens as border tokens
pub fn into_border_tokens(tokens: &[DesignToken]) -> Vec<BorderToken> {
    tokens
        .iter()
        .map(|token| BorderToken::new(token.key.clone(), token.border_value()))
        .collect()
}

/// Check that a token type can be imported from files
pub fn ensure_importable(kind: TokenKind) -> Result<()> {
    match kind {
        TokenKind::Font => Err(ImportError::UnsupportedType(kind)),
        _ => Ok(()),
    }
}
