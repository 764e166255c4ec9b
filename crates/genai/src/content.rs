//! Typed parsing of generation-service payloads.
//!
//! The service returns loosely structured JSON. This module converts it
//! into a [`GeneratedContent`] or reports exactly what was malformed, so
//! the processor can decide between using the payload and constructing a
//! fallback module.

use modcraft_core::module::{FieldDef, ModuleData, ModuleMeta};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Parsed payload
// ---------------------------------------------------------------------------

/// A structurally valid generation payload.
#[derive(Debug, Clone)]
pub struct GeneratedContent {
    pub fields: Vec<FieldDef>,
    pub meta: ModuleMeta,
    pub html: String,
    pub css: Option<String>,
    /// Score reported by the service's own validation pass, if any.
    pub quality_score: Option<f64>,
}

impl GeneratedContent {
    /// Convert into the pipeline's per-section module data.
    pub fn into_module_data(self) -> ModuleData {
        ModuleData {
            fields: self.fields,
            meta: self.meta,
            html: self.html,
            css: self.css,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Why a payload could not be accepted as structured content.
#[derive(Debug, thiserror::Error)]
pub enum ContentParseError {
    #[error("Payload is not a JSON object")]
    NotAnObject,

    #[error("Missing required key '{0}'")]
    MissingKey(&'static str),

    #[error("Key '{key}' has wrong type: expected {expected}")]
    WrongType {
        key: &'static str,
        expected: &'static str,
    },

    #[error("Field at index {index} is malformed: {reason}")]
    MalformedField { index: usize, reason: String },
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a raw service payload into [`GeneratedContent`].
///
/// Required shape: `html` (non-empty string) and `fields` (array of
/// field objects with string `id`). `meta` is optional and defaults to
/// empty label/description; `css` and `quality_score` are optional.
pub fn parse_content(payload: &Value) -> Result<GeneratedContent, ContentParseError> {
    let obj = payload.as_object().ok_or(ContentParseError::NotAnObject)?;

    let html = obj
        .get("html")
        .ok_or(ContentParseError::MissingKey("html"))?
        .as_str()
        .ok_or(ContentParseError::WrongType {
            key: "html",
            expected: "string",
        })?;
    if html.trim().is_empty() {
        return Err(ContentParseError::WrongType {
            key: "html",
            expected: "non-empty string",
        });
    }

    let raw_fields = obj
        .get("fields")
        .ok_or(ContentParseError::MissingKey("fields"))?
        .as_array()
        .ok_or(ContentParseError::WrongType {
            key: "fields",
            expected: "array",
        })?;

    let mut fields = Vec::with_capacity(raw_fields.len());
    for (index, raw) in raw_fields.iter().enumerate() {
        fields.push(parse_field(index, raw)?);
    }

    let meta = match obj.get("meta") {
        Some(raw) => parse_meta(raw)?,
        None => ModuleMeta {
            label: String::new(),
            description: String::new(),
            content_types: Vec::new(),
        },
    };

    let css = match obj.get("css") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    };

    let quality_score = obj.get("quality_score").and_then(Value::as_f64);

    Ok(GeneratedContent {
        fields,
        meta,
        html: html.to_string(),
        css,
        quality_score,
    })
}

fn parse_field(index: usize, raw: &Value) -> Result<FieldDef, ContentParseError> {
    let obj = raw.as_object().ok_or(ContentParseError::MalformedField {
        index,
        reason: "not an object".to_string(),
    })?;

    let id = obj
        .get("id")
        .and_then(Value::as_str)
        .ok_or(ContentParseError::MalformedField {
            index,
            reason: "missing string 'id'".to_string(),
        })?;
    if id.trim().is_empty() {
        return Err(ContentParseError::MalformedField {
            index,
            reason: "empty 'id'".to_string(),
        });
    }

    Ok(FieldDef {
        id: id.to_string(),
        name: obj
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(id)
            .to_string(),
        field_type: obj
            .get("type")
            .or_else(|| obj.get("field_type"))
            .and_then(Value::as_str)
            .unwrap_or("text")
            .to_string(),
        required: obj.get("required").and_then(Value::as_bool).unwrap_or(false),
        default: obj.get("default").cloned(),
    })
}

fn parse_meta(raw: &Value) -> Result<ModuleMeta, ContentParseError> {
    let obj = raw.as_object().ok_or(ContentParseError::WrongType {
        key: "meta",
        expected: "object",
    })?;
    Ok(ModuleMeta {
        label: obj
            .get("label")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        description: obj
            .get("description")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        content_types: obj
            .get("content_types")
            .and_then(Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
