//! Asset transforms: minification and documentation synthesis.

use std::sync::LazyLock;

use regex::Regex;

use crate::files::{find_file, PackageFile};
use modcraft_core::manifest::{FILE_FIELDS_JSON, FILE_META_JSON};

static HTML_COMMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--(?s).*?-->").expect("valid regex"));
static BETWEEN_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("valid regex"));
static CSS_COMMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\*(?s).*?\*/").expect("valid regex"));
static WHITESPACE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

// ---------------------------------------------------------------------------
// Minification
// ---------------------------------------------------------------------------

/// Strip HTML comments and collapse whitespace between tags.
///
/// Section marker comments (`<!-- Section: ... -->`) are preserved; they
/// are part of the combined-module format.
pub fn minify_html(html: &str) -> String {
    let without_comments = HTML_COMMENTS.replace_all(html, |caps: &regex::Captures<'_>| {
        let c = caps.get(0).map(|m| m.as_str()).unwrap_or("");
        if c.starts_with("<!-- Section:") {
            c.to_string()
        } else {
            String::new()
        }
    });
    BETWEEN_TAGS
        .replace_all(without_comments.trim(), "><")
        .to_string()
}

/// Strip CSS comments and collapse runs of whitespace.
pub fn minify_css(css: &str) -> String {
    let without_comments = CSS_COMMENTS.replace_all(css, "");
    WHITESPACE_RUNS
        .replace_all(without_comments.trim(), " ")
        .replace("; ", ";")
        .replace(" {", "{")
        .replace("{ ", "{")
        .replace(" }", "}")
}

/// Conservative script minification: drop blank lines and trailing
/// whitespace only. Comment stripping is not attempted because `//`
/// also appears inside string literals and URLs.
pub fn minify_js(js: &str) -> String {
    js.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Apply minification in place to markup, style, and script files.
pub fn minify_assets(files: &mut [PackageFile]) {
    for file in files.iter_mut() {
        let Some(text) = file.as_text().map(str::to_string) else {
            continue;
        };
        let minified = match file.path.rsplit('.').next().unwrap_or("") {
            "html" | "htm" => minify_html(&text),
            "css" => minify_css(&text),
            "js" => minify_js(&text),
            _ => continue,
        };
        file.contents = minified.into_bytes();
    }
}

// ---------------------------------------------------------------------------
// Documentation synthesis
// ---------------------------------------------------------------------------

/// Derive a human-readable README from the meta and fields payloads.
///
/// Works on a best-effort basis: whatever keys the payloads carry end up
/// in the document, absent keys are simply omitted.
pub fn synthesize_docs(files: &[PackageFile]) -> String {
    let meta: serde_json::Value = find_file(files, FILE_META_JSON)
        .and_then(|f| f.as_text())
        .and_then(|t| serde_json::from_str(t).ok())
        .unwrap_or(serde_json::Value::Null);
    let fields: serde_json::Value = find_file(files, FILE_FIELDS_JSON)
        .and_then(|f| f.as_text())
        .and_then(|t| serde_json::from_str(t).ok())
        .unwrap_or(serde_json::Value::Null);

    let mut doc = String::new();
    let label = meta
        .get("label")
        .and_then(|v| v.as_str())
        .unwrap_or("Module");
    doc.push_str(&format!("# {label}\n\n"));

    if let Some(description) = meta.get("description").and_then(|v| v.as_str()) {
        if !description.is_empty() {
            doc.push_str(description);
            doc.push_str("\n\n");
        }
    }

    if let Some(types) = meta.get("content_types").and_then(|v| v.as_array()) {
        if !types.is_empty() {
            let names: Vec<&str> = types.iter().filter_map(|v| v.as_str()).collect();
            doc.push_str(&format!("Available in: {}\n\n", names.join(", ")));
        }
    }

    if let Some(list) = fields.as_array() {
        doc.push_str("## Fields\n\n");
        for field in list {
            let id = field.get("id").and_then(|v| v.as_str()).unwrap_or("?");
            let name = field.get("name").and_then(|v| v.as_str()).unwrap_or(id);
            let field_type = field
                .get("field_type")
                .or_else(|| field.get("type"))
                .and_then(|v| v.as_str())
                .unwrap_or("text");
            doc.push_str(&format!("- `{id}` ({field_type}): {name}\n"));
        }
        doc.push('\n');
    }

    doc
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
