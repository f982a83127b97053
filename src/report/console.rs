//! Console trace for a single result

use colored::Colorize;

use super::format::{display_text, first_entries, pretty_json, serialized_size};
use crate::runner::state::{is_truthy, truncate_chars, ResponseBody, TestResult};

/// Objects with more keys than this are previewed instead of printed whole
pub const PREVIEW_KEY_THRESHOLD: usize = 5;

/// Keys shown in a preview
pub const PREVIEW_KEYS: usize = 3;

/// Characters shown for bodies that are not JSON objects
pub const PREVIEW_TEXT_CHARS: usize = 200;

/// What the console shows of a response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponsePreview {
    /// Small object, printed whole
    Full(String),
    /// First keys of a large object plus the full serialized size
    Partial { preview: String, size: usize },
    /// Anything that is not an object, cut to a fixed length
    Text(String),
}

impl ResponsePreview {
    pub fn of(body: &ResponseBody) -> Option<Self> {
        if body.is_blank() {
            return None;
        }

        let preview = match body {
            ResponseBody::Json(value) => match value.as_object() {
                Some(map) if map.len() > PREVIEW_KEY_THRESHOLD => ResponsePreview::Partial {
                    preview: pretty_json(&first_entries(map, PREVIEW_KEYS)),
                    size: serialized_size(value),
                },
                Some(_) => ResponsePreview::Full(pretty_json(value)),
                None => {
                    ResponsePreview::Text(truncate_chars(&display_text(body), PREVIEW_TEXT_CHARS))
                }
            },
            ResponseBody::Text(_) => {
                ResponsePreview::Text(truncate_chars(&display_text(body), PREVIEW_TEXT_CHARS))
            }
        };
        Some(preview)
    }
}

/// Multi-line trace for one result, as printed after each call
pub fn render_result(result: &TestResult) -> String {
    let mut lines = Vec::new();

    let status = if result.success() {
        "✓ PASS".green()
    } else {
        "✗ FAIL".red()
    };

    lines.push(format!("\n{}", result.name.bold()));
    lines.push(format!("  {} - {} {}", status, result.method, result.url));

    if let Some(error) = result.error() {
        lines.push(format!("  {}", format!("Error: {}", error).red()));
        return lines.join("\n");
    }

    if let Some(code) = result.status() {
        lines.push(format!("  Status: {}", code));
    }
    lines.push(format!("  Duration: {:.3}s", result.duration.as_secs_f64()));

    if let Some(body) = result.request_body.as_ref().filter(|b| is_truthy(b)) {
        lines.push(format!("  Request Body: {}", pretty_json(body)));
    }

    if let Some(preview) = result.response_body().and_then(ResponsePreview::of) {
        match preview {
            ResponsePreview::Full(body) => lines.push(format!("  Response: {}", body)),
            ResponsePreview::Partial { preview, size } => {
                lines.push(format!("  Response Preview: {}...", preview));
                lines.push(format!("  Response Size: {} characters", size));
            }
            ResponsePreview::Text(text) => lines.push(format!("  Response: {}...", text)),
        }
    }

    lines.join("\n")
}
