//! Markdown report for a completed run

use serde_json::Value;

use super::format::{display_text, first_entries, pretty_json, serialized_size};
use crate::runner::state::{is_truthy, truncate_chars, ResponseBody, RunSummary, TestResult};

pub const REPORT_TITLE: &str = "Bible Reading Backend - API Endpoint Test Report";

/// Bodies whose serialized size exceeds this are truncated
pub const MAX_INLINE_BODY_CHARS: usize = 2000;

/// Characters kept from bodies that are not JSON objects or arrays
pub const MAX_TEXT_BODY_CHARS: usize = 1000;

/// Response headers listed per scenario
pub const RESPONSE_HEADER_LIMIT: usize = 5;

const PREVIEW_ITEMS: usize = 2;
const PREVIEW_KEYS: usize = 5;

/// Render the whole report
pub fn render(results: &[TestResult], generated_at: &str, base_url: &str) -> String {
    let summary = RunSummary::from_results(results);
    let mut report = Vec::new();

    report.push(format!("# {}", REPORT_TITLE));
    report.push(format!("\n**Generated:** {}", generated_at));
    report.push(format!("**Base URL:** {}\n", base_url));

    report.push("## 📊 Summary".to_string());
    report.push(format!("- **Total Endpoints:** {}", summary.total));
    report.push(format!("- **Passed:** {} ✓", summary.passed));
    report.push(format!("- **Failed:** {} ✗", summary.failed));
    report.push(format!("- **Success Rate:** {:.1}%\n", summary.success_rate));

    report.push("## 📋 Detailed Test Results\n".to_string());

    for (i, result) in results.iter().enumerate() {
        render_section(&mut report, i + 1, result);
    }

    let failed: Vec<&TestResult> = results.iter().filter(|r| !r.success()).collect();
    if !failed.is_empty() {
        report.push("## ❌ Failed Tests Summary\n".to_string());
        for result in failed {
            report.push(format!("- **{}** ({} {})", result.name, result.method, result.url));
            report.push(format!("  - Status: {}", status_text(result)));
            report.push(format!("  - Error: {}\n", result.error().unwrap_or("N/A")));
        }
    }

    report.join("\n")
}

fn render_section(report: &mut Vec<String>, index: usize, result: &TestResult) {
    let (icon, verdict) = if result.success() {
        ("✓", "PASS")
    } else {
        ("✗", "FAIL")
    };

    report.push(format!("### {}. {} {}", index, result.name, icon));
    report.push(format!("\n**Status:** `{}`", verdict));
    report.push(format!("**Method:** `{}`", result.method));
    report.push(format!("**Endpoint:** `{}`", result.url));
    report.push(format!("**HTTP Status:** `{}`", status_text(result)));
    report.push(format!("**Duration:** `{:.3}s`", result.duration.as_secs_f64()));

    if let Some(error) = result.error() {
        report.push(format!("\n**Error:** `{}`", error));
    }

    if !result.request_headers.is_empty() {
        push_json_block(
            report,
            "Request Headers",
            pretty_json(&result.request_headers.to_json()),
        );
    }

    if let Some(body) = result.request_body.as_ref().filter(|b| is_truthy(b)) {
        push_json_block(report, "Request Body", pretty_json(body));
    }

    if let Some(headers) = result.response_headers().filter(|h| !h.is_empty()) {
        push_json_block(
            report,
            "Response Headers",
            pretty_json(&headers.first(RESPONSE_HEADER_LIMIT).to_json()),
        );
    }

    if let Some(body) = result.response_body().filter(|b| !b.is_blank()) {
        push_json_block(report, "Response Body", response_body_block(body));
    }

    report.push("\n---\n".to_string());
}

fn push_json_block(report: &mut Vec<String>, label: &str, content: String) {
    report.push(format!("\n**{}:**", label));
    report.push("```json".to_string());
    report.push(content);
    report.push("```".to_string());
}

/// Body text for the report, truncated when large
pub fn response_body_block(body: &ResponseBody) -> String {
    let (value, note, preview) = match body {
        ResponseBody::Json(value @ Value::Array(items)) => (
            value,
            format!(
                "// Array with {} items, showing first {}:",
                items.len(),
                PREVIEW_ITEMS
            ),
            Value::Array(items.iter().take(PREVIEW_ITEMS).cloned().collect()),
        ),
        ResponseBody::Json(value @ Value::Object(map)) => (
            value,
            format!(
                "// Response has {} keys, showing first {}:",
                map.len(),
                PREVIEW_KEYS
            ),
            first_entries(map, PREVIEW_KEYS),
        ),
        _ => return truncate_chars(&display_text(body), MAX_TEXT_BODY_CHARS),
    };

    let size = serialized_size(value);
    if size <= MAX_INLINE_BODY_CHARS {
        return pretty_json(value);
    }

    [
        note,
        pretty_json(&preview),
        format!("// ... (truncated, total size: {} chars)", size),
    ]
    .join("\n")
}

fn status_text(result: &TestResult) -> String {
    result
        .status()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}
