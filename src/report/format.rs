//! JSON display helpers shared by the console trace and the markdown report.

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::{Map, Value};
use std::io;

use crate::runner::state::ResponseBody;

/// Two-space indented JSON
pub fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Single-line JSON with `", "` and `": "` separators
pub fn spaced_json(value: &Value) -> String {
    let mut ser = serde_json::Serializer::with_formatter(Vec::new(), SpacedFormatter);
    if value.serialize(&mut ser).is_err() {
        return value.to_string();
    }
    String::from_utf8(ser.into_inner()).unwrap_or_else(|_| value.to_string())
}

/// Character count of [`spaced_json`], used for size annotations
pub fn serialized_size(value: &Value) -> usize {
    spaced_json(value).chars().count()
}

/// Object holding only the first `n` entries of `map`
pub fn first_entries(map: &Map<String, Value>, n: usize) -> Value {
    Value::Object(
        map.iter()
            .take(n)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    )
}

/// Body as plain text: strings unquoted, other JSON single-line
pub fn display_text(body: &ResponseBody) -> String {
    match body {
        ResponseBody::Text(text) => text.clone(),
        ResponseBody::Json(Value::String(s)) => s.clone(),
        ResponseBody::Json(value) => spaced_json(value),
    }
}

struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spaced_json() {
        let value = json!({"a": 1, "b": [1, 2], "c": {"d": "x"}});
        assert_eq!(
            spaced_json(&value),
            r#"{"a": 1, "b": [1, 2], "c": {"d": "x"}}"#
        );
        assert_eq!(serialized_size(&json!({"status": "ok"})), 16);
        assert_eq!(spaced_json(&json!([])), "[]");
    }

    #[test]
    fn test_pretty_json_indent() {
        let value = json!({"status": "ok"});
        assert_eq!(pretty_json(&value), "{\n  \"status\": \"ok\"\n}");
    }

    #[test]
    fn test_first_entries_keeps_order() {
        let value = json!({"z": 1, "a": 2, "m": 3, "b": 4});
        let map = value.as_object().unwrap();
        let first = first_entries(map, 2);
        assert_eq!(spaced_json(&first), r#"{"z": 1, "a": 2}"#);
    }

    #[test]
    fn test_display_text() {
        assert_eq!(display_text(&ResponseBody::Text("plain".into())), "plain");
        assert_eq!(display_text(&ResponseBody::Json(json!("quoted"))), "quoted");
        assert_eq!(display_text(&ResponseBody::Json(json!([1, 2]))), "[1, 2]");
    }
}
