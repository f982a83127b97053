use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::time::Duration;

/// Text bodies that are not JSON are kept up to this many characters
pub const TEXT_BODY_LIMIT: usize = 500;

/// Ordered list of HTTP headers, serialized as a JSON object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Set a header, replacing any existing value with the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.0[idx].1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Add a header, folding repeated names into one comma-separated value
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => {
                let existing = &mut self.0[idx].1;
                existing.push_str(", ");
                existing.push_str(&value);
            }
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.0[idx].1.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First `n` headers in their original order
    pub fn first(&self, n: usize) -> Headers {
        Headers(self.0.iter().take(n).cloned().collect())
    }

    /// Headers as a JSON object, for pretty-printing
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
        )
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.0
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Response payload: parsed JSON, or the leading text when parsing fails
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    pub fn parse(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(truncate_chars(raw, TEXT_BODY_LIMIT)),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    /// True when there is nothing worth displaying (null, false, 0, "", [], {})
    pub fn is_blank(&self) -> bool {
        match self {
            ResponseBody::Json(value) => !is_truthy(value),
            ResponseBody::Text(text) => text.is_empty(),
        }
    }
}

/// Whether a JSON value carries content worth displaying
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// First `limit` characters of `text`
pub fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

/// How a scenario's HTTP call ended
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Outcome {
    /// The server answered, whatever the status
    Response {
        status: u16,
        headers: Headers,
        body: ResponseBody,
    },
    /// No HTTP response was obtained
    Failure { error: String },
}

/// Record of one executed scenario
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub name: String,
    pub method: String,
    pub url: String,
    pub request_headers: Headers,
    pub request_body: Option<Value>,
    pub outcome: Outcome,
    #[serde(rename = "durationSecs", serialize_with = "serialize_secs")]
    pub duration: Duration,
}

impl TestResult {
    pub fn new(
        name: &str,
        method: &str,
        url: &str,
        request_headers: Headers,
        request_body: Option<Value>,
        outcome: Outcome,
        duration: Duration,
    ) -> Self {
        Self {
            name: name.to_string(),
            method: method.to_string(),
            url: url.to_string(),
            request_headers,
            request_body,
            outcome,
            duration,
        }
    }

    /// A call that produced no response. Its duration is zero.
    pub fn failure(
        name: &str,
        method: &str,
        url: &str,
        request_headers: Headers,
        request_body: Option<Value>,
        error: impl Into<String>,
    ) -> Self {
        let outcome = Outcome::Failure {
            error: error.into(),
        };
        Self::new(
            name,
            method,
            url,
            request_headers,
            request_body,
            outcome,
            Duration::ZERO,
        )
    }

    /// Passed iff a response arrived with a 2xx status
    pub fn success(&self) -> bool {
        matches!(self.outcome, Outcome::Response { status, .. } if (200..300).contains(&status))
    }

    pub fn status(&self) -> Option<u16> {
        match &self.outcome {
            Outcome::Response { status, .. } => Some(*status),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failure { error } => Some(error),
            Outcome::Response { .. } => None,
        }
    }

    pub fn response_headers(&self) -> Option<&Headers> {
        match &self.outcome {
            Outcome::Response { headers, .. } => Some(headers),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn response_body(&self) -> Option<&ResponseBody> {
        match &self.outcome {
            Outcome::Response { body, .. } => Some(body),
            Outcome::Failure { .. } => None,
        }
    }

    /// Response body as JSON, only for successful calls
    pub fn success_json(&self) -> Option<&Value> {
        if !self.success() {
            return None;
        }
        self.response_body().and_then(ResponseBody::as_json)
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

/// `passed / total` as a percentage with one decimal, rounding exact halves to even
fn rounded_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let scaled = passed as u128 * 1000;
    let total = total as u128;
    let (mut tenths, rem) = (scaled / total, scaled % total);
    if rem * 2 > total || (rem * 2 == total && tenths % 2 == 1) {
        tenths += 1;
    }
    tenths as f64 / 10.0
}

/// Aggregate counts for a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percentage rounded to one decimal, ties to even
    pub success_rate: f64,
}

impl RunSummary {
    pub fn from_results(results: &[TestResult]) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.success()).count();
        let success_rate = rounded_rate(passed, total);

        Self {
            total,
            passed,
            failed: total - passed,
            success_rate,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Process exit status for this run
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_status(status: u16) -> TestResult {
        let outcome = Outcome::Response {
            status,
            headers: Headers::new(),
            body: ResponseBody::Json(json!({})),
        };
        TestResult::new(
            "Get Current User Profile",
            "GET",
            "/api/users/me",
            Headers::new(),
            None,
            outcome,
            Duration::from_millis(5),
        )
    }

    #[test]
    fn test_success_follows_status_range() {
        assert!(with_status(200).success());
        assert!(with_status(204).success());
        assert!(with_status(299).success());
        assert!(!with_status(199).success());
        assert!(!with_status(300).success());
        assert!(!with_status(404).success());
        assert!(!with_status(500).success());
    }

    #[test]
    fn test_failure_has_no_status() {
        let result = TestResult::failure(
            "Health Check - Liveness",
            "GET",
            "/liveness",
            Headers::new(),
            None,
            "Connection refused - Server may not be running",
        );
        assert!(!result.success());
        assert_eq!(result.status(), None);
        assert_eq!(
            result.error(),
            Some("Connection refused - Server may not be running")
        );
        assert_eq!(result.duration, Duration::ZERO);
        assert!(result.response_body().is_none());
    }

    #[test]
    fn test_response_body_parse_json() {
        let body = ResponseBody::parse(r#"{"status":"ok"}"#);
        assert_eq!(body, ResponseBody::Json(json!({"status": "ok"})));
    }

    #[test]
    fn test_response_body_text_fallback_truncates() {
        let raw = "x".repeat(800);
        match ResponseBody::parse(&raw) {
            ResponseBody::Text(text) => assert_eq!(text.len(), 500),
            other => panic!("expected text body, got {:?}", other),
        }

        // Character-based, not byte-based
        let raw = "é".repeat(600);
        match ResponseBody::parse(&raw) {
            ResponseBody::Text(text) => assert_eq!(text.chars().count(), 500),
            other => panic!("expected text body, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_body_is_blank_text() {
        let body = ResponseBody::parse("");
        assert_eq!(body, ResponseBody::Text(String::new()));
        assert!(body.is_blank());
        assert!(ResponseBody::Json(json!([])).is_blank());
        assert!(ResponseBody::Json(json!(null)).is_blank());
        assert!(!ResponseBody::Json(json!({"a": 1})).is_blank());
    }

    #[test]
    fn test_headers_insert_and_append() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/plain");
        headers.insert("content-type", "application/json");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));

        headers.append("set-cookie", "a=1");
        headers.append("set-cookie", "b=2");
        assert_eq!(headers.get("set-cookie"), Some("a=1, b=2"));

        let json = serde_json::to_string(&headers).unwrap();
        assert_eq!(
            json,
            r#"{"Content-Type":"application/json","set-cookie":"a=1, b=2"}"#
        );
    }

    #[test]
    fn test_summary_rate() {
        let results = vec![with_status(200), with_status(201), with_status(404)];
        let summary = RunSummary::from_results(&results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.success_rate, 66.7);
        assert_eq!(summary.exit_code(), 1);

        let empty = RunSummary::from_results(&[]);
        assert_eq!(empty.success_rate, 0.0);
        assert_eq!(empty.exit_code(), 0);

        let all = RunSummary::from_results(&[with_status(200)]);
        assert_eq!(all.success_rate, 100.0);
        assert!(all.all_passed());
    }

    #[test]
    fn test_summary_rate_rounds_half_to_even() {
        let mut results = vec![with_status(200)];
        results.extend((0..15).map(|_| with_status(500)));
        // 1/16 is 6.25%
        assert_eq!(RunSummary::from_results(&results).success_rate, 6.2);

        let mut results = vec![with_status(200); 3];
        results.extend((0..13).map(|_| with_status(500)));
        // 3/16 is 18.75%
        assert_eq!(RunSummary::from_results(&results).success_rate, 18.8);

        let mut results = vec![with_status(200); 19];
        results.extend((0..19).map(|_| with_status(500)));
        assert_eq!(RunSummary::from_results(&results).success_rate, 50.0);

        let one_of_three = [with_status(200), with_status(404), with_status(404)];
        assert_eq!(RunSummary::from_results(&one_of_three).success_rate, 33.3);
    }
}
