use log::debug;
use serde_json::Value;
use std::time::Instant;

use super::state::{Headers, Outcome, ResponseBody, TestResult};
use super::transport::{HttpMethod, HttpRequest, Transport};

/// Issues single HTTP calls against the backend and records the outcome
pub struct RequestExecutor {
    transport: Box<dyn Transport>,
    base_url: String,
}

impl RequestExecutor {
    pub fn new(transport: Box<dyn Transport>, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    /// Execute one call. Never fails: transport problems end up in the result.
    ///
    /// `path` is appended verbatim to the base URL and recorded as the
    /// result's URL. Unknown methods fail immediately without touching the
    /// network.
    pub async fn execute(
        &self,
        name: &str,
        method: &str,
        path: &str,
        headers: Option<Headers>,
        body: Option<Value>,
        query: Option<Vec<(String, String)>>,
    ) -> TestResult {
        let request_headers = headers.unwrap_or_default();

        let method = match method.parse::<HttpMethod>() {
            Ok(method) => method,
            Err(err) => {
                let error = err.to_string();
                return TestResult::failure(name, method, path, request_headers, body, error);
            }
        };

        let request = HttpRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            headers: request_headers,
            body,
            query: query.unwrap_or_default(),
        };

        debug!("{} {}", request.method, request.url);

        let started = Instant::now();
        let sent = self.transport.send(&request).await;
        let duration = started.elapsed();

        let HttpRequest { headers, body, .. } = request;

        match sent {
            Ok(res) => {
                debug!("{} {} -> {} in {:?}", method, path, res.status, duration);
                let outcome = Outcome::Response {
                    status: res.status,
                    headers: res.headers,
                    body: ResponseBody::parse(&res.body),
                };
                TestResult::new(
                    name,
                    method.as_str(),
                    path,
                    headers,
                    body,
                    outcome,
                    duration,
                )
            }
            Err(err) => {
                debug!("{} {} failed: {}", method, path, err);
                let error = err.to_string();
                TestResult::failure(name, method.as_str(), path, headers, body, error)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::super::transport::{HttpRequest, HttpResponse, Transport, TransportError};
    use super::Headers;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    type Responder =
        Box<dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync>;

    /// Requests seen by a [`StubTransport`], in order
    pub type SentRequests = Arc<Mutex<Vec<HttpRequest>>>;

    /// Transport that answers from a closure and remembers every request
    pub struct StubTransport {
        responder: Responder,
        sent: Arc<Mutex<Vec<HttpRequest>>>,
    }

    impl StubTransport {
        pub fn new(
            responder: impl Fn(&HttpRequest) -> Result<HttpResponse, TransportError>
                + Send
                + Sync
                + 'static,
        ) -> (Self, SentRequests) {
            let sent = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    responder: Box::new(responder),
                    sent: sent.clone(),
                },
                sent,
            )
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.sent.lock().unwrap().push(request.clone());
            (self.responder)(request)
        }
    }

    pub fn json_response(status: u16, body: &str) -> HttpResponse {
        let mut headers = Headers::new();
        headers.insert("content-type", "application/json");
        HttpResponse {
            status,
            headers,
            body: body.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{json_response, SentRequests, StubTransport};
    use super::*;
    use crate::runner::transport::{HttpResponse, TransportError};
    use serde_json::json;
    use std::time::Duration;

    fn executor(
        responder: impl Fn(&HttpRequest) -> Result<HttpResponse, TransportError>
            + Send
            + Sync
            + 'static,
    ) -> (RequestExecutor, SentRequests) {
        let (transport, sent) = StubTransport::new(responder);
        (
            RequestExecutor::new(Box::new(transport), "http://localhost:8000"),
            sent,
        )
    }

    #[tokio::test]
    async fn test_readiness_success() {
        let (exec, sent) = executor(|_| Ok(json_response(200, r#"{"status":"ok"}"#)));

        let result = exec
            .execute(
                "Health Check - Readiness",
                "GET",
                "/readiness",
                None,
                None,
                None,
            )
            .await;

        assert!(result.success());
        assert_eq!(result.status(), Some(200));
        assert_eq!(
            result.response_body(),
            Some(&ResponseBody::Json(json!({"status": "ok"})))
        );
        assert_eq!(result.url, "/readiness");

        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url, "http://localhost:8000/readiness");
        assert_eq!(sent[0].method, HttpMethod::Get);
    }

    #[tokio::test]
    async fn test_http_error_is_not_transport_error() {
        let (exec, _) = executor(|_| Ok(json_response(400, r#"{"error":"password required"}"#)));

        let result = exec
            .execute(
                "Register User - Missing Required Fields",
                "POST",
                "/api/register/",
                None,
                Some(json!({"email": "test@example.com"})),
                None,
            )
            .await;

        assert!(!result.success());
        assert_eq!(result.status(), Some(400));
        assert_eq!(result.error(), None);
        assert_eq!(
            result.request_body,
            Some(json!({"email": "test@example.com"}))
        );
    }

    #[tokio::test]
    async fn test_unsupported_method_makes_no_call() {
        let (exec, sent) = executor(|_| Ok(json_response(200, "{}")));

        let result = exec
            .execute(
                "Patch Something",
                "PATCH",
                "/api/users/me",
                None,
                None,
                None,
            )
            .await;

        assert!(!result.success());
        assert_eq!(result.error(), Some("Unsupported method: PATCH"));
        assert_eq!(result.status(), None);
        assert!(sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failures() {
        let (exec, _) = executor(|_| Err(TransportError::ConnectionRefused));
        let result = exec
            .execute("Down", "GET", "/liveness", None, None, None)
            .await;
        assert_eq!(
            result.error(),
            Some("Connection refused - Server may not be running")
        );
        assert_eq!(result.status(), None);
        assert_eq!(result.duration, Duration::ZERO);

        let (exec, _) = executor(|_| Err(TransportError::Timeout(Duration::from_secs(30))));
        let result = exec
            .execute("Slow", "GET", "/liveness", None, None, None)
            .await;
        assert_eq!(result.error(), Some("Request timed out after 30 seconds"));

        let (exec, _) = executor(|_| Err(TransportError::Other("broken pipe".to_string())));
        let result = exec
            .execute("Odd", "GET", "/liveness", None, None, None)
            .await;
        assert_eq!(result.error(), Some("broken pipe"));
        assert!(!result.success());
    }

    #[tokio::test]
    async fn test_text_fallback_and_request_facets() {
        let (exec, sent) = executor(|_| {
            Ok(HttpResponse {
                status: 502,
                headers: Headers::new(),
                body: "<html>".to_string() + &"x".repeat(1000),
            })
        });

        let headers: Headers = [("Authorization", "Bearer abc")].into_iter().collect();
        let result = exec
            .execute(
                "Proxy Page",
                "GET",
                "/api/niv/books",
                Some(headers.clone()),
                None,
                Some(vec![("page".to_string(), "1".to_string())]),
            )
            .await;

        match result.response_body() {
            Some(ResponseBody::Text(text)) => {
                assert_eq!(text.chars().count(), 500);
                assert!(text.starts_with("<html>"));
            }
            other => panic!("expected text body, got {:?}", other),
        }
        assert_eq!(result.request_headers, headers);

        let sent = sent.lock().unwrap();
        assert_eq!(sent[0].query, vec![("page".to_string(), "1".to_string())]);
        assert_eq!(sent[0].headers.get("authorization"), Some("Bearer abc"));
    }
}
