use log::info;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

use super::state::TestResult;

/// Book used when the books listing yields nothing usable
pub const DEFAULT_BOOK: &str = "Genesis";

pub const VAR_BOOK: &str = "book";
pub const VAR_TOKEN: &str = "token";
pub const VAR_USER_ID: &str = "user_id";
pub const VAR_RUN_ID: &str = "run_id";
pub const VAR_EMAIL: &str = "email";
pub const VAR_SHORT_PASSWORD_EMAIL: &str = "short_password_email";

/// Values threaded from earlier responses into later requests
pub struct RunContext {
    vars: HashMap<String, String>,
}

impl RunContext {
    /// Context seeded from the current unix time, so each run registers a fresh user
    pub fn new() -> Self {
        Self::with_run_id(chrono::Utc::now().timestamp())
    }

    pub fn with_run_id(run_id: i64) -> Self {
        let mut vars = HashMap::new();
        vars.insert(VAR_RUN_ID.to_string(), run_id.to_string());
        vars.insert(VAR_BOOK.to_string(), DEFAULT_BOOK.to_string());
        vars.insert(
            VAR_EMAIL.to_string(),
            format!("testuser_{}@example.com", run_id),
        );
        vars.insert(
            VAR_SHORT_PASSWORD_EMAIL.to_string(),
            format!("test2_{}@example.com", run_id),
        );
        Self { vars }
    }

    pub fn get_var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn set_var(&mut self, name: &str, value: &str) {
        self.vars.insert(name.to_string(), value.to_string());
    }

    pub fn book(&self) -> &str {
        self.get_var(VAR_BOOK).unwrap_or(DEFAULT_BOOK)
    }

    pub fn token(&self) -> Option<&str> {
        self.get_var(VAR_TOKEN).filter(|t| !t.is_empty())
    }

    pub fn has_token(&self) -> bool {
        self.token().is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.get_var(VAR_USER_ID)
    }

    pub fn email(&self) -> &str {
        self.get_var(VAR_EMAIL).unwrap_or_default()
    }

    /// Substitute `${name}` patterns; unknown names are left untouched
    pub fn substitute_vars(&self, text: &str) -> String {
        static VAR_PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = VAR_PATTERN.get_or_init(|| {
            Regex::new(r"\$\{([a-zA-Z0-9_]+)\}").expect("variable pattern is valid")
        });

        re.replace_all(text, |caps: &regex::Captures<'_>| match self.get_var(&caps[1]) {
            Some(val) => val.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
    }

    /// Substitute variables inside every string of a JSON value
    pub fn substitute_json(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.substitute_vars(s)),
            Value::Array(items) => {
                Value::Array(items.iter().map(|v| self.substitute_json(v)).collect())
            }
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.substitute_json(v)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Take the book name from a books listing, or fall back to the default
    pub fn capture_book(&mut self, result: &TestResult) {
        let book = result
            .success_json()
            .and_then(book_from_listing)
            .unwrap_or(DEFAULT_BOOK)
            .to_string();
        info!("Using book '{}' for chapter and verse scenarios", book);
        self.set_var(VAR_BOOK, &book);
    }

    /// Take the access token (and user id, if present) from a registration response
    pub fn capture_registration(&mut self, result: &TestResult) {
        let Some(body) = result.success_json().filter(|b| b.is_object()) else {
            return;
        };

        if let Some(token) = non_empty_str(body.get("access")) {
            info!("Registration returned an access token");
            self.set_var(VAR_TOKEN, token);
        }

        if let Some(id) = body.get("user").and_then(|u| u.get("id")) {
            let id = match id.as_str() {
                Some(s) => s.to_string(),
                None => id.to_string(),
            };
            if id != "null" {
                info!("Registered user id {}", id);
                self.set_var(VAR_USER_ID, &id);
            }
        }
    }

    /// Replace the token with the login response's, keeping the old one if absent
    pub fn capture_login(&mut self, result: &TestResult) {
        let Some(body) = result.success_json().filter(|b| b.is_object()) else {
            return;
        };

        if let Some(token) = non_empty_str(body.get("access")) {
            info!("Login returned an access token");
            self.set_var(VAR_TOKEN, token);
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// `book` of the first listed entry, or of the object itself
fn book_from_listing(body: &Value) -> Option<&str> {
    let entry = match body {
        Value::Array(items) => items.first()?,
        Value::Object(_) => body,
        _ => return None,
    };
    non_empty_str(entry.get("book"))
}
