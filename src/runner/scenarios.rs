//! The fixed scenario catalog run against the backend.
//!
//! Names, paths, header values and string fields of bodies may reference
//! run variables as `${name}`; they are resolved against the run context
//! right before each call.

use serde_json::{json, Value};

use super::context::RunContext;
use super::state::Headers;

/// When a scenario may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Always,
    /// Skipped (not recorded) when no access token was obtained
    RequiresToken,
}

/// Value taken from a scenario's response into the run context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    BookName,
    RegistrationToken,
    LoginToken,
}

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub method: &'static str,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
    pub gate: Gate,
    pub capture: Option<Capture>,
}

/// Scenario with every variable substituted
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedScenario {
    pub name: String,
    pub method: &'static str,
    pub path: String,
    pub headers: Option<Headers>,
    pub body: Option<Value>,
}

impl Scenario {
    pub fn new(name: &str, method: &'static str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            method,
            path: path.to_string(),
            headers: Vec::new(),
            body: None,
            gate: Gate::Always,
            capture: None,
        }
    }

    pub fn get(name: &str, path: &str) -> Self {
        Self::new(name, "GET", path)
    }

    pub fn delete(name: &str, path: &str) -> Self {
        Self::new(name, "DELETE", path)
    }

    pub fn post(name: &str, path: &str, body: Value) -> Self {
        Self::new(name, "POST", path).body(body)
    }

    pub fn put(name: &str, path: &str, body: Value) -> Self {
        Self::new(name, "PUT", path).body(body)
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn json_content(self) -> Self {
        self.header("Content-Type", "application/json")
    }

    /// Send the run's bearer token; the scenario is skipped when there is none
    pub fn authenticated(mut self) -> Self {
        self.gate = Gate::RequiresToken;
        self.header("Authorization", "Bearer ${token}")
    }

    pub fn capture(mut self, capture: Capture) -> Self {
        self.capture = Some(capture);
        self
    }

    pub fn resolve(&self, ctx: &RunContext) -> ResolvedScenario {
        let headers = if self.headers.is_empty() {
            None
        } else {
            Some(
                self.headers
                    .iter()
                    .map(|(k, v)| (k.clone(), ctx.substitute_vars(v)))
                    .collect(),
            )
        };

        ResolvedScenario {
            name: ctx.substitute_vars(&self.name),
            method: self.method,
            path: ctx.substitute_vars(&self.path),
            headers,
            body: self.body.as_ref().map(|b| ctx.substitute_json(b)),
        }
    }
}

/// Scenarios announced under one console banner
#[derive(Debug, Clone)]
pub struct ScenarioGroup {
    pub title: &'static str,
    pub scenarios: Vec<Scenario>,
}

/// All groups, in execution order
pub fn catalog() -> Vec<ScenarioGroup> {
    vec![
        ScenarioGroup {
            title: "Testing Health Endpoints...",
            scenarios: health_scenarios(),
        },
        ScenarioGroup {
            title: "Testing NIV API Endpoints...",
            scenarios: niv_scenarios(),
        },
        ScenarioGroup {
            title: "Testing User Management Endpoints...",
            scenarios: user_scenarios(),
        },
    ]
}

fn health_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::get("Health Check - Readiness", "/readiness"),
        Scenario::get("Health Check - Liveness", "/liveness"),
    ]
}

fn niv_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::get("Get All Verses", "/api/niv/verses"),
        Scenario::get("Get All Books", "/api/niv/books")
            .capture(Capture::BookName),
        Scenario::get(
            "Get Chapters for Book: ${book}",
            "/api/niv/chapters/${book}",
        ),
        Scenario::get(
            "Get Verses by Chapter - ${book} Chapter 1",
            "/api/niv/${book}/1/verses",
        ),
        Scenario::get(
            "Get Verses by Chapter - Invalid Chapter (999)",
            "/api/niv/${book}/999/verses",
        ),
        Scenario::post(
            "Explain Verse - Valid Request",
            "/api/niv/explain",
            json!({
                "book": "${book}",
                "chapter": 1,
                "start_verse": 1,
                "end_verse": 3,
                "age": 25,
                "belief": 3
            }),
        )
        .json_content(),
        Scenario::post(
            "Explain Verse - Invalid Request (Missing Fields)",
            "/api/niv/explain",
            json!({
                "book": "${book}",
                "chapter": 1
            }),
        )
        .json_content(),
        // age and belief left to the server defaults
        Scenario::post(
            "Explain Verse - With Default Values",
            "/api/niv/explain",
            json!({
                "book": "${book}",
                "chapter": 1,
                "start_verse": 1,
                "end_verse": 3
            }),
        )
        .json_content(),
    ]
}

fn register_body() -> Value {
    // `belif_rating` is the backend's field name
    json!({
        "first_name": "Test",
        "last_name": "User",
        "email": "${email}",
        "password": "testpass123",
        "age": 25,
        "belif_rating": 3
    })
}

fn user_scenarios() -> Vec<Scenario> {
    let mut scenarios = vec![
        Scenario::post("Register User - Valid", "/api/register/", register_body())
            .json_content()
            .capture(Capture::RegistrationToken),
        Scenario::post(
            "Register User - Duplicate Email",
            "/api/register/",
            register_body(),
        )
        .json_content(),
        Scenario::post(
            "Register User - Missing Required Fields",
            "/api/register/",
            json!({"email": "test@example.com"}),
        )
        .json_content(),
        Scenario::post(
            "Register User - Short Password",
            "/api/register/",
            json!({
                "first_name": "Test",
                "last_name": "User",
                "email": "${short_password_email}",
                "password": "123",
                "age": 25,
                "belif_rating": 3
            }),
        )
        .json_content(),
        Scenario::post(
            "Login User - Valid Credentials",
            "/api/login/",
            json!({"email": "${email}", "password": "testpass123"}),
        )
        .json_content()
        .capture(Capture::LoginToken),
        Scenario::post(
            "Login User - Invalid Password",
            "/api/login/",
            json!({"email": "${email}", "password": "wrongpassword"}),
        )
        .json_content(),
        Scenario::post(
            "Login User - Non-existent Email",
            "/api/login/",
            json!({"email": "nonexistent@example.com", "password": "password123"}),
        )
        .json_content(),
    ];

    scenarios.extend(protected_scenarios());

    scenarios.extend([
        Scenario::get("Get Current User Profile - No Token", "/api/users/me"),
        Scenario::get("Get Current User Profile - Invalid Token", "/api/users/me")
            .header("Authorization", "Bearer invalid_token_12345"),
        Scenario::post(
            "Update Last Read - Invalid Verse",
            "/api/users/me/last-read",
            json!({
                "book_id": 999,
                "book_name": "InvalidBook",
                "chapter": 999,
                "verse": 999
            }),
        )
        .authenticated()
        .json_content(),
    ]);

    scenarios
}

fn protected_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::get("Get Current User Profile", "/api/users/me")
            .authenticated(),
        Scenario::put(
            "Update Current User Profile",
            "/api/users/me",
            json!({"first_name": "Updated", "age": 30, "belif_rating": 4}),
        )
        .authenticated()
        .json_content(),
        Scenario::put(
            "Update Current User Profile - Invalid Age",
            "/api/users/me",
            json!({"age": 200}),
        )
        .authenticated()
        .json_content(),
        Scenario::post(
            "Add Favorite Verse",
            "/api/users/me/favorites",
            json!({"book_id": 1, "chapter": 1, "verse": 1}),
        )
        .authenticated()
        .json_content(),
        Scenario::post(
            "Add Favorite Verse - Duplicate",
            "/api/users/me/favorites",
            json!({"book_id": 1, "chapter": 1, "verse": 1}),
        )
        .authenticated()
        .json_content(),
        Scenario::post(
            "Add Favorite Verse - Invalid Verse",
            "/api/users/me/favorites",
            json!({"book_id": 999, "chapter": 999, "verse": 999}),
        )
        .authenticated()
        .json_content(),
        Scenario::get(
            "Get Favorite Verses",
            "/api/users/me/favorites?page=1&limit=10",
        )
        .authenticated(),
        Scenario::get(
            "Get Favorite Verses - Pagination",
            "/api/users/me/favorites?page=1&limit=5",
        )
        .authenticated(),
        Scenario::post(
            "Add Highlighted Verse",
            "/api/users/me/highlights",
            json!({
                "book_id": 1,
                "chapter": 1,
                "verse": 2,
                "note": "This is a test highlight",
                "color": "yellow"
            }),
        )
        .authenticated()
        .json_content(),
        Scenario::post(
            "Add Highlighted Verse - Duplicate",
            "/api/users/me/highlights",
            json!({
                "book_id": 1,
                "chapter": 1,
                "verse": 2,
                "note": "Updated note",
                "color": "blue"
            }),
        )
        .authenticated()
        .json_content(),
        Scenario::get(
            "Get Highlighted Verses",
            "/api/users/me/highlights?page=1&limit=10",
        )
        .authenticated(),
        Scenario::put(
            "Update Highlighted Verse",
            "/api/users/me/highlights/1/1/2",
            json!({"note": "Updated highlight note", "color": "green"}),
        )
        .authenticated()
        .json_content(),
        Scenario::post(
            "Update Last Read Position",
            "/api/users/me/last-read",
            json!({"book_id": 1, "book_name": "Genesis", "chapter": 1, "verse": 5}),
        )
        .authenticated()
        .json_content(),
        Scenario::get("Get Last Read Position", "/api/users/me/last-read")
            .authenticated(),
        Scenario::get("Get Last Read Verses (Legacy)", "/api/last-read-verses/")
            .authenticated(),
        Scenario::delete("Remove Favorite Verse", "/api/users/me/favorites/1/1/1")
            .authenticated(),
        Scenario::delete("Remove Highlighted Verse", "/api/users/me/highlights/1/1/2")
            .authenticated(),
        Scenario::get("Get Current User Profile - After Update", "/api/users/me")
            .authenticated(),
    ]
}
