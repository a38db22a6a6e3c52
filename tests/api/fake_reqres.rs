//! An in-process stand-in for the users and registration endpoints.
//!
//! The listed dataset is fixed at construction time. Users created through
//! the API can be fetched, updated and deleted but never show up in the
//! listing, like on the real service.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const CLOUDFLARE_NEL: &str =
    r#"{"success_fraction":0,"report_to":"cf-nel","max_age":604800}"#;
pub const REGISTERED_TOKEN: &str = "QpwL5tke4Pnpja7X4";
pub const FIRST_CREATED_ID: u64 = 500;

const JSON: &str = "application/json; charset=utf-8";
const PER_PAGE: usize = 6;
const REGISTERED_EMAIL: &str = "eve.holt@reqres.in";

#[derive(Debug, Clone)]
struct StoredUser {
    id: u64,
    email: String,
    first_name: String,
    last_name: String,
}

impl StoredUser {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "email": self.email,
            "first_name": self.first_name,
            "last_name": self.last_name,
            "avatar": format!("https://reqres.in/img/faces/{}-image.jpg", self.id),
        })
    }
}

#[derive(Debug)]
struct FakeState {
    listed: BTreeMap<u64, StoredUser>,
    created: BTreeMap<u64, StoredUser>,
    next_id: u64,
}

impl FakeState {
    fn find(&self, id: u64) -> Option<&StoredUser> {
        self.listed.get(&id).or_else(|| self.created.get(&id))
    }
}

#[derive(Clone, Debug)]
pub struct FakeReqres {
    state: Arc<Mutex<FakeState>>,
    nel: Option<String>,
    latency: Duration,
    forgets_deletes: bool,
    timestamp: Option<String>,
    token: String,
}

impl Default for FakeReqres {
    fn default() -> Self {
        Self::with_users(12)
    }
}

impl FakeReqres {
    /// A compliant service listing users `1..=count`.
    pub fn with_users(count: u64) -> Self {
        let listed = (1..=count)
            .map(|id| {
                let user = StoredUser {
                    id,
                    email: format!("user.{}@reqres.in", id),
                    first_name: "User".to_string(),
                    last_name: id.to_string(),
                };
                (id, user)
            })
            .collect();
        Self {
            state: Arc::new(Mutex::new(FakeState {
                listed,
                created: BTreeMap::new(),
                next_id: FIRST_CREATED_ID,
            })),
            nel: Some(CLOUDFLARE_NEL.to_string()),
            latency: Duration::ZERO,
            forgets_deletes: false,
            timestamp: None,
            token: REGISTERED_TOKEN.to_string(),
        }
    }

    /// `None` drops the header altogether.
    pub fn nel(mut self, nel: Option<&str>) -> Self {
        self.nel = nel.map(str::to_string);
        self
    }

    /// Latency of listings that ask for a `delay`.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn forgetting_deletes(mut self) -> Self {
        self.forgets_deletes = true;
        self
    }

    /// Stamp every `createdAt`/`updatedAt` with `timestamp` instead of now.
    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    pub fn token(mut self, token: &str) -> Self {
        self.token = token.to_string();
        self
    }

    pub async fn mount(self, server: &MockServer) {
        Mock::given(any()).respond_with(self).mount(server).await;
    }

    fn now(&self) -> String {
        self.timestamp
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    fn json(&self, status: u16, body: Value) -> ResponseTemplate {
        self.with_nel(ResponseTemplate::new(status).set_body_raw(body.to_string(), JSON))
    }

    fn with_nel(&self, template: ResponseTemplate) -> ResponseTemplate {
        match &self.nel {
            Some(nel) => template.insert_header("nel", nel.as_str()),
            None => template,
        }
    }

    fn not_found(&self) -> ResponseTemplate {
        self.json(404, json!({}))
    }

    fn list(&self, request: &Request) -> ResponseTemplate {
        let delayed = request.url.query_pairs().any(|(key, _)| key == "delay");
        let state = self.state.lock().unwrap();
        let total = state.listed.len();
        let data: Vec<Value> = state
            .listed
            .values()
            .take(PER_PAGE)
            .map(StoredUser::to_json)
            .collect();
        let response = self.json(
            200,
            json!({
                "page": 1,
                "per_page": PER_PAGE,
                "total": total,
                "total_pages": total.div_ceil(PER_PAGE),
                "data": data,
                "support": {"url": "https://reqres.in/#support-heading", "text": "Thanks!"}
            }),
        );
        if delayed {
            response.set_delay(self.latency)
        } else {
            response
        }
    }

    fn get(&self, id: &str) -> ResponseTemplate {
        let state = self.state.lock().unwrap();
        match id.parse().ok().and_then(|id| state.find(id)) {
            Some(user) => self.json(200, json!({"data": user.to_json()})),
            None => self.not_found(),
        }
    }

    fn create(&self, request: &Request) -> ResponseTemplate {
        let mut body = request_object(request);
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;
        let name = body.get("name").and_then(Value::as_str).unwrap_or_default();
        let user = StoredUser {
            id,
            email: format!("created.{}@reqres.in", id),
            first_name: name.to_string(),
            last_name: String::new(),
        };
        state.created.insert(id, user);
        body.insert("id".into(), Value::String(id.to_string()));
        body.insert("createdAt".into(), Value::String(self.now()));
        self.json(201, Value::Object(body))
    }

    fn update(&self, id: &str, request: &Request) -> ResponseTemplate {
        let mut body = request_object(request);
        if let (Ok(id), Some(name)) = (id.parse::<u64>(), body.get("name").and_then(Value::as_str))
        {
            let mut state = self.state.lock().unwrap();
            if let Some(user) = state.created.get_mut(&id) {
                user.first_name = name.to_string();
            }
        }
        body.insert("updatedAt".into(), Value::String(self.now()));
        self.json(200, Value::Object(body))
    }

    fn delete(&self, id: &str) -> ResponseTemplate {
        if !self.forgets_deletes {
            if let Ok(id) = id.parse::<u64>() {
                let mut state = self.state.lock().unwrap();
                state.created.remove(&id);
                state.listed.remove(&id);
            }
        }
        self.with_nel(ResponseTemplate::new(204))
    }

    fn register(&self, request: &Request) -> ResponseTemplate {
        let body = request_object(request);
        let field = |name: &str| {
            body.get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let (email, password) = (field("email"), field("password"));
        if email.is_empty() {
            self.json(400, json!({"error": "Missing email or username"}))
        } else if password.is_empty() {
            self.json(400, json!({"error": "Missing password"}))
        } else if email != REGISTERED_EMAIL {
            self.json(
                400,
                json!({"error": "Note: Only defined users succeed registration"}),
            )
        } else {
            self.json(200, json!({"id": 4, "token": self.token}))
        }
    }
}

fn request_object(request: &Request) -> Map<String, Value> {
    serde_json::from_slice(&request.body).unwrap_or_default()
}

impl Respond for FakeReqres {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let segments: Vec<&str> = request
            .url
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        match (request.method.as_str(), segments.as_slice()) {
            ("GET", ["api", "users"]) => self.list(request),
            ("POST", ["api", "users"]) => self.create(request),
            ("GET", ["api", "users", id]) => self.get(id),
            ("PUT", ["api", "users", id]) => self.update(id, request),
            ("DELETE", ["api", "users", id]) => self.delete(id),
            ("POST", ["api", "register"]) => self.register(request),
            _ => self.not_found(),
        }
    }
}
