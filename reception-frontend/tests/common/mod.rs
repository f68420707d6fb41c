use axum::{
    extract::State,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use reception_frontend::config::{ReceptionSettings, ServerSettings, Settings, TelemetrySettings};
use reception_frontend::startup::Application;
use secrecy::Secret;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_KEY: &str = "secret123";

/// Behaviour of the stand-in reception API.
pub struct StubApi {
    pub attempts_allowed: usize,
    pub feed_status: StatusCode,
    pub posts: Value,
    pub attempts: AtomicUsize,
    pub feed_calls: AtomicUsize,
    /// `x-forwarded-for` of every verification request, in order.
    pub forwarded_for: Mutex<Vec<String>>,
}

impl StubApi {
    pub fn new() -> Self {
        Self {
            attempts_allowed: 3,
            feed_status: StatusCode::OK,
            posts: json!([
                { "id": "old", "title": "Gammalt inlägg", "publishDate": { "_seconds": 10, "_nanoseconds": 0 } },
                { "id": "new", "title": "Nytt inlägg", "publishDate": { "_seconds": 30, "_nanoseconds": 0 } },
                { "id": "mid", "title": "Mellaninlägg", "publishDate": { "_seconds": 20, "_nanoseconds": 0 } }
            ]),
            attempts: AtomicUsize::new(0),
            feed_calls: AtomicUsize::new(0),
            forwarded_for: Mutex::new(Vec::new()),
        }
    }

    pub fn feed_calls(&self) -> usize {
        self.feed_calls.load(Ordering::SeqCst)
    }

    pub fn forwarded_for(&self) -> Vec<String> {
        self.forwarded_for.lock().unwrap().clone()
    }
}

async fn verify(
    State(stub): State<Arc<StubApi>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    stub.forwarded_for.lock().unwrap().push(forwarded);

    let attempt = stub.attempts.fetch_add(1, Ordering::SeqCst) + 1;
    if attempt > stub.attempts_allowed {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({ "error": "Too many attempts" })),
        )
            .into_response();
    }

    if body["password"] == TEST_KEY {
        (
            StatusCode::OK,
            [(SET_COOKIE, format!("mottagning_key={}; Path=/; HttpOnly", TEST_KEY))],
            Json(json!({ "mottagning_key": TEST_KEY })),
        )
            .into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Fel lösenord" })),
        )
            .into_response()
    }
}

async fn feed(State(stub): State<Arc<StubApi>>, headers: HeaderMap) -> Response {
    stub.feed_calls.fetch_add(1, Ordering::SeqCst);

    if stub.feed_status != StatusCode::OK {
        return (stub.feed_status, Json(json!({ "error": "store failure" }))).into_response();
    }

    match headers.get("mottagning_key").and_then(|v| v.to_str().ok()) {
        Some(TEST_KEY) => Json(json!({ "posts": stub.posts })).into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Ogiltig nyckel" })),
        )
            .into_response(),
    }
}

pub struct TestApp {
    pub address: String,
    pub api: Arc<StubApi>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(StubApi::new()).await
    }

    pub async fn spawn_with(api: StubApi) -> Self {
        let api = Arc::new(api);

        let stub = Router::new()
            .route("/api/mottagning-password", get(feed).post(verify))
            .with_state(api.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let api_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, stub).await.unwrap();
        });

        let settings = Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 0,
                trusted_proxies: Vec::new(),
            },
            reception: ReceptionSettings {
                secret: Secret::new(TEST_KEY.to_string()),
                api_url,
                request_timeout_secs: 2,
            },
            telemetry: TelemetrySettings::default(),
        };

        let app = Application::build(settings)
            .await
            .expect("Failed to build frontend");
        let address = format!("http://127.0.0.1:{}", app.port());
        tokio::spawn(app.run_until_stopped());

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            address,
            api,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Submit the login form the way the HTMX panel does.
    pub async fn submit(&self, password: &str, url: Option<&str>) -> reqwest::Response {
        self.submit_from(password, url, None).await
    }

    /// As [`submit`](Self::submit), with a browser-supplied `x-forwarded-for`.
    pub async fn submit_from(
        &self,
        password: &str,
        url: Option<&str>,
        forwarded_for: Option<&str>,
    ) -> reqwest::Response {
        let mut form = vec![("password", password)];
        if let Some(url) = url {
            form.push(("url", url));
        }

        let mut request = self
            .client
            .post(self.url("/mottagning"))
            .header("HX-Request", "true");
        if let Some(forwarded_for) = forwarded_for {
            request = request.header("x-forwarded-for", forwarded_for);
        }

        request
            .form(&form)
            .send()
            .await
            .expect("Failed to submit credential")
    }

    pub async fn get_with_cookie(&self, path: &str, cookie: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(self.url(path));
        if let Some(cookie) = cookie {
            request = request.header("cookie", format!("mottagning_key={}", cookie));
        }
        request.send().await.expect("Failed to execute request")
    }
}
