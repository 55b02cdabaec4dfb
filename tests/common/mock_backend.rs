//! Mock attendance backend built on wiremock

use attendbook::client::{ApiClient, AuthContext, Config};
use attendbook::shared::{AppConfig, PageSizes};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_PASS: &str = "test-pass";
pub const TEST_UID: &str = "uid-42";

pub struct TestBackend {
    pub server: MockServer,
}

impl TestBackend {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn api(&self) -> ApiClient {
        self.api_with_sizes(PageSizes::default())
    }

    pub fn api_with_sizes(&self, sizes: PageSizes) -> ApiClient {
        let config = Config::with_builder(
            AppConfig::builder()
                .server_url(self.server.uri())
                .pass(TEST_PASS)
                .page_sizes(sizes),
        )
        .expect("mock server URL is valid");
        ApiClient::new(config)
    }

    /// Logged-in context
    pub fn auth(&self) -> AuthContext {
        AuthContext::in_memory(Some(TEST_UID))
    }

    /// Answer POSTs to `route` whose body contains `body` with `reply`
    pub async fn on_post(&self, route: &str, body: Value, reply: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path(route))
            .and(body_partial_json(body))
            .respond_with(reply)
            .mount(&self.server)
            .await;
    }

    /// Like `on_post`, but the mock must be hit exactly `times` times
    pub async fn expect_post(&self, route: &str, body: Value, reply: ResponseTemplate, times: u64) {
        Mock::given(method("POST"))
            .and(path(route))
            .and(body_partial_json(body))
            .respond_with(reply)
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Number of requests received on `route`
    pub async fn hits(&self, route: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == route)
            .count()
    }
}

/// Success reply: `body` with `status: 1` merged in
pub fn ok(mut body: Value) -> ResponseTemplate {
    if let Some(map) = body.as_object_mut() {
        map.insert("status".into(), json!(1));
    }
    ResponseTemplate::new(200).set_body_json(body)
}

/// Backend-declared failure with a message
pub fn rejected(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"status": 0, "message": message}))
}

/// Same reply, held back for `ms` milliseconds
pub fn slow(reply: ResponseTemplate, ms: u64) -> ResponseTemplate {
    reply.set_delay(Duration::from_millis(ms))
}

pub fn notification(id: u32) -> Value {
    json!({
        "id": id,
        "title": format!("Notice {id}"),
        "description": "Lecture moved",
        "timestamp": "2024-09-02 09:00",
        "type": "academic",
        "is_read": 0
    })
}

/// One page of the notification feed
pub fn notifications_page(ids: impl IntoIterator<Item = u32>, total_pages: u32) -> ResponseTemplate {
    let items: Vec<Value> = ids.into_iter().map(notification).collect();
    ok(json!({"notifications": items, "total_pages": total_pages}))
}

pub fn book(id: i64, title: &str) -> Value {
    json!({"book_id": id, "book_title": title, "created_at": "2024-09-01 10:00:00"})
}
