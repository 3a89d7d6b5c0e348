#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        HeaderMap, Request, StatusCode,
    },
    Router,
};
use chrono::Duration;
use spider_bot_registration::{
    config::ProjectContent,
    gateway::MemoryGateway,
    registration_manager::{CookieConfig, RegistrationManager},
    registration_server::build_router,
};
use std::sync::Arc;
use tower::ServiceExt;

pub const COOKIE_NAME: &str = "test_session";

pub struct TestContext {
    pub app: Router,
    pub gateway: Arc<MemoryGateway>,
    pub registration_manager: Arc<RegistrationManager>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_session_lifetime(Duration::minutes(10))
    }

    pub fn with_session_lifetime(lifetime: Duration) -> Self {
        let gateway = Arc::new(MemoryGateway::default());
        let registration_manager = Arc::new(RegistrationManager::new(
            gateway.to_owned(),
            CookieConfig::new(COOKIE_NAME.to_string(), false),
            ProjectContent::default(),
            lifetime,
        ));
        Self {
            app: build_router(registration_manager.to_owned()),
            gateway,
            registration_manager,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().to_owned();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        TestResponse {
            status,
            headers,
            body: String::from_utf8(body.to_vec()).expect("utf-8 body"),
        }
    }

    ///Loads the page and returns the `name=value` session cookie it set.
    pub async fn open_session(&self, uri: &str) -> (String, TestResponse) {
        let response = self.send(get(uri, None)).await;
        let cookie = response.session_cookie().expect("page view sets a cookie");
        (cookie, response)
    }

    pub async fn post_action(&self, path: &str, cookie: &str) -> TestResponse {
        self.send(post(path, Some(cookie), "")).await
    }

    pub async fn submit(
        &self,
        cookie: &str,
        email: &str,
        phone: &str,
        message: &str,
    ) -> TestResponse {
        let body = format!(
            "email={}&phone={}&message={}",
            form_encode(email),
            form_encode(phone),
            form_encode(message)
        );
        self.send(post("/register", Some(cookie), &body)).await
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn session_cookie(&self) -> Option<String> {
        let set_cookie = self.headers.get(SET_COOKIE)?.to_str().ok()?;
        set_cookie.split(';').next().map(|pair| pair.trim().to_string())
    }

    pub fn error_count(&self) -> usize {
        self.body.matches("<li class=\"error\">").count()
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("valid request")
}

pub fn post(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).expect("valid request")
}

fn form_encode(value: &str) -> String {
    let mut encoded = String::new();
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push('+'),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
