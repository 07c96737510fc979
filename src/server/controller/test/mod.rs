use std::{net::SocketAddr, time::Duration};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tower::ServiceExt;

use crate::server::{
    background::BackgroundTasks,
    config::{Config, DatabaseConfig, LimiterConfig, ShutdownConfig},
    mailer::{Email, Mailer},
    router,
    state::AppState,
};
use test_utils::{builder::TestBuilder, context::TestContext, factory};


const TRUSTED_ORIGIN: &str = "https://trusted.example";

struct TestApp {
    router: Router,
    state: AppState,
    emails: UnboundedReceiver<Email>,
    _context: TestContext,
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

fn test_config(limiter: LimiterConfig) -> Config {
    Config {
        port: 0,
        env: "test".to_string(),
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            idle_timeout: Duration::from_secs(60),
        },
        limiter,
        shutdown: ShutdownConfig::default(),
        smtp_sender: "Marquee <no-reply@marquee.test>".to_string(),
        cors_trusted_origins: vec![TRUSTED_ORIGIN.to_string()],
    }
}

fn unlimited() -> LimiterConfig {
    LimiterConfig {
        enabled: false,
        ..LimiterConfig::default()
    }
}

impl TestApp {
    async fn new() -> Self {
        Self::with(unlimited(), router::routes()).await
    }

    async fn with(limiter: LimiterConfig, routes: Router<AppState>) -> Self {
        let context = TestBuilder::new()
            .with_catalogue_tables()
            .build()
            .await
            .unwrap();
        let db = context.db.clone().unwrap();
        for code in ["movies:read", "movies:write"] {
            factory::permission::find_or_create_permission(&db, code)
                .await
                .unwrap();
        }

        let (tap, emails) = unbounded_channel();
        let mailer = Mailer::new("Marquee <no-reply@marquee.test>").with_tap(tap);
        let state = AppState::new(db, test_config(limiter), BackgroundTasks::new(), mailer);

        Self {
            router: router::with_middleware(routes, state.clone()),
            state,
            emails,
            _context: context,
        }
    }

    fn db(&self) -> &sea_orm::DatabaseConnection {
        &self.state.db
    }

    /// Creates an activated user holding `permissions` and returns a bearer token for it.
    async fn bearer_with(&self, permissions: &[&str]) -> String {
        let user = factory::user::UserFactory::new(self.db())
            .activated(true)
            .permissions(permissions)
            .build()
            .await
            .unwrap();
        let (plaintext, _) = factory::token::TokenFactory::new(self.db(), user.id)
            .build()
            .await
            .unwrap();

        plaintext
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = request(method, uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// Waits for the next message the mailer delivered.
    async fn next_email(&mut self) -> Email {
        tokio::time::timeout(Duration::from_secs(5), self.emails.recv())
            .await
            .expect("no email within 5s")
            .expect("mailer tap closed")
    }
}

/// Request builder carrying a peer address, as the connect-info service would attach.
fn request(method: Method, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .extension(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40000))))
}

fn movie_body(title: &str) -> Value {
    json!({
        "title": title,
        "year": 2016,
        "runtime": "107 mins",
        "genres": ["animation", "adventure"],
    })
}
