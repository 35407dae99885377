//! Common test utilities
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::util::ServiceExt;
use uuid::Uuid;

use minibank::api::{self, AppState};
use minibank::auth::JwtKeys;
use minibank::handlers::ensure_admin;
use minibank::store::{BankStore, MemoryStore};

pub const ADMIN_EMAIL: &str = "admin@minibank.test";
pub const ADMIN_PASSWORD: &str = "admin-password";
pub const USER_PASSWORD: &str = "user-password";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<dyn BankStore>,
}

pub fn jwt_keys() -> JwtKeys {
    JwtKeys::new("integration-test-secret-0123456789", "minibank", "minibank-clients")
}

/// Router over a fresh in-memory store with a seeded administrator
pub async fn spawn_app() -> TestApp {
    let store: Arc<dyn BankStore> = Arc::new(MemoryStore::new());
    ensure_admin(store.as_ref(), ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .expect("Failed to seed admin");

    let router = api::build_router(AppState::new(store.clone(), jwt_keys()));
    TestApp { router, store }
}

impl TestApp {
    /// Send a request and decode the JSON body (Null when empty or not JSON)
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/api/v1/login",
            None,
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    pub async fn admin_token(&self) -> String {
        let (status, body) = self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "admin login failed: {}", body);
        body["token"].as_str().unwrap().to_string()
    }

    /// Register `name` as `<name>@example.com`; returns the new user id
    pub async fn register(&self, name: &str) -> Uuid {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/register",
                None,
                Some(json!({
                    "name": name,
                    "email": email_of(name),
                    "password": USER_PASSWORD,
                    "mobile": "555-0100",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
        body["userId"].as_str().unwrap().parse().unwrap()
    }

    pub async fn approve(&self, admin_token: &str, user_id: Uuid, balance: &str) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            &format!("/api/v1/admin/approve-user/{}", user_id),
            Some(admin_token),
            Some(json!({ "balance": balance })),
        )
        .await
    }

    /// Register, approve and log in; returns (user id, token)
    pub async fn approved_user(&self, name: &str, balance: &str) -> (Uuid, String) {
        let admin = self.admin_token().await;
        let user_id = self.register(name).await;
        let (status, body) = self.approve(&admin, user_id, balance).await;
        assert_eq!(status, StatusCode::OK, "approve failed: {}", body);

        let (status, body) = self.login(&email_of(name), USER_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        (user_id, body["token"].as_str().unwrap().to_string())
    }

    /// Add `recipient` as beneficiary of the token's owner; returns the beneficiary id
    pub async fn add_beneficiary(&self, token: &str, recipient: &str) -> Uuid {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/beneficiaries",
                Some(token),
                Some(json!({ "accountIdentifier": email_of(recipient) })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add beneficiary failed: {}", body);
        body["beneficiaryId"].as_str().unwrap().parse().unwrap()
    }
}

pub fn email_of(name: &str) -> String {
    format!("{}@example.com", name.to_lowercase())
}

/// Connect to DATABASE_URL, migrate and empty all tables
pub async fn setup_test_db() -> PgPool {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    minibank::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query("TRUNCATE TABLE transactions, beneficiaries, users CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to clean up DB");

    pool
}
