// tests/common/mod.rs

#![allow(dead_code)]

use quizapp::{
    config::{Config, TableNames},
    db::Db,
    routes,
    seed::seed_admin_user,
    state::AppState,
};
use serde_json::{Value, json};
use sqlx::sqlite::SqlitePoolOptions;

pub const ADMIN_EMAIL: &str = "admin@quiz.test";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const JWT_SECRET: &str = "test_secret_for_integration_tests";

pub struct TestApp {
    pub address: String,
    pub db: Db,
    pub client: reqwest::Client,
}

/// Spawns the app on a random port backed by a private in-memory database.
pub async fn spawn_app() -> TestApp {
    // A single connection, so every query sees the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        port: 0,
        tables: TableNames::with_prefix(Some("test")).unwrap(),
        cors_origins: vec![],
        admin_name: "Test Admin".to_string(),
        admin_email: Some(ADMIN_EMAIL.to_string()),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
    };

    let db = Db::new(pool, config.tables.clone());
    db.init_schema().await.expect("Failed to create schema");
    seed_admin_user(&db, &config)
        .await
        .expect("Failed to seed admin");

    let state = AppState {
        db: db.clone(),
        config,
    };
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address,
        db,
        client: reqwest::Client::new(),
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Registers a user and returns the auth response body (id, token, ...).
    pub async fn register(&self, name: &str) -> Value {
        let email = format!("{}_{}@quiz.test", name, &uuid::Uuid::new_v4().to_string()[..8]);
        let response = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "name": name, "email": email, "password": "password123" }))
            .send()
            .await
            .expect("Register failed");
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.expect("Failed to parse register json")
    }

    pub async fn admin_token(&self) -> String {
        let body: Value = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
            .send()
            .await
            .expect("Admin login failed")
            .json()
            .await
            .expect("Failed to parse login json");
        body["token"].as_str().expect("Token not found").to_string()
    }

    /// Creates a quiz as admin and returns it (with answer key).
    pub async fn create_quiz(&self, body: Value) -> Value {
        let token = self.admin_token().await;
        let response = self
            .client
            .post(self.url("/api/quiz"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("Create quiz failed");
        assert_eq!(response.status().as_u16(), 201);
        response.json().await.unwrap()
    }

    pub async fn submit(&self, token: &str, quiz_id: &str, body: Value) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/api/result/submit/{}", quiz_id)))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .expect("Submit failed")
    }
}

/// One question worth 1 point; "4" is the only correct option.
pub fn arithmetic_quiz(published: bool) -> Value {
    json!({
        "title": "Arithmetic",
        "description": "Warm-up",
        "timeLimit": 5,
        "isPublished": published,
        "questions": [{
            "question": "2 + 2 = ?",
            "points": 1,
            "options": [
                { "text": "3", "isCorrect": false },
                { "text": "4", "isCorrect": true },
                { "text": "5", "isCorrect": false }
            ]
        }]
    })
}

/// Id of the option with the given text in the first question.
pub fn option_id(quiz: &Value, text: &str) -> String {
    quiz["questions"][0]["options"]
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["text"] == text)
        .and_then(|o| o["id"].as_str())
        .unwrap()
        .to_string()
}
