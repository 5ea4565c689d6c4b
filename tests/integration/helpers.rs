//! Shared test helpers for integration tests.
//!
//! Tests need a PostgreSQL database named by `DRIVEBOX_TEST_DATABASE_URL`.
//! When it is unset, `TestApp::try_new` returns `None` and the test is
//! skipped. Every test provisions its own user, so tests can share one
//! database and run concurrently.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use drivebox_api::app::{build_app, build_state};
use drivebox_api::auth::Claims;
use drivebox_core::config::AppConfig;
use drivebox_database::DatabasePool;
use drivebox_database::migration::run_migrations;

const JWT_SECRET: &str = "integration-test-secret";
const BOUNDARY: &str = "drivebox-test-boundary";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Database pool for direct queries
    pub db_pool: PgPool,
    /// Storage root backing this app
    pub storage: TempDir,
}

/// A provisioned user and a valid token for them.
pub struct TestUser {
    pub id: Uuid,
    pub email: String,
    pub token: String,
}

/// One part of a multipart upload body.
pub enum Part<'a> {
    Field(&'a str, &'a str),
    File {
        name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

impl TestApp {
    /// Build an app over the test database, or `None` when no database is
    /// configured.
    pub async fn try_new() -> Option<Self> {
        let Ok(url) = std::env::var("DRIVEBOX_TEST_DATABASE_URL") else {
            eprintln!("DRIVEBOX_TEST_DATABASE_URL not set, skipping");
            return None;
        };

        let storage = TempDir::new().expect("Failed to create storage root");
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "database": { "url": url, "max_connections": 5, "min_connections": 1 },
            "auth": { "jwt_secret": JWT_SECRET },
            "storage": {
                "mode": "development",
                "development_root": storage.path().to_string_lossy(),
                "public_app_url": "http://drivebox.test",
            },
            "share": { "link_base_url": "http://drivebox.test/shared" },
        }))
        .expect("Invalid test config");

        let db_pool = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to connect to test database")
            .into_pool();
        run_migrations(&db_pool)
            .await
            .expect("Failed to run migrations");

        let state = build_state(config, db_pool.clone())
            .await
            .expect("Failed to build state");

        Some(Self {
            router: build_app(state),
            db_pool,
            storage,
        })
    }

    /// Insert a user with the given quota and issue a token for them.
    pub async fn create_user(&self, max_storage_size: i64) -> TestUser {
        let id = Uuid::new_v4();
        let email = format!("user-{}@test.com", id.simple());

        sqlx::query("INSERT INTO users (id, email, name, max_storage_size) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(&email)
            .bind("Test User")
            .bind(max_storage_size)
            .execute(&self.db_pool)
            .await
            .expect("Failed to create test user");

        TestUser {
            id,
            email,
            token: token_for(id),
        }
    }

    /// The directory a user's root folder maps to.
    pub fn user_dir(&self, user: &TestUser) -> PathBuf {
        self.storage.path().join(&user.email)
    }

    /// Make a JSON request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .header("User-Agent", "Mozilla/5.0 (X11; Linux x86_64) Firefox/124.0")
            .header("X-Forwarded-For", "203.0.113.7");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Send a multipart upload built from `parts`, in order.
    pub async fn upload(&self, token: &str, parts: &[Part<'_>]) -> TestResponse {
        let mut body = multipart_body(parts);
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.send(upload_request(token, Body::from(body))).await
    }

    /// Send `parts` and then the first `sent` bytes of one more file part,
    /// after which the body stream fails as if the client disconnected.
    pub async fn upload_cut_off(
        &self,
        token: &str,
        parts: &[Part<'_>],
        name: &str,
        sent: &[u8],
    ) -> TestResponse {
        let mut head = multipart_body(parts);
        head.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        head.extend_from_slice(sent);

        let chunks: Vec<Result<Bytes, std::io::Error>> = vec![
            Ok(Bytes::from(head)),
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "client went away",
            )),
        ];
        let body = Body::from_stream(futures::stream::iter(chunks));
        self.send(upload_request(token, body)).await
    }

    /// Make every activity insert for `user` fail. Returns the trigger name
    /// to hand to [`TestApp::restore_activity_writes`].
    pub async fn break_activity_writes(&self, user: &TestUser) -> String {
        let name = format!("reject_activity_{}", user.id.simple());
        let sql = format!(
            "CREATE FUNCTION {name}() RETURNS trigger LANGUAGE plpgsql AS $$ \
             BEGIN \
                 IF NEW.user_id = '{id}' THEN RAISE EXCEPTION 'activity log unavailable'; END IF; \
                 RETURN NEW; \
             END $$; \
             CREATE TRIGGER {name} BEFORE INSERT ON file_activities \
             FOR EACH ROW EXECUTE FUNCTION {name}();",
            id = user.id
        );
        sqlx::raw_sql(&sql)
            .execute(&self.db_pool)
            .await
            .expect("Failed to install activity trigger");
        name
    }

    pub async fn restore_activity_writes(&self, name: &str) {
        let sql = format!(
            "DROP TRIGGER IF EXISTS {name} ON file_activities; DROP FUNCTION IF EXISTS {name}();"
        );
        sqlx::raw_sql(&sql)
            .execute(&self.db_pool)
            .await
            .expect("Failed to remove activity trigger");
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            raw: body_bytes.to_vec(),
            body,
        }
    }

    /// Upload a single file into the user's root and return its JSON record.
    pub async fn upload_one(&self, user: &TestUser, name: &str, data: &[u8]) -> Value {
        let response = self
            .upload(
                &user.token,
                &[Part::File {
                    name,
                    content_type: "text/plain",
                    data,
                }],
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.body["files"][0].clone()
    }

    /// Number of file rows a user owns.
    pub async fn file_count(&self, user: &TestUser) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM files WHERE user_id = $1")
            .bind(user.id)
            .fetch_one(&self.db_pool)
            .await
            .expect("Failed to count files")
    }

    /// `(used_storage, usage_percentage, notification_sent)` of the latest
    /// snapshot, if any.
    pub async fn latest_snapshot(&self, user: &TestUser) -> Option<(i64, f64, bool)> {
        sqlx::query_as(
            "SELECT used_storage, storage_usage_percentage, notification_sent \
             FROM storage_snapshots WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user.id)
        .fetch_optional(&self.db_pool)
        .await
        .expect("Failed to read snapshot")
    }

    /// Activity action names recorded for a user, oldest first.
    pub async fn activity_actions(&self, user: &TestUser) -> Vec<String> {
        sqlx::query_scalar(
            "SELECT action FROM file_activities WHERE user_id = $1 ORDER BY created_at ASC",
        )
        .bind(user.id)
        .fetch_all(&self.db_pool)
        .await
        .expect("Failed to read activities")
    }
}

/// Encoded multipart parts, without the closing boundary.
fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Field(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"files\"; filename=\"{name}\"\r\n\
                         Content-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body
}

fn upload_request(token: &str, body: Body) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/files/upload")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("Authorization", format!("Bearer {}", token))
        .body(body)
        .expect("Failed to build request")
}

/// A valid HS256 token for `user_id`, one hour out.
pub fn token_for(user_id: Uuid) -> String {
    let exp = chrono::Utc::now().timestamp() as u64 + 3600;
    encode(
        &Header::default(),
        &Claims { sub: user_id, exp },
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("Failed to sign token")
}

/// Whether `path` exists on disk.
pub fn exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().exists()
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: axum::http::HeaderMap,
    /// Raw body bytes
    pub raw: Vec<u8>,
    /// Parsed JSON body (`Null` when the body is not JSON)
    pub body: Value,
}
