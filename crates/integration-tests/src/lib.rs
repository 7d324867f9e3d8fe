//! Integration test harness for the Greenlane storefront.
//!
//! Boots the real application on an ephemeral port with an in-memory
//! `SQLite` database and drives it over HTTP with a cookie-holding
//! [`reqwest`] client, so tests exercise the full stack: routing,
//! sessions, templates, and the repository layer.
//!
//! # Usage
//!
//! ```rust,ignore
//! let app = TestApp::spawn().await;
//! let email = unique_email("jane");
//! app.register_customer(&email, "Jane", "Doe").await;
//!
//! let resp = app.get("/account").await;
//! assert!(resp.status().is_success());
//! ```

use reqwest::{Client, Response};
use secrecy::SecretString;
use serde::Serialize;
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tower_sessions_sqlx_store::SqliteStore;
use uuid::Uuid;

use greenlane_storefront::config::StorefrontConfig;
use greenlane_storefront::db::run_migrations;
use greenlane_storefront::middleware::create_session_layer;
use greenlane_storefront::state::AppState;

/// Password used for every customer the harness registers.
pub const TEST_PASSWORD: &str = "customer-portal-pass-1";

/// A running storefront instance backed by an in-memory database.
pub struct TestApp {
    /// Base URL of the spawned server, e.g. `http://127.0.0.1:54321`.
    pub base_url: String,
    /// HTTP client with a cookie store, so sessions persist across requests.
    pub client: Client,
    /// Handle to the same pool the server uses, for direct assertions.
    pub pool: SqlitePool,
}

impl TestApp {
    /// Spawn the application on an ephemeral port.
    ///
    /// The in-memory database lives as long as its single pooled
    /// connection, so the pool is capped at one connection and shared
    /// between the server and the test's direct queries.
    pub async fn spawn() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        run_migrations(&pool).await.expect("Failed to run migrations");

        let session_store = SqliteStore::new(pool.clone());
        session_store
            .migrate()
            .await
            .expect("Failed to migrate session store");

        let config = test_config();
        let session_layer = create_session_layer(session_store, &config);
        let state = AppState::new(config, pool.clone()).expect("Failed to build app state");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind ephemeral port");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let router = greenlane_storefront::app(state, session_layer);
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("Server stopped unexpectedly");
        });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
            pool,
        }
    }

    /// GET a path relative to the server's base URL.
    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("Request failed")
    }

    /// POST to a path with an empty body.
    pub async fn post(&self, path: &str) -> Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .send()
            .await
            .expect("Request failed")
    }

    /// POST a form to a path relative to the server's base URL.
    ///
    /// Redirect responses are followed, so the returned body is the page
    /// the browser would land on.
    pub async fn post_form<T: Serialize + ?Sized>(&self, path: &str, form: &T) -> Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .form(form)
            .send()
            .await
            .expect("Request failed")
    }

    /// Register a customer and leave the client logged in as them.
    ///
    /// Uses [`TEST_PASSWORD`] as the password.
    pub async fn register_customer(&self, email: &str, first_name: &str, last_name: &str) {
        let resp = self
            .post_form(
                "/auth/register",
                &[
                    ("email", email),
                    ("password", TEST_PASSWORD),
                    ("password_confirm", TEST_PASSWORD),
                    ("first_name", first_name),
                    ("last_name", last_name),
                ],
            )
            .await;

        assert!(
            resp.status().is_success(),
            "Registration failed with status {}",
            resp.status()
        );
        assert!(
            resp.url().path().starts_with("/account"),
            "Registration did not land on the account page: {}",
            resp.url()
        );
    }

    /// Look up a customer's id by email, straight from the database.
    pub async fn customer_id(&self, email: &str) -> i64 {
        sqlx::query_scalar("SELECT id FROM customers WHERE email = ?1")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .expect("Customer not found")
    }
}

/// Generate an email address that cannot collide across tests.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.test", Uuid::new_v4())
}

/// Configuration for the spawned test server.
///
/// Secrets here bypass `from_env` validation on purpose: they only need
/// to be stable for the lifetime of one test process.
fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: std::net::IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://127.0.0.1".to_owned(),
        session_secret: SecretString::from("k9f2mq8vz4wj7xr1c5hn3bt6yd0gl2ps"),
        sentry_dsn: None,
        sentry_environment: None,
    }
}
