//! Integration tests for CSE Motors.
//!
//! Each test spawns the full router (all middleware layers included) on an
//! ephemeral port, backed by a fresh in-memory `SQLite` database, and drives
//! it over real HTTP with a cookie-keeping client that does not follow
//! redirects.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p cse-motors-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use cse_motors_core::{AccountType, ClassificationId, Email};
use cse_motors_web::config::MotorsConfig;
use cse_motors_web::db::{self, AccountRepository, ClassificationRepository};
use cse_motors_web::services::auth::AuthService;
use cse_motors_web::state::AppState;
use reqwest::{Client, Response, StatusCode, header};
use secrecy::SecretString;
use sqlx::SqlitePool;

/// Password that satisfies the strength policy.
pub const STRONG_PASSWORD: &str = "Str0ng!Password";

const TOKEN_SECRET: &str = "integration-test-token-secret-a8f3k2m9x7q1";

/// A running server plus a client and direct database access.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub pool: SqlitePool,
}

impl TestApp {
    /// Start a server on `127.0.0.1:0` with an empty, migrated database.
    pub async fn spawn() -> Self {
        let pool = db::connect_in_memory()
            .await
            .expect("in-memory database should open");

        let config = MotorsConfig::development(
            SecretString::from("sqlite::memory:"),
            SecretString::from(TOKEN_SECRET),
        );
        let router = cse_motors_web::app(AppState::new(config, pool.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral port should bind");
        let address = format!(
            "http://{}",
            listener.local_addr().expect("listener has an address")
        );
        tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("server should run");
        });

        let client = Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("client should build");

        Self {
            address,
            client,
            pool,
        }
    }

    /// Absolute URL for a path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET should complete")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST should complete")
    }

    pub async fn register(&self, first: &str, last: &str, email: &str, password: &str) -> Response {
        self.post_form(
            "/account/register",
            &[
                ("account_firstname", first),
                ("account_lastname", last),
                ("account_email", email),
                ("account_password", password),
            ],
        )
        .await
    }

    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_form(
            "/account/login",
            &[("account_email", email), ("account_password", password)],
        )
        .await
    }

    /// Insert an account directly, bypassing the registration form.
    pub async fn create_account(&self, email: &str, account_type: AccountType) {
        let email = Email::parse(email).expect("test email should be valid");
        AuthService::new(&self.pool)
            .create_account("Happy", "Tester", &email, STRONG_PASSWORD, account_type)
            .await
            .expect("account should be created");
    }

    /// Create an employee and sign the client in as them.
    pub async fn login_as_employee(&self) {
        let email = "employee@example.com";
        self.create_account(email, AccountType::Employee).await;
        let response = self.login(email, STRONG_PASSWORD).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    /// Create a client account and sign in as them.
    pub async fn login_as_client(&self) {
        let email = "client@example.com";
        self.create_account(email, AccountType::Client).await;
        let response = self.login(email, STRONG_PASSWORD).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    pub async fn create_classification(&self, name: &str) -> ClassificationId {
        ClassificationRepository::new(&self.pool)
            .create(name)
            .await
            .expect("classification should be created")
            .id
    }

    pub async fn account_count(&self) -> i64 {
        AccountRepository::new(&self.pool)
            .count()
            .await
            .expect("count should succeed")
    }
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Whether the response sets the auth cookie to a non-empty value.
#[must_use]
pub fn sets_auth_cookie(response: &Response) -> bool {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.starts_with("cse_auth=") && !v.starts_with("cse_auth=;"))
}
