use std::sync::Arc;

use auth::Authenticator;
use auth::PasswordHasher;
use auth::TokenService;
use chrono::Utc;
use identity_service::domain::identity::models::DisplayName;
use identity_service::domain::identity::models::Identity;
use identity_service::domain::identity::models::IdentityId;
use identity_service::domain::identity::models::LoginIdentifier;
use identity_service::domain::identity::models::Role;
use identity_service::domain::identity::ports::CredentialStore;
use identity_service::domain::identity::service::IdentityService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryCredentialStore;
use serde_json::json;
use serde_json::Value;

// base64 of "test_secret_key_at_least_32_bytes!"
pub const SIGNING_KEY: &str = "dGVzdF9zZWNyZXRfa2V5X2F0X2xlYXN0XzMyX2J5dGVzIQ==";
pub const DEFAULT_PASSWORD: &str = "pass_word!";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: Arc<InMemoryCredentialStore>,
    pub tokens: TokenService,
    pub api_client: reqwest::Client,
}

impl TestApp {
    /// Spawn the application with a one hour token lifetime
    pub async fn spawn() -> Self {
        Self::spawn_with_lifetime(3_600_000).await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_with_lifetime(token_lifetime_ms: i64) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let tokens = TokenService::from_config(SIGNING_KEY, token_lifetime_ms)
            .expect("Failed to build token service");

        let store = Arc::new(InMemoryCredentialStore::new());
        let identity_service = Arc::new(IdentityService::new(Arc::clone(&store)));
        let authenticator = Arc::new(Authenticator::new(tokens.clone()));

        let router = create_router(identity_service, authenticator);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            store,
            tokens,
            api_client: reqwest::Client::new(),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register an identity and return the response body
    pub async fn register(&self, login_identifier: &str, display_name: &str) -> Value {
        let response = self
            .post("/api/auth/register")
            .json(&json!({
                "login_identifier": login_identifier,
                "display_name": display_name,
                "password": DEFAULT_PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Register an identity and return its id and bearer token
    pub async fn register_with_token(&self, login_identifier: &str) -> (String, String) {
        let body = self.register(login_identifier, "Test").await;
        (
            body["data"]["identity"]["id"].as_str().unwrap().to_string(),
            body["data"]["token"].as_str().unwrap().to_string(),
        )
    }

    /// Seed an administrator straight into the store and return a token for it
    pub async fn seed_admin(&self, login_identifier: &str) -> String {
        let now = Utc::now();
        let admin = Identity {
            id: IdentityId::new(),
            login_identifier: LoginIdentifier::new(login_identifier).unwrap(),
            display_name: DisplayName::new("Admin").unwrap(),
            role: Role::Admin,
            password_hash: PasswordHasher::new().hash(DEFAULT_PASSWORD).unwrap(),
            created_at: now,
            updated_at: now,
        };
        self.store.create(admin).await.expect("Failed to seed admin");

        self.tokens.issue(login_identifier).unwrap().value
    }
}
