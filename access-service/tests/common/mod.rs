use std::sync::Arc;

use access_service::domain::identity::models::Identifier;
use access_service::domain::identity::models::Identity;
use access_service::domain::identity::models::SubjectId;
use access_service::domain::identity::service::AuthService;
use access_service::inbound::http::router::create_router;
use access_service::outbound::repositories::InMemoryCredentialStore;
use access_service::outbound::revocation::InMemoryRevocationRegistry;
use auth::HashingParams;
use auth::ManualClock;
use auth::PasswordHasher;
use auth::TokenCodec;
use chrono::Duration;
use chrono::Utc;
use serde_json::Value;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TOKEN_TTL_SECONDS: i64 = 3_600;

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub clock: Arc<ManualClock>,
    pub credential_store: Arc<InMemoryCredentialStore>,
    pub revocation_registry: Arc<InMemoryRevocationRegistry>,
    pub password_hasher: PasswordHasher,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let clock = Arc::new(ManualClock::starting_now());
        let token_codec = Arc::new(
            TokenCodec::with_clock(TEST_SECRET, clock.clone()).expect("Invalid test secret"),
        );
        let password_hasher = PasswordHasher::with_params(HashingParams {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Invalid hashing params");

        let credential_store = Arc::new(InMemoryCredentialStore::new());
        let revocation_registry =
            Arc::new(InMemoryRevocationRegistry::with_clock(clock.clone()));

        let auth_service = Arc::new(
            AuthService::new(
                Arc::clone(&credential_store),
                Arc::clone(&revocation_registry),
                password_hasher.clone(),
                token_codec,
                Duration::seconds(TOKEN_TTL_SECONDS),
            )
            .expect("Failed to build auth service"),
        );

        let router = create_router(auth_service);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            clock,
            credential_store,
            revocation_registry,
            password_hasher,
        }
    }

    /// Register an identity directly in the directory
    pub async fn register(&self, identifier: &str, password: &str, profile: Value) -> SubjectId {
        let identity = Identity {
            id: SubjectId::new(),
            identifier: Identifier::new(identifier).expect("Invalid identifier"),
            password_hash: self.password_hasher.hash(password).expect("Failed to hash"),
            profile: profile.as_object().cloned().unwrap_or_default(),
            created_at: Utc::now(),
        };
        let id = identity.id;

        self.credential_store
            .insert(identity)
            .await
            .expect("Failed to register identity");

        id
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

    /// Log in and return the token, panicking on failure
    pub async fn login(&self, identifier: &str, password: &str) -> String {
        let response = self
            .post("/login")
            .json(&serde_json::json!({
                "identifier": identifier,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["token"]
            .as_str()
            .expect("Missing token in response")
            .to_string()
    }
}
