/// Shared helpers for API router tests
///
/// These tests exercise the router without a live database: the pool is
/// created lazily and never connects for request paths that are rejected by
/// validation or authorization before any query runs.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use workboard_api::app::{build_router, AppState};
use workboard_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use workboard_shared::auth::jwt::{create_token, Claims, TokenType};
use workboard_shared::models::user::UserRole;

pub const TEST_JWT_SECRET: &str = "router-test-secret-key-32-bytes-long!!";

/// Test harness around the router
pub struct TestApp {
    pub app: Router,
}

impl TestApp {
    /// Builds the router with a lazy pool pointing at an unreachable database
    pub fn new() -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: "postgresql://localhost:1/unreachable".to_string(),
                max_connections: 1,
            },
            jwt: JwtConfig {
                secret: TEST_JWT_SECRET.to_string(),
            },
        };

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect_lazy(&config.database.url)
            .expect("Lazy pool creation should succeed");

        Self {
            app: build_router(AppState::new(pool, config)),
        }
    }

    /// Sends one request through the router
    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("Router should produce a response")
    }

    /// Mints a valid access token for the given user and role
    pub fn access_token(&self, user_id: &str, role: UserRole) -> String {
        let claims = Claims::new(user_id, role, TokenType::Access);
        create_token(&claims, TEST_JWT_SECRET).expect("Token creation should succeed")
    }

    /// Authorization header value for a freshly minted access token
    pub fn auth_header(&self, user_id: &str, role: UserRole) -> String {
        format!("Bearer {}", self.access_token(user_id, role))
    }
}

/// Reads the response body as JSON
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Body should be readable");
    serde_json::from_slice(&bytes).expect("Body should be JSON")
}
