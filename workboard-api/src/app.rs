/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use workboard_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = workboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use workboard_shared::auth::{jwt, middleware::AuthContext};

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── /health                                   # Health check (public)
/// ├── /v1/                                      # API v1 (versioned)
/// │   ├── /auth/
/// │   │   ├── POST /register                    # Public
/// │   │   ├── POST /login                       # Public
/// │   │   ├── POST /refresh                     # Public
/// │   │   └── PUT  /password                    # Authenticated
/// │   ├── /users/                               # Admin only
/// │   │   ├── GET /                             # List users (?role=)
/// │   │   └── PUT /:id/role                     # Change a user's role
/// │   └── /projects/                            # Authenticated
/// │       ├── POST   /                          # Create project
/// │       ├── GET    /                          # List visible projects
/// │       ├── DELETE /:id                       # Remove project (admin)
/// │       ├── POST   /:id/members               # Add member
/// │       ├── GET    /:id/members               # List members
/// │       ├── POST   /:id/tasks                 # Create task
/// │       ├── GET    /:id/tasks                 # List tasks (?status=&unassigned=)
/// │       ├── POST   /:id/tasks/:tid/assign     # Assign task
/// │       ├── POST   /:id/tasks/:tid/start      # Start task
/// │       ├── POST   /:id/tasks/:tid/complete   # Complete task
/// │       └── GET    /:id/dashboard             # Project dashboard
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Password change requires a valid token
    let password_routes = Router::new()
        .route("/password", put(routes::auth::change_password))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // User administration routes (require JWT; admin check is in the handlers)
    let user_routes = Router::new()
        .route("/", get(routes::users::list_users))
        .route("/:id/role", put(routes::users::set_role))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Project, task, and dashboard routes (require JWT authentication)
    let project_routes = Router::new()
        .route("/", post(routes::projects::create_project))
        .route("/", get(routes::projects::list_projects))
        .route("/:id", delete(routes::projects::remove_project))
        .route("/:id/members", post(routes::projects::add_member))
        .route("/:id/members", get(routes::projects::list_members))
        .route("/:id/tasks", post(routes::tasks::create_task))
        .route("/:id/tasks", get(routes::tasks::list_tasks))
        .route("/:id/tasks/:task_id/assign", post(routes::tasks::assign_task))
        .route("/:id/tasks/:task_id/start", post(routes::tasks::start_task))
        .route(
            "/:id/tasks/:task_id/complete",
            post(routes::tasks::complete_task),
        )
        .route("/:id/dashboard", get(routes::dashboard::project_dashboard))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    // Build complete v1 API
    let v1_routes = Router::new()
        .nest("/auth", auth_routes.merge(password_routes))
        .nest("/users", user_routes)
        .nest("/projects", project_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates a Bearer token from the Authorization header,
/// then injects AuthContext into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let token = workboard_shared::auth::middleware::bearer_token(req.headers())?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    let auth_context = AuthContext::from_claims(&claims);
    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
