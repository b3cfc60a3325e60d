/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use cotask_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = cotask_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use crate::realtime::{ConnectionRegistry, EventPublisher};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post, put},
    Router,
};
use cotask_shared::auth::jwt;
use cotask_shared::models::user::UserRole;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

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

    /// Live WebSocket connections
    pub registry: ConnectionRegistry,

    /// Real-time event fan-out
    pub events: EventPublisher,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        let registry = ConnectionRegistry::new();
        let events = EventPublisher::new(registry.clone());
        Self {
            db,
            config: Arc::new(config),
            registry,
            events,
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Authenticated user extracted from a validated JWT
///
/// Injected into request extensions by [`jwt_auth_layer`] and read by
/// handlers through `Extension<CurrentUser>`.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser {
    /// User id (JWT `sub` claim)
    pub id: uuid::Uuid,

    /// Role carried in the token
    pub role: UserRole,
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// ├── /ws                           # WebSocket upgrade (public)
/// ├── /api/
/// │   ├── /auth/                    # Authentication (public)
/// │   │   ├── POST /register
/// │   │   └── POST /login
/// │   ├── /users/                   # Profiles (authenticated)
/// │   │   ├── GET  /                # List users
/// │   │   ├── GET  /me
/// │   │   └── PUT  /me
/// │   ├── /tasks/                   # Task CRUD (authenticated)
/// │   │   ├── POST   /
/// │   │   ├── GET    /              # ?status=&priority=&sortByDueDate=
/// │   │   ├── PUT    /:id
/// │   │   └── DELETE /:id
/// │   └── /notifications/           # Notifications (authenticated)
/// │       ├── GET   /
/// │       └── PATCH /:id/read
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::realtime::socket;
    use crate::routes;

    // Public routes: health check and WebSocket upgrade
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/ws", get(socket::ws_handler));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // User routes (require JWT authentication)
    let user_routes = Router::new()
        .route("/", get(routes::users::list_users))
        .route("/me", get(routes::users::get_profile))
        .route("/me", put(routes::users::update_profile));

    // Task routes (require JWT authentication)
    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task))
        .route("/", get(routes::tasks::list_tasks))
        .route("/:id", put(routes::tasks::update_task))
        .route("/:id", delete(routes::tasks::delete_task));

    // Notification routes (require JWT authentication)
    let notification_routes = Router::new()
        .route("/", get(routes::notifications::list_notifications))
        .route("/:id/read", patch(routes::notifications::mark_read));

    let protected_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/tasks", task_routes)
        .nest("/notifications", notification_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

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
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(public_routes)
        .nest("/api", api_routes)
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
/// Extracts and validates JWT token from Authorization header,
/// then injects [`CurrentUser`] into request extensions.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    // Extract Authorization header
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    // Parse Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| crate::error::ApiError::Unauthorized("Expected Bearer token".to_string()))?;

    // Validate token
    let claims = jwt::validate_token(token, state.jwt_secret())?;

    // Insert into request extensions
    req.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        role: claims.role,
    });

    Ok(next.run(req).await)
}
