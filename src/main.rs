//! Campus Attendance Backend
//!
//! A REST backend for schedule management and student attendance tracking
//! with SQLite persistence.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod scheduling;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use scheduling::YearMap;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub year_map: Arc<YearMap>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Campus Attendance Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Create application state
    let state = AppState {
        repo,
        year_map: Arc::new(YearMap::standard()),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API routes
    let api_routes = Router::new()
        // Schedules
        .route("/schedules", get(api::list_schedules))
        .route("/schedules", post(api::create_schedule))
        .route("/schedules/availability", get(api::check_availability))
        .route("/schedules/overlapping", get(api::overlapping_schedules))
        .route(
            "/schedules/location/{location}",
            get(api::schedules_by_location),
        )
        .route("/schedules/branch/{branch}", get(api::schedules_by_branch))
        .route("/schedules/{id}", get(api::get_schedule))
        .route("/schedules/{id}", put(api::update_schedule))
        .route("/schedules/{id}", delete(api::delete_schedule))
        .route("/schedules/{id}/mark", put(api::update_mark_status))
        // Attendance
        .route(
            "/schedules/{id}/attendance",
            get(api::attendance_for_schedule),
        )
        .route(
            "/schedules/{id}/attendance/present",
            get(api::present_for_schedule),
        )
        .route(
            "/schedules/{id}/attendance/absent",
            get(api::absent_for_schedule),
        )
        .route("/attendance/mark", post(api::mark_attendance))
        .route("/attendance/mark/batch", post(api::mark_attendance_batch))
        .route(
            "/attendance/mark/by-time",
            post(api::mark_attendance_by_time),
        )
        .route("/attendance/dates", get(api::attendance_dates))
        // Students
        .route("/students", get(api::list_students))
        .route("/students", post(api::create_student))
        .route("/students/details", post(api::student_details));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
