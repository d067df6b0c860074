pub mod application;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod listing;
pub mod notification;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    middleware::{auth::require_session, cors::cors_layer, rate_limit},
    AppState,
};

pub fn router(state: AppState, config: &Config) -> Router {
    let base_routes = Router::new().route("/health", get(health::health));

    let public_api = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::initiate_login))
        .route("/api/auth/login/cancel", post(auth::cancel_login))
        .route("/api/auth/verify", post(auth::verify_login))
        .route("/api/listings", get(listing::list_listings))
        .route("/api/listings/:id", get(listing::get_listing))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::RateLimiter::new(config.public_rps),
            rate_limit::rps_middleware,
        ));

    let session_api = Router::new()
        .route("/api/auth/session", get(auth::current_session))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/listings", post(listing::create_listing))
        .route("/api/listings/:id", patch(listing::update_listing))
        .route(
            "/api/listings/:id/applications",
            get(listing::list_listing_applications),
        )
        .route("/api/applications", post(application::apply))
        .route(
            "/api/applications/:id/status",
            patch(application::update_application_status),
        )
        .route(
            "/api/candidates/:id/applications",
            get(application::list_candidate_applications),
        )
        .route("/api/notifications", get(notification::list_notifications))
        .route(
            "/api/notifications/unread-count",
            get(notification::unread_count),
        )
        .route(
            "/api/notifications/read-all",
            post(notification::mark_all_read),
        )
        .route("/api/notifications/:id/read", post(notification::mark_read))
        .route("/api/dashboard/stats", get(dashboard::get_dashboard_stats))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit::RateLimiter::new(config.api_rps),
            rate_limit::rps_middleware,
        ));

    base_routes
        .merge(public_api)
        .merge(session_api)
        .with_state(state)
        .layer(cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(1024 * 1024))
}
