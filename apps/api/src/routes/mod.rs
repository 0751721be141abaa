pub mod health;
pub mod stats;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::state::AppState;
use crate::voice::handlers as voice;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/api/health", get(health::health_handler))
        // Users and targets
        .route(
            "/api/user/profiles/available",
            get(voice::handle_available_profiles),
        )
        .route("/api/user/profile", post(voice::handle_create_user_profile))
        .route("/api/user/profile/:id", get(voice::handle_get_user_profile))
        .route("/api/target/analyze", post(voice::handle_analyze_target))
        // Comments
        .route(
            "/api/comments/generate",
            post(generation::handle_generate_comments),
        )
        .route("/api/humanize", post(generation::handle_humanize))
        .route("/api/history/:user_id", get(generation::handle_history))
        // Stats
        .route("/api/usage-stats", get(stats::usage_stats_handler))
        .route("/api/debug/database", get(stats::debug_database_handler))
        .with_state(state)
}
