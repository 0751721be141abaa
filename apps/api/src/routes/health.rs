use axum::{extract::State, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "status": "online",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /api/health
/// Reports which LLM provider, data source and store backend are active.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "ai_provider": state.llm.provider(),
        "model": state.llm.model(),
        "data_source": state.linkedin.source_name(),
        "services": {
            "store": state.store.backend(),
            "fetch_cache": state.linkedin.has_cache(),
            "paraphrase": state.paraphrase.is_enabled()
        }
    }))
}
