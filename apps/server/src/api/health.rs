use std::sync::Arc;

use axum::extract::State;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// Liveness: the process is up and serving.
pub async fn healthz() -> &'static str {
    "ok"
}

/// Readiness: the database/auth backend answers.
pub async fn readyz(State(state): State<Arc<AppState>>) -> ApiResult<&'static str> {
    state.admin.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "Readiness check failed");
        ApiError::Unavailable("Admin backend unavailable".to_string())
    })?;
    Ok("ok")
}
