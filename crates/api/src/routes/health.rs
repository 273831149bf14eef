use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`. Not wrapped in the `data` envelope so load
/// balancers can read it directly.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"`, or `"degraded"` when the queue database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl HealthResponse {
    fn new(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

/// Report liveness and whether ticket issuance can reach PostgreSQL.
///
/// Always 200; callers decide what `degraded` means for routing.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match antrean_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "Health check could not reach the database");
            false
        }
    };
    Json(HealthResponse::new(db_healthy))
}

/// Routes mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_database_reports_degraded() {
        let body = HealthResponse::new(false);
        assert_eq!(body.status, "degraded");
        assert!(!body.db_healthy);
        assert_eq!(HealthResponse::new(true).status, "ok");
    }
}
