//! Server status and statistics endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{StatisticsReport, StatusReport};
use crate::AppState;

/// GET /api/status - Latest heartbeat result.
pub async fn get_status(State(state): State<AppState>) -> ApiResult<StatusReport> {
    success(state.status.report().await)
}

/// GET /api/statistics - Global and per-endpoint request statistics.
///
/// The server is probed first; statistics are only fetched when it is online.
pub async fn get_statistics(State(state): State<AppState>) -> ApiResult<StatisticsReport> {
    let server = state.status.check_now().await;
    if !server.is_online() {
        return Err(AppError::Unavailable(
            "Server is offline. Cannot fetch statistics.".to_string(),
        ));
    }

    let global = state.client.fetch_global_statistics().await?;
    let mut endpoints = state.client.fetch_endpoint_statistics().await?;
    endpoints.sort_by(|a, b| b.request_count.cmp(&a.request_count));

    success(StatisticsReport {
        server,
        global,
        endpoints,
    })
}
