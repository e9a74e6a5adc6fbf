//! Laundry API endpoints.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::LaundryView;
use crate::AppState;

/// GET /api/laundry - The locally ticked machine view.
pub async fn get_laundry(State(state): State<AppState>) -> ApiResult<LaundryView> {
    success(state.laundry.view().await?)
}

/// POST /api/laundry/refresh - Fetch fresh data from upstream now.
pub async fn refresh_laundry(State(state): State<AppState>) -> ApiResult<LaundryView> {
    state.laundry.refresh().await?;
    success(state.laundry.view().await?)
}
