//! Restaurant menu endpoint.

use axum::extract::{Query, State};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{GroupedMenu, Mealtime, RestaurantView};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct RestaurantQuery {
    #[serde(default)]
    pub mealtime: Option<String>,
}

/// GET /api/restaurant - Today's menu grouped by mealtime.
pub async fn get_restaurant(
    State(state): State<AppState>,
    Query(query): Query<RestaurantQuery>,
) -> ApiResult<RestaurantView> {
    let mealtime = match query.mealtime.as_deref() {
        Some(raw) => Some(Mealtime::parse(raw).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unknown mealtime {:?}, expected lunch or dinner",
                raw
            ))
        })?),
        None => None,
    };

    let response = state.client.fetch_menu().await?;
    let menu = GroupedMenu::from_response(&response);
    let item_count = mealtime.map(|m| menu.item_count(m));

    success(RestaurantView {
        menu,
        mealtime,
        item_count,
    })
}
