//! App download endpoints.

use axum::{
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};

use super::{success, ApiResult};
use crate::models::DownloadInfo;

fn user_agent(headers: &HeaderMap) -> &str {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// GET /api/downloads - Store links and the detected platform.
pub async fn get_downloads(headers: HeaderMap) -> ApiResult<DownloadInfo> {
    success(DownloadInfo::for_user_agent(user_agent(&headers)))
}

/// GET /download - Send mobile visitors straight to their store.
pub async fn download_redirect(headers: HeaderMap) -> Response {
    let info = DownloadInfo::for_user_agent(user_agent(&headers));
    match info.detected_platform.store_url() {
        Some(url) => Redirect::to(url).into_response(),
        None => success(info).into_response(),
    }
}
