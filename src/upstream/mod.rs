//! HTTP client for the remote Transat backend.
//!
//! Every failure (transport, non-2xx status, malformed JSON, `success: false`)
//! is reported as a single [`AppError::Upstream`] carrying a display message.

use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;

use crate::errors::AppError;
use crate::models::{
    Availability, EndpointStatistic, GlobalStatistic, LaundryEnvelope, LaundrySnapshot,
    MenuResponse, ServerStatus, StatisticsEnvelope,
};

pub const LAUNDRY_PATH: &str = "/api/washingmachines";
pub const STATUS_PATH: &str = "/status";
pub const GLOBAL_STATISTICS_PATH: &str = "/api/statistics/global";
pub const ENDPOINT_STATISTICS_PATH: &str = "/api/statistics/endpoints";
pub const RESTAURANT_PATH: &str = "/api/restaurant";

/// Read-only client for the Transat API.
#[derive(Debug, Clone)]
pub struct TransatClient {
    http: reqwest::Client,
    base_url: String,
}

impl TransatClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON document, failing on any non-2xx status.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let response = self.http.get(self.url(path)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "HTTP error! Status: {}",
                status.as_u16()
            )));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Fetch the current state of every washer and dryer.
    pub async fn fetch_laundry(&self) -> Result<LaundrySnapshot, AppError> {
        let envelope: LaundryEnvelope = self.get_json(LAUNDRY_PATH).await?;

        match envelope {
            LaundryEnvelope {
                success: true,
                data: Some(snapshot),
            } => Ok(snapshot),
            _ => Err(AppError::Upstream(
                "Failed to fetch laundry data".to_string(),
            )),
        }
    }

    /// Probe the status endpoint. Never fails: errors are reported as offline.
    pub async fn check_status(&self) -> ServerStatus {
        let started = Instant::now();
        let result = self.http.get(self.url(STATUS_PATH)).send().await;
        let checked_at = Utc::now();

        match result {
            Ok(response) if response.status().is_success() => ServerStatus {
                status: Availability::Online,
                latency_ms: started.elapsed().as_millis() as u64,
                checked_at,
            },
            Ok(_) => ServerStatus {
                status: Availability::Offline,
                latency_ms: started.elapsed().as_millis() as u64,
                checked_at,
            },
            Err(e) => {
                tracing::debug!("Status check failed: {}", e);
                ServerStatus::offline(checked_at)
            }
        }
    }

    pub async fn fetch_global_statistics(&self) -> Result<GlobalStatistic, AppError> {
        self.get_json::<StatisticsEnvelope<GlobalStatistic>>(GLOBAL_STATISTICS_PATH)
            .await
            .map(|envelope| envelope.statistics)
            .map_err(|e| with_context("Failed to fetch global statistics", e))
    }

    pub async fn fetch_endpoint_statistics(&self) -> Result<Vec<EndpointStatistic>, AppError> {
        self.get_json::<StatisticsEnvelope<Vec<EndpointStatistic>>>(ENDPOINT_STATISTICS_PATH)
            .await
            .map(|envelope| envelope.statistics)
            .map_err(|e| with_context("Failed to fetch endpoint statistics", e))
    }

    pub async fn fetch_menu(&self) -> Result<MenuResponse, AppError> {
        self.get_json(RESTAURANT_PATH)
            .await
            .map_err(|e| with_context("Failed to fetch menu", e))
    }
}

fn with_context(context: &str, err: AppError) -> AppError {
    AppError::Upstream(format!("{}: {}", context, err.message()))
}
