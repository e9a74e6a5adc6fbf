//! Statistics and server status models.
//!
//! Field names follow the upstream statistics API and are passed through as-is.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregated statistics for a single upstream endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointStatistic {
    pub endpoint: String,
    pub method: String,
    pub request_count: u64,
    pub avg_duration_ms: f64,
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
    pub success_rate_percent: f64,
    pub first_request: String,
    pub last_request: String,
    pub success_count: u64,
    pub error_count: u64,
}

/// Statistics aggregated over every upstream endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalStatistic {
    pub total_request_count: u64,
    pub global_avg_duration_ms: f64,
    pub global_min_duration_ms: f64,
    pub global_max_duration_ms: f64,
    pub global_success_rate_percent: f64,
    pub first_request: String,
    pub last_request: String,
    pub success_count: u64,
    pub error_count: u64,
}

/// Upstream wraps both statistics payloads as `{ "statistics": ... }`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatisticsEnvelope<T> {
    pub statistics: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Online,
    Offline,
}

/// Result of one heartbeat against the upstream `/status` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerStatus {
    pub status: Availability,
    pub latency_ms: u64,
    pub checked_at: DateTime<Utc>,
}

impl ServerStatus {
    pub fn offline(checked_at: DateTime<Utc>) -> Self {
        Self {
            status: Availability::Offline,
            latency_ms: 0,
            checked_at,
        }
    }

    pub fn is_online(&self) -> bool {
        self.status == Availability::Online
    }
}

/// Status report served at `GET /api/status`.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    #[serde(flatten)]
    pub server: ServerStatus,
    pub started_at: DateTime<Utc>,
}

/// Combined payload served at `GET /api/statistics`.
#[derive(Debug, Clone, Serialize)]
pub struct StatisticsReport {
    pub server: ServerStatus,
    pub global: GlobalStatistic,
    pub endpoints: Vec<EndpointStatistic>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_envelope_parses() {
        let raw = r#"{"statistics": {
            "total_request_count": 42,
            "global_avg_duration_ms": 12.5,
            "global_min_duration_ms": 1,
            "global_max_duration_ms": 250,
            "global_success_rate_percent": 97.6,
            "first_request": "2025-01-01T00:00:00Z",
            "last_request": "2025-03-01T12:00:00Z",
            "success_count": 41,
            "error_count": 1
        }}"#;

        let envelope: StatisticsEnvelope<GlobalStatistic> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.statistics.total_request_count, 42);
        assert_eq!(envelope.statistics.global_min_duration_ms, 1.0);
    }

    #[test]
    fn test_status_report_flattens_server_fields() {
        let now = Utc::now();
        let report = StatusReport {
            server: ServerStatus::offline(now),
            started_at: now,
        };

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["status"], "offline");
        assert_eq!(value["latency_ms"], 0);
        assert!(value["started_at"].is_string());
    }
}
