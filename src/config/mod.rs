//! Configuration module for the Transat gateway.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Transat backend
    pub upstream_url: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Pre-shared key guarding the manual refresh endpoint
    pub api_psk: Option<String>,
    /// Laundry auto-refresh period
    pub refresh_interval: Duration,
    /// Countdown tick period
    pub tick_interval: Duration,
    /// Server status heartbeat period
    pub status_interval: Duration,
    /// Timeout for every upstream request
    pub request_timeout: Duration,
    /// Assumed washer cycle length, used for progress estimation only
    pub washer_cycle: Duration,
    /// Assumed dryer cycle length, used for progress estimation only
    pub dryer_cycle: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_url: "https://transat.destimt.fr".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            log_level: "info".to_string(),
            api_psk: None,
            refresh_interval: Duration::from_secs(300),
            tick_interval: Duration::from_secs(1),
            status_interval: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            washer_cycle: Duration::from_secs(2400),
            dryer_cycle: Duration::from_secs(3600),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let upstream_url = lookup("TRANSAT_UPSTREAM_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.upstream_url);

        let bind_addr = match lookup("TRANSAT_BIND_ADDR") {
            Some(raw) => parse_value("TRANSAT_BIND_ADDR", &raw)?,
            None => defaults.bind_addr,
        };

        let log_level = lookup("TRANSAT_LOG_LEVEL").unwrap_or(defaults.log_level);

        let api_psk = lookup("TRANSAT_API_PSK").filter(|psk| !psk.is_empty());

        Ok(Self {
            upstream_url,
            bind_addr,
            log_level,
            api_psk,
            refresh_interval: duration_var(
                &lookup,
                "TRANSAT_REFRESH_INTERVAL_SECS",
                Duration::from_secs,
                defaults.refresh_interval,
            )?,
            tick_interval: duration_var(
                &lookup,
                "TRANSAT_TICK_INTERVAL_MS",
                Duration::from_millis,
                defaults.tick_interval,
            )?,
            status_interval: duration_var(
                &lookup,
                "TRANSAT_STATUS_INTERVAL_SECS",
                Duration::from_secs,
                defaults.status_interval,
            )?,
            request_timeout: duration_var(
                &lookup,
                "TRANSAT_REQUEST_TIMEOUT_SECS",
                Duration::from_secs,
                defaults.request_timeout,
            )?,
            washer_cycle: duration_var(
                &lookup,
                "TRANSAT_WASHER_CYCLE_SECS",
                Duration::from_secs,
                defaults.washer_cycle,
            )?,
            dryer_cycle: duration_var(
                &lookup,
                "TRANSAT_DRYER_CYCLE_SECS",
                Duration::from_secs,
                defaults.dryer_cycle,
            )?,
        })
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("Invalid {} value: {:?}", key, raw)))
}

/// Read a positive integer variable and convert it to a `Duration`.
fn duration_var<F>(
    lookup: &F,
    key: &str,
    unit: fn(u64) -> Duration,
    default: Duration,
) -> Result<Duration, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let value: u64 = parse_value(key, &raw)?;
    if value == 0 {
        return Err(AppError::Config(format!("{} must be greater than zero", key)));
    }
    Ok(unit(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = from_map(&[]).unwrap();

        assert!(config.api_psk.is_none());
        assert_eq!(config.upstream_url, "https://transat.destimt.fr");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.refresh_interval, Duration::from_secs(300));
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.status_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let config = from_map(&[
            ("TRANSAT_UPSTREAM_URL", "http://localhost:9000/"),
            ("TRANSAT_BIND_ADDR", "0.0.0.0:3000"),
            ("TRANSAT_API_PSK", "secret"),
            ("TRANSAT_TICK_INTERVAL_MS", "250"),
            ("TRANSAT_WASHER_CYCLE_SECS", "1800"),
        ])
        .unwrap();

        assert_eq!(config.upstream_url, "http://localhost:9000");
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.api_psk.as_deref(), Some("secret"));
        assert_eq!(config.tick_interval, Duration::from_millis(250));
        assert_eq!(config.washer_cycle, Duration::from_secs(1800));
        assert_eq!(config.dryer_cycle, Duration::from_secs(3600));
    }

    #[test]
    fn test_empty_psk_disables_auth() {
        let config = from_map(&[("TRANSAT_API_PSK", "")]).unwrap();
        assert!(config.api_psk.is_none());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = from_map(&[("TRANSAT_BIND_ADDR", "not-an-addr")]).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");

        let err = from_map(&[("TRANSAT_REFRESH_INTERVAL_SECS", "soon")]).unwrap_err();
        assert!(err.message().contains("TRANSAT_REFRESH_INTERVAL_SECS"));

        let err = from_map(&[("TRANSAT_TICK_INTERVAL_MS", "0")]).unwrap_err();
        assert!(err.message().contains("greater than zero"));
    }
}
