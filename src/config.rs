use std::net::SocketAddr;
use std::time::Duration;

use crate::dispatch::{WebhookTarget, DEFAULT_SPACING};

/// Application-level constants
pub const APP_NAME: &str = "Clinic Dispatch";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default listen address for the dispatch API.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8787";

/// Bound on every outbound HTTP call (webhooks and backend).
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

pub const DEFAULT_SCHEDULING_RESOURCE: &str = "agendamentos";
pub const DEFAULT_RECEIVABLE_RESOURCE: &str = "contas-receber";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "info,clinic_dispatch_lib=debug"
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime configuration, read from `CLINIC_*` environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub backend_url: Option<String>,
    pub backend_token: Option<String>,
    pub scheduling: WebhookTarget,
    pub receivables: WebhookTarget,
    pub http_timeout: Duration,
    pub spacing: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind_addr = parse_or(
            "CLINIC_BIND_ADDR",
            get("CLINIC_BIND_ADDR"),
            DEFAULT_BIND_ADDR,
        )?;
        let timeout_secs: u64 = parse_or(
            "CLINIC_HTTP_TIMEOUT_SECS",
            get("CLINIC_HTTP_TIMEOUT_SECS"),
            &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "CLINIC_HTTP_TIMEOUT_SECS",
                value: "0".into(),
            });
        }
        let spacing_ms: u64 = parse_or(
            "CLINIC_SPACING_MS",
            get("CLINIC_SPACING_MS"),
            &DEFAULT_SPACING.as_millis().to_string(),
        )?;

        Ok(Self {
            bind_addr,
            backend_url: get("CLINIC_BACKEND_URL"),
            backend_token: get("CLINIC_BACKEND_TOKEN"),
            scheduling: WebhookTarget {
                webhook_url: get("CLINIC_SCHEDULING_WEBHOOK_URL"),
                status_resource: get("CLINIC_SCHEDULING_RESOURCE")
                    .unwrap_or_else(|| DEFAULT_SCHEDULING_RESOURCE.to_string()),
            },
            receivables: WebhookTarget {
                webhook_url: get("CLINIC_RECEIVABLE_WEBHOOK_URL"),
                status_resource: get("CLINIC_RECEIVABLE_RESOURCE")
                    .unwrap_or_else(|| DEFAULT_RECEIVABLE_RESOURCE.to_string()),
            },
            http_timeout: Duration::from_secs(timeout_secs),
            spacing: Duration::from_millis(spacing_ms),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<T, ConfigError> {
    let raw = value.unwrap_or_else(|| default.to_string());
    raw.parse()
        .map_err(|_| ConfigError::Invalid { key, value: raw })
}
