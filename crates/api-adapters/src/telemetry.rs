//! Fire-and-forget client telemetry: `POST /logs` with the client's
//! environment fingerprint. Sends happen on a detached task; a failed send
//! is worth a debug line and nothing more.

use configs::ClientConfig;
use domains::models::LogType;
use domains::TelemetrySink;

use crate::dto::{ClientInfo, LogBody};

impl ClientInfo {
    /// Gathers the environment fingerprint once, at startup.
    pub fn gather() -> Self {
        Self {
            user_agent: format!("corkboard/{}", env!("CARGO_PKG_VERSION")),
            language: std::env::var("LANG").unwrap_or_else(|_| "en-US".to_string()),
            platform: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
            timezone: chrono::Local::now().offset().to_string(),
        }
    }
}

pub struct HttpTelemetry {
    http: reqwest::Client,
    endpoint: String,
    enabled: bool,
    client_info: ClientInfo,
}

impl HttpTelemetry {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/logs", config.api_base_url.trim_end_matches('/')),
            enabled: config.telemetry_enabled,
            client_info: ClientInfo::gather(),
        }
    }
}

impl TelemetrySink for HttpTelemetry {
    fn record(&self, log_type: LogType, message: &str) {
        if !self.enabled {
            return;
        }
        let body = LogBody {
            client_info: self.client_info.clone(),
            message: message.to_string(),
            log_type,
        };
        let http = self.http.clone();
        let endpoint = self.endpoint.clone();
        tokio::spawn(async move {
            if let Err(err) = http.post(&endpoint).json(&body).send().await {
                tracing::debug!(error = %err, "telemetry record dropped");
            }
        });
    }
}
