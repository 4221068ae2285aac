//! Typed client for the monitoring backend's REST API

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::io::HttpClient;
use crate::model::{ActiveAlertsResponse, Alert, MetricSample, StatusResponse};

/// Client for the four dashboard resources. Pure transport: no retries,
/// no caching, no timeout beyond what the underlying client provides.
pub struct MetricsClient {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for MetricsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl MetricsClient {
    pub fn new(base_url: impl Into<String>, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        tracing::debug!("Created MetricsClient for {}", base_url);
        Self { base_url, http }
    }

    /// List the known service identifiers
    pub async fn list_services(&self) -> crate::Result<Vec<String>> {
        self.get_json(&format!("{}/services", self.base_url)).await
    }

    /// Fetch the full retained metric series for a service
    pub async fn fetch_samples(&self, service: &str) -> crate::Result<Vec<MetricSample>> {
        self.get_json(&format!("{}/metrics/{}", self.base_url, service))
            .await
    }

    /// Fetch the current status string for a service
    pub async fn fetch_status(&self, service: &str) -> crate::Result<String> {
        let response: StatusResponse = self
            .get_json(&format!("{}/status/{}", self.base_url, service))
            .await?;
        Ok(response.status)
    }

    /// Fetch the alert history snapshot for a service
    pub async fn fetch_alerts(&self, service: &str) -> crate::Result<Vec<Alert>> {
        self.get_json(&format!("{}/alerts/{}", self.base_url, service))
            .await
    }

    /// Fetch the number of currently active alerts for a service
    pub async fn fetch_active_alert_count(&self, service: &str) -> crate::Result<u64> {
        let response: ActiveAlertsResponse = self
            .get_json(&format!("{}/alerts/active/{}", self.base_url, service))
            .await?;
        Ok(response.count)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> crate::Result<T> {
        let response = self.http.get(url).await?;

        if !(200..300).contains(&response.status) {
            return Err(crate::OpsdeckError::Transport(format!(
                "GET {} returned status {}",
                url, response.status
            )));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            crate::OpsdeckError::Transport(format!("GET {}: malformed body: {}", url, e))
        })
    }
}
