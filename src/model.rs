//! Wire types for the monitoring backend's JSON responses

use serde::{Deserialize, Serialize};

/// One metric sample for a service, timestamped in epoch seconds.
///
/// The backend delivers samples in non-decreasing timestamp order, but
/// duplicates and repeated timestamps are tolerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub timestamp: i64,
    /// CPU usage percentage, 0-100
    pub cpu: f64,
    /// Memory usage percentage, 0-100
    pub memory: f64,
    /// Disk usage percentage, 0-100
    pub disk: f64,
    /// Bytes received during the sample interval
    pub net_in: f64,
    /// Bytes sent during the sample interval
    pub net_out: f64,
}

/// One alert as reported by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: f64,
}

/// Response body of `GET /status/{service}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

/// Response body of `GET /alerts/active/{service}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveAlertsResponse {
    pub count: u64,
}
