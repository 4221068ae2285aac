//! Widget-ready projections of the dashboard state
//!
//! These types are the value contract handed to the rendering layer.
//! Everything here is a pure read of already-fetched state.

use serde::Serialize;

use crate::model::Alert;
use crate::state::DashboardState;
use crate::window::{filter_window, latest};

/// How many alert-history entries the log shows
const ALERT_LOG_LIMIT: usize = 10;

/// Input for a gauge widget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeInput {
    pub title: String,
    pub value: f64,
    pub unit: String,
}

/// One point of a chart series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub timestamp: i64,
    pub value: f64,
}

/// Input for a time-series chart widget
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub title: String,
    pub color_hint: String,
    pub unit: String,
    pub data: Vec<ChartPoint>,
}

/// One row of the alert log, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertLogEntry {
    pub timestamp: i64,
    pub kind: String,
    pub value: f64,
}

/// Status badge: raw backend string plus the nominal flag used for styling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusBadge {
    pub status: String,
    pub nominal: bool,
}

/// Active-alert badge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertBadge {
    pub count: u64,
    pub has_active: bool,
}

/// Everything the rendering layer consumes for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub gauges: Vec<GaugeInput>,
    pub charts: Vec<ChartSeries>,
    pub alert_log: Vec<AlertLogEntry>,
    pub status: StatusBadge,
    pub alerts: AlertBadge,
}

/// Derive the per-widget inputs from the current state. `now` is the
/// window edge, captured once by the caller.
pub fn compose(state: &DashboardState, now: i64) -> DashboardView {
    let filtered = filter_window(&state.samples, state.window_seconds, now);
    let current = latest(&filtered);

    let gauge = |title: &str, value: Option<f64>| GaugeInput {
        title: title.to_string(),
        value: value.unwrap_or(0.0),
        unit: "%".to_string(),
    };

    let gauges = vec![
        gauge("CPU Usage", current.map(|s| s.cpu)),
        gauge("Memory Usage", current.map(|s| s.memory)),
        gauge("Disk Usage", current.map(|s| s.disk)),
    ];

    let series = |title: &str, color_hint: &str, unit: &str, project: fn(&crate::model::MetricSample) -> f64| {
        ChartSeries {
            title: title.to_string(),
            color_hint: color_hint.to_string(),
            unit: unit.to_string(),
            data: filtered
                .iter()
                .map(|s| ChartPoint {
                    timestamp: s.timestamp,
                    value: project(s),
                })
                .collect(),
        }
    };

    // Network series are rescaled from bytes to KB for display.
    let charts = vec![
        series("CPU Usage", "#ef4444", "%", |s| s.cpu),
        series("Memory Usage", "#3b82f6", "%", |s| s.memory),
        series("Network IN", "#22c55e", " KB", |s| s.net_in / 1024.0),
        series("Network OUT", "#a855f7", " KB", |s| s.net_out / 1024.0),
    ];

    DashboardView {
        gauges,
        charts,
        alert_log: alert_log(&state.alerts),
        status: StatusBadge {
            nominal: state.status == "UP",
            status: state.status.clone(),
        },
        alerts: AlertBadge {
            count: state.active_alert_count,
            has_active: state.active_alert_count > 0,
        },
    }
}

/// The most recent entries of the alert history, newest first
fn alert_log(alerts: &[Alert]) -> Vec<AlertLogEntry> {
    alerts
        .iter()
        .rev()
        .take(ALERT_LOG_LIMIT)
        .map(|a| AlertLogEntry {
            timestamp: a.timestamp,
            kind: a.kind.clone(),
            value: a.value,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MetricSample;

    fn sample(timestamp: i64, cpu: f64, memory: f64, disk: f64) -> MetricSample {
        MetricSample {
            timestamp,
            cpu,
            memory,
            disk,
            net_in: 2048.0,
            net_out: 4096.0,
        }
    }

    fn state_with_samples(samples: Vec<MetricSample>) -> DashboardState {
        DashboardState {
            samples,
            ..DashboardState::default()
        }
    }

    #[test]
    fn gauges_show_latest_sample() {
        let state = state_with_samples(vec![
            sample(100, 10.0, 20.0, 30.0),
            sample(200, 55.0, 66.0, 77.0),
        ]);
        let view = compose(&state, 200);

        assert_eq!(view.gauges.len(), 3);
        assert_eq!(view.gauges[0].title, "CPU Usage");
        assert_eq!(view.gauges[0].value, 55.0);
        assert_eq!(view.gauges[1].value, 66.0);
        assert_eq!(view.gauges[2].value, 77.0);
        assert!(view.gauges.iter().all(|g| g.unit == "%"));
    }

    #[test]
    fn gauges_default_to_zero_without_samples() {
        let state = state_with_samples(Vec::new());
        let view = compose(&state, 1000);
        assert!(view.gauges.iter().all(|g| g.value == 0.0));
    }

    #[test]
    fn gauges_default_to_zero_when_all_samples_age_out() {
        let state = state_with_samples(vec![sample(100, 99.0, 99.0, 99.0)]);
        let view = compose(&state, 100_000);
        assert!(view.charts.iter().all(|c| c.data.is_empty()));
        assert!(view.gauges.iter().all(|g| g.value == 0.0));
    }

    #[test]
    fn charts_cover_the_filtered_window() {
        let state = state_with_samples(vec![
            sample(100, 50.0, 0.0, 0.0),
            sample(200, 70.0, 0.0, 0.0),
            sample(400, 90.0, 0.0, 0.0),
        ]);
        // window 300, now 500: t=100 is out
        let mut state = state;
        state.window_seconds = 300;
        let view = compose(&state, 500);

        let cpu = &view.charts[0];
        assert_eq!(cpu.title, "CPU Usage");
        assert_eq!(cpu.color_hint, "#ef4444");
        assert_eq!(
            cpu.data,
            vec![
                ChartPoint {
                    timestamp: 200,
                    value: 70.0
                },
                ChartPoint {
                    timestamp: 400,
                    value: 90.0
                },
            ]
        );
    }

    #[test]
    fn network_series_are_rescaled_to_kb() {
        let state = state_with_samples(vec![sample(100, 0.0, 0.0, 0.0)]);
        let view = compose(&state, 100);

        let net_in = view.charts.iter().find(|c| c.title == "Network IN").unwrap();
        let net_out = view
            .charts
            .iter()
            .find(|c| c.title == "Network OUT")
            .unwrap();
        assert_eq!(net_in.data[0].value, 2.0);
        assert_eq!(net_out.data[0].value, 4.0);
        assert_eq!(net_in.unit, " KB");
    }

    #[test]
    fn alert_log_shows_last_ten_newest_first() {
        let mut state = DashboardState::default();
        state.alerts = (0..15)
            .map(|i| Alert {
                timestamp: i * 100,
                kind: format!("alert-{}", i),
                value: i as f64,
            })
            .collect();

        let view = compose(&state, 10_000);
        assert_eq!(view.alert_log.len(), 10);
        assert_eq!(view.alert_log[0].kind, "alert-14");
        assert_eq!(view.alert_log[9].kind, "alert-5");
    }

    #[test]
    fn short_alert_history_is_shown_whole() {
        let mut state = DashboardState::default();
        state.alerts = vec![
            Alert {
                timestamp: 100,
                kind: "first".to_string(),
                value: 1.0,
            },
            Alert {
                timestamp: 200,
                kind: "second".to_string(),
                value: 2.0,
            },
        ];

        let view = compose(&state, 1000);
        assert_eq!(view.alert_log.len(), 2);
        assert_eq!(view.alert_log[0].kind, "second");
        assert_eq!(view.alert_log[1].kind, "first");
    }

    #[test]
    fn status_badge_nominal_only_for_up() {
        let mut state = DashboardState::default();
        state.status = "UP".to_string();
        assert!(compose(&state, 0).status.nominal);

        for status in ["DOWN", "UNKNOWN", "DEGRADED", "up"] {
            state.status = status.to_string();
            let badge = compose(&state, 0).status;
            assert!(!badge.nominal, "{status} should not be nominal");
            assert_eq!(badge.status, status);
        }
    }

    #[test]
    fn alert_badge_thresholds() {
        let mut state = DashboardState::default();
        state.active_alert_count = 3;
        let badge = compose(&state, 0).alerts;
        assert!(badge.has_active);
        assert_eq!(badge.count, 3);

        state.active_alert_count = 0;
        assert!(!compose(&state, 0).alerts.has_active);
    }
}
