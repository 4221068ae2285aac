//! Shared dashboard state, owned by one session

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::model::{Alert, MetricSample};

/// The time windows the dashboard can display, in seconds (5m, 15m, 1h, 6h)
pub const WINDOW_CHOICES: [i64; 4] = [300, 900, 3600, 21600];

/// Default display window: 5 minutes
pub const DEFAULT_WINDOW_SECONDS: i64 = 300;

/// Status string shown before the first successful status fetch
pub const STATUS_UNKNOWN: &str = "UNKNOWN";

/// Epoch seconds of the last successful fetch per polled field.
///
/// Never displayed; this is what makes stale-retain observable when a
/// field silently stops refreshing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchTimestamps {
    pub samples: Option<i64>,
    pub status: Option<i64>,
    pub alerts: Option<i64>,
    pub active_alert_count: Option<i64>,
}

/// All state for one dashboard session.
///
/// The four polled fields (`samples`, `status`, `alerts`,
/// `active_alert_count`) are each replaced wholesale when their fetch
/// succeeds and retained unchanged when it fails. There is no
/// cross-field consistency: one rendered frame may mix results from
/// different ticks.
#[derive(Debug)]
pub struct DashboardState {
    pub services: Vec<String>,
    pub selected_service: Option<String>,
    pub samples: Vec<MetricSample>,
    pub status: String,
    pub alerts: Vec<Alert>,
    pub active_alert_count: u64,
    pub window_seconds: i64,
    /// Selection epoch. Bumped on every selection change and on
    /// teardown; commits carrying an older generation are discarded.
    pub generation: u64,
    pub last_success: FetchTimestamps,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            services: Vec::new(),
            selected_service: None,
            samples: Vec::new(),
            status: STATUS_UNKNOWN.to_string(),
            alerts: Vec::new(),
            active_alert_count: 0,
            window_seconds: DEFAULT_WINDOW_SECONDS,
            generation: 0,
            last_success: FetchTimestamps::default(),
        }
    }
}

impl DashboardState {
    /// Record the service list. Returns the first service if this is
    /// the initial (empty) selection, which the caller should then
    /// select.
    pub fn set_services(&mut self, services: Vec<String>) -> Option<String> {
        self.services = services;
        match (&self.selected_service, self.services.first()) {
            (None, Some(first)) => Some(first.clone()),
            _ => None,
        }
    }

    /// Bump the selection epoch and record the new selection.
    /// Returns the new generation, which tags all fetches issued for it.
    pub fn select(&mut self, service: String) -> u64 {
        self.generation += 1;
        self.selected_service = Some(service);
        self.generation
    }

    /// Change the display window. Returns false (state unchanged) for
    /// values outside the supported set.
    pub fn set_window(&mut self, window_seconds: i64) -> bool {
        if WINDOW_CHOICES.contains(&window_seconds) {
            self.window_seconds = window_seconds;
            true
        } else {
            false
        }
    }

    pub fn commit_samples(&mut self, samples: Vec<MetricSample>, now: i64) {
        self.samples = samples;
        self.last_success.samples = Some(now);
    }

    pub fn commit_status(&mut self, status: String, now: i64) {
        self.status = status;
        self.last_success.status = Some(now);
    }

    pub fn commit_alerts(&mut self, alerts: Vec<Alert>, now: i64) {
        self.alerts = alerts;
        self.last_success.alerts = Some(now);
    }

    pub fn commit_active_alert_count(&mut self, count: u64, now: i64) {
        self.active_alert_count = count;
        self.last_success.active_alert_count = Some(now);
    }

    /// Reset everything to defaults, keeping the generation ahead of
    /// any fetch still in flight so its late commit is discarded.
    pub fn reset(&mut self) {
        let generation = self.generation + 1;
        *self = Self::default();
        self.generation = generation;
    }
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<DashboardState>>;

pub fn new_state_handle() -> StateHandle {
    Arc::new(RwLock::new(DashboardState::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_empty() {
        let state = DashboardState::default();
        assert!(state.services.is_empty());
        assert_eq!(state.selected_service, None);
        assert!(state.samples.is_empty());
        assert_eq!(state.status, "UNKNOWN");
        assert!(state.alerts.is_empty());
        assert_eq!(state.active_alert_count, 0);
        assert_eq!(state.window_seconds, 300);
        assert_eq!(state.last_success, FetchTimestamps::default());
    }

    #[test]
    fn set_services_proposes_first_on_initial_load() {
        let mut state = DashboardState::default();
        let first = state.set_services(vec!["svc-a".to_string(), "svc-b".to_string()]);
        assert_eq!(first, Some("svc-a".to_string()));
    }

    #[test]
    fn set_services_keeps_existing_selection() {
        let mut state = DashboardState::default();
        state.select("svc-b".to_string());
        let first = state.set_services(vec!["svc-a".to_string(), "svc-b".to_string()]);
        assert_eq!(first, None);
        assert_eq!(state.selected_service, Some("svc-b".to_string()));
    }

    #[test]
    fn set_services_with_empty_list_proposes_nothing() {
        let mut state = DashboardState::default();
        assert_eq!(state.set_services(Vec::new()), None);
    }

    #[test]
    fn select_bumps_generation() {
        let mut state = DashboardState::default();
        let g1 = state.select("svc-a".to_string());
        let g2 = state.select("svc-b".to_string());
        assert!(g2 > g1);
        assert_eq!(state.selected_service, Some("svc-b".to_string()));
    }

    #[test]
    fn set_window_accepts_supported_values() {
        let mut state = DashboardState::default();
        for w in WINDOW_CHOICES {
            assert!(state.set_window(w));
            assert_eq!(state.window_seconds, w);
        }
    }

    #[test]
    fn set_window_rejects_unsupported_values() {
        let mut state = DashboardState::default();
        assert!(!state.set_window(600));
        assert_eq!(state.window_seconds, 300);
        assert!(!state.set_window(0));
        assert!(!state.set_window(-300));
        assert_eq!(state.window_seconds, 300);
    }

    #[test]
    fn commits_replace_wholesale_and_stamp_last_success() {
        let mut state = DashboardState::default();
        state.commit_samples(
            vec![crate::model::MetricSample {
                timestamp: 100,
                cpu: 1.0,
                memory: 2.0,
                disk: 3.0,
                net_in: 4.0,
                net_out: 5.0,
            }],
            1000,
        );
        state.commit_samples(Vec::new(), 2000);
        assert!(state.samples.is_empty());
        assert_eq!(state.last_success.samples, Some(2000));

        state.commit_status("UP".to_string(), 3000);
        assert_eq!(state.status, "UP");
        assert_eq!(state.last_success.status, Some(3000));

        state.commit_active_alert_count(7, 4000);
        assert_eq!(state.active_alert_count, 7);
        assert_eq!(state.last_success.active_alert_count, Some(4000));
    }

    #[test]
    fn reset_restores_defaults_but_advances_generation() {
        let mut state = DashboardState::default();
        state.select("svc-a".to_string());
        state.commit_status("UP".to_string(), 1000);
        let generation_before = state.generation;

        state.reset();

        assert_eq!(state.selected_service, None);
        assert_eq!(state.status, "UNKNOWN");
        assert!(state.generation > generation_before);
    }
}
