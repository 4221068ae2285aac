//! Polling coordinator: one refresh loop bound to the selected service
//!
//! The coordinator is the only component that has to reason about
//! concurrency: the four per-tick fetches complete in any order, and a
//! fetch issued for one service may resolve after the user has switched
//! to another. Every fetch is tagged with the selection generation it
//! was issued under, and a commit is dropped if the generation has
//! moved on by the time the response arrives.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::MetricsClient;
use crate::state::{DashboardState, StateHandle};
use crate::window::current_epoch;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

pub struct PollingCoordinator {
    client: Arc<MetricsClient>,
    state: StateHandle,
    interval: Duration,
    session: CancellationToken,
    loop_token: Mutex<Option<CancellationToken>>,
}

impl PollingCoordinator {
    pub fn new(
        client: Arc<MetricsClient>,
        state: StateHandle,
        interval: Duration,
        session: CancellationToken,
    ) -> Self {
        Self {
            client,
            state,
            interval,
            session,
            loop_token: Mutex::new(None),
        }
    }

    pub fn state(&self) -> &StateHandle {
        &self.state
    }

    /// Fetch the service list once and select the first entry.
    /// Selection happens here exactly once; afterwards only
    /// `select_service` changes it.
    pub async fn start(&self) -> crate::Result<()> {
        let services = self.client.list_services().await?;
        tracing::info!("Loaded {} services", services.len());

        let initial = {
            let mut state = self.state.write().await;
            state.set_services(services)
        };

        if let Some(service) = initial {
            self.select_service(service).await;
        } else {
            tracing::warn!("Service list is empty, nothing to poll");
        }

        Ok(())
    }

    /// Bind the polling loop to a new service. The previous loop is
    /// cancelled before the next tick can fire, and its in-flight
    /// fetches are left to die against the bumped generation.
    pub async fn select_service(&self, service: String) {
        let generation = {
            let mut state = self.state.write().await;
            state.select(service.clone())
        };

        let token = self.session.child_token();
        let previous = {
            let mut guard = self.loop_token.lock().expect("loop token lock poisoned");
            guard.replace(token.clone())
        };
        if let Some(previous) = previous {
            previous.cancel();
        }

        tracing::info!("Selected service '{}' (generation {})", service, generation);

        let client = Arc::clone(&self.client);
        let state = Arc::clone(&self.state);
        let interval = self.interval;
        tokio::spawn(async move {
            poll_loop(client, state, service, generation, interval, token).await;
        });
    }

    /// Change the display window. Out-of-set values are ignored.
    pub async fn set_window(&self, window_seconds: i64) -> bool {
        let accepted = self.state.write().await.set_window(window_seconds);
        if accepted {
            tracing::info!("Display window set to {}s", window_seconds);
        } else {
            tracing::warn!("Ignoring unsupported window of {}s", window_seconds);
        }
        accepted
    }

    /// Tear the session down: stop the loop and reset state to
    /// defaults. The reset bumps the generation, so in-flight fetches
    /// resolve into discards rather than resurrecting old data.
    pub async fn shutdown(&self) {
        let token = self.loop_token.lock().expect("loop token lock poisoned").take();
        if let Some(token) = token {
            token.cancel();
        }
        self.state.write().await.reset();
        tracing::info!("Polling stopped");
    }
}

async fn poll_loop(
    client: Arc<MetricsClient>,
    state: StateHandle,
    service: String,
    generation: u64,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        // The fetches are deliberately detached: a slow response must
        // not delay the other three or the next tick. Overlapping
        // in-flight fetches across ticks are allowed and uncoalesced.
        drop(spawn_fetches(&client, &state, &service, generation));

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = cancel.cancelled() => {
                tracing::debug!("Polling loop for '{}' cancelled", service);
                break;
            }
        }
    }
}

/// Issue one round of the four fetches as independent tasks. Each task
/// commits its own field on success and logs-and-retains on failure.
fn spawn_fetches(
    client: &Arc<MetricsClient>,
    state: &StateHandle,
    service: &str,
    generation: u64,
) -> Vec<JoinHandle<()>> {
    tracing::debug!("Polling '{}'", service);

    let samples = {
        let (client, state, service) = clone_refs(client, state, service);
        tokio::spawn(async move {
            match client.fetch_samples(&service).await {
                Ok(samples) => {
                    commit(&state, generation, |s, now| s.commit_samples(samples, now)).await
                }
                Err(e) => tracing::debug!("Samples fetch for '{}' failed: {}", service, e),
            }
        })
    };

    let status = {
        let (client, state, service) = clone_refs(client, state, service);
        tokio::spawn(async move {
            match client.fetch_status(&service).await {
                Ok(status) => {
                    commit(&state, generation, |s, now| s.commit_status(status, now)).await
                }
                Err(e) => tracing::debug!("Status fetch for '{}' failed: {}", service, e),
            }
        })
    };

    let alerts = {
        let (client, state, service) = clone_refs(client, state, service);
        tokio::spawn(async move {
            match client.fetch_alerts(&service).await {
                Ok(alerts) => {
                    commit(&state, generation, |s, now| s.commit_alerts(alerts, now)).await
                }
                Err(e) => tracing::debug!("Alerts fetch for '{}' failed: {}", service, e),
            }
        })
    };

    let active = {
        let (client, state, service) = clone_refs(client, state, service);
        tokio::spawn(async move {
            match client.fetch_active_alert_count(&service).await {
                Ok(count) => {
                    commit(&state, generation, |s, now| {
                        s.commit_active_alert_count(count, now)
                    })
                    .await
                }
                Err(e) => tracing::debug!("Active-alert fetch for '{}' failed: {}", service, e),
            }
        })
    };

    vec![samples, status, alerts, active]
}

fn clone_refs(
    client: &Arc<MetricsClient>,
    state: &StateHandle,
    service: &str,
) -> (Arc<MetricsClient>, StateHandle, String) {
    (Arc::clone(client), Arc::clone(state), service.to_string())
}

/// Apply a state mutation, but only if the selection generation the
/// fetch was issued under is still current. The check and the write
/// happen under the same lock, so a service switch can never interleave
/// between them.
async fn commit<F>(state: &StateHandle, generation: u64, apply: F)
where
    F: FnOnce(&mut DashboardState, i64),
{
    let now = current_epoch();
    let mut state = state.write().await;
    if state.generation != generation {
        tracing::debug!(
            "Discarding fetch result from generation {} (current {})",
            generation,
            state.generation
        );
        return;
    }
    apply(&mut state, now);
}
