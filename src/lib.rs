//! Opsdeck - data-synchronization engine for a live service dashboard
//!
//! Polls a monitoring backend's four per-service resources on a fixed
//! cadence, keeps shared state consistent across service switches and
//! teardown, and derives the bounded, filtered projections the
//! rendering widgets consume.

pub mod client;
pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod poller;
pub mod state;
pub mod view;
pub mod window;

pub use config::{load_config, Config};
pub use error::{OpsdeckError, Result};

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::MetricsClient;
use crate::io::ReqwestHttpClient;
use crate::poller::PollingCoordinator;

/// Run a dashboard session with the given configuration.
///
/// Blocks until ctrl-c. Rendering widgets are out of scope; the session
/// logs one composed frame per tick instead.
pub async fn run(config: Config) -> Result<()> {
    config.validate()?;

    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::default());
    let client = Arc::new(MetricsClient::new(config.base_url.clone(), http));
    let state = state::new_state_handle();
    state.write().await.set_window(config.window_seconds);

    let cancel = CancellationToken::new();
    let interval = Duration::from_secs(config.poll_interval_seconds);
    let coordinator =
        PollingCoordinator::new(client, Arc::clone(&state), interval, cancel.clone());

    coordinator.start().await?;

    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for ctrl-c");
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    tracing::info!("Dashboard session started");

    loop {
        tokio::select! {
            _ = tokio::time::sleep(interval) => {
                let view = {
                    let s = state.read().await;
                    view::compose(&s, window::current_epoch())
                };
                tracing::info!(
                    status = %view.status.status,
                    nominal = view.status.nominal,
                    active_alerts = view.alerts.count,
                    cpu = view.gauges[0].value,
                    memory = view.gauges[1].value,
                    disk = view.gauges[2].value,
                    alert_log = view.alert_log.len(),
                    "frame"
                );
            }
            _ = cancel.cancelled() => break,
        }
    }

    coordinator.shutdown().await;
    tracing::info!("Dashboard session ended");

    Ok(())
}
