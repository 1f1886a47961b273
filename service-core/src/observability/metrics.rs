use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the process-wide Prometheus recorder.
///
/// Safe to call more than once; only the first call installs a recorder.
/// Returns `None` if another recorder was installed outside this function.
pub fn init_metrics() -> Option<PrometheusHandle> {
    if let Some(handle) = METRICS_HANDLE.get() {
        return Some(handle.clone());
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => Some(METRICS_HANDLE.get_or_init(|| handle).clone()),
        Err(e) => {
            tracing::warn!("Prometheus recorder not installed: {}", e);
            METRICS_HANDLE.get().cloned()
        }
    }
}

/// Render the current metrics in Prometheus text format.
pub fn render_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_default()
}
