//! Periodic snapshot polling with an explicit start/stop lifecycle.
//!
//! A host starts polling when a view mounts and stops it when the view unmounts (or simply
//! drops the handle). The worker polls once immediately, then once per interval.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::AlertRecord;
use crate::error::AppError;
use crate::source::AlertSource;

pub struct RefreshHandle {
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .map(|w| !w.is_finished())
            .unwrap_or(false)
    }

    /// Stop polling and wait for the worker. No callback runs after this returns.
    ///
    /// A callback that panicked is reported as `SOURCE_REFRESH_WORKER_PANICKED`.
    pub fn stop(mut self) -> Result<(), AppError> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> Result<(), AppError> {
        // Dropping the sender wakes the worker with `Disconnected`.
        self.stop_tx.take();
        let Some(worker) = self.worker.take() else {
            return Ok(());
        };
        match worker.join() {
            Ok(()) => {
                info!("alert refresh stopped");
                Ok(())
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic payload".to_string());
                warn!(%reason, "alert refresh worker panicked");
                Err(AppError::new(
                    "SOURCE_REFRESH_WORKER_PANICKED",
                    "Refresh worker stopped after a panic",
                )
                .with_details(format!("reason={reason}")))
            }
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        // Already logged by `shutdown`; there is no caller left to hand the error to.
        if self.shutdown().is_err() {
            debug!("refresh handle dropped after worker panic");
        }
    }
}

/// Start polling `source` every `interval`, delivering each snapshot (or error) to
/// `on_snapshot` on a dedicated worker thread. Errors are passed through untouched; the host
/// decides what to surface.
pub fn start_refresh<S, F>(
    source: S,
    interval: Duration,
    mut on_snapshot: F,
) -> Result<RefreshHandle, AppError>
where
    S: AlertSource + Send + 'static,
    F: FnMut(Result<Vec<AlertRecord>, AppError>) + Send + 'static,
{
    if interval.is_zero() {
        return Err(AppError::new(
            "VALIDATION_REFRESH_INTERVAL_INVALID",
            "Refresh interval must be greater than zero",
        )
        .with_details("interval=0"));
    }

    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    let worker = std::thread::Builder::new()
        .name("alert-refresh".to_string())
        .spawn(move || {
            let mut tick: u64 = 0;
            loop {
                debug!(tick, "polling alert source");
                on_snapshot(source.snapshot());
                tick += 1;
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        })
        .map_err(|e| {
            AppError::new("SOURCE_REFRESH_SPAWN_FAILED", "Failed to start refresh worker")
                .with_details(e.to_string())
                .with_retryable(true)
        })?;

    info!(interval_ms = interval.as_millis() as u64, "alert refresh started");
    Ok(RefreshHandle {
        stop_tx: Some(stop_tx),
        worker: Some(worker),
    })
}
