//! Main runtime manager.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::RuntimeConfig;
use crate::error::{Result, RuntimeError};
use crate::handle::MonitorHandle;
use crate::poller::{Monitor, MonitorParts, MonitorPoller};

/// Owns the monitor and the background poller task.
pub struct Runtime {
    /// Shared monitor state.
    monitor: Arc<Monitor>,
    /// Handle to the poller task.
    poller_handle: Option<JoinHandle<()>>,
    /// Shutdown signal sender.
    shutdown_tx: watch::Sender<bool>,
    /// Shutdown signal receiver (for cloning to poller).
    shutdown_rx: watch::Receiver<bool>,
    /// Whether the runtime has been started.
    started: bool,
}

impl Runtime {
    /// Create a new runtime with the given configuration.
    pub fn new(config: RuntimeConfig, parts: MonitorParts) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Self {
            monitor: Arc::new(Monitor::new(config, parts)),
            poller_handle: None,
            shutdown_tx,
            shutdown_rx,
            started: false,
        }
    }

    /// Start the runtime (begins polling).
    ///
    /// The first tick fires immediately, so a cycle runs right away when
    /// monitoring is on.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(RuntimeError::AlreadyStarted);
        }

        info!(
            users = self.monitor.users().len(),
            poll_interval_secs = self.monitor.poll_interval().as_secs(),
            monitoring = self.monitor.is_monitoring(),
            "starting runtime"
        );

        let monitor = Arc::clone(&self.monitor);
        let shutdown_rx = self.shutdown_rx.clone();

        let handle = tokio::spawn(async move {
            let mut poller = MonitorPoller::new(monitor, shutdown_rx);
            poller.run().await;
        });

        self.poller_handle = Some(handle);
        self.started = true;

        debug!("runtime started");

        Ok(())
    }

    /// Stop the runtime gracefully.
    ///
    /// Waits for an in-flight cycle to finish.
    pub async fn shutdown(&mut self) -> Result<()> {
        if !self.started {
            return Err(RuntimeError::NotStarted);
        }

        info!("shutting down runtime");

        self.shutdown_tx.send(true).map_err(|e| {
            RuntimeError::Shutdown(format!("failed to send shutdown signal: {}", e))
        })?;

        if let Some(handle) = self.poller_handle.take() {
            debug!("waiting for poller to stop");
            handle
                .await
                .map_err(|e| RuntimeError::Shutdown(format!("poller task panicked: {}", e)))?;
        }

        self.started = false;

        info!("runtime stopped");

        Ok(())
    }

    /// Handle for controlling and inspecting the monitor.
    pub fn handle(&self) -> MonitorHandle {
        MonitorHandle::new(Arc::clone(&self.monitor))
    }

    /// Check if the runtime has been started.
    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        if self.started {
            let _ = self.shutdown_tx.send(true);
        }
    }
}
