use tokio::signal::unix::{signal, Signal, SignalKind};
use tracing::info;

use crate::SidecarError;

/// SIGINT and SIGTERM request shutdown. SIGHUP is swallowed so that a
/// controlling terminal going away does not kill the process.
pub struct ShutdownSignals {
    interrupt: Signal,
    terminate: Signal,
    hangup: Signal,
}

impl ShutdownSignals {
    pub fn install() -> Result<Self, SidecarError> {
        let install = |kind: SignalKind| {
            signal(kind).map_err(|e| SidecarError::Fatal(anyhow::anyhow!("signal handler: {}", e)))
        };

        Ok(Self {
            interrupt: install(SignalKind::interrupt())?,
            terminate: install(SignalKind::terminate())?,
            hangup: install(SignalKind::hangup())?,
        })
    }

    /// Resolves with the name of the first shutdown signal received.
    pub async fn recv(mut self) -> &'static str {
        loop {
            tokio::select! {
                _ = self.interrupt.recv() => return "SIGINT",
                _ = self.terminate.recv() => return "SIGTERM",
                _ = self.hangup.recv() => info!("Ignoring SIGHUP"),
            }
        }
    }
}
