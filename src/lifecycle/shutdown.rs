//! Signal handling for graceful shutdown

use std::fmt;

use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, warn};

/// Signal that ended the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    Terminate,
    Interrupt,
}

impl fmt::Display for Shutdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shutdown::Terminate => write!(f, "SIGTERM"),
            Shutdown::Interrupt => write!(f, "SIGINT"),
        }
    }
}

/// Waits for SIGTERM or SIGINT
#[derive(Debug, Default)]
pub struct ShutdownSignal;

impl ShutdownSignal {
    pub fn new() -> Self {
        Self
    }

    /// Resolve with the first shutdown signal received
    ///
    /// Never resolves if the signal handlers cannot be registered, so an
    /// unsupported environment still exits through input or `:quit`.
    pub async fn wait(&self) -> Shutdown {
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                (Err(e), _) | (_, Err(e)) => {
                    warn!(?e, "failed to register signal handlers");
                    return std::future::pending().await;
                }
            };

        let received = tokio::select! {
            _ = sigterm.recv() => Shutdown::Terminate,
            _ = sigint.recv() => Shutdown::Interrupt,
        };
        debug!(signal = %received, "shutdown signal");
        received
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use tokio_test::{assert_pending, task};

    #[tokio::test]
    async fn test_wait_pending_without_signal() {
        let shutdown = ShutdownSignal::new();
        let mut wait = task::spawn(shutdown.wait());
        assert_pending!(wait.poll());
    }

    #[test]
    fn test_signal_names() {
        assert_eq!(Shutdown::Terminate.to_string(), "SIGTERM");
        assert_eq!(Shutdown::Interrupt.to_string(), "SIGINT");
    }
}
