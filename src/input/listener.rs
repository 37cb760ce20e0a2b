//! Line reader for the input source
//!
//! Blocking stdin reads run on a dedicated thread and are forwarded to the
//! session over a channel.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use super::commands::InputEvent;

/// Reads committed lines and turns them into input events
pub struct InputListener {
    /// Handed to the reader thread on start so the channel closes at EOF
    event_tx: Option<mpsc::Sender<InputEvent>>,
    running: Arc<AtomicBool>,
}

impl InputListener {
    /// Create a new input listener
    pub fn new(event_tx: mpsc::Sender<InputEvent>) -> Self {
        Self {
            event_tx: Some(event_tx),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start reading stdin on a dedicated thread
    ///
    /// The channel closes when stdin reaches EOF or `stop()` is called.
    pub fn start(&mut self) -> Result<(), InputError> {
        self.start_with(std::io::BufReader::new(std::io::stdin()))
    }

    /// Start reading from any line source
    ///
    /// A listener reads one source only; a second start is rejected.
    pub fn start_with<R>(&mut self, reader: R) -> Result<(), InputError>
    where
        R: BufRead + Send + 'static,
    {
        let event_tx = self.event_tx.take().ok_or(InputError::AlreadyRunning)?;
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);

        thread::Builder::new()
            .name("input-listener".to_string())
            .spawn(move || {
                info!("input listener thread started");

                if let Err(e) = read_lines(reader, &event_tx, &running) {
                    error!(?e, "input listener error");
                }

                running.store(false, Ordering::SeqCst);
                info!("input listener thread stopped");
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                InputError::ThreadSpawn(e.to_string())
            })?;

        Ok(())
    }

    /// Stop forwarding input; takes effect after the next line
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the listener is currently running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

/// Errors that can occur in the input listener
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("input listener was already started")]
    AlreadyRunning,

    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawn(String),

    #[error("failed to read input: {0}")]
    Read(#[from] std::io::Error),
}

fn read_lines<R: BufRead>(
    reader: R,
    event_tx: &mpsc::Sender<InputEvent>,
    running: &AtomicBool,
) -> Result<(), InputError> {
    for line in reader.lines() {
        if !running.load(Ordering::SeqCst) {
            break;
        }

        let line = line?;
        let event = match InputEvent::parse(&line) {
            Ok(event) => event,
            Err(message) => {
                warn!(%message, "ignoring input line");
                continue;
            }
        };

        debug!(?event, "input event");
        let quit = event == InputEvent::Quit;

        // Not in an async context, so block until the session has room
        if event_tx.blocking_send(event).is_err() {
            warn!("failed to send input event - channel closed?");
            break;
        }
        if quit {
            break;
        }
    }

    Ok(())
}
