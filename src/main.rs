//! fingerspell-viewer: headless fingerspelling playback for rigged hand models
//!
//! The viewer:
//! - Loads a right- or left-handed `.glb` model with one clip per letter
//! - Reads text from stdin and spells each committed line letter by letter
//! - Cross-fades between letter clips on a frame-driven animation mixer
//! - Prints every playback event to stdout as a JSON line
//!
//! Rendering, the orbit camera and the settings widget are left to
//! whatever consumes the event stream.

mod animation;
mod config;
mod events;
mod input;
mod lifecycle;
mod model;
mod prompt;
mod session;
mod state;

use std::io::Write;

use anyhow::{Context, Result};
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::events::ViewerEvent;
use crate::input::InputListener;
use crate::lifecycle::ShutdownSignal;
use crate::model::ModelLoader;
use crate::session::ViewerSession;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for the event stream
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "fingerspell-viewer starting"
    );

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;
    info!(
        asset_dir = ?config.asset_dir,
        handedness = %config.handedness,
        fps = config.frames_per_second,
        "configuration loaded"
    );

    // Create shutdown signal handler
    let shutdown = ShutdownSignal::new();

    // Create channels for inter-component communication
    // Input listener -> session
    let (input_tx, input_rx) = mpsc::channel(32);
    // Model loader -> session
    let (load_tx, load_rx) = mpsc::channel(4);
    // Session and sequencer -> event printer
    let (event_tx, _event_rx) = broadcast::channel::<ViewerEvent>(256);

    let mut event_rx = event_tx.subscribe();
    let mut session = ViewerSession::new(config, ModelLoader::new(load_tx), event_tx);

    let mut input_listener = InputListener::new(input_tx);
    input_listener
        .start()
        .context("failed to start input listener")?;

    session.start();

    info!("viewer initialized, entering main loop");

    // Main event loop
    tokio::select! {
        // Run the session (input, model loads, frame ticks)
        _ = session.run(input_rx, load_rx) => {
            info!(
                handedness = %session.handedness(),
                letters = %session.sequencer().prompt(),
                cursor = session.sequencer().cursor(),
                "session exited"
            );
        }

        // Print events as they happen
        _ = async {
            loop {
                match event_rx.recv().await {
                    Ok(event) => print_event(&event),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "event printer lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        break;
                    }
                }
            }
        } => {
            info!("event printer exited");
        }

        // Wait for shutdown signal
        received = shutdown.wait() => {
            info!(signal = %received, "shutdown signal received");
        }
    }

    // Flush events emitted during the final frame
    while let Ok(event) = event_rx.try_recv() {
        print_event(&event);
    }

    info!("shutting down...");
    input_listener.stop();
    info!("fingerspell-viewer stopped");

    Ok(())
}

/// Write one event as a JSON line to stdout
fn print_event(event: &ViewerEvent) {
    match serde_json::to_string(event) {
        Ok(line) => {
            let mut stdout = std::io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{line}") {
                warn!(?e, "failed to write event");
            }
        }
        Err(e) => error!(?e, %event, "failed to encode event"),
    }
}
