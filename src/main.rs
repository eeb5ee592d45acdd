use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod backend;
mod calibration;
mod config;
mod display;
mod error;
mod service;
mod telemetry;

use backend::{Backend, HttpBackend};
use calibration::CalibrationController;
use config::Cli;
use display::{ConsoleDisplay, TelemetryObserver};
use service::poll_loop::PollLoop;
use service::state::create_shared_range;
use telemetry::DEFAULT_RANGE;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with colors and stderr output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "volume_dial_client=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.to_client_config();

    tracing::info!("Connecting to sensing backend at {}", config.backend_url);

    let backend: Arc<dyn Backend> =
        Arc::new(HttpBackend::new(&config.backend_url, config.request_timeout)?);

    // Seed the active range from the backend, falling back to system defaults
    let initial_range = match backend.read_data().await {
        Ok(reading) => reading.bounds(),
        Err(e) => {
            tracing::warn!("Could not fetch initial bounds ({}), using {}", e, DEFAULT_RANGE);
            DEFAULT_RANGE
        }
    };

    let range = create_shared_range(initial_range);
    let observer: Arc<dyn TelemetryObserver> = Arc::new(ConsoleDisplay::new());

    let mut controller = CalibrationController::new(
        backend.clone(),
        range.clone(),
        observer.clone(),
        config.reminder_interval,
    );

    let poll_loop = PollLoop::new(
        backend,
        range,
        observer,
        config.poll_interval,
        config.buffer_capacity,
    );

    let poll_handle = tokio::spawn(poll_loop.run());

    println!("Commands: start | stop | reset | default | status | quit");

    // Drive calibration commands from stdin until quit or Ctrl+C
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if !dispatch_command(line.trim(), &mut controller).await {
                            break;
                        }
                    }
                    Ok(None) => break, // stdin closed
                    Err(e) => {
                        tracing::error!("Failed to read command: {}", e);
                        break;
                    }
                }
            }
        }
    }

    tracing::info!("Shutting down...");
    poll_handle.abort();

    Ok(())
}

/// Execute one operator command; returns false when the client should exit
async fn dispatch_command(command: &str, controller: &mut CalibrationController) -> bool {
    let result = match command {
        "" => return true,
        "start" => controller.start().await,
        "stop" => controller.stop().await,
        "reset" => controller.reset().await,
        "default" => controller.restore_default().await,
        "status" => {
            println!(
                "State: {}; active range: {}",
                controller.state(),
                controller.active_range().await
            );
            return true;
        }
        "quit" | "exit" => return false,
        other => {
            println!("Unknown command {other:?} - expected start, stop, reset, default, status or quit");
            return true;
        }
    };

    // Failures are already surfaced through the observer
    if let Err(e) = result {
        tracing::debug!("Command {} rejected: {}", command, e);
    }

    true
}

/// Wait for shutdown signal (Ctrl+C)
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Received shutdown signal");
}
