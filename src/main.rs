//! barcode-capture - Scans one barcode from simulated frames on stdin.
//!
//! Each input line becomes one frame whose payload is the line's text, so
//! typing `012345678905` "shows" that code to the camera. A line starting
//! with `manual:` is submitted through manual entry instead. Lines are pushed
//! as raw bytes, so input that is not UTF-8 shows up as an unreadable frame.
//! The first scanned code is printed to stdout; end of input, or a read
//! error, ends the stream.

use std::process::ExitCode;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use barcode_capture::adapters::simulated::{
    RecordingScanListener, SimulatedCaptureDevice, TextPayloadEngine,
};
use barcode_capture::application::scanner::{ControlError, ScannerHandle, ScannerService};
use barcode_capture::config::{AppConfig, ConfigError, LoggingConfig, ValidationError};
use barcode_capture::domain::barcode::Barcode;
use barcode_capture::domain::capture::{ScanError, ScanOutcome};

const MANUAL_PREFIX: &str = "manual:";

#[derive(Debug, Error)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error(transparent)]
    Control(#[from] ControlError),

    #[error("Reading input failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("No barcode scanned: {0}")]
    Scan(ScanError),
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(barcode) => {
            println!("{barcode}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<Barcode, DemoError> {
    let config = AppConfig::load()?;
    config.validate()?;
    init_tracing(&config.logging)?;

    let device = SimulatedCaptureDevice::new().with_buffer(config.scanner.frame_buffer);
    let (scanner, service) = ScannerService::spawn(
        Arc::new(device.clone()),
        Arc::new(TextPayloadEngine::new()),
        Arc::new(RecordingScanListener::new()),
        config.scanner.settings()?,
    );

    scanner.set_active(true).await?;
    let mut feeder = tokio::spawn(feed_stdin(
        BufReader::new(tokio::io::stdin()),
        device,
        scanner.clone(),
    ));

    let settled = scanner.wait_for(|s| s.last_outcome.is_some());
    tokio::pin!(settled);
    let result = tokio::select! {
        biased;
        fed = &mut feeder => match fed {
            Ok(Ok(())) => settled.await.map_err(DemoError::from),
            Ok(Err(err)) => Err(err),
            Err(err) => Err(DemoError::Io(err.into())),
        },
        snapshot = &mut settled => snapshot.map_err(DemoError::from),
    };
    feeder.abort();

    scanner.shutdown().await?;
    if let Err(err) = service.await {
        warn!(error = %err, "Scanner service task failed");
    }
    let snapshot = result?;

    match serde_json::to_string(&snapshot) {
        Ok(json) => debug!(snapshot = %json, "Final scanner state"),
        Err(err) => warn!(error = %err, "Could not serialize scanner state"),
    }

    match snapshot.last_outcome {
        Some(ScanOutcome::Scanned { barcode, source }) => {
            info!(barcode = %barcode, source = ?source, "Scan complete");
            Ok(barcode)
        }
        Some(ScanOutcome::Failed { error }) => Err(DemoError::Scan(error)),
        None => Err(DemoError::Control(ControlError::ControllerClosed)),
    }
}

/// Turns input lines into frames, then ends the stream however input stopped.
async fn feed_stdin<R>(
    input: R,
    device: SimulatedCaptureDevice,
    scanner: ScannerHandle,
) -> Result<(), DemoError>
where
    R: AsyncBufRead + Unpin,
{
    let fed = feed_lines(input, &device, &scanner).await;
    device.end_latest_stream();
    fed
}

/// Pushes each line's raw bytes as one frame until a barcode is delivered.
async fn feed_lines<R>(
    input: R,
    device: &SimulatedCaptureDevice,
    scanner: &ScannerHandle,
) -> Result<(), DemoError>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.split(b'\n');
    scanner
        .wait_for(|s| s.decoding || s.last_outcome.is_some())
        .await?;

    while let Some(mut line) = lines.next_segment().await? {
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        if let Some(typed) = line.strip_prefix(MANUAL_PREFIX.as_bytes()) {
            let Ok(typed) = std::str::from_utf8(typed) else {
                warn!("Manual entry is not valid UTF-8");
                continue;
            };
            match scanner.submit_manual(typed).await {
                Ok(_) => return Ok(()),
                Err(err) => {
                    warn!(code = %err.code(), "Manual entry rejected");
                    continue;
                }
            }
        }

        let Some(feed) = device.latest_feed() else {
            break;
        };
        if !feed.push(line).await {
            break;
        }
    }
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), DemoError> {
    let filter = logging.env_filter()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| DemoError::Logging(e.to_string()))
}
