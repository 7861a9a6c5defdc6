//! ScannerService - Runs the lifecycle controller on its own task.
//!
//! The service is a single-owner actor. Host commands, acquisition reports,
//! and frames are all funnelled into one `select!` loop, so the controller
//! never needs a lock and callbacks fire from one place.
//!
//! # Example
//!
//! ```ignore
//! let (scanner, task) = ScannerService::spawn(device, engine, listener, settings);
//! scanner.set_active(true).await?;
//! let snapshot = scanner.wait_for(|s| s.last_outcome.is_some()).await?;
//! scanner.shutdown().await?;
//! task.await?;
//! ```

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{
    accept_manual_entry, AcquisitionReport, ControlError, LifecycleController, ScannerSettings,
    ScannerSnapshot,
};
use crate::domain::barcode::Barcode;
use crate::ports::{CaptureDevice, DecodeEngine, ScanListener};

/// A host request, answered on its `ack` once applied.
#[derive(Debug)]
pub enum ControlCommand {
    SetActive {
        active: bool,
        ack: oneshot::Sender<()>,
    },
    Retry {
        ack: oneshot::Sender<Result<(), ControlError>>,
    },
    Stop {
        ack: oneshot::Sender<()>,
    },
    ManualEntry {
        barcode: Barcode,
        ack: oneshot::Sender<()>,
    },
    Shutdown {
        ack: oneshot::Sender<()>,
    },
}

pub struct ScannerService {
    controller: LifecycleController,
    commands: mpsc::UnboundedReceiver<ControlCommand>,
    reports: mpsc::UnboundedReceiver<AcquisitionReport>,
}

impl ScannerService {
    /// Builds the service and the handle that drives it. Nothing runs until `run`.
    pub fn new(
        device: Arc<dyn CaptureDevice>,
        engine: Arc<dyn DecodeEngine>,
        listener: Arc<dyn ScanListener>,
        settings: ScannerSettings,
    ) -> (Self, ScannerHandle) {
        let (reports_tx, reports) = mpsc::unbounded_channel();
        let (commands_tx, commands) = mpsc::unbounded_channel();
        let controller = LifecycleController::new(device, engine, listener, settings, reports_tx);

        let handle = ScannerHandle {
            commands: commands_tx,
            snapshots: controller.subscribe(),
        };
        let service = Self {
            controller,
            commands,
            reports,
        };
        (service, handle)
    }

    /// Builds the service and runs it on a new task.
    pub fn spawn(
        device: Arc<dyn CaptureDevice>,
        engine: Arc<dyn DecodeEngine>,
        listener: Arc<dyn ScanListener>,
        settings: ScannerSettings,
    ) -> (ScannerHandle, JoinHandle<()>) {
        let (service, handle) = Self::new(device, engine, listener, settings);
        (handle, tokio::spawn(service.run()))
    }

    /// Runs until `shutdown` is requested or every handle has been dropped.
    ///
    /// Either way the device is released before this returns.
    pub async fn run(mut self) {
        info!("Scanner service started");

        loop {
            let streaming = self.controller.is_streaming();

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(ControlCommand::Shutdown { ack }) => {
                        self.controller.shutdown();
                        let _ = ack.send(());
                        break;
                    }
                    Some(command) => self.dispatch(command),
                    None => {
                        debug!("All scanner handles dropped");
                        self.controller.shutdown();
                        break;
                    }
                },

                Some(report) = self.reports.recv() => {
                    self.controller.on_acquisition(report);
                }

                frame = self.controller.next_frame(), if streaming => {
                    self.controller.on_frame(frame);
                }
            }
        }

        info!("Scanner service stopped");
    }

    fn dispatch(&mut self, command: ControlCommand) {
        // A dropped ack only means the caller stopped waiting.
        match command {
            ControlCommand::SetActive { active, ack } => {
                self.controller.set_active(active);
                let _ = ack.send(());
            }
            ControlCommand::Retry { ack } => {
                let _ = ack.send(self.controller.retry());
            }
            ControlCommand::Stop { ack } => {
                self.controller.stop();
                let _ = ack.send(());
            }
            ControlCommand::ManualEntry { barcode, ack } => {
                self.controller.submit_manual(barcode);
                let _ = ack.send(());
            }
            ControlCommand::Shutdown { ack } => {
                self.controller.shutdown();
                let _ = ack.send(());
            }
        }
    }
}

/// Cloneable host-side handle to a running `ScannerService`.
///
/// Dropping every handle shuts the service down and releases the device.
#[derive(Debug, Clone)]
pub struct ScannerHandle {
    commands: mpsc::UnboundedSender<ControlCommand>,
    snapshots: watch::Receiver<ScannerSnapshot>,
}

impl ScannerHandle {
    /// Sets the host activation flag.
    pub async fn set_active(&self, active: bool) -> Result<(), ControlError> {
        self.request(|ack| ControlCommand::SetActive { active, ack }).await
    }

    pub async fn retry(&self) -> Result<(), ControlError> {
        self.request(|ack| ControlCommand::Retry { ack }).await?
    }

    pub async fn stop(&self) -> Result<(), ControlError> {
        self.request(|ack| ControlCommand::Stop { ack }).await
    }

    /// Validates and submits a typed barcode.
    ///
    /// Empty input is rejected here and never reaches the controller.
    pub async fn submit_manual(&self, input: &str) -> Result<Barcode, ControlError> {
        let barcode = accept_manual_entry(input)?;
        let submitted = barcode.clone();
        self.request(|ack| ControlCommand::ManualEntry {
            barcode: submitted,
            ack,
        })
        .await?;
        Ok(barcode)
    }

    pub async fn shutdown(&self) -> Result<(), ControlError> {
        self.request(|ack| ControlCommand::Shutdown { ack }).await
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> ScannerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Waits until a published snapshot satisfies `predicate`.
    ///
    /// Checks the current snapshot first.
    pub async fn wait_for(
        &self,
        mut predicate: impl FnMut(&ScannerSnapshot) -> bool,
    ) -> Result<ScannerSnapshot, ControlError> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(|snapshot| predicate(snapshot))
            .await
            .map_err(|_| ControlError::ControllerClosed)?;
        Ok(snapshot.clone())
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> ControlCommand,
    ) -> Result<T, ControlError> {
        let (ack, response) = oneshot::channel();
        self.commands
            .send(build(ack))
            .map_err(|_| ControlError::ControllerClosed)?;
        response.await.map_err(|_| ControlError::ControllerClosed)
    }
}
