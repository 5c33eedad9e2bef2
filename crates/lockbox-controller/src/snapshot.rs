//! Telemetry snapshots and sinks.
//!
//! The telemetry loop periodically captures a [`Snapshot`] of the state
//! machine and hands it to a [`TelemetrySink`]. Snapshots are plain values, so
//! a sink never holds the machine lock.

#![allow(async_fn_in_trait)]

use lockbox_core::LockState;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

use crate::error::{ControllerError, Result};

/// Read-only view of the lock at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: LockState,
    pub input: String,
    /// Empty until a PIN has been set.
    pub password: String,
    pub has_daylight: bool,
    pub remaining_attempts: u32,
    pub light_gate_enabled: bool,
    pub light_value: f32,
}

/// Destination for telemetry snapshots.
pub trait TelemetrySink: Send + Sync {
    /// Publish one snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be encoded or delivered.
    async fn publish(&mut self, snapshot: &Snapshot) -> Result<()>;
}

/// Sink that logs each snapshot as a JSON line.
#[derive(Debug, Default)]
pub struct LogTelemetry;

impl TelemetrySink for LogTelemetry {
    async fn publish(&mut self, snapshot: &Snapshot) -> Result<()> {
        let json = serde_json::to_string(snapshot)?;
        info!(target: "lockbox::telemetry", "{json}");
        Ok(())
    }
}

/// Sink that forwards snapshots to a [`MockTelemetryHandle`].
#[derive(Debug)]
pub struct MockTelemetry {
    snapshot_tx: mpsc::UnboundedSender<Snapshot>,
}

impl MockTelemetry {
    pub fn new() -> (Self, MockTelemetryHandle) {
        let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();
        (Self { snapshot_tx }, MockTelemetryHandle { snapshot_rx })
    }
}

impl TelemetrySink for MockTelemetry {
    async fn publish(&mut self, snapshot: &Snapshot) -> Result<()> {
        self.snapshot_tx
            .send(snapshot.clone())
            .map_err(|_| ControllerError::TelemetryClosed)
    }
}

/// Receiving side of a [`MockTelemetry`].
#[derive(Debug)]
pub struct MockTelemetryHandle {
    snapshot_rx: mpsc::UnboundedReceiver<Snapshot>,
}

impl MockTelemetryHandle {
    /// Wait for the next published snapshot.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.snapshot_rx.recv().await
    }

    /// Take every snapshot published so far, oldest first.
    pub fn drain(&mut self) -> Vec<Snapshot> {
        let mut snapshots = Vec::new();
        while let Ok(snapshot) = self.snapshot_rx.try_recv() {
            snapshots.push(snapshot);
        }
        snapshots
    }
}

/// Enum wrapper for telemetry sink dispatch.
#[derive(Debug)]
pub enum AnyTelemetrySink {
    Log(LogTelemetry),
    Mock(MockTelemetry),
}

impl TelemetrySink for AnyTelemetrySink {
    async fn publish(&mut self, snapshot: &Snapshot) -> Result<()> {
        match self {
            Self::Log(sink) => sink.publish(snapshot).await,
            Self::Mock(sink) => sink.publish(snapshot).await,
        }
    }
}
