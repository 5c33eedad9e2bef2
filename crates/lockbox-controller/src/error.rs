//! Error types for the lock controller.
//!
//! Wrong PINs, unknown operator commands and no-op alarm stops are policy
//! outcomes and never show up here. A `ControllerError` means a collaborator
//! failed or the controller was misconfigured.

use lockbox_hardware::HardwareError;

/// Errors that stop the controller.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// A device or channel failed.
    #[error("Hardware error: {0}")]
    Hardware(#[from] HardwareError),

    /// Invalid configuration or value construction.
    #[error(transparent)]
    Core(#[from] lockbox_core::Error),

    /// A telemetry snapshot could not be encoded.
    #[error("Telemetry encoding failed: {0}")]
    Telemetry(#[from] serde_json::Error),

    /// A telemetry sink went away.
    #[error("Telemetry sink closed")]
    TelemetryClosed,
}

impl ControllerError {
    /// Check whether the error came from a disconnected device.
    pub fn is_disconnected(&self) -> bool {
        matches!(self, Self::Hardware(e) if e.is_disconnected())
    }
}

/// Result type alias for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;
