//! Lockbox controller.
//!
//! This crate contains the lock state machine and the policies around it
//! (failed-attempt window, daylight gate, operator commands), plus the
//! cooperative scheduler that connects it to the devices from
//! `lockbox-hardware`.

pub mod attempts;
pub mod command;
pub mod config;
pub mod error;
pub mod feedback;
pub mod scheduler;
pub mod snapshot;
pub mod state_machine;

pub use attempts::{AttemptVerdict, FailedAttemptTracker};
pub use command::{Command, CommandProcessor, CommandReply};
pub use config::LockboxConfig;
pub use error::{ControllerError, Result};
pub use feedback::IndicatorFeedback;
pub use scheduler::{Scheduler, SharedMachine};
pub use snapshot::{AnyTelemetrySink, LogTelemetry, MockTelemetry, Snapshot, TelemetrySink};
pub use state_machine::{
    IndicatorEffect, LockStateMachine, LockStateMachineBuilder, Reaction, StateTransition,
};
