//! Hardware device abstraction layer for the lockbox controller.
//!
//! This crate provides trait-based abstractions for the peripherals around a
//! keypad lock: the 4×4 keypad, the ambient-light sensor, the tri-color status
//! LED and the operator command channel. The traits let the controller run
//! unchanged against mock implementations (for development and testing) and
//! real drivers.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations are asynchronous using native `async fn`
//!   in traits (Rust 1.90 + Edition 2024 RPITIT).
//! - **Enum dispatch**: The traits are not object-safe; [`devices`] provides
//!   `Any*` wrappers for runtime device selection.
//! - **Thread-safe**: Device traits require `Send + Sync` for use with Tokio.
//! - **Error-aware**: All operations return `Result<T>` with [`HardwareError`].
//!
//! # Device Traits
//!
//! ## Key Sources
//!
//! [`KeySource`] yields one [`Key`](lockbox_core::Key) per press and never
//! blocks:
//!
//! ```no_run
//! use lockbox_hardware::traits::KeySource;
//! use lockbox_hardware::error::Result;
//!
//! async fn count_presses<K: KeySource>(keypad: &mut K) -> Result<usize> {
//!     let mut count = 0;
//!     while keypad.poll_key().await?.is_some() {
//!         count += 1;
//!     }
//!     Ok(count)
//! }
//! ```
//!
//! [`matrix::MatrixKeypad`] decodes raw 16-bit scan words into presses.
//!
//! ## Light Sensors and Indicators
//!
//! ```no_run
//! use lockbox_hardware::traits::{IndicatorDevice, LightSensor};
//! use lockbox_hardware::types::LedColor;
//! use lockbox_hardware::error::Result;
//!
//! async fn mirror_light<S: LightSensor, I: IndicatorDevice>(
//!     sensor: &mut S,
//!     led: &mut I,
//! ) -> Result<()> {
//!     let reading = sensor.read_level().await?;
//!     let color = if reading.level() > 0.5 { LedColor::WHITE } else { LedColor::OFF };
//!     led.set_color(color).await
//! }
//! ```
//!
//! ## Command Channels
//!
//! [`CommandChannel`] delivers operator text lines.
//! [`line_channel::LineCommandChannel`] frames any byte stream (serial port,
//! standard input) into lines.
//!
//! # Mock Implementations
//!
//! The [`mock`] module ships a mock for every trait, each paired with a
//! cloneable handle for driving or observing it from tests and simulators.

pub mod devices;
pub mod error;
pub mod line_channel;
pub mod matrix;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use devices::{AnyCommandChannel, AnyIndicator, AnyKeySource, AnyLightSensor};
pub use error::{HardwareError, Result};
pub use traits::{CommandChannel, IndicatorDevice, KeySource, LightSensor};
pub use types::{DeviceInfo, LedColor};
