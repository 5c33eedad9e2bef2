//! Hardware device trait definitions.
//!
//! This module defines trait interfaces for the peripherals around the lock
//! controller: the keypad, the ambient-light sensor, the status indicator and
//! the operator command channel. These traits establish the contract between
//! the controller core and its collaborators, enabling easy substitution
//! between mock and real hardware implementations.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.

#![allow(async_fn_in_trait)]

use crate::error::Result;
use crate::types::{DeviceInfo, LedColor};
use lockbox_core::{Key, LightReading};

/// Source of debounced key presses.
///
/// # Contract
///
/// - `poll_key` never waits for a press: it returns `Ok(None)` when nothing
///   happened since the last call.
/// - A held key yields exactly one `Some(key)` per press. Debouncing and edge
///   detection belong to the implementation, never to the caller.
///
/// # Object Safety and Dynamic Dispatch
///
/// This trait is NOT object-safe because `async fn` methods return
/// `impl Future`. Use generic type parameters, or the enum wrapper
/// [`AnyKeySource`](crate::devices::AnyKeySource) for concrete dispatch.
///
/// # Examples
///
/// ```no_run
/// use lockbox_hardware::traits::KeySource;
/// use lockbox_hardware::error::Result;
/// use lockbox_core::Key;
///
/// async fn drain_digits<K: KeySource>(keypad: &mut K) -> Result<String> {
///     let mut digits = String::new();
///     while let Some(key) = keypad.poll_key().await? {
///         if let Key::Digit(d) = key {
///             digits.push(char::from(b'0' + d));
///         }
///     }
///     Ok(digits)
/// }
/// ```
pub trait KeySource: Send + Sync {
    /// Return the next key press, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected or delivers data that
    /// does not decode to a key.
    async fn poll_key(&mut self) -> Result<Option<Key>>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Ambient-light sensor.
///
/// Readings are normalized to `0.0..=1.0`. Which side of the threshold counts
/// as daylight is decided by the controller configuration, not by the sensor.
pub trait LightSensor: Send + Sync {
    /// Sample the current illumination.
    ///
    /// # Errors
    ///
    /// Returns an error if the sensor is disconnected.
    async fn read_level(&mut self) -> Result<LightReading>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Tri-color status indicator.
///
/// # Examples
///
/// ```no_run
/// use lockbox_hardware::traits::IndicatorDevice;
/// use lockbox_hardware::types::LedColor;
/// use lockbox_hardware::error::Result;
///
/// async fn signal_open<I: IndicatorDevice>(led: &mut I) -> Result<()> {
///     led.set_color(LedColor::GREEN).await
/// }
/// ```
pub trait IndicatorDevice: Send + Sync {
    /// Drive the three channels to the given color.
    ///
    /// # Errors
    ///
    /// Returns an error if the device is disconnected.
    async fn set_color(&mut self, color: LedColor) -> Result<()>;

    /// Get device information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs while querying
    /// device information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}

/// Line-oriented operator command channel (serial console or similar).
pub trait CommandChannel: Send + Sync {
    /// Wait for the next command line, without its line terminator.
    ///
    /// Returns `Ok(None)` once the channel has closed and no further lines
    /// will arrive. Waiting suspends only the calling task.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or if a line is not valid text.
    async fn next_line(&mut self) -> Result<Option<String>>;
}
