//! Enum wrappers for hardware device dispatch.
//!
//! Native `async fn` in traits (RPITIT - Rust Edition 2024) are not
//! object-safe, so we cannot use `Box<dyn KeySource>`. The enums in this
//! module provide concrete type dispatch instead, so a binary can choose a
//! device at runtime while the controller stays generic.
//!
//! # Examples
//!
//! ```
//! use lockbox_hardware::devices::AnyKeySource;
//! use lockbox_hardware::mock::MockKeypad;
//!
//! let (keypad, _handle) = MockKeypad::new();
//! let any_keypad = AnyKeySource::Mock(keypad);
//! ```

use crate::line_channel::LineCommandChannel;
use crate::matrix::MatrixKeypad;
use crate::mock::{MockCommandChannel, MockIndicator, MockKeypad, MockLightSensor};
use crate::traits::{CommandChannel, IndicatorDevice, KeySource, LightSensor};
use crate::{DeviceInfo, LedColor, Result};
use lockbox_core::{Key, LightReading};

/// Enum wrapper for key source dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyKeySource {
    /// Mock keypad for development and testing.
    Mock(MockKeypad),
    /// Keypad decoded from raw matrix scan words.
    Matrix(MatrixKeypad),
}

impl KeySource for AnyKeySource {
    async fn poll_key(&mut self) -> Result<Option<Key>> {
        match self {
            Self::Mock(device) => device.poll_key().await,
            Self::Matrix(device) => device.poll_key().await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
            Self::Matrix(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for light sensor dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyLightSensor {
    /// Mock sensor for development and testing.
    Mock(MockLightSensor),
}

impl LightSensor for AnyLightSensor {
    async fn read_level(&mut self) -> Result<LightReading> {
        match self {
            Self::Mock(device) => device.read_level().await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for indicator dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyIndicator {
    /// Mock indicator for development and testing.
    Mock(MockIndicator),
}

impl IndicatorDevice for AnyIndicator {
    async fn set_color(&mut self, color: LedColor) -> Result<()> {
        match self {
            Self::Mock(device) => device.set_color(color).await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

/// Enum wrapper for command channel dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyCommandChannel {
    /// Mock channel for development and testing.
    Mock(MockCommandChannel),
    /// Operator console on the process standard input.
    Stdin(LineCommandChannel<tokio::io::Stdin>),
}

impl AnyCommandChannel {
    /// Read commands from the process standard input.
    pub fn stdin() -> Self {
        Self::Stdin(LineCommandChannel::new(tokio::io::stdin()))
    }
}

impl CommandChannel for AnyCommandChannel {
    async fn next_line(&mut self) -> Result<Option<String>> {
        match self {
            Self::Mock(channel) => channel.next_line().await,
            Self::Stdin(channel) => channel.next_line().await,
        }
    }
}
