//! Common types shared across hardware device implementations.
//!
//! This module defines types used by multiple device traits, such as
//! device information and the indicator color model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generic device information.
///
/// Contains metadata about a hardware device such as name, model
/// and firmware version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "Mock Keypad").
    pub name: String,

    /// Device model identifier.
    pub model: String,

    /// Optional firmware version string.
    pub firmware_version: Option<String>,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with required fields.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            firmware_version: None,
        }
    }

    /// Set the firmware version.
    pub fn with_firmware_version(mut self, firmware_version: impl Into<String>) -> Self {
        self.firmware_version = Some(firmware_version.into());
        self
    }
}

/// Color of the tri-color status LED.
///
/// The indicator has three independent on/off channels. Every color the
/// controller uses is a combination of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LedColor {
    /// Red channel.
    pub red: bool,

    /// Green channel.
    pub green: bool,

    /// Blue channel.
    pub blue: bool,
}

impl LedColor {
    /// All channels off.
    pub const OFF: LedColor = LedColor::rgb(false, false, false);

    /// Red only.
    pub const RED: LedColor = LedColor::rgb(true, false, false);

    /// Green only.
    pub const GREEN: LedColor = LedColor::rgb(false, true, false);

    /// Blue only.
    pub const BLUE: LedColor = LedColor::rgb(false, false, true);

    /// All channels on.
    pub const WHITE: LedColor = LedColor::rgb(true, true, true);

    /// Create a color from its three channels.
    pub const fn rgb(red: bool, green: bool, blue: bool) -> Self {
        Self { red, green, blue }
    }

    /// Get the channel states as a `(red, green, blue)` tuple.
    pub fn as_rgb(&self) -> (bool, bool, bool) {
        (self.red, self.green, self.blue)
    }

    /// Returns `true` if every channel is off.
    pub fn is_off(&self) -> bool {
        *self == Self::OFF
    }
}

impl fmt::Display for LedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::OFF => write!(f, "off"),
            Self::RED => write!(f, "red"),
            Self::GREEN => write!(f, "green"),
            Self::BLUE => write!(f, "blue"),
            Self::WHITE => write!(f, "white"),
            Self { red, green, blue } => {
                write!(f, "rgb({}, {}, {})", red as u8, green as u8, blue as u8)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_info_builder() {
        let info = DeviceInfo::new("Mock Keypad", "Mock").with_firmware_version("1.0.0");

        assert_eq!(info.name, "Mock Keypad");
        assert_eq!(info.model, "Mock");
        assert_eq!(info.firmware_version, Some("1.0.0".to_string()));
    }

    #[test]
    fn test_led_color_rgb() {
        assert_eq!(LedColor::RED.as_rgb(), (true, false, false));
        assert_eq!(LedColor::GREEN.as_rgb(), (false, true, false));
        assert_eq!(LedColor::BLUE.as_rgb(), (false, false, true));
        assert_eq!(LedColor::WHITE.as_rgb(), (true, true, true));
        assert!(LedColor::OFF.is_off());
        assert_eq!(LedColor::default(), LedColor::OFF);
    }

    #[test]
    fn test_led_color_display() {
        assert_eq!(LedColor::BLUE.to_string(), "blue");
        assert_eq!(LedColor::rgb(true, false, true).to_string(), "rgb(1, 0, 1)");
    }

    #[test]
    fn test_led_color_serialization() {
        let color = LedColor::GREEN;
        let json = serde_json::to_string(&color).unwrap();
        let deserialized: LedColor = serde_json::from_str(&json).unwrap();
        assert_eq!(color, deserialized);
    }
}
