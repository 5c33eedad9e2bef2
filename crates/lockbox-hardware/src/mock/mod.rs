//! Mock device implementations for testing and development.
//!
//! This module provides simulated device implementations that can be controlled
//! programmatically without requiring physical hardware.

pub mod command;
pub mod indicator;
pub mod keypad;
pub mod light;

// Re-export commonly used types
pub use command::{MockCommandChannel, MockCommandHandle};
pub use indicator::{MockIndicator, MockIndicatorHandle};
pub use keypad::{MockKeypad, MockKeypadHandle};
pub use light::{MockLightSensor, MockLightSensorHandle};
