//! Simulator console: routes typed lines to the mock devices.
//!
//! | Line                      | Routed to                    |
//! |---------------------------|------------------------------|
//! | only `0-9 * # A-D`        | keypad, one press per symbol |
//! | `light <level>`           | light sensor (0.0-1.0)       |
//! | anything else             | operator command channel     |

use anyhow::{Context, Result};
use lockbox_core::constants::KEYPAD_SYMBOLS;
use lockbox_hardware::CommandChannel;
use lockbox_hardware::mock::{MockCommandHandle, MockKeypadHandle, MockLightSensorHandle};
use tracing::warn;

/// One classified console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleLine {
    Blank,
    Keys(String),
    Light(f32),
    /// `light` with a value that is not a number.
    BadLight(String),
    Command(String),
}

impl ConsoleLine {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return ConsoleLine::Blank;
        }

        if trimmed.chars().all(|c| KEYPAD_SYMBOLS.contains(c)) {
            return ConsoleLine::Keys(trimmed.to_string());
        }

        if let Some(level) = trimmed.strip_prefix("light ") {
            let level = level.trim();
            return match level.parse::<f32>() {
                Ok(value) => ConsoleLine::Light(value),
                Err(_) => ConsoleLine::BadLight(level.to_string()),
            };
        }

        // Commands are matched exactly downstream, so forward the raw line
        ConsoleLine::Command(line.to_string())
    }
}

/// Handles for the devices the console drives.
#[derive(Debug, Clone)]
pub struct Console {
    keypad: MockKeypadHandle,
    light: MockLightSensorHandle,
    commands: MockCommandHandle,
}

impl Console {
    pub fn new(
        keypad: MockKeypadHandle,
        light: MockLightSensorHandle,
        commands: MockCommandHandle,
    ) -> Self {
        Self {
            keypad,
            light,
            commands,
        }
    }

    /// Route lines from `input` until it closes.
    pub async fn run<C: CommandChannel>(&self, mut input: C) -> Result<()> {
        while let Some(line) = input.next_line().await.context("console read failed")? {
            self.route(&line).await?;
        }
        Ok(())
    }

    /// Route a single line.
    pub async fn route(&self, line: &str) -> Result<()> {
        match ConsoleLine::parse(line) {
            ConsoleLine::Blank => {}
            ConsoleLine::Keys(keys) => self
                .keypad
                .type_keys(&keys)
                .await
                .context("keypad unavailable")?,
            ConsoleLine::Light(level) => {
                if let Err(e) = self.light.set_level(level) {
                    warn!(error = %e, "Light level rejected");
                }
            }
            ConsoleLine::BadLight(text) => warn!(value = %text, "Light level is not a number"),
            ConsoleLine::Command(text) => self
                .commands
                .send_line(text)
                .await
                .context("command channel unavailable")?,
        }
        Ok(())
    }
}
