//! Mock keypad implementation for testing and development.
//!
//! This module provides a simulated keypad device that can be controlled
//! programmatically for testing without requiring physical hardware.

use crate::{Result, traits::KeySource, types::DeviceInfo};
use lockbox_core::Key;
use tokio::sync::mpsc::{self, error::TryRecvError};

/// Mock keypad device for testing and development.
///
/// Key presses are queued through a `MockKeypadHandle` and handed out one
/// per [`poll_key`](KeySource::poll_key) call, exactly like a debounced
/// hardware keypad.
///
/// # Examples
///
/// ```
/// use lockbox_hardware::mock::MockKeypad;
/// use lockbox_hardware::traits::KeySource;
/// use lockbox_core::Key;
///
/// #[tokio::main]
/// async fn main() -> lockbox_hardware::Result<()> {
///     let (mut keypad, handle) = MockKeypad::new();
///
///     handle.press(Key::Digit(1)).await?;
///     handle.press(Key::Hash).await?;
///
///     assert_eq!(keypad.poll_key().await?, Some(Key::Digit(1)));
///     assert_eq!(keypad.poll_key().await?, Some(Key::Hash));
///     assert_eq!(keypad.poll_key().await?, None);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockKeypad {
    /// Channel receiver for simulated presses
    input_rx: mpsc::Receiver<Key>,

    /// Device name
    name: String,
}

impl MockKeypad {
    /// Create a new mock keypad with the default name.
    ///
    /// Returns a tuple of (MockKeypad, MockKeypadHandle) where the handle
    /// can be used to simulate presses.
    pub fn new() -> (Self, MockKeypadHandle) {
        Self::with_name("Mock Keypad".to_string())
    }

    /// Create a new mock keypad with a custom name.
    pub fn with_name(name: String) -> (Self, MockKeypadHandle) {
        let (input_tx, input_rx) = mpsc::channel(32);

        let keypad = Self {
            input_rx,
            name: name.clone(),
        };

        let handle = MockKeypadHandle { input_tx, name };

        (keypad, handle)
    }
}

impl Default for MockKeypad {
    fn default() -> Self {
        Self::new().0
    }
}

impl KeySource for MockKeypad {
    async fn poll_key(&mut self) -> Result<Option<Key>> {
        match self.input_rx.try_recv() {
            Ok(key) => Ok(Some(key)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(crate::HardwareError::disconnected(
                "Keypad input channel closed",
            )),
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock Keypad v1.0").with_firmware_version("1.0.0"))
    }
}

/// Handle for controlling a mock keypad.
///
/// This handle allows programmatic control of the mock keypad by sending
/// key presses. It can be cloned and shared across tasks.
#[derive(Debug, Clone)]
pub struct MockKeypadHandle {
    /// Channel sender for simulated presses
    input_tx: mpsc::Sender<Key>,

    /// Device name
    name: String,
}

impl MockKeypadHandle {
    /// Press and release a single key.
    ///
    /// # Errors
    ///
    /// Returns an error if the keypad has been dropped and the channel is closed.
    pub async fn press(&self, key: Key) -> Result<()> {
        self.input_tx
            .send(key)
            .await
            .map_err(|_| crate::HardwareError::disconnected("Keypad input channel closed"))
    }

    /// Type a sequence of keypad symbols, e.g. `"1234#"`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any character is not a keypad symbol
    /// - The keypad has been dropped and the channel is closed
    ///
    /// # Examples
    ///
    /// ```
    /// use lockbox_hardware::mock::MockKeypad;
    ///
    /// #[tokio::main]
    /// async fn main() -> lockbox_hardware::Result<()> {
    ///     let (_keypad, handle) = MockKeypad::new();
    ///
    ///     handle.type_keys("1234").await?;
    ///     assert!(handle.type_keys("12x").await.is_err());
    ///
    ///     Ok(())
    /// }
    /// ```
    pub async fn type_keys(&self, symbols: &str) -> Result<()> {
        let keys = symbols
            .chars()
            .map(Key::from_char)
            .collect::<lockbox_core::Result<Vec<_>>>()?;
        for key in keys {
            self.press(key).await?;
        }
        Ok(())
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
