//! Mock tri-color indicator.

use crate::{Result, traits::IndicatorDevice, types::DeviceInfo, types::LedColor};
use tokio::sync::{mpsc, watch};

/// Mock indicator that records every color it is driven to.
///
/// The paired [`MockIndicatorHandle`] exposes both the color currently shown
/// and the ordered log of writes, so tests can assert on blink and flash
/// patterns.
///
/// # Examples
///
/// ```
/// use lockbox_hardware::mock::MockIndicator;
/// use lockbox_hardware::traits::IndicatorDevice;
/// use lockbox_hardware::types::LedColor;
///
/// #[tokio::main]
/// async fn main() -> lockbox_hardware::Result<()> {
///     let (mut led, mut handle) = MockIndicator::new();
///
///     led.set_color(LedColor::BLUE).await?;
///     led.set_color(LedColor::OFF).await?;
///
///     assert_eq!(handle.current(), LedColor::OFF);
///     assert_eq!(handle.drain(), vec![LedColor::BLUE, LedColor::OFF]);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockIndicator {
    current_tx: watch::Sender<LedColor>,
    log_tx: mpsc::UnboundedSender<LedColor>,
    name: String,
}

impl MockIndicator {
    /// Create a new mock indicator, initially off.
    pub fn new() -> (Self, MockIndicatorHandle) {
        let (current_tx, current_rx) = watch::channel(LedColor::OFF);
        let (log_tx, log_rx) = mpsc::unbounded_channel();

        let indicator = Self {
            current_tx,
            log_tx,
            name: "Mock Indicator".to_string(),
        };

        (indicator, MockIndicatorHandle { current_rx, log_rx })
    }
}

impl IndicatorDevice for MockIndicator {
    async fn set_color(&mut self, color: LedColor) -> Result<()> {
        self.current_tx.send_replace(color);
        // A dropped handle only means nobody is watching
        let _ = self.log_tx.send(color);
        Ok(())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock RGB LED v1.0"))
    }
}

/// Handle for observing a [`MockIndicator`].
#[derive(Debug)]
pub struct MockIndicatorHandle {
    current_rx: watch::Receiver<LedColor>,
    log_rx: mpsc::UnboundedReceiver<LedColor>,
}

impl MockIndicatorHandle {
    /// The color currently shown.
    pub fn current(&self) -> LedColor {
        *self.current_rx.borrow()
    }

    /// Take every write recorded since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<LedColor> {
        let mut writes = Vec::new();
        while let Ok(color) = self.log_rx.try_recv() {
            writes.push(color);
        }
        writes
    }

    /// Wait for the next write and return the color written.
    ///
    /// # Errors
    ///
    /// Returns an error if the indicator was dropped.
    pub async fn changed(&mut self) -> Result<LedColor> {
        self.current_rx
            .changed()
            .await
            .map_err(|_| crate::HardwareError::disconnected("Indicator dropped"))?;
        Ok(*self.current_rx.borrow_and_update())
    }

    /// Wait until the indicator is driven to `color`.
    ///
    /// # Errors
    ///
    /// Returns an error if the indicator was dropped first.
    pub async fn wait_for(&mut self, color: LedColor) -> Result<()> {
        self.current_rx
            .wait_for(|current| *current == color)
            .await
            .map(|_| ())
            .map_err(|_| crate::HardwareError::disconnected("Indicator dropped"))
    }
}
