//! Mock ambient-light sensor.

use crate::{Result, traits::LightSensor, types::DeviceInfo};
use lockbox_core::LightReading;
use tokio::sync::watch;

/// Mock light sensor whose level is set through a [`MockLightSensorHandle`].
///
/// The sensor always reports the most recent level; intermediate levels set
/// between two reads are never observed, as with a real ADC.
///
/// # Examples
///
/// ```
/// use lockbox_hardware::mock::MockLightSensor;
/// use lockbox_hardware::traits::LightSensor;
/// use lockbox_core::LightReading;
///
/// #[tokio::main]
/// async fn main() -> lockbox_hardware::Result<()> {
///     let (mut sensor, handle) = MockLightSensor::new(LightReading::DARK);
///
///     handle.set_level(0.9)?;
///     assert_eq!(sensor.read_level().await?.level(), 0.9);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockLightSensor {
    level_rx: watch::Receiver<LightReading>,
    name: String,
}

impl MockLightSensor {
    /// Create a sensor reporting `initial` until told otherwise.
    pub fn new(initial: LightReading) -> (Self, MockLightSensorHandle) {
        let (level_tx, level_rx) = watch::channel(initial);

        let sensor = Self {
            level_rx,
            name: "Mock Light Sensor".to_string(),
        };

        (sensor, MockLightSensorHandle { level_tx })
    }
}

impl LightSensor for MockLightSensor {
    async fn read_level(&mut self) -> Result<LightReading> {
        if self.level_rx.has_changed().is_err() {
            return Err(crate::HardwareError::disconnected(
                "Light sensor channel closed",
            ));
        }
        Ok(*self.level_rx.borrow_and_update())
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock LDR v1.0"))
    }
}

/// Handle for changing the level reported by a [`MockLightSensor`].
#[derive(Debug, Clone)]
pub struct MockLightSensorHandle {
    level_tx: watch::Sender<LightReading>,
}

impl MockLightSensorHandle {
    /// Set a normalized level.
    ///
    /// # Errors
    ///
    /// Returns an error if the level is outside `0.0..=1.0`.
    pub fn set_level(&self, level: f32) -> Result<()> {
        self.set_reading(LightReading::new(level)?);
        Ok(())
    }

    /// Set a reading directly.
    pub fn set_reading(&self, reading: LightReading) {
        // send_replace never fails, even with no receiver left
        self.level_tx.send_replace(reading);
    }

    /// Set a raw 16-bit ADC sample.
    pub fn set_raw(&self, raw: u16) {
        self.set_reading(LightReading::from_raw_u16(raw));
    }

    /// The level currently reported.
    pub fn current(&self) -> LightReading {
        *self.level_tx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_light_initial_level() {
        let (mut sensor, _handle) = MockLightSensor::new(LightReading::FULL);

        assert_eq!(sensor.read_level().await.unwrap(), LightReading::FULL);
    }

    #[tokio::test]
    async fn test_mock_light_reports_latest_level() {
        let (mut sensor, handle) = MockLightSensor::new(LightReading::DARK);

        handle.set_level(0.2).unwrap();
        handle.set_level(0.7).unwrap();

        assert_eq!(sensor.read_level().await.unwrap().level(), 0.7);
        // Unchanged level is reported again
        assert_eq!(sensor.read_level().await.unwrap().level(), 0.7);
    }

    #[tokio::test]
    async fn test_mock_light_raw_sample() {
        let (mut sensor, handle) = MockLightSensor::new(LightReading::DARK);

        handle.set_raw(u16::MAX);

        assert_eq!(sensor.read_level().await.unwrap(), LightReading::FULL);
        assert_eq!(handle.current(), LightReading::FULL);
    }

    #[tokio::test]
    async fn test_mock_light_rejects_out_of_range() {
        let (_sensor, handle) = MockLightSensor::new(LightReading::DARK);

        assert!(handle.set_level(1.2).is_err());
        assert_eq!(handle.current(), LightReading::DARK);
    }

    #[tokio::test]
    async fn test_mock_light_closed_channel() {
        let (mut sensor, handle) = MockLightSensor::new(LightReading::DARK);

        drop(handle);

        assert!(sensor.read_level().await.unwrap_err().is_disconnected());
    }
}
