//! Indicator feedback executor.
//!
//! Plays the [`IndicatorEffect`]s returned by the state machine on an
//! [`IndicatorDevice`]. Blinks and alarm flashes sleep for fixed durations.
//! These sleeps are the control loop's feedback suspension points, so callers
//! must release the state machine lock before playing effects.

use std::time::Duration;

use lockbox_hardware::{IndicatorDevice, LedColor};
use tokio::time::sleep;
use tracing::trace;

use crate::config::TimingConfig;
use crate::error::Result;
use crate::state_machine::IndicatorEffect;

/// Drives an indicator and remembers what it shows.
///
/// # Examples
///
/// ```
/// use lockbox_controller::feedback::IndicatorFeedback;
/// use lockbox_controller::state_machine::IndicatorEffect;
/// use lockbox_controller::config::TimingConfig;
/// use lockbox_hardware::mock::MockIndicator;
/// use lockbox_hardware::LedColor;
///
/// #[tokio::main]
/// async fn main() -> lockbox_controller::Result<()> {
///     let (led, handle) = MockIndicator::new();
///     let mut feedback = IndicatorFeedback::new(led, &TimingConfig::default());
///
///     feedback.play(&[IndicatorEffect::Show(LedColor::GREEN)]).await?;
///     assert_eq!(handle.current(), LedColor::GREEN);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct IndicatorFeedback<I> {
    device: I,
    shown: Option<LedColor>,
    blink: Duration,
    alarm_flash: Duration,
}

impl<I: IndicatorDevice> IndicatorFeedback<I> {
    /// Wrap `device`, taking feedback delays from `timing`.
    pub fn new(device: I, timing: &TimingConfig) -> Self {
        Self {
            device,
            shown: None,
            blink: timing.blink(),
            alarm_flash: timing.alarm_flash(),
        }
    }

    /// The last color written, if any.
    pub fn shown(&self) -> Option<LedColor> {
        self.shown
    }

    /// Play effects in order.
    ///
    /// # Errors
    ///
    /// Returns the first device error; remaining effects are skipped.
    pub async fn play(&mut self, effects: &[IndicatorEffect]) -> Result<()> {
        for effect in effects {
            match *effect {
                IndicatorEffect::Show(color) => self.show(color).await?,
                IndicatorEffect::Blink => self.blink().await?,
                IndicatorEffect::AlarmFlash => self.alarm_flash().await?,
            }
        }
        Ok(())
    }

    /// Show a steady color, writing only if it differs from the current one.
    pub async fn show(&mut self, color: LedColor) -> Result<()> {
        if self.shown == Some(color) {
            return Ok(());
        }
        self.write(color).await
    }

    /// Blank briefly, then restore the previous color.
    pub async fn blink(&mut self) -> Result<()> {
        let restore = self.shown.unwrap_or(LedColor::OFF);
        self.write(LedColor::OFF).await?;
        sleep(self.blink).await;
        self.write(restore).await
    }

    /// One red/blue alarm period.
    pub async fn alarm_flash(&mut self) -> Result<()> {
        self.write(LedColor::RED).await?;
        sleep(self.alarm_flash).await;
        self.write(LedColor::BLUE).await?;
        sleep(self.alarm_flash).await;
        Ok(())
    }

    /// The wrapped device.
    pub fn device(&self) -> &I {
        &self.device
    }

    async fn write(&mut self, color: LedColor) -> Result<()> {
        trace!(%color, "Indicator");
        self.device.set_color(color).await?;
        self.shown = Some(color);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbox_hardware::mock::{MockIndicator, MockIndicatorHandle};

    fn feedback() -> (IndicatorFeedback<MockIndicator>, MockIndicatorHandle) {
        let (led, handle) = MockIndicator::new();
        (IndicatorFeedback::new(led, &TimingConfig::default()), handle)
    }

    #[tokio::test]
    async fn test_show_writes_only_on_change() {
        let (mut feedback, mut handle) = feedback();

        feedback.show(LedColor::BLUE).await.unwrap();
        feedback.show(LedColor::BLUE).await.unwrap();
        feedback.show(LedColor::GREEN).await.unwrap();

        assert_eq!(handle.drain(), vec![LedColor::BLUE, LedColor::GREEN]);
        assert_eq!(feedback.shown(), Some(LedColor::GREEN));
    }

    #[tokio::test]
    async fn test_device_info_passes_through() {
        let (feedback, _handle) = feedback();

        let info = feedback.device().get_info().await.unwrap();
        assert_eq!(info.name, "Mock Indicator");
    }

    #[tokio::test(start_paused = true)]
    async fn test_blink_restores_color() {
        let (mut feedback, mut handle) = feedback();
        feedback.show(LedColor::WHITE).await.unwrap();
        handle.drain();

        let started = tokio::time::Instant::now();
        feedback.blink().await.unwrap();

        assert_eq!(started.elapsed(), Duration::from_millis(100));
        assert_eq!(handle.drain(), vec![LedColor::OFF, LedColor::WHITE]);
        assert_eq!(feedback.shown(), Some(LedColor::WHITE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_alarm_flash_pattern() {
        let (mut feedback, mut handle) = feedback();

        let started = tokio::time::Instant::now();
        feedback.play(&[IndicatorEffect::AlarmFlash]).await.unwrap();

        assert_eq!(started.elapsed(), Duration::from_millis(500));
        assert_eq!(handle.drain(), vec![LedColor::RED, LedColor::BLUE]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_in_order() {
        let (mut feedback, mut handle) = feedback();

        feedback
            .play(&[
                IndicatorEffect::Show(LedColor::WHITE),
                IndicatorEffect::Blink,
                IndicatorEffect::Show(LedColor::BLUE),
            ])
            .await
            .unwrap();

        assert_eq!(
            handle.drain(),
            vec![LedColor::WHITE, LedColor::OFF, LedColor::WHITE, LedColor::BLUE]
        );
    }
}
