//! Common test utilities for controller integration tests.
//!
//! Helpers come in two flavors:
//!
//! 1. **Machine helpers** (`machine_*`, `type_keys`) drive a
//!    [`LockStateMachine`] directly with explicit timestamps.
//! 2. **Rig helpers** (`Rig`) wire mock devices into a [`Scheduler`] for tests
//!    running on paused Tokio time.

#![allow(dead_code)]

use std::time::Duration;

use lockbox_controller::{LockStateMachine, LockboxConfig, MockTelemetry, Reaction, Scheduler};
use lockbox_controller::snapshot::MockTelemetryHandle;
use lockbox_core::{Key, LightReading, LockState, Pin};
use lockbox_hardware::mock::{
    MockCommandChannel, MockCommandHandle, MockIndicator, MockIndicatorHandle, MockKeypad,
    MockKeypadHandle, MockLightSensor, MockLightSensorHandle,
};
use tokio::time::Instant;

/// Type a string of keypad symbols, returning the last reaction.
pub fn type_keys(machine: &mut LockStateMachine, keys: &str, now: Instant) -> Reaction {
    keys.chars()
        .map(|c| Key::from_char(c).expect("valid keypad symbol"))
        .fold(Reaction::default(), |_, key| machine.handle_key(key, now))
}

/// Machine in BootMode with no PIN.
pub fn machine_in_boot_mode(config: &LockboxConfig, now: Instant) -> LockStateMachine {
    let mut machine = LockStateMachine::new(config);
    machine.tick(LightReading::FULL, now);
    assert_eq!(machine.state(), LockState::BootMode);
    machine
}

/// Machine in Locked with `pin` set.
pub fn machine_locked(config: &LockboxConfig, pin: &str, now: Instant) -> LockStateMachine {
    let mut machine = LockStateMachine::builder()
        .with_config(config.clone())
        .with_password(Pin::new(pin).expect("valid PIN"))
        .build();
    machine.tick(LightReading::FULL, now);
    assert_eq!(machine.state(), LockState::Locked);
    machine
}

/// Machine in Open with `pin` set.
pub fn machine_open(config: &LockboxConfig, pin: &str, now: Instant) -> LockStateMachine {
    let mut machine = machine_locked(config, pin, now);
    type_keys(&mut machine, pin, now);
    assert_eq!(machine.state(), LockState::Open);
    machine
}

/// Configuration with short timings for scheduler tests.
pub fn fast_config() -> LockboxConfig {
    let mut config = LockboxConfig::default();
    config.timing.tick_ms = 10;
    config.timing.telemetry_ms = 50;
    config.timing.blink_ms = 5;
    config.timing.alarm_flash_ms = 20;
    config.timing.alarm_ms = 1_000;
    config.timing.inactivity_ms = 500;
    config
}

pub type MockScheduler =
    Scheduler<MockKeypad, MockLightSensor, MockIndicator, MockCommandChannel, MockTelemetry>;

/// A scheduler on mock devices, plus the handles that drive them.
pub struct Rig {
    pub scheduler: MockScheduler,
    pub keypad: MockKeypadHandle,
    pub light: MockLightSensorHandle,
    pub led: MockIndicatorHandle,
    pub commands: MockCommandHandle,
    pub telemetry: MockTelemetryHandle,
}

impl Rig {
    pub fn new(config: &LockboxConfig, machine: LockStateMachine, light: LightReading) -> Self {
        let (keypad, keypad_handle) = MockKeypad::new();
        let (sensor, light_handle) = MockLightSensor::new(light);
        let (led, led_handle) = MockIndicator::new();
        let (commands, command_handle) = MockCommandChannel::new();
        let (telemetry, telemetry_handle) = MockTelemetry::new();

        let scheduler = Scheduler::new(config, machine, keypad, sensor, led, commands, telemetry);

        Self {
            scheduler,
            keypad: keypad_handle,
            light: light_handle,
            led: led_handle,
            commands: command_handle,
            telemetry: telemetry_handle,
        }
    }
}

/// Let the paused clock run forward by `duration`.
pub async fn advance(duration: Duration) {
    tokio::time::sleep(duration).await;
}
