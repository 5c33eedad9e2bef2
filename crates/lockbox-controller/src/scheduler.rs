//! Cooperative scheduler.
//!
//! Three loops share one [`LockStateMachine`]:
//!
//! 1. **Control**: poll the keypad, handle the key, read the light sensor,
//!    tick, play indicator effects, sleep for one tick period.
//! 2. **Telemetry**: sleep for one telemetry period, snapshot, publish.
//! 3. **Commands**: wait for a command line, dispatch it.
//!
//! The loops are joined on a single task, so they interleave only at await
//! points. Each step locks the machine, mutates it synchronously and releases
//! it before any indicator delay, so a command can land between two ticks but
//! never inside one.
//!
//! # Termination
//!
//! - A device or sink error ends [`Scheduler::run`] with that error. This
//!   includes the device info queries logged at startup.
//! - A closed command channel ends only the command loop.

use std::sync::Arc;
use std::time::Duration;

use lockbox_hardware::{CommandChannel, DeviceInfo, IndicatorDevice, KeySource, LightSensor};
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::command::CommandProcessor;
use crate::config::LockboxConfig;
use crate::error::Result;
use crate::feedback::IndicatorFeedback;
use crate::snapshot::TelemetrySink;
use crate::state_machine::LockStateMachine;

/// Shared handle to the state machine.
pub type SharedMachine = Arc<Mutex<LockStateMachine>>;

/// Owns the devices and drives the state machine.
#[derive(Debug)]
pub struct Scheduler<K, L, I, C, T> {
    machine: SharedMachine,
    keypad: K,
    sensor: L,
    feedback: IndicatorFeedback<I>,
    commands: C,
    telemetry: T,
    tick: Duration,
    telemetry_interval: Duration,
}

impl<K, L, I, C, T> Scheduler<K, L, I, C, T>
where
    K: KeySource,
    L: LightSensor,
    I: IndicatorDevice,
    C: CommandChannel,
    T: TelemetrySink,
{
    /// Wire a machine to its collaborators.
    pub fn new(
        config: &LockboxConfig,
        machine: LockStateMachine,
        keypad: K,
        sensor: L,
        indicator: I,
        commands: C,
        telemetry: T,
    ) -> Self {
        Self {
            machine: Arc::new(Mutex::new(machine)),
            keypad,
            sensor,
            feedback: IndicatorFeedback::new(indicator, &config.timing),
            commands,
            telemetry,
            tick: config.timing.tick(),
            telemetry_interval: config.timing.telemetry_interval(),
        }
    }

    /// Shared handle for observing or inspecting the machine.
    pub fn machine(&self) -> SharedMachine {
        Arc::clone(&self.machine)
    }

    /// Run all three loops until a collaborator fails.
    ///
    /// # Errors
    ///
    /// Returns the first device, channel or telemetry error.
    pub async fn run(self) -> Result<()> {
        let Self {
            machine,
            mut keypad,
            mut sensor,
            mut feedback,
            mut commands,
            mut telemetry,
            tick,
            telemetry_interval,
        } = self;

        log_device("keypad", &keypad.get_info().await?);
        log_device("light sensor", &sensor.get_info().await?);
        log_device("indicator", &feedback.device().get_info().await?);

        info!(?tick, ?telemetry_interval, "Scheduler started");

        tokio::try_join!(
            control_loop(&machine, &mut keypad, &mut sensor, &mut feedback, tick),
            telemetry_loop(&machine, &mut telemetry, telemetry_interval),
            command_loop(&machine, &mut commands),
        )?;
        Ok(())
    }
}

fn log_device(role: &str, info: &DeviceInfo) {
    info!(
        role,
        name = %info.name,
        model = %info.model,
        firmware = info.firmware_version.as_deref().unwrap_or("unknown"),
        "Device attached"
    );
}

async fn control_loop<K, L, I>(
    machine: &Mutex<LockStateMachine>,
    keypad: &mut K,
    sensor: &mut L,
    feedback: &mut IndicatorFeedback<I>,
    tick: Duration,
) -> Result<()>
where
    K: KeySource,
    L: LightSensor,
    I: IndicatorDevice,
{
    loop {
        if let Some(key) = keypad.poll_key().await? {
            let reaction = machine.lock().await.handle_key(key, Instant::now());
            feedback.play(&reaction.effects).await?;
        }

        let reading = sensor.read_level().await?;
        let reaction = machine.lock().await.tick(reading, Instant::now());
        feedback.play(&reaction.effects).await?;

        sleep(tick).await;
    }
}

async fn telemetry_loop<T: TelemetrySink>(
    machine: &Mutex<LockStateMachine>,
    sink: &mut T,
    interval: Duration,
) -> Result<()> {
    loop {
        sleep(interval).await;
        let snapshot = machine.lock().await.snapshot(Instant::now());
        sink.publish(&snapshot).await?;
    }
}

async fn command_loop<C: CommandChannel>(
    machine: &Mutex<LockStateMachine>,
    commands: &mut C,
) -> Result<()> {
    while let Some(line) = commands.next_line().await? {
        let mut guard = machine.lock().await;
        let reply = CommandProcessor::dispatch(&line, &mut guard, Instant::now());
        drop(guard);
        debug!(%reply, "Command reply");
    }

    info!("Command channel closed");
    Ok(())
}
