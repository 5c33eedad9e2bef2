//! `lockbox` entry point.
//!
//! Runs the lock controller against mock devices driven from standard input.
//! Type digits and `*`/`#` to press keys, `light 0.2` to change the ambient
//! light, or an operator command such as `STOP_ALARM`. Indicator changes and
//! telemetry snapshots are logged.

mod console;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lockbox_controller::{
    AnyTelemetrySink, LockStateMachine, LockboxConfig, LogTelemetry, Scheduler,
};
use lockbox_core::LightReading;
use lockbox_hardware::mock::{
    MockCommandChannel, MockIndicator, MockIndicatorHandle, MockKeypad, MockLightSensor,
};
use lockbox_hardware::{AnyCommandChannel, AnyIndicator, AnyKeySource, AnyLightSensor};
use tracing::info;

use crate::console::Console;

#[derive(Parser)]
#[command(name = "lockbox")]
#[command(about = "PIN lockbox controller simulator", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial ambient light level (0.0-1.0)
    #[arg(long, default_value_t = 1.0)]
    light: f32,

    /// Start with the daylight gate on or off
    #[arg(long, value_enum, default_value_t = Toggle::On)]
    light_gate: Toggle,

    /// Log filter, e.g. `debug` or `lockbox_controller=trace` (overrides RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Toggle {
    On,
    Off,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_level.as_deref());

    let config = load_config(cli.config.as_deref())?;
    let initial_light = LightReading::new(cli.light).context("invalid --light")?;

    let machine = LockStateMachine::builder()
        .with_config(config.clone())
        .with_light_gate(cli.light_gate == Toggle::On)
        .build();

    let (keypad, keypad_handle) = MockKeypad::new();
    let (sensor, light_handle) = MockLightSensor::new(initial_light);
    let (led, led_handle) = MockIndicator::new();
    let (commands, command_handle) = MockCommandChannel::new();

    let scheduler = Scheduler::new(
        &config,
        machine,
        AnyKeySource::Mock(keypad),
        AnyLightSensor::Mock(sensor),
        AnyIndicator::Mock(led),
        AnyCommandChannel::Mock(commands),
        AnyTelemetrySink::Log(LogTelemetry),
    );
    let console = Console::new(keypad_handle, light_handle, command_handle);

    info!(
        light = %initial_light,
        light_gate = cli.light_gate == Toggle::On,
        "lockbox simulator ready"
    );

    tokio::select! {
        result = scheduler.run() => result.context("controller stopped")?,
        result = console.run(AnyCommandChannel::stdin()) => {
            result?;
            info!("Input closed, shutting down");
        }
        () = log_indicator(led_handle) => {}
    }

    Ok(())
}

fn init_tracing(filter: Option<&str>) {
    let filter = match filter {
        Some(directives) => tracing_subscriber::EnvFilter::new(directives),
        None => {
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
        }
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(path: Option<&Path>) -> Result<LockboxConfig> {
    let Some(path) = path else {
        return Ok(LockboxConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    LockboxConfig::parse(&content).with_context(|| format!("invalid config file {}", path.display()))
}

async fn log_indicator(mut led: MockIndicatorHandle) {
    while let Ok(color) = led.changed().await {
        info!(target: "lockbox::indicator", %color, "Indicator");
    }
}
