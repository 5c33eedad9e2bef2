//! Operator command processing.
//!
//! Commands arrive one per line and are matched exactly, case included:
//!
//! | Line          | Effect                              |
//! |---------------|-------------------------------------|
//! | `DISABLE_LDR` | bypass the daylight gate            |
//! | `ENABLE_LDR`  | restore the daylight gate           |
//! | `STOP_ALARM`  | end an alarm now (no effect otherwise) |
//!
//! Commands mutate the state machine directly and never drive the indicator.
//! The next tick reconciles it.

use std::fmt;
use std::str::FromStr;

use lockbox_core::constants::{CMD_DISABLE_LIGHT_GATE, CMD_ENABLE_LIGHT_GATE, CMD_STOP_ALARM};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::state_machine::LockStateMachine;

/// A recognized operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    DisableLightGate,
    EnableLightGate,
    StopAlarm,
}

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        match line {
            CMD_DISABLE_LIGHT_GATE => Ok(Command::DisableLightGate),
            CMD_ENABLE_LIGHT_GATE => Ok(Command::EnableLightGate),
            CMD_STOP_ALARM => Ok(Command::StopAlarm),
            other => Err(UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Command::DisableLightGate => CMD_DISABLE_LIGHT_GATE,
            Command::EnableLightGate => CMD_ENABLE_LIGHT_GATE,
            Command::StopAlarm => CMD_STOP_ALARM,
        };
        f.write_str(text)
    }
}

/// Text that is not a known command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCommand(pub String);

/// Informational reply to a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    LightGateDisabled,
    LightGateEnabled,
    AlarmStopped,
    /// The command was valid but nothing needed doing.
    NoEffect(Command),
    Unrecognized(String),
}

impl CommandReply {
    /// Whether the command changed anything.
    pub fn applied(&self) -> bool {
        !matches!(self, CommandReply::NoEffect(_) | CommandReply::Unrecognized(_))
    }
}

impl fmt::Display for CommandReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandReply::LightGateDisabled => f.write_str("light gate disabled"),
            CommandReply::LightGateEnabled => f.write_str("light gate enabled"),
            CommandReply::AlarmStopped => f.write_str("alarm stopped"),
            CommandReply::NoEffect(command) => write!(f, "{command}: no effect"),
            CommandReply::Unrecognized(text) => write!(f, "unrecognized command: {text:?}"),
        }
    }
}

/// Parses command lines and applies them to the state machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandProcessor;

impl CommandProcessor {
    /// Parse one line, without its line terminator.
    pub fn parse(line: &str) -> Result<Command, UnknownCommand> {
        line.trim_end_matches(['\r', '\n']).parse()
    }

    /// Apply one command line.
    pub fn dispatch(line: &str, machine: &mut LockStateMachine, now: Instant) -> CommandReply {
        let command = match Self::parse(line) {
            Ok(command) => command,
            Err(UnknownCommand(text)) => {
                warn!(command = %text, "Unrecognized command");
                return CommandReply::Unrecognized(text);
            }
        };

        let reply = Self::apply(command, machine, now);
        info!(%command, %reply, "Command processed");
        reply
    }

    /// Apply a parsed command.
    pub fn apply(command: Command, machine: &mut LockStateMachine, now: Instant) -> CommandReply {
        match command {
            Command::DisableLightGate => {
                machine.set_light_gate(false);
                CommandReply::LightGateDisabled
            }
            Command::EnableLightGate => {
                machine.set_light_gate(true);
                CommandReply::LightGateEnabled
            }
            Command::StopAlarm => match machine.stop_alarm(now) {
                Some(_) => CommandReply::AlarmStopped,
                None => CommandReply::NoEffect(command),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockbox_core::{Key, LightReading, LockState, Pin};
    use rstest::rstest;

    #[rstest]
    #[case("DISABLE_LDR", Command::DisableLightGate)]
    #[case("ENABLE_LDR", Command::EnableLightGate)]
    #[case("STOP_ALARM", Command::StopAlarm)]
    #[case("STOP_ALARM\r\n", Command::StopAlarm)]
    fn test_parse_known(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(CommandProcessor::parse(line), Ok(expected));
    }

    #[rstest]
    #[case("stop_alarm")]
    #[case(" STOP_ALARM")]
    #[case("STOP_ALARM ")]
    #[case("")]
    #[case("OPEN")]
    fn test_parse_is_exact(#[case] line: &str) {
        assert!(CommandProcessor::parse(line).is_err());
    }

    #[test]
    fn test_light_gate_commands() {
        let mut machine = LockStateMachine::default();
        let now = Instant::now();

        let reply = CommandProcessor::dispatch("DISABLE_LDR", &mut machine, now);
        assert_eq!(reply, CommandReply::LightGateDisabled);
        assert!(!machine.light_gate_enabled());
        assert!(machine.has_daylight());

        let reply = CommandProcessor::dispatch("ENABLE_LDR", &mut machine, now);
        assert_eq!(reply, CommandReply::LightGateEnabled);
        assert!(machine.light_gate_enabled());
        assert!(!machine.has_daylight());
    }

    #[test]
    fn test_stop_alarm_outside_alarm_has_no_effect() {
        let mut machine = LockStateMachine::default();

        let reply = CommandProcessor::dispatch("STOP_ALARM", &mut machine, Instant::now());

        assert_eq!(reply, CommandReply::NoEffect(Command::StopAlarm));
        assert!(!reply.applied());
        assert_eq!(reply.to_string(), "STOP_ALARM: no effect");
        assert_eq!(machine.state(), LockState::Disabled);
    }

    #[test]
    fn test_stop_alarm_relocks() {
        let mut machine = LockStateMachine::builder()
            .with_password(Pin::new("2580").unwrap())
            .build();
        let now = Instant::now();
        machine.tick(LightReading::FULL, now);
        for _ in 0..3 {
            for d in [9, 9, 9, 9] {
                machine.handle_key(Key::Digit(d), now);
            }
        }
        assert_eq!(machine.state(), LockState::Alarmed);

        let reply = CommandProcessor::dispatch("STOP_ALARM", &mut machine, now);

        assert_eq!(reply, CommandReply::AlarmStopped);
        assert_eq!(machine.state(), LockState::Locked);
    }

    #[test]
    fn test_unrecognized_leaves_state_alone() {
        let mut machine = LockStateMachine::default();

        let reply = CommandProcessor::dispatch("REBOOT", &mut machine, Instant::now());

        assert_eq!(reply, CommandReply::Unrecognized("REBOOT".to_string()));
        assert_eq!(reply.to_string(), "unrecognized command: \"REBOOT\"");
        assert_eq!(machine.state(), LockState::Disabled);
        assert!(machine.light_gate_enabled());
    }
}
