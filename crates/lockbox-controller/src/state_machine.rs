//! Lock state machine.
//!
//! This module owns every piece of mutable lock state: the current state, the
//! partial keypad entry, the PIN, the daylight gate and the failed-attempt
//! record. Two entry points drive it:
//!
//! - [`LockStateMachine::handle_key`] for each key press;
//! - [`LockStateMachine::tick`] for each periodic evaluation (light level,
//!   alarm duration, entry inactivity).
//!
//! Both are synchronous and return a [`Reaction`]: the transition taken, if
//! any, and the indicator effects the caller must play. The machine never
//! touches hardware or sleeps, and time is always passed in, so every rule can
//! be tested without a runtime.
//!
//! # States
//!
//! - `Disabled`: light gate not satisfied, keys ignored
//! - `BootMode`: no PIN yet, the first four digits become the PIN
//! - `Locked`: waiting for the PIN
//! - `Open`: unlocked
//! - `Alarmed`: too many wrong PINs, keys ignored until the alarm ends
//!
//! # Valid Transitions
//!
//! - Disabled → BootMode/Locked (daylight regained)
//! - BootMode/Locked → Disabled (daylight lost)
//! - BootMode → Locked (PIN entered)
//! - Locked → Open (PIN matched)
//! - Locked → Alarmed (attempt limit reached)
//! - Open → Locked (`*`)
//! - Open → BootMode (`###`, PIN cleared)
//! - Alarmed → Locked (alarm elapsed or stopped)
//!
//! # Examples
//!
//! ```
//! use lockbox_controller::{LockStateMachine, LockboxConfig};
//! use lockbox_core::{Key, LightReading, LockState};
//! use tokio::time::Instant;
//!
//! let mut machine = LockStateMachine::new(&LockboxConfig::default());
//! let now = Instant::now();
//!
//! machine.tick(LightReading::FULL, now);
//! assert_eq!(machine.state(), LockState::BootMode);
//!
//! for d in [1, 2, 3, 4] {
//!     machine.handle_key(Key::Digit(d), now);
//! }
//! assert_eq!(machine.state(), LockState::Locked);
//! assert_eq!(machine.password().map(|p| p.as_str()), Some("1234"));
//! ```

use std::collections::VecDeque;
use std::time::Duration;

use lockbox_core::constants::{MAX_INPUT_LENGTH, PIN_LENGTH, RESET_HASH_COUNT};
use lockbox_core::{Key, LightReading, LockState, Pin, ThresholdDirection};
use lockbox_hardware::LedColor;
use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, trace, warn};

use crate::attempts::FailedAttemptTracker;
use crate::config::LockboxConfig;
use crate::snapshot::Snapshot;

/// Maximum number of state transitions to keep in history.
///
/// A lock changes state a handful of times per use, so 100 entries cover
/// several dozen unlock cycles for diagnostics at a few kilobytes.
pub const MAX_HISTORY_SIZE: usize = 100;

/// Fixed indicator color for a state, if it has one.
///
/// `Alarmed` has no steady color: the tick loop flashes red and blue.
pub fn state_color(state: LockState) -> Option<LedColor> {
    match state {
        LockState::Disabled => Some(LedColor::OFF),
        LockState::BootMode => Some(LedColor::WHITE),
        LockState::Locked => Some(LedColor::BLUE),
        LockState::Open => Some(LedColor::GREEN),
        LockState::Alarmed => None,
    }
}

/// A single state transition with timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: LockState,

    /// The state transitioned to.
    pub to: LockState,

    /// When the transition occurred.
    #[serde(skip)]
    pub timestamp: Instant,
}

/// Indicator work requested by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorEffect {
    /// Drive the indicator to a steady color.
    Show(LedColor),
    /// Blank the indicator briefly, then restore it.
    Blink,
    /// One red/blue period of the alarm pattern.
    AlarmFlash,
}

/// What a key press or tick did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reaction {
    /// The transition taken, if any. At most one per event.
    pub transition: Option<StateTransition>,
    /// Indicator effects to play, in order.
    pub effects: Vec<IndicatorEffect>,
}

impl Reaction {
    /// Feedback for an accepted key, followed by the new state color.
    fn accepted(transition: Option<StateTransition>) -> Self {
        let mut effects = vec![IndicatorEffect::Blink];
        if let Some(color) = transition.as_ref().and_then(|t| state_color(t.to)) {
            effects.push(IndicatorEffect::Show(color));
        }
        Self {
            transition,
            effects,
        }
    }
}

/// Internal state with the data each state needs.
///
/// The PIN lives inside the variants that require it, so a comparison against
/// an unset PIN cannot be written.
#[derive(Debug, Clone)]
enum Phase {
    Disabled { pin: Option<Pin> },
    BootMode,
    Locked { pin: Pin },
    Open { pin: Pin },
    Alarmed { pin: Pin, since: Instant },
}

impl Phase {
    fn state(&self) -> LockState {
        match self {
            Phase::Disabled { .. } => LockState::Disabled,
            Phase::BootMode => LockState::BootMode,
            Phase::Locked { .. } => LockState::Locked,
            Phase::Open { .. } => LockState::Open,
            Phase::Alarmed { .. } => LockState::Alarmed,
        }
    }

    fn pin(&self) -> Option<&Pin> {
        match self {
            Phase::Disabled { pin } => pin.as_ref(),
            Phase::BootMode => None,
            Phase::Locked { pin } | Phase::Open { pin } | Phase::Alarmed { pin, .. } => Some(pin),
        }
    }
}

/// The lock controller state machine.
///
/// # Thread Safety
///
/// This struct is not thread-safe by design. The scheduler shares it behind a
/// `tokio::sync::Mutex` and never holds the lock across an indicator delay.
#[derive(Debug)]
pub struct LockStateMachine {
    phase: Phase,
    input: String,
    last_input_at: Option<Instant>,
    light_value: LightReading,
    light_gate_enabled: bool,
    attempts: FailedAttemptTracker,

    threshold: f32,
    direction: ThresholdDirection,
    alarm_duration: Duration,
    inactivity_timeout: Duration,

    state_entered_at: Instant,
    history: VecDeque<StateTransition>,
}

impl LockStateMachine {
    /// Create a machine in `Disabled` with no PIN and the light gate enabled.
    pub fn new(config: &LockboxConfig) -> Self {
        Self::builder().with_config(config.clone()).build()
    }

    /// Create a builder for restoring a PIN or starting with the gate off.
    ///
    /// # Examples
    ///
    /// ```
    /// use lockbox_controller::LockStateMachine;
    /// use lockbox_core::{LightReading, LockState, Pin};
    /// use tokio::time::Instant;
    ///
    /// let mut machine = LockStateMachine::builder()
    ///     .with_password(Pin::new("2580").unwrap())
    ///     .with_light_gate(false)
    ///     .build();
    ///
    /// machine.tick(LightReading::DARK, Instant::now());
    /// assert_eq!(machine.state(), LockState::Locked);
    /// ```
    pub fn builder() -> LockStateMachineBuilder {
        LockStateMachineBuilder::default()
    }

    /// Get the current state.
    pub fn state(&self) -> LockState {
        self.phase.state()
    }

    /// Get the partial entry.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Get the PIN, once one has been set.
    pub fn password(&self) -> Option<&Pin> {
        self.phase.pin()
    }

    /// Get the last light reading.
    pub fn light_value(&self) -> LightReading {
        self.light_value
    }

    pub fn light_gate_enabled(&self) -> bool {
        self.light_gate_enabled
    }

    /// Enable or bypass the daylight gate.
    ///
    /// Takes effect on the next tick, which also reconciles the indicator.
    pub fn set_light_gate(&mut self, enabled: bool) {
        if self.light_gate_enabled != enabled {
            info!(enabled, "Light gate changed");
        }
        self.light_gate_enabled = enabled;
    }

    /// Whether keys may be accepted under the current light level.
    pub fn has_daylight(&self) -> bool {
        !self.light_gate_enabled || self.direction.is_daylight(self.light_value, self.threshold)
    }

    /// Attempts left before the alarm arms, as seen at `now`.
    pub fn remaining_attempts(&self, now: Instant) -> u32 {
        self.attempts.remaining(now)
    }

    pub fn failed_attempts(&self) -> &FailedAttemptTracker {
        &self.attempts
    }

    /// When the current alarm started, while alarmed.
    pub fn alarm_started_at(&self) -> Option<Instant> {
        match self.phase {
            Phase::Alarmed { since, .. } => Some(since),
            _ => None,
        }
    }

    /// When the last key was accepted, if one is pending.
    pub fn last_input_at(&self) -> Option<Instant> {
        self.last_input_at
    }

    /// Time spent in the current state.
    pub fn time_in_current_state(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.state_entered_at)
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Get the last N state transitions.
    pub fn last_transitions(&self, count: usize) -> Vec<StateTransition> {
        let skip = self.history.len().saturating_sub(count);
        self.history.iter().skip(skip).cloned().collect()
    }

    /// Capture a read-only view for telemetry.
    pub fn snapshot(&self, now: Instant) -> Snapshot {
        Snapshot {
            state: self.state(),
            input: self.input.clone(),
            password: self
                .password()
                .map(|pin| pin.as_str().to_string())
                .unwrap_or_default(),
            has_daylight: self.has_daylight(),
            remaining_attempts: self.remaining_attempts(now),
            light_gate_enabled: self.light_gate_enabled,
            light_value: self.light_value.level(),
        }
    }

    /// Process one key press.
    pub fn handle_key(&mut self, key: Key, now: Instant) -> Reaction {
        if let Key::Letter(_) = key {
            trace!(%key, "Reserved key ignored");
            return Reaction::default();
        }

        match self.state() {
            LockState::Disabled | LockState::Alarmed => {
                trace!(%key, state = %self.state(), "Key ignored");
                Reaction::default()
            }
            LockState::BootMode => self.boot_mode_key(key, now),
            LockState::Locked => self.locked_key(key, now),
            LockState::Open => self.open_key(key, now),
        }
    }

    /// Run one periodic evaluation with a fresh light reading.
    pub fn tick(&mut self, reading: LightReading, now: Instant) -> Reaction {
        self.light_value = reading;
        let daylight = self.has_daylight();
        trace!(light = %reading, daylight, state = %self.state(), "Tick");

        let transition = match &self.phase {
            Phase::Alarmed { since, .. } => {
                if now.saturating_duration_since(*since) < self.alarm_duration {
                    return Reaction {
                        transition: None,
                        effects: vec![IndicatorEffect::AlarmFlash],
                    };
                }
                info!("Alarm period elapsed");
                self.carry_pin(now, |pin| Phase::Locked { pin })
            }
            Phase::Disabled { pin } if daylight => {
                let next = match pin.clone() {
                    Some(pin) => Phase::Locked { pin },
                    None => Phase::BootMode,
                };
                Some(self.enter(next, now))
            }
            Phase::BootMode | Phase::Locked { .. } if !daylight => {
                let pin = self.phase.pin().cloned();
                Some(self.enter(Phase::Disabled { pin }, now))
            }
            _ => None,
        };

        let mut effects = Vec::with_capacity(2);
        if let Some(color) = state_color(self.state()) {
            effects.push(IndicatorEffect::Show(color));
        }

        if transition.is_none() && self.entry_expired(now) {
            debug!(discarded = self.input.len(), "Entry timed out");
            self.input.clear();
            self.last_input_at = None;
            effects.push(IndicatorEffect::Blink);
        }

        Reaction {
            transition,
            effects,
        }
    }

    /// End an alarm early.
    ///
    /// Returns `None` when the lock is not alarmed.
    pub fn stop_alarm(&mut self, now: Instant) -> Option<StateTransition> {
        if self.state() != LockState::Alarmed {
            return None;
        }
        info!("Alarm stopped by operator");
        self.carry_pin(now, |pin| Phase::Locked { pin })
    }

    fn boot_mode_key(&mut self, key: Key, now: Instant) -> Reaction {
        match key {
            Key::Digit(_) => {
                self.accept(key, now);
                if self.input.len() < PIN_LENGTH {
                    return Reaction::accepted(None);
                }

                match Pin::new(&self.input) {
                    Ok(pin) => {
                        info!("PIN set");
                        Reaction::accepted(Some(self.enter(Phase::Locked { pin }, now)))
                    }
                    Err(e) => {
                        warn!(error = %e, "Discarding entry");
                        self.input.clear();
                        Reaction::accepted(None)
                    }
                }
            }
            Key::Hash => {
                self.clear_entry(now);
                Reaction::accepted(None)
            }
            _ => Reaction::default(),
        }
    }

    fn locked_key(&mut self, key: Key, now: Instant) -> Reaction {
        match key {
            Key::Digit(_) => {
                self.accept(key, now);
                if self.input.len() < PIN_LENGTH {
                    return Reaction::accepted(None);
                }

                let matched = match &self.phase {
                    Phase::Locked { pin } => pin.matches(&self.input),
                    _ => return Reaction::default(),
                };

                if matched {
                    info!("PIN accepted");
                    return Reaction::accepted(self.carry_pin(now, |pin| Phase::Open { pin }));
                }

                self.input.clear();
                let verdict = self.attempts.record_failure(now);
                if verdict.trigger_alarm {
                    warn!(limit = self.attempts.limit(), "Failed attempt limit reached");
                    return Reaction::accepted(
                        self.carry_pin(now, |pin| Phase::Alarmed { pin, since: now }),
                    );
                }

                debug!(remaining = verdict.remaining, "Wrong PIN");
                Reaction::accepted(None)
            }
            Key::Hash => {
                self.clear_entry(now);
                Reaction::accepted(None)
            }
            _ => Reaction::default(),
        }
    }

    fn open_key(&mut self, key: Key, now: Instant) -> Reaction {
        match key {
            Key::Star => Reaction::accepted(self.carry_pin(now, |pin| Phase::Locked { pin })),
            Key::Digit(_) | Key::Hash => {
                if self.input.len() >= MAX_INPUT_LENGTH {
                    self.input.remove(0);
                }
                self.accept(key, now);

                let trailing_hashes = self.input.bytes().rev().take_while(|&b| b == b'#').count();
                if trailing_hashes >= RESET_HASH_COUNT {
                    info!("PIN cleared, entering boot mode");
                    return Reaction::accepted(Some(self.enter(Phase::BootMode, now)));
                }
                Reaction::accepted(None)
            }
            Key::Letter(_) => Reaction::default(),
        }
    }

    fn accept(&mut self, key: Key, now: Instant) {
        self.input.push(key.to_char());
        self.last_input_at = Some(now);
        debug!(%key, len = self.input.len(), "Key accepted");
    }

    fn clear_entry(&mut self, now: Instant) {
        self.input.clear();
        self.last_input_at = Some(now);
        debug!("Entry cleared");
    }

    fn entry_expired(&self, now: Instant) -> bool {
        !self.input.is_empty()
            && self
                .last_input_at
                .is_some_and(|at| now.saturating_duration_since(at) > self.inactivity_timeout)
    }

    /// Enter the next state with the current PIN.
    fn carry_pin(
        &mut self,
        now: Instant,
        next: impl FnOnce(Pin) -> Phase,
    ) -> Option<StateTransition> {
        let pin = self.phase.pin()?.clone();
        Some(self.enter(next(pin), now))
    }

    fn enter(&mut self, next: Phase, now: Instant) -> StateTransition {
        let from = std::mem::replace(&mut self.phase, next).state();
        let to = self.phase.state();

        self.input.clear();
        self.last_input_at = None;
        self.attempts.reset();
        let held = self.time_in_current_state(now);
        self.state_entered_at = now;

        info!(from = %from, to = %to, ?held, "State transition");

        let transition = StateTransition {
            from,
            to,
            timestamp: now,
        };
        self.history.push_back(transition.clone());
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
        transition
    }
}

impl Default for LockStateMachine {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for constructing `LockStateMachine` instances.
#[derive(Debug, Default)]
pub struct LockStateMachineBuilder {
    config: LockboxConfig,
    password: Option<Pin>,
    light_gate_disabled: bool,
}

impl LockStateMachineBuilder {
    /// Use thresholds, limits and timeouts from `config`.
    pub fn with_config(mut self, config: LockboxConfig) -> Self {
        self.config = config;
        self
    }

    /// Start with a PIN already set, as after a completed boot mode.
    pub fn with_password(mut self, pin: Pin) -> Self {
        self.password = Some(pin);
        self
    }

    /// Start with the daylight gate enabled or bypassed.
    pub fn with_light_gate(mut self, enabled: bool) -> Self {
        self.light_gate_disabled = !enabled;
        self
    }

    /// Build the state machine. It always starts `Disabled`.
    pub fn build(self) -> LockStateMachine {
        let config = self.config;
        LockStateMachine {
            phase: Phase::Disabled {
                pin: self.password,
            },
            input: String::with_capacity(MAX_INPUT_LENGTH),
            last_input_at: None,
            light_value: LightReading::DARK,
            light_gate_enabled: !self.light_gate_disabled,
            attempts: FailedAttemptTracker::new(config.attempts.limit, config.attempts.window()),
            threshold: config.light.threshold,
            direction: config.light.direction,
            alarm_duration: config.timing.alarm_duration(),
            inactivity_timeout: config.timing.inactivity_timeout(),
            state_entered_at: Instant::now(),
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }
}
