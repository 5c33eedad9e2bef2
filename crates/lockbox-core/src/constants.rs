//! Core constants for the lockbox controller.
//!
//! This module centralizes the keypad alphabet, PIN geometry, light-gate
//! defaults and every timing default used by the controller. Runtime
//! configuration (`LockboxConfig` in `lockbox-controller`) starts from these
//! values and validates overrides against the limits defined here.
//!
//! # Usage
//!
//! ```
//! use lockbox_core::constants::*;
//! use std::time::Duration;
//!
//! assert_eq!(PIN_LENGTH, 4);
//! let window = Duration::from_millis(DEFAULT_ATTEMPT_WINDOW_MS);
//! assert_eq!(window.as_secs(), 60);
//! ```

// ============================================================================
// Keypad
// ============================================================================

/// Every symbol a 4×4 keypad can produce.
///
/// Letters `A`-`D` are reserved: they are valid keys but carry no meaning.
pub const KEYPAD_SYMBOLS: &str = "0123456789*#ABCD";

/// Bit-to-key table of the 16-bit matrix scan word.
///
/// Bit `i` of the scan word is set while the key `MATRIX_KEY_MAP[i]` is held.
/// The order follows the column-major wiring of the membrane keypad.
///
/// # Examples
///
/// ```
/// use lockbox_core::constants::MATRIX_KEY_MAP;
///
/// assert_eq!(MATRIX_KEY_MAP.len(), 16);
/// assert_eq!(MATRIX_KEY_MAP.as_bytes()[0], b'*');
/// assert_eq!(MATRIX_KEY_MAP.as_bytes()[15], b'A');
/// ```
pub const MATRIX_KEY_MAP: &str = "*7410852#963DCBA";

/// Number of digits in a PIN.
pub const PIN_LENGTH: usize = 4;

/// Maximum number of symbols held in the input buffer between key events.
pub const MAX_INPUT_LENGTH: usize = 4;

/// Number of consecutive `#` presses in the Open state that wipe the PIN
/// and return the box to setup mode.
pub const RESET_HASH_COUNT: usize = 3;

// ============================================================================
// Light Gate
// ============================================================================

/// Default normalized illumination threshold.
///
/// The firmware this controller replaces compared the raw 16-bit ADC sample
/// against 40000; normalized, that is roughly 0.61.
///
/// # Value: 0.61
pub const DEFAULT_LIGHT_THRESHOLD: f32 = 0.61;

/// Full scale of a 16-bit ADC sample, used to normalize raw readings.
pub const ADC_FULL_SCALE: u16 = u16::MAX;

// ============================================================================
// Failed Attempt Policy
// ============================================================================

/// Default number of failed attempts inside the window that arms the alarm.
///
/// # Value: 3
pub const DEFAULT_ATTEMPT_LIMIT: u32 = 3;

/// Default sliding window for counting failed attempts (milliseconds).
///
/// # Value: 60000ms (60 seconds)
pub const DEFAULT_ATTEMPT_WINDOW_MS: u64 = 60_000;

// ============================================================================
// Timing
// ============================================================================

/// Default duration of the intrusion alarm before the box re-locks
/// (milliseconds).
///
/// # Value: 30000ms (30 seconds)
pub const DEFAULT_ALARM_DURATION_MS: u64 = 30_000;

/// Default inactivity timeout after which a partial entry is discarded
/// (milliseconds).
///
/// # Value: 10000ms (10 seconds)
pub const DEFAULT_INACTIVITY_TIMEOUT_MS: u64 = 10_000;

/// Default length of the key-press feedback blink (milliseconds).
///
/// # Value: 100ms
pub const DEFAULT_BLINK_MS: u64 = 100;

/// Default half-period of the red/blue alarm flash (milliseconds).
///
/// # Value: 250ms
pub const DEFAULT_ALARM_FLASH_MS: u64 = 250;

/// Default pause between two iterations of the control loop (milliseconds).
///
/// # Value: 100ms
pub const DEFAULT_TICK_MS: u64 = 100;

/// Default interval between two telemetry snapshots (milliseconds).
///
/// # Value: 1000ms (1 second)
pub const DEFAULT_TELEMETRY_INTERVAL_MS: u64 = 1_000;

/// Upper bound for any single indicator suspension point (milliseconds).
///
/// Blinks and alarm flashes hold the control loop; values above this would
/// starve key polling.
///
/// # Value: 2000ms
pub const MAX_FEEDBACK_MS: u64 = 2_000;

// ============================================================================
// Operator Commands
// ============================================================================

/// Command that turns the light gate off.
pub const CMD_DISABLE_LIGHT_GATE: &str = "DISABLE_LDR";

/// Command that turns the light gate back on.
pub const CMD_ENABLE_LIGHT_GATE: &str = "ENABLE_LDR";

/// Command that silences an active alarm.
pub const CMD_STOP_ALARM: &str = "STOP_ALARM";
