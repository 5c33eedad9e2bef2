use crate::{
    Result,
    constants::{ADC_FULL_SCALE, PIN_LENGTH},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// A single keypad symbol.
///
/// The controller understands digits, `*` and `#`. Letters `A`-`D` exist on
/// the physical keypad and are carried through as [`Key::Letter`] so that a
/// press is never mistaken for a digit, but the lock logic ignores them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Numeric digit (0-9).
    Digit(u8),
    /// Star key (*).
    Star,
    /// Hash/pound key (#).
    Hash,
    /// Reserved letter key (A-D).
    Letter(char),
}

impl Key {
    /// Create a digit key.
    ///
    /// # Errors
    /// Returns `Error::InvalidDigit` if the digit is greater than 9.
    pub fn digit(d: u8) -> Result<Self> {
        if d > 9 {
            return Err(Error::InvalidDigit(d));
        }
        Ok(Key::Digit(d))
    }

    /// Parse a keypad symbol.
    ///
    /// # Errors
    /// Returns `Error::InvalidKey` for anything outside `0-9`, `*`, `#`, `A-D`.
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            '0'..='9' => Ok(Key::Digit(c as u8 - b'0')),
            '*' => Ok(Key::Star),
            '#' => Ok(Key::Hash),
            'A'..='D' => Ok(Key::Letter(c)),
            _ => Err(Error::InvalidKey(c)),
        }
    }

    /// The symbol printed on the key.
    #[must_use]
    pub fn to_char(self) -> char {
        match self {
            Key::Digit(d) => char::from(b'0' + d),
            Key::Star => '*',
            Key::Hash => '#',
            Key::Letter(c) => c,
        }
    }

    /// Returns `true` for digit keys.
    #[inline]
    #[must_use]
    pub fn is_digit(self) -> bool {
        matches!(self, Key::Digit(_))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// A four-digit PIN.
///
/// # Security
/// Equality is constant-time, and `Debug` never prints the digits.
#[derive(Clone, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pin(String);

impl Pin {
    /// Create a PIN from exactly four ASCII digits.
    ///
    /// # Errors
    /// Returns `Error::InvalidPin` if the length is not 4 or a symbol is not a digit.
    pub fn new(digits: &str) -> Result<Self> {
        if digits.len() != PIN_LENGTH {
            return Err(Error::InvalidPin {
                reason: format!("expected {PIN_LENGTH} digits, got {}", digits.len()),
            });
        }
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidPin {
                reason: "only digits 0-9 are allowed".to_string(),
            });
        }
        Ok(Pin(digits.to_string()))
    }

    /// Get the digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a candidate entry in constant time.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl PartialEq for Pin {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.0)
    }
}

impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Pin(****)")
    }
}

impl std::str::FromStr for Pin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Pin::new(s)
    }
}

impl TryFrom<String> for Pin {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Pin::new(&value)
    }
}

impl From<Pin> for String {
    fn from(pin: Pin) -> Self {
        pin.0
    }
}

/// Normalized ambient-light reading in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct LightReading(f32);

impl LightReading {
    /// Total darkness.
    pub const DARK: LightReading = LightReading(0.0);

    /// Sensor saturated.
    pub const FULL: LightReading = LightReading(1.0);

    /// Create a reading from a normalized value.
    ///
    /// # Errors
    /// Returns `Error::InvalidLightReading` if the value is NaN or outside `0.0..=1.0`.
    pub fn new(level: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&level) {
            return Err(Error::InvalidLightReading(level));
        }
        Ok(LightReading(level))
    }

    /// Normalize a raw 16-bit ADC sample.
    #[must_use]
    pub fn from_raw_u16(raw: u16) -> Self {
        LightReading(f32::from(raw) / f32::from(ADC_FULL_SCALE))
    }

    /// Get the normalized level.
    #[must_use]
    pub fn level(self) -> f32 {
        self.0
    }
}

impl fmt::Display for LightReading {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}

/// Which side of the light threshold counts as daylight.
///
/// Photoresistor dividers can be wired either way, so the direction is a
/// configuration constant rather than something inferred at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdDirection {
    /// Readings at or above the threshold are daylight.
    #[default]
    Above,
    /// Readings at or below the threshold are daylight.
    Below,
}

impl ThresholdDirection {
    /// Apply the comparison to a reading.
    #[must_use]
    pub fn is_daylight(self, reading: LightReading, threshold: f32) -> bool {
        match self {
            ThresholdDirection::Above => reading.level() >= threshold,
            ThresholdDirection::Below => reading.level() <= threshold,
        }
    }
}

/// Externally visible state of the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockState {
    /// Keypad ignored, light gate not satisfied.
    Disabled,
    /// Waiting for a new PIN to be entered.
    BootMode,
    /// Waiting for the PIN.
    Locked,
    /// Unlocked.
    Open,
    /// Intrusion alarm sounding.
    Alarmed,
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            LockState::Disabled => "Disabled",
            LockState::BootMode => "BootMode",
            LockState::Locked => "Locked",
            LockState::Open => "Open",
            LockState::Alarmed => "Alarmed",
        };
        write!(f, "{name}")
    }
}
