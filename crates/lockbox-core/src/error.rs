use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Keypad errors
    #[error("Invalid key symbol: {0:?}")]
    InvalidKey(char),

    #[error("Digit must be 0-9, got {0}")]
    InvalidDigit(u8),

    #[error("Invalid PIN: {reason}")]
    InvalidPin { reason: String },

    // Sensor errors
    #[error("Light reading must be within 0.0-1.0, got {0}")]
    InvalidLightReading(f32),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidConfigValue { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
