use std::fmt::Display;

/// All error types that can occur when talking to a light strip.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The command code does not fit in a single byte.
    #[error("invalid command 0x{0:x}; must be between 0x00 and 0xff")]
    InvalidCommand(u32),

    /// The payload does not fit in a frame.
    #[error("payload too long: {0} bytes (max 17)")]
    PayloadTooLong(usize),

    /// A command argument is outside of its documented bounds.
    #[error("{what} {value} is out of range [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// The link could not be established, or failed mid-session.
    #[error("connection {action} failed: {reason}")]
    ConnectionFailure { action: String, reason: String },

    /// A received buffer is not a well-formed frame.
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// Failed to parse a [`crate::DeviceAddress`] from a string.
    #[error("invalid device address: {0}")]
    InvalidAddress(String),

    /// Failed to parse a [`crate::Color`] from a string.
    #[error("invalid color string: {0}")]
    InvalidColorString(String),

    /// No device advertising the given name was seen during the scan.
    #[error("no device named {0:?} found")]
    DeviceNotFound(String),
}

impl Error {
    /// Create a new connection failure
    pub fn connection(action: &str, reason: impl Display) -> Self {
        Error::ConnectionFailure {
            action: action.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a new out of range error
    pub fn out_of_range(what: &'static str, value: i64, min: i64, max: i64) -> Self {
        Error::OutOfRange {
            what,
            value,
            min,
            max,
        }
    }

    /// Whether this error means the worker is gone and a new controller is needed.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, Error::ConnectionFailure { .. })
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
