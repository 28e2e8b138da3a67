//! High-level commands and the frames they encode to.

use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::frame::{self, Frame, FrameKind};
use crate::types::{Brightness, Color, PowerMode};

type Result<T> = std::result::Result<T, Error>;

/// Command code switching the strip on or off.
pub const CMD_POWER: u8 = 0x01;
/// Command code setting the brightness.
pub const CMD_BRIGHTNESS: u8 = 0x04;
/// Command code setting the color.
pub const CMD_COLOR: u8 = 0x05;
/// First color payload byte selecting manual (single color) mode.
pub const COLOR_MODE_MANUAL: u8 = 0x02;

/// A command the strip understands.
///
/// # Example
///
/// ```
/// use govee_ble_rs::{Color, Command};
///
/// let frame = Command::from(&Color::rgb(255, 0, 128)).to_frame().unwrap();
/// assert_eq!(frame.command(), 0x05);
/// assert_eq!(&frame.payload()[..4], &[0x02, 0xFF, 0x00, 0x80]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Power(PowerMode),
    Brightness(Brightness),
    Color(Color),
    /// Any other command code with an opaque payload.
    Raw { code: u32, payload: Vec<u8> },
}

impl Command {
    pub fn code(&self) -> u32 {
        match self {
            Command::Power(_) => CMD_POWER.into(),
            Command::Brightness(_) => CMD_BRIGHTNESS.into(),
            Command::Color(_) => CMD_COLOR.into(),
            Command::Raw { code, .. } => *code,
        }
    }

    pub fn payload(&self) -> Vec<u8> {
        match self {
            Command::Power(power) => vec![power.value()],
            Command::Brightness(brightness) => vec![brightness.to_byte()],
            Command::Color(color) => vec![COLOR_MODE_MANUAL, color.red, color.green, color.blue],
            Command::Raw { payload, .. } => payload.clone(),
        }
    }

    pub fn to_frame(&self) -> Result<Frame> {
        frame::encode(FrameKind::Command, self.code(), &self.payload())
    }
}

impl From<&PowerMode> for Command {
    fn from(power: &PowerMode) -> Self {
        Command::Power(*power)
    }
}

impl From<&Brightness> for Command {
    fn from(brightness: &Brightness) -> Self {
        Command::Brightness(*brightness)
    }
}

impl From<&Color> for Command {
    fn from(color: &Color) -> Self {
        Command::Color(*color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_payloads() {
        let on = Command::from(&PowerMode::On).to_frame().unwrap();
        let off = Command::from(&PowerMode::Off).to_frame().unwrap();
        assert_eq!((on.command(), on.payload()[0]), (0x01, 0x01));
        assert_eq!((off.command(), off.payload()[0]), (0x01, 0x00));
    }

    #[test]
    fn test_brightness_payload_bounds() {
        let zero = Command::from(&Brightness::create(0).unwrap()).to_frame().unwrap();
        let full = Command::from(&Brightness::create(100).unwrap()).to_frame().unwrap();
        assert_eq!((zero.command(), zero.payload()[0]), (0x04, 0x00));
        assert_eq!((full.command(), full.payload()[0]), (0x04, 0xFF));
    }

    #[test]
    fn test_raw_command_validation() {
        let raw = Command::Raw {
            code: 0x1FF,
            payload: vec![],
        };
        assert_eq!(raw.to_frame().unwrap_err(), Error::InvalidCommand(0x1FF));

        let raw = Command::Raw {
            code: 0xAA,
            payload: vec![1; 18],
        };
        assert_eq!(raw.to_frame().unwrap_err(), Error::PayloadTooLong(18));
    }
}
