//! Power mode for light control.

use serde::{Deserialize, Serialize};

/// Power state for a light strip.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum PowerMode {
    /// Turn the strip on
    On,
    /// Turn the strip off
    Off,
}

impl PowerMode {
    /// Payload byte of the power command.
    pub fn value(&self) -> u8 {
        match self {
            PowerMode::On => 0x01,
            PowerMode::Off => 0x00,
        }
    }
}

impl From<bool> for PowerMode {
    fn from(on: bool) -> Self {
        if on { PowerMode::On } else { PowerMode::Off }
    }
}
