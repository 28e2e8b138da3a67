//! Brightness control for light strips.

use serde::{Deserialize, Serialize};

/// Brightness level from 0 to 100 percent.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Brightness {
    pub(crate) const MIN: i32 = 0;
    pub(crate) const MAX: i32 = 100;

    /// Full brightness (100%).
    pub fn new() -> Self {
        Brightness {
            value: Self::MAX as u8,
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns None if value is outside valid range (0-100).
    ///
    /// ```
    /// use govee_ble_rs::Brightness;
    ///
    /// assert!(Brightness::create(-10).is_none());
    /// assert!(Brightness::create(150).is_none());
    /// assert_eq!(Brightness::create(50).unwrap().value(), 50);
    /// ```
    pub fn create(value: i32) -> Option<Self> {
        if Self::is_valid(value) {
            Some(Brightness { value: value as u8 })
        } else {
            None
        }
    }

    /// Scaled to the device's 0-255 range, rounding halves to even.
    pub fn to_byte(&self) -> u8 {
        (f64::from(self.value) / 100.0 * 255.0).round_ties_even() as u8
    }

    fn is_valid(value: i32) -> bool {
        (Self::MIN..=Self::MAX).contains(&value)
    }
}
