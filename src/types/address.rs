//! Radio addresses of light strips.

use std::fmt;
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::errors::Error;

/// A 48-bit Bluetooth device address, e.g. `A4:C1:38:12:DB:A2`.
///
/// ```
/// use govee_ble_rs::DeviceAddress;
///
/// let addr: DeviceAddress = "a4-c1-38-12-db-a2".parse().unwrap();
/// assert_eq!(addr.to_string(), "A4:C1:38:12:DB:A2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct DeviceAddress([u8; 6]);

impl DeviceAddress {
    pub fn new(octets: [u8; 6]) -> Self {
        DeviceAddress(octets)
    }

    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for DeviceAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidAddress(s.to_string());
        let separator = if s.contains('-') { '-' } else { ':' };

        let mut octets = [0u8; 6];
        let mut parts = s.split(separator);
        for octet in octets.iter_mut() {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 || !part.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *octet = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(DeviceAddress(octets))
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}
