//! Fixed-size wire frames and their XOR checksum.
//!
//! Every write to the strip's control characteristic is exactly
//! [`FRAME_LEN`] bytes:
//!
//! ```text
//! +--------+---------+--------------------------+----------+
//! | prefix | command | payload (zero padded)    | checksum |
//! | 1 byte | 1 byte  | 17 bytes                 | 1 byte   |
//! +--------+---------+--------------------------+----------+
//! ```
//!
//! The checksum is the XOR of the 19 bytes before it.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// Total length of a frame on the wire.
pub const FRAME_LEN: usize = 20;

/// Largest payload that fits between the command byte and the checksum.
pub const MAX_PAYLOAD_LEN: usize = FRAME_LEN - 3;

/// Command byte carried by the keep-alive frame.
pub const KEEP_ALIVE_COMMAND: u8 = 0x01;

/// The two kinds of frame, identified by their first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FrameKind {
    Command = 0x33,
    KeepAlive = 0xAA,
}

impl FrameKind {
    pub fn prefix(&self) -> u8 {
        *self as u8
    }

    pub fn from_prefix(prefix: u8) -> Option<Self> {
        match prefix {
            0x33 => Some(FrameKind::Command),
            0xAA => Some(FrameKind::KeepAlive),
            _ => None,
        }
    }
}

/// A complete 20-byte frame, checksum included.
///
/// # Example
///
/// ```
/// use govee_ble_rs::{Frame, FrameKind, encode};
///
/// let frame = encode(FrameKind::Command, 0x04, &[0xFF]).unwrap();
/// assert_eq!(frame.as_bytes().len(), 20);
/// assert_eq!(frame.command(), 0x04);
/// assert_eq!(frame.to_string(), "3304ff00000000000000000000000000000000c8");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    pub fn kind(&self) -> FrameKind {
        // Only `encode` and `try_from` construct frames; both vet the prefix.
        FrameKind::from_prefix(self.0[0]).unwrap_or(FrameKind::Command)
    }

    pub fn command(&self) -> u8 {
        self.0[1]
    }

    /// The zero-padded payload area.
    pub fn payload(&self) -> &[u8] {
        &self.0[2..FRAME_LEN - 1]
    }

    pub fn checksum(&self) -> u8 {
        self.0[FRAME_LEN - 1]
    }

    pub fn is_keep_alive(&self) -> bool {
        self.kind() == FrameKind::KeepAlive
    }
}

impl TryFrom<&[u8]> for Frame {
    type Error = Error;

    /// Validate a raw buffer as a frame.
    fn try_from(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; FRAME_LEN] = bytes.try_into().map_err(|_| {
            Error::InvalidFrame(format!("expected {FRAME_LEN} bytes, got {}", bytes.len()))
        })?;

        if FrameKind::from_prefix(bytes[0]).is_none() {
            return Err(Error::InvalidFrame(format!(
                "unknown prefix 0x{:02x}",
                bytes[0]
            )));
        }

        let expected = checksum(&bytes[..FRAME_LEN - 1]);
        if bytes[FRAME_LEN - 1] != expected {
            return Err(Error::InvalidFrame(format!(
                "checksum mismatch: expected 0x{expected:02x}, got 0x{:02x}",
                bytes[FRAME_LEN - 1]
            )));
        }

        Ok(Frame(bytes))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|b| write!(f, "{b:02x}"))
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({self})")
    }
}

/// XOR of all bytes.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

/// Build a frame from a command code and a payload of at most 17 bytes.
///
/// Payload bytes are copied as-is; validating them is up to the caller.
pub fn encode(kind: FrameKind, command: u32, payload: &[u8]) -> Result<Frame> {
    let command = u8::try_from(command).map_err(|_| Error::InvalidCommand(command))?;
    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(Error::PayloadTooLong(payload.len()));
    }

    let mut bytes = [0u8; FRAME_LEN];
    bytes[0] = kind.prefix();
    bytes[1] = command;
    bytes[2..2 + payload.len()].copy_from_slice(payload);
    bytes[FRAME_LEN - 1] = checksum(&bytes[..FRAME_LEN - 1]);

    Ok(Frame(bytes))
}

/// The keep-alive frame (`0xAA 0x01`, empty payload).
pub fn encode_keep_alive() -> Frame {
    let mut bytes = [0u8; FRAME_LEN];
    bytes[0] = FrameKind::KeepAlive.prefix();
    bytes[1] = KEEP_ALIVE_COMMAND;
    bytes[FRAME_LEN - 1] = checksum(&bytes[..FRAME_LEN - 1]);
    Frame(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_xor_of_first_19_bytes() {
        for len in 0..=MAX_PAYLOAD_LEN {
            let payload: Vec<u8> = (0..len as u8).map(|b| b.wrapping_mul(37)).collect();
            let frame = encode(FrameKind::Command, 0x05, &payload).unwrap();
            let bytes = frame.as_bytes();
            assert_eq!(bytes.len(), FRAME_LEN);
            assert_eq!(bytes[19], bytes[..19].iter().fold(0, |a, b| a ^ b));
            assert_eq!(&frame.payload()[..len], payload.as_slice());
            assert!(frame.payload()[len..].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn test_power_on_frame_bytes() {
        let frame = encode(FrameKind::Command, 0x01, &[0x01]).unwrap();
        let mut expected = [0u8; FRAME_LEN];
        expected[0] = 0x33;
        expected[1] = 0x01;
        expected[2] = 0x01;
        expected[19] = 0x33;
        assert_eq!(frame.as_bytes(), &expected);
    }

    #[test]
    fn test_payload_too_long() {
        let err = encode(FrameKind::Command, 0x05, &[0u8; 18]).unwrap_err();
        assert_eq!(err, Error::PayloadTooLong(18));
    }

    #[test]
    fn test_invalid_command() {
        let err = encode(FrameKind::Command, 0x100, &[]).unwrap_err();
        assert_eq!(err, Error::InvalidCommand(0x100));
        assert!(encode(FrameKind::Command, 0xFF, &[]).is_ok());
    }

    #[test]
    fn test_keep_alive() {
        let frame = encode_keep_alive();
        assert!(frame.is_keep_alive());
        assert_eq!(frame.command(), KEEP_ALIVE_COMMAND);
        assert!(frame.payload().iter().all(|&b| b == 0));
        assert_eq!(frame.checksum(), 0xAB);
        assert_eq!(frame, encode(FrameKind::KeepAlive, 0x01, &[]).unwrap());
    }

    #[test]
    fn test_decode_rejects_bad_frames() {
        let frame = encode(FrameKind::Command, 0x04, &[0x80]).unwrap();
        assert_eq!(Frame::try_from(&frame.as_bytes()[..]).unwrap(), frame);

        assert!(matches!(
            Frame::try_from(&frame.as_bytes()[..19]),
            Err(Error::InvalidFrame(_))
        ));

        let mut corrupted = *frame.as_bytes();
        corrupted[5] ^= 0x10;
        assert!(matches!(
            Frame::try_from(&corrupted[..]),
            Err(Error::InvalidFrame(_))
        ));

        let mut unknown = [0u8; FRAME_LEN];
        unknown[0] = 0x44;
        unknown[19] = 0x44;
        assert!(matches!(
            Frame::try_from(&unknown[..]),
            Err(Error::InvalidFrame(_))
        ));
    }
}
