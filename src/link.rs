//! The physical radio link, as seen by the connection worker.
//!
//! The crate does not ship a Bluetooth stack. Implement [`Link`] on top of
//! the stack of your choice; every frame is written, without response, to
//! the [`CONTROL_CHARACTERISTIC`] of the strip.

use std::future::Future;
use std::io;

use uuid::{Uuid, uuid};

use crate::frame::Frame;
use crate::types::DeviceAddress;

/// GATT characteristic that accepts command frames.
pub const CONTROL_CHARACTERISTIC: Uuid = uuid!("00010203-0405-0607-0809-0a0b0c0d2b11");

/// Opens connections to strips.
pub trait Link: Send + 'static {
    /// An open connection, exclusively owned by one worker.
    type Connection: Connection;

    /// Connect to the strip at `address`.
    fn connect(
        &mut self,
        address: &DeviceAddress,
    ) -> impl Future<Output = io::Result<Self::Connection>> + Send;
}

/// An open connection to one strip.
///
/// The worker calls [`close`](Connection::close) on every exit path of its
/// service loop. Implementations should also release the underlying
/// resources on `Drop`, which is all that runs if the worker task panics.
pub trait Connection: Send + 'static {
    /// Write one frame.
    fn write_frame(&mut self, frame: &Frame) -> impl Future<Output = io::Result<()>> + Send;

    /// Disconnect.
    fn close(self) -> impl Future<Output = io::Result<()>> + Send;
}
