//! # govee_ble_rs
//!
//! An async Rust library for controlling Govee-style Bluetooth LE light strips.
//!
//! This crate provides a **runtime-agnostic** async API that turns high level
//! light commands into 20-byte control frames and delivers them, in order, over
//! a persistent connection kept alive by a background worker.
//!
//! ## Quick Start
//!
//! ```ignore
//! use govee_ble_rs::{Controller, ControllerConfig};
//!
//! // Works with any async runtime!
//! async fn control_strip(link: MyBleLink) -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect to the strip; a worker now owns the link
//!     let address = "A4:C1:38:12:DB:A2".parse()?;
//!     let strip = Controller::connect(link, address, ControllerConfig::default()).await?;
//!
//!     strip.power_on().await?;
//!     strip.set_color("0,0,255").await?;
//!     strip.set_brightness(60).await?;
//!
//!     strip.disconnect(false).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Runtime Agnostic**: Works with tokio, async-std, or smol async runtimes
//! - **Frames**: Build and validate control frames with [`encode`] and [`Frame`]
//! - **Ordered Delivery**: A single [`CommandQueue`] per strip, drained by one worker
//! - **Keep-Alive**: Idle connections are refreshed every 3 seconds
//! - **Colors**: RGB, hex or named colors using [`Color`]
//! - **Brightness**: Control brightness from 0-100% using [`Brightness`]
//! - **Effects**: [`Controller::blink`] and [`Controller::fade`]
//! - **Discovery**: Resolve a strip by its advertised name with [`resolve_address_by_name`]
//! - **Diagnostics**: Recent frames and counters through [`FrameHistory`]
//!
//! ## Transport
//!
//! The crate does not ship a Bluetooth stack. Implement [`Link`] and
//! [`Connection`] on top of one; frames are written without response to the
//! [`CONTROL_CHARACTERISTIC`].
//!
//! ## Runtime Selection
//!
//! This library is runtime-agnostic. Select your preferred runtime using feature flags:
//!
//! ### Using tokio (default)
//!
//! ```toml
//! [dependencies]
//! govee-ble-rs = "0.1"
//! tokio = { version = "1", features = ["rt-multi-thread", "macros"] }
//! ```
//!
//! ### Using async-std
//!
//! ```toml
//! [dependencies]
//! govee-ble-rs = { version = "0.1", default-features = false, features = ["runtime-async-std"] }
//! async-std = { version = "1.12", features = ["attributes"] }
//! ```
//!
//! ### Using smol
//!
//! ```toml
//! [dependencies]
//! govee-ble-rs = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! smol = "2"
//! ```
//!
//! ## Feature Flags
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `runtime-async-std`: Use the async-std runtime
//! - `runtime-smol`: Use the smol runtime

mod command;
mod config;
mod controller;
mod discovery;
mod errors;
mod frame;
mod history;
mod link;
mod queue;
pub mod runtime;
mod types;
mod worker;

// Re-export public API
pub use command::{CMD_BRIGHTNESS, CMD_COLOR, CMD_POWER, COLOR_MODE_MANUAL, Command};
pub use config::{ControllerConfig, DeliveryMode};
pub use controller::Controller;
pub use discovery::{DiscoveredDevice, Scanner, resolve_address_by_name};
pub use errors::Error;
pub use frame::{
    FRAME_LEN, Frame, FrameKind, KEEP_ALIVE_COMMAND, MAX_PAYLOAD_LEN, checksum, encode,
    encode_keep_alive,
};
pub use history::{FrameHistory, HistoryEntry, HistorySummary};
pub use link::{CONTROL_CHARACTERISTIC, Connection, Link};
pub use queue::CommandQueue;
pub use types::{Brightness, Color, DeviceAddress, Fade, NamedColor, PowerMode};
pub use worker::ConnectionState;
