//! Runtime-agnostic async services.
//!
//! The connection worker needs very little from its runtime: a way to spawn
//! itself, a timer, a monotonic clock and an async mutex. This module picks
//! them from whichever runtime feature is enabled (tokio, async-std, smol).
//!
//! # Feature Flags
//!
//! Enable exactly one of the following features:
//!
//! - `runtime-tokio` (default) - Use the tokio runtime
//! - `runtime-async-std` - Use the async-std runtime
//! - `runtime-smol` - Use the smol runtime
//!
//! # Example
//!
//! ```toml
//! [dependencies]
//! # Using async-std
//! govee-ble-rs = { version = "0.1", default-features = false, features = ["runtime-async-std"] }
//!
//! # Using smol
//! govee-ble-rs = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

#[cfg(feature = "runtime-tokio")]
#[path = "tokio_impl.rs"]
mod backend;

#[cfg(feature = "runtime-async-std")]
#[path = "async_std_impl.rs"]
mod backend;

#[cfg(feature = "runtime-smol")]
#[path = "smol_impl.rs"]
mod backend;

/// Async mutex of the active runtime.
pub use backend::Mutex;

/// Monotonic clock of the active runtime.
pub use backend::Instant;

/// Handle to a spawned task.
///
/// Awaiting it yields the task's output. Dropping it detaches the task on
/// every runtime; the task keeps running.
pub struct JoinHandle<T>(backend::Task<T>);

impl<T> Future for JoinHandle<T> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        Pin::new(&mut self.0).poll(cx)
    }
}

/// Spawn a future as a background task.
pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    JoinHandle(backend::spawn(future))
}

/// Sleep for the specified duration.
pub async fn sleep(duration: Duration) {
    backend::sleep(duration).await
}

/// Run a future with a deadline.
///
/// The future is dropped, and `Err(TimedOut)` returned, if it has not
/// completed after `duration`.
pub async fn timeout<F: Future>(duration: Duration, future: F) -> Result<F::Output, TimedOut> {
    backend::timeout(duration, future).await
}

/// Error returned when a deadline elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("deadline elapsed")]
pub struct TimedOut;

#[cfg(not(any(
    feature = "runtime-tokio",
    feature = "runtime-async-std",
    feature = "runtime-smol"
)))]
compile_error!(
    "One of \"runtime-tokio\", \"runtime-async-std\", or \"runtime-smol\" features must be enabled"
);

#[cfg(any(
    all(feature = "runtime-tokio", feature = "runtime-async-std"),
    all(feature = "runtime-tokio", feature = "runtime-smol"),
    all(feature = "runtime-async-std", feature = "runtime-smol"),
))]
compile_error!("Only one runtime feature can be enabled at a time");
