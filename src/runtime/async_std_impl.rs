//! async-std backend.

use std::future::Future;
use std::time::Duration;

use super::TimedOut;

pub use async_std::sync::Mutex;
pub use std::time::Instant;

/// async-std already detaches tasks whose handle is dropped.
pub type Task<T> = async_std::task::JoinHandle<T>;

pub fn spawn<F>(future: F) -> Task<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    async_std::task::spawn(future)
}

pub async fn sleep(duration: Duration) {
    async_std::task::sleep(duration).await
}

pub async fn timeout<F: Future>(duration: Duration, future: F) -> Result<F::Output, TimedOut> {
    async_std::future::timeout(duration, future)
        .await
        .map_err(|_| TimedOut)
}
