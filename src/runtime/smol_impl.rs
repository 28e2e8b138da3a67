//! smol backend.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use smol::future::FutureExt;

use super::TimedOut;

pub use async_lock::Mutex;
pub use std::time::Instant;

/// A smol task that is detached, not cancelled, when dropped.
pub struct Task<T>(Option<smol::Task<T>>);

impl<T> Future for Task<T> {
    type Output = T;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        match self.0.as_mut() {
            Some(task) => Pin::new(task).poll(cx),
            None => Poll::Pending,
        }
    }
}

impl<T> Drop for Task<T> {
    fn drop(&mut self) {
        if let Some(task) = self.0.take() {
            task.detach();
        }
    }
}

pub fn spawn<F>(future: F) -> Task<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    Task(Some(smol::spawn(future)))
}

pub async fn sleep(duration: Duration) {
    smol::Timer::after(duration).await;
}

pub async fn timeout<F: Future>(duration: Duration, future: F) -> Result<F::Output, TimedOut> {
    let deadline = async {
        smol::Timer::after(duration).await;
        Err(TimedOut)
    };
    async { Ok(future.await) }.or(deadline).await
}
