//! Ordered handoff between callers and the connection worker.
//!
//! The queue is an unbounded MPSC channel. Producers never block; the worker
//! is the single consumer. Waiting for delivery is done with a drain marker
//! pushed behind the frames it waits for, so it completes exactly when every
//! earlier frame has been written to the link.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::channel::{mpsc, oneshot};
use futures::{FutureExt, StreamExt};

use crate::errors::Error;
use crate::frame::Frame;

type Result<T> = std::result::Result<T, Error>;

pub(crate) enum QueueItem {
    Frame(Frame),
    /// Completed once everything queued before it has been transmitted.
    Drain(oneshot::Sender<()>),
}

pub(crate) enum TryDequeue {
    Item(QueueItem),
    Empty,
    Closed,
}

/// Producer side of the command queue.
///
/// Cheap to clone; every clone feeds the same worker, and frames from
/// concurrent producers keep each producer's own order.
#[derive(Clone)]
pub struct CommandQueue {
    tx: mpsc::UnboundedSender<QueueItem>,
    pending: Arc<AtomicUsize>,
}

pub(crate) struct QueueReceiver {
    rx: mpsc::UnboundedReceiver<QueueItem>,
    pending: Arc<AtomicUsize>,
}

pub(crate) fn channel() -> (CommandQueue, QueueReceiver) {
    let (tx, rx) = mpsc::unbounded();
    let pending = Arc::new(AtomicUsize::new(0));
    (
        CommandQueue {
            tx,
            pending: Arc::clone(&pending),
        },
        QueueReceiver { rx, pending },
    )
}

impl CommandQueue {
    /// Append a frame. Never blocks.
    pub fn enqueue(&self, frame: Frame) -> Result<()> {
        self.pending.fetch_add(1, Ordering::SeqCst);
        if self.tx.unbounded_send(QueueItem::Frame(frame)).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            return Err(Error::connection("enqueue", "worker has stopped"));
        }
        Ok(())
    }

    /// Wait until every frame enqueued before this call has been transmitted.
    pub async fn wait_until_drained(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .unbounded_send(QueueItem::Drain(done_tx))
            .map_err(|_| Error::connection("drain", "worker has stopped"))?;
        done_rx
            .await
            .map_err(|_| Error::connection("drain", "worker stopped before the queue drained"))
    }

    /// Frames queued but not yet transmitted.
    pub fn len(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the worker has stopped accepting frames.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl QueueReceiver {
    /// Non-blocking poll.
    pub(crate) fn try_dequeue(&mut self) -> TryDequeue {
        match self.rx.next().now_or_never() {
            Some(Some(item)) => TryDequeue::Item(item),
            Some(None) => TryDequeue::Closed,
            None => TryDequeue::Empty,
        }
    }

    /// Wait for the next item; `None` once every producer is gone.
    pub(crate) async fn dequeue(&mut self) -> Option<QueueItem> {
        self.rx.next().await
    }

    pub(crate) fn mark_transmitted(&self) {
        self.pending.fetch_sub(1, Ordering::SeqCst);
    }

    /// Stop accepting items and discard what is still queued.
    ///
    /// Returns the number of frames dropped. Pending drain markers are
    /// dropped too, which fails their waiters.
    pub(crate) fn close(&mut self) -> usize {
        self.rx.close();
        let mut dropped = 0;
        while let TryDequeue::Item(item) = self.try_dequeue() {
            if let QueueItem::Frame(_) = item {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                dropped += 1;
            }
        }
        dropped
    }
}
