//! The connection worker: a task that owns the link.
//!
//! One worker runs per [`Controller`](crate::Controller). It connects, then
//! loops waiting for whichever comes first of a stop request, the next queue
//! item, or the idle timer. Idle timeouts produce a keep-alive frame. A write
//! failure ends the worker; it is never restarted.

use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::FutureExt;
use futures::channel::oneshot;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::config::ControllerConfig;
use crate::errors::Error;
use crate::frame::{self, Frame};
use crate::history::FrameHistory;
use crate::link::{Connection, Link};
use crate::queue::{QueueItem, QueueReceiver, TryDequeue};
use crate::runtime::{self, Instant};
use crate::types::DeviceAddress;

type Result<T> = std::result::Result<T, Error>;

/// Lifecycle of a connection worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Ready,
    Stopping,
    Stopped,
}

impl ConnectionState {
    pub fn can_transition_to(&self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Disconnected, Connecting)
                | (Connecting, Ready)
                | (Connecting, Stopped)
                | (Ready, Stopping)
                | (Stopping, Stopped)
        )
    }

    /// Whether the worker has stopped or is about to.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConnectionState::Stopping | ConnectionState::Stopped)
    }
}

struct WorkerStatus {
    state: ConnectionState,
    history: FrameHistory,
}

/// Worker status, written by the worker and read by the controller.
#[derive(Clone)]
pub(crate) struct SharedStatus(Arc<Mutex<WorkerStatus>>);

impl SharedStatus {
    pub(crate) fn new(history_size: usize) -> Self {
        SharedStatus(Arc::new(Mutex::new(WorkerStatus {
            state: ConnectionState::Disconnected,
            history: FrameHistory::with_max_entries(history_size),
        })))
    }

    fn lock(&self) -> MutexGuard<'_, WorkerStatus> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn state(&self) -> ConnectionState {
        self.lock().state
    }

    fn set_state(&self, next: ConnectionState) {
        let mut status = self.lock();
        if !status.state.can_transition_to(next) {
            warn!("unexpected state transition {} -> {}", status.state, next);
        }
        debug!("worker state {} -> {}", status.state, next);
        status.state = next;
    }

    fn record_frame(&self, frame: &Frame) {
        self.lock().history.record(frame);
    }

    fn record_error(&self, error: &Error) {
        self.lock().history.record_error(&error.to_string());
    }

    pub(crate) fn last_error(&self) -> Option<String> {
        self.lock().history.last_error().map(String::from)
    }

    pub(crate) fn history(&self) -> FrameHistory {
        self.lock().history.clone()
    }

    pub(crate) fn clear_history(&self) {
        self.lock().history.clear();
    }
}

enum Event {
    Item(QueueItem),
    Idle,
    Stop,
}

pub(crate) struct Worker<L: Link> {
    link: L,
    address: DeviceAddress,
    queue: QueueReceiver,
    status: SharedStatus,
    keep_alive_interval: Duration,
    transmit_timeout: Option<Duration>,
}

impl<L: Link> Worker<L> {
    pub(crate) fn new(
        link: L,
        address: DeviceAddress,
        queue: QueueReceiver,
        status: SharedStatus,
        config: &ControllerConfig,
    ) -> Self {
        Worker {
            link,
            address,
            queue,
            status,
            keep_alive_interval: config.keep_alive_interval,
            transmit_timeout: config.transmit_timeout,
        }
    }

    /// Connect, report readiness, serve until stopped, then close the link.
    ///
    /// `stop` fires on an explicit stop request and also when its sender is
    /// dropped.
    pub(crate) async fn run(
        mut self,
        mut stop: oneshot::Receiver<()>,
        ready: oneshot::Sender<Result<()>>,
    ) {
        self.status.set_state(ConnectionState::Connecting);

        let mut connection = match self.link.connect(&self.address).await {
            Ok(connection) => connection,
            Err(e) => {
                let err = Error::connection("connect", e);
                error!("failed to connect to {}: {}", self.address, err);
                self.status.record_error(&err);
                self.queue.close();
                self.status.set_state(ConnectionState::Stopped);
                let _ = ready.send(Err(err));
                return;
            }
        };

        info!("connected to {}", self.address);
        self.status.set_state(ConnectionState::Ready);
        let _ = ready.send(Ok(()));

        let outcome = self.serve(&mut connection, &mut stop).await;

        self.status.set_state(ConnectionState::Stopping);
        let dropped = self.queue.close();
        if dropped > 0 {
            warn!(
                "discarding {} queued frame(s) for {}",
                dropped, self.address
            );
        }
        if let Err(e) = connection.close().await {
            warn!("error closing connection to {}: {}", self.address, e);
        }
        self.status.set_state(ConnectionState::Stopped);

        match outcome {
            Ok(()) => info!("disconnected from {}", self.address),
            Err(e) => error!("connection to {} lost: {}", self.address, e),
        }
    }

    async fn serve(
        &mut self,
        connection: &mut L::Connection,
        stop: &mut oneshot::Receiver<()>,
    ) -> Result<()> {
        let mut last_transmit = Instant::now();

        loop {
            if !matches!(stop.try_recv(), Ok(None)) {
                return Ok(());
            }

            let event = match self.queue.try_dequeue() {
                TryDequeue::Item(item) => Event::Item(item),
                TryDequeue::Closed => Event::Stop,
                TryDequeue::Empty => self.next_event(stop, last_transmit).await,
            };

            match event {
                Event::Stop => return Ok(()),
                Event::Item(QueueItem::Frame(frame)) => {
                    let sent = self.transmit(connection, &frame).await;
                    self.queue.mark_transmitted();
                    sent?;
                    last_transmit = Instant::now();
                }
                Event::Item(QueueItem::Drain(done)) => {
                    let _ = done.send(());
                }
                Event::Idle => {
                    debug!(
                        "{} idle for {:?}, sending keep-alive",
                        self.address,
                        last_transmit.elapsed()
                    );
                    self.transmit(connection, &frame::encode_keep_alive())
                        .await?;
                    last_transmit = Instant::now();
                }
            }
        }
    }

    /// Wait for a stop request, a queue item or the idle deadline.
    async fn next_event(
        &mut self,
        mut stop: &mut oneshot::Receiver<()>,
        last_transmit: Instant,
    ) -> Event {
        let idle = self
            .keep_alive_interval
            .saturating_sub(last_transmit.elapsed());

        let next = self.queue.dequeue().fuse();
        let timer = runtime::sleep(idle).fuse();
        futures::pin_mut!(next, timer);

        futures::select_biased! {
            _ = stop => Event::Stop,
            item = next => item.map_or(Event::Stop, Event::Item),
            () = timer => Event::Idle,
        }
    }

    async fn transmit(&mut self, connection: &mut L::Connection, frame: &Frame) -> Result<()> {
        let write = connection.write_frame(frame);
        let result = match self.transmit_timeout {
            Some(limit) => runtime::timeout(limit, write).await.unwrap_or_else(|_| {
                Err(io::Error::new(
                    io::ErrorKind::TimedOut,
                    format!("write took longer than {limit:?}"),
                ))
            }),
            None => write.await,
        };

        match result {
            Ok(()) => {
                debug!("sent {:?} to {}", frame, self.address);
                self.status.record_frame(frame);
                Ok(())
            }
            Err(e) => {
                let err = Error::connection("write", e);
                self.status.record_error(&err);
                Err(err)
            }
        }
    }
}
