//! Controlling a single light strip.

use std::time::Duration;

use futures::channel::oneshot;
use log::{debug, info};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::command::Command;
use crate::config::{ControllerConfig, DeliveryMode};
use crate::discovery::{self, Scanner};
use crate::errors::Error;
use crate::frame::Frame;
use crate::history::FrameHistory;
use crate::link::Link;
use crate::queue::{self, CommandQueue};
use crate::runtime::{self, JoinHandle, Mutex};
use crate::types::{Brightness, Color, DeviceAddress, Fade, PowerMode};
use crate::worker::{ConnectionState, SharedStatus, Worker};

type Result<T> = std::result::Result<T, Error>;

struct WorkerHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// A connected light strip.
///
/// A `Controller` owns a background worker holding the connection. Commands
/// are validated here, encoded into frames and queued for the worker, which
/// writes them in order and keeps the link alive while idle.
///
/// Whether a command returns once queued or once written is decided by the
/// controller's [`DeliveryMode`] (`Drained` unless configured otherwise), or
/// per call with [`send_with`](Controller::send_with).
///
/// # Example
///
/// ```ignore
/// use govee_ble_rs::{Controller, ControllerConfig};
///
/// let address = "A4:C1:38:12:DB:A2".parse()?;
/// let strip = Controller::connect(link, address, ControllerConfig::default()).await?;
/// strip.power_on().await?;
/// strip.set_color("orange").await?;
/// strip.set_brightness(40).await?;
/// strip.disconnect(false).await?;
/// ```
pub struct Controller {
    id: Uuid,
    address: DeviceAddress,
    queue: CommandQueue,
    status: SharedStatus,
    delivery: DeliveryMode,
    worker: Mutex<Option<WorkerHandle>>,
}

impl Controller {
    /// Start a worker for the strip at `address` and wait until it is connected.
    pub async fn connect<L: Link>(
        link: L,
        address: DeviceAddress,
        config: ControllerConfig,
    ) -> Result<Self> {
        let (queue, receiver) = queue::channel();
        let (stop_tx, stop_rx) = oneshot::channel();
        let (ready_tx, ready_rx) = oneshot::channel();
        let status = SharedStatus::new(config.history_size);

        let worker = Worker::new(link, address, receiver, status.clone(), &config);
        let task = runtime::spawn(worker.run(stop_rx, ready_tx));

        match ready_rx.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                task.await;
                return Err(e);
            }
            Err(_) => {
                return Err(Error::connection(
                    "connect",
                    "worker exited before becoming ready",
                ));
            }
        }

        let id = Uuid::new_v4();
        debug!("controller {} ready for {}", id, address);
        Ok(Controller {
            id,
            address,
            queue,
            status,
            delivery: config.delivery,
            worker: Mutex::new(Some(WorkerHandle {
                stop: stop_tx,
                task,
            })),
        })
    }

    /// Find the strip advertising `name`, then [`connect`](Controller::connect) to it.
    pub async fn connect_by_name<S: Scanner, L: Link>(
        scanner: &S,
        link: L,
        name: &str,
        scan_timeout: Duration,
        config: ControllerConfig,
    ) -> Result<Self> {
        let address = discovery::resolve_address_by_name(scanner, name, scan_timeout).await?;
        info!("resolved {:?} to {}", name, address);
        Self::connect(link, address, config).await
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn address(&self) -> DeviceAddress {
        self.address
    }

    pub fn state(&self) -> ConnectionState {
        self.status.state()
    }

    pub fn delivery_mode(&self) -> DeliveryMode {
        self.delivery
    }

    /// A producer handle on this controller's queue.
    ///
    /// Frames enqueued through it are written in order with everything else
    /// sent by this controller. Enqueueing fails once the worker has stopped.
    pub fn queue(&self) -> CommandQueue {
        self.queue.clone()
    }

    /// Frames queued but not yet written.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn history(&self) -> FrameHistory {
        self.status.history()
    }

    pub fn clear_history(&self) {
        self.status.clear_history();
    }

    /// Returns diagnostics including state, counters and recent frames.
    pub fn diagnostics(&self) -> Value {
        let history = self.status.history();
        let recent: Vec<_> = history.entries().collect();
        json!({
            "id": self.id.to_string(),
            "address": self.address.to_string(),
            "state": self.state().to_string(),
            "delivery": serde_json::to_value(self.delivery).unwrap_or(Value::Null),
            "pending": self.queue.len(),
            "history": serde_json::to_value(history.summary()).unwrap_or(Value::Null),
            "recent_frames": serde_json::to_value(recent).unwrap_or(Value::Null),
        })
    }

    /// Send a command using the controller's delivery mode.
    pub async fn send(&self, command: &Command) -> Result<()> {
        self.send_with(command, self.delivery).await
    }

    /// Send a command and wait until it has been written to the link.
    pub async fn send_and_wait(&self, command: &Command) -> Result<()> {
        self.send_with(command, DeliveryMode::Drained).await
    }

    pub async fn send_with(&self, command: &Command, mode: DeliveryMode) -> Result<()> {
        let frame = command.to_frame()?;
        self.send_frame(frame, mode).await
    }

    /// Queue a prebuilt frame.
    pub async fn send_frame(&self, frame: Frame, mode: DeliveryMode) -> Result<()> {
        if self.state().is_terminal() {
            return Err(self.stopped("send"));
        }
        self.queue.enqueue(frame).map_err(|_| self.stopped("send"))?;
        if mode == DeliveryMode::Drained {
            self.wait_until_drained().await?;
        }
        Ok(())
    }

    /// Wait until everything queued so far has been written.
    pub async fn wait_until_drained(&self) -> Result<()> {
        self.queue
            .wait_until_drained()
            .await
            .map_err(|_| self.stopped("drain"))
    }

    pub async fn set_power(&self, power: PowerMode) -> Result<()> {
        self.send(&Command::from(&power)).await
    }

    pub async fn power_on(&self) -> Result<()> {
        self.set_power(PowerMode::On).await
    }

    pub async fn power_off(&self) -> Result<()> {
        self.set_power(PowerMode::Off).await
    }

    /// Set the brightness in percent (0-100).
    pub async fn set_brightness(&self, percent: i32) -> Result<()> {
        let brightness = Brightness::create(percent).ok_or_else(|| {
            Error::out_of_range(
                "brightness",
                percent.into(),
                Brightness::MIN.into(),
                Brightness::MAX.into(),
            )
        })?;
        self.send(&Command::from(&brightness)).await
    }

    /// Set the color from RGB components (0-255 each).
    pub async fn set_rgb(&self, red: i32, green: i32, blue: i32) -> Result<()> {
        let color = Color::try_rgb(red, green, blue)?;
        self.apply_color(&color).await
    }

    /// Set the color from a color string such as `"red"`, `"#ff8000"` or `"0,128,255"`.
    pub async fn set_color(&self, color: &str) -> Result<()> {
        let color: Color = color.parse()?;
        self.apply_color(&color).await
    }

    pub async fn apply_color(&self, color: &Color) -> Result<()> {
        self.send(&Command::from(color)).await
    }

    /// Flash between full and zero brightness `iterations` times.
    ///
    /// With a `color`, the strip is first dimmed to zero and switched to it.
    pub async fn blink(&self, iterations: u32, delay: Duration, color: Option<&str>) -> Result<()> {
        if let Some(color) = color {
            self.prime(color).await?;
        }
        for _ in 0..iterations {
            self.set_brightness(100).await?;
            runtime::sleep(delay).await;
            self.set_brightness(0).await?;
            runtime::sleep(delay).await;
        }
        Ok(())
    }

    /// Ramp the brightness up and/or down, one frame per step.
    pub async fn fade(&self, fade: &Fade) -> Result<()> {
        let levels = fade.levels()?;
        if let Some(color) = &fade.color {
            self.prime(color).await?;
        }
        for level in levels {
            self.set_brightness(level).await?;
        }
        Ok(())
    }

    /// Stop the worker and close the link.
    ///
    /// With `turn_off_first`, the strip is set to full brightness and switched
    /// off before disconnecting, waiting for both frames regardless of the
    /// delivery mode. Frames still queued are discarded; call
    /// [`wait_until_drained`](Controller::wait_until_drained) first to keep
    /// them. Disconnecting is final: every later send fails.
    pub async fn disconnect(&self, turn_off_first: bool) -> Result<()> {
        let mut worker = self.worker.lock().await;
        let Some(handle) = worker.take() else {
            return Ok(());
        };

        let farewell = if turn_off_first {
            self.turn_off_before_stop().await
        } else {
            Ok(())
        };

        let _ = handle.stop.send(());
        handle.task.await;
        info!("controller {} disconnected from {}", self.id, self.address);
        farewell
    }

    async fn turn_off_before_stop(&self) -> Result<()> {
        let full = Brightness::new();
        self.send_and_wait(&Command::from(&full)).await?;
        self.send_and_wait(&Command::from(&PowerMode::Off)).await
    }

    /// Dim to zero, then switch color.
    async fn prime(&self, color: &str) -> Result<()> {
        let color: Color = color.parse()?;
        self.set_brightness(0).await?;
        self.apply_color(&color).await
    }

    fn stopped(&self, action: &str) -> Error {
        match self.status.last_error() {
            Some(last) => Error::connection(
                action,
                format!("worker for {} has stopped ({last})", self.address),
            ),
            None => Error::connection(action, format!("worker for {} has stopped", self.address)),
        }
    }
}

#[cfg(all(test, feature = "runtime-tokio"))]
mod tests {
    use super::*;
    use crate::discovery::tests::{FixedScanner, device};
    use crate::frame::{FrameKind, encode};
    use crate::link::mock::MockLink;

    const ADDRESS: &str = "A4:C1:38:12:DB:A2";

    async fn connect(link: &MockLink) -> Controller {
        connect_with(link, ControllerConfig::default()).await
    }

    async fn connect_with(link: &MockLink, config: ControllerConfig) -> Controller {
        Controller::connect(link.clone(), ADDRESS.parse().unwrap(), config)
            .await
            .unwrap()
    }

    fn brightness_byte(byte: u8) -> Frame {
        encode(FrameKind::Command, 0x04, &[byte]).unwrap()
    }

    fn color(r: u8, g: u8, b: u8) -> Frame {
        encode(FrameKind::Command, 0x05, &[0x02, r, g, b]).unwrap()
    }

    #[tokio::test]
    async fn test_blocking_send_returns_after_write() {
        let link = MockLink::new();
        let strip = connect(&link).await;
        assert_eq!(strip.state(), ConnectionState::Ready);

        strip.power_on().await.unwrap();
        assert_eq!(
            link.frames(),
            vec![encode(FrameKind::Command, 0x01, &[0x01]).unwrap()]
        );
        strip.power_off().await.unwrap();
        assert_eq!(
            link.frames()[1],
            encode(FrameKind::Command, 0x01, &[0x00]).unwrap()
        );
    }

    #[tokio::test]
    async fn test_brightness_bounds() {
        let link = MockLink::new();
        let strip = connect(&link).await;

        for bad in [150, -10, 101] {
            let err = strip.set_brightness(bad).await.unwrap_err();
            assert!(matches!(err, Error::OutOfRange { .. }), "{bad}: {err}");
        }
        assert!(link.frames().is_empty());

        strip.set_brightness(0).await.unwrap();
        strip.set_brightness(100).await.unwrap();
        assert_eq!(link.frames(), vec![brightness_byte(0x00), brightness_byte(0xFF)]);
    }

    #[tokio::test]
    async fn test_rgb_payload() {
        let link = MockLink::new();
        let strip = connect(&link).await;

        strip.set_rgb(255, 0, 128).await.unwrap();
        let frame = link.frames()[0];
        assert_eq!(frame.command(), 0x05);
        assert_eq!(&frame.payload()[..4], &[0x02, 0xFF, 0x00, 0x80]);

        let err = strip.set_rgb(0, 256, 0).await.unwrap_err();
        assert_eq!(err, Error::out_of_range("green", 256, 0, 255));
        assert_eq!(link.frames().len(), 1);
    }

    #[tokio::test]
    async fn test_set_color_parses_before_sending() {
        let link = MockLink::new();
        let strip = connect(&link).await;

        strip.set_color("#ff8000").await.unwrap();
        strip.set_color("blue").await.unwrap();
        assert!(matches!(
            strip.set_color("no-such-color").await,
            Err(Error::InvalidColorString(_))
        ));
        assert_eq!(link.frames(), vec![color(255, 128, 0), color(0, 0, 255)]);
    }

    #[tokio::test]
    async fn test_blink_sequence() {
        let link = MockLink::new();
        let strip = connect(&link).await;

        strip
            .blink(2, Duration::from_millis(1), Some("red"))
            .await
            .unwrap();
        assert_eq!(
            link.frames(),
            vec![
                brightness_byte(0),
                color(255, 0, 0),
                brightness_byte(255),
                brightness_byte(0),
                brightness_byte(255),
                brightness_byte(0),
            ]
        );
    }

    #[tokio::test]
    async fn test_fade_sequence() {
        let link = MockLink::new();
        let strip = connect(&link).await;

        strip
            .fade(&Fade::new().amount(100).step(50).color("lime"))
            .await
            .unwrap();
        assert_eq!(
            link.frames(),
            vec![
                brightness_byte(0),
                color(0, 255, 0),
                brightness_byte(0),
                brightness_byte(128),
                brightness_byte(255),
                brightness_byte(255),
                brightness_byte(128),
                brightness_byte(0),
            ]
        );

        assert!(strip.fade(&Fade::new().step(0)).await.is_err());
        assert_eq!(link.frames().len(), 8);
    }

    #[tokio::test]
    async fn test_sends_fail_after_disconnect() {
        let link = MockLink::new();
        let strip = connect(&link).await;

        strip.disconnect(false).await.unwrap();
        assert_eq!(strip.state(), ConnectionState::Stopped);
        assert!(link.is_closed());

        let err = strip.power_on().await.unwrap_err();
        assert!(err.is_connection_failure());
        assert!(strip.set_brightness(50).await.unwrap_err().is_connection_failure());
        assert!(strip.disconnect(false).await.is_ok());
    }

    #[tokio::test]
    async fn test_disconnect_turning_off_first() {
        let link = MockLink::new();
        let strip = connect(&link).await;

        strip.disconnect(true).await.unwrap();
        assert_eq!(
            link.command_frames(),
            vec![
                brightness_byte(255),
                encode(FrameKind::Command, 0x01, &[0x00]).unwrap(),
            ]
        );
        assert!(link.is_closed());
    }

    #[tokio::test]
    async fn test_queued_mode_drain_before_disconnect_keeps_frames() {
        let link = MockLink::with_write_delay(Duration::from_millis(5));
        let config = ControllerConfig::new().delivery(DeliveryMode::Queued);
        let strip = connect_with(&link, config).await;

        for percent in [10, 20, 30, 40, 50] {
            strip.set_brightness(percent).await.unwrap();
        }
        strip.wait_until_drained().await.unwrap();
        strip.disconnect(false).await.unwrap();
        assert_eq!(link.command_frames().len(), 5);
        assert_eq!(strip.pending(), 0);
    }

    #[tokio::test]
    async fn test_queued_mode_disconnect_may_drop_frames() {
        let link = MockLink::with_write_delay(Duration::from_millis(20));
        let config = ControllerConfig::new().delivery(DeliveryMode::Queued);
        let strip = connect_with(&link, config).await;

        for percent in 1..=10 {
            strip.set_brightness(percent).await.unwrap();
        }
        strip.disconnect(false).await.unwrap();
        assert!(link.command_frames().len() < 10);
        assert!(link.is_closed());
    }

    #[tokio::test]
    async fn test_write_failure_surfaces_on_next_send() {
        let link = MockLink::failing_after(1);
        let strip = connect(&link).await;

        strip.power_on().await.unwrap();
        let err = strip.power_off().await.unwrap_err();
        assert!(err.to_string().contains("link lost"), "{err}");

        let err = strip.set_rgb(1, 2, 3).await.unwrap_err();
        assert!(err.is_connection_failure());
        assert!(strip.state().is_terminal());

        strip.clear_history();
        let err = strip.power_on().await.unwrap_err();
        assert!(err.to_string().contains("link lost"), "{err}");
    }

    #[tokio::test]
    async fn test_concurrent_producers_share_the_queue() {
        let link = MockLink::new();
        let strip = connect(&link).await;

        let producers: Vec<_> = (0..4u8)
            .map(|p| {
                let queue = strip.queue();
                std::thread::spawn(move || {
                    for i in 0..25u8 {
                        queue.enqueue(brightness_byte(p * 25 + i)).unwrap();
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }
        strip.wait_until_drained().await.unwrap();

        let written = link.command_frames();
        assert_eq!(written.len(), 100);
        for p in 0..4u8 {
            let own: Vec<u8> = written
                .iter()
                .map(|f| f.payload()[0])
                .filter(|b| (p * 25..(p + 1) * 25).contains(b))
                .collect();
            assert_eq!(own, (p * 25..(p + 1) * 25).collect::<Vec<_>>());
        }
    }

    #[tokio::test]
    async fn test_connect_failure() {
        let link = MockLink::failing_connect();
        let result = Controller::connect(link, ADDRESS.parse().unwrap(), ControllerConfig::default()).await;
        assert!(result.err().unwrap().is_connection_failure());
    }

    #[tokio::test]
    async fn test_connect_by_name() {
        let scanner = FixedScanner(vec![
            device(Some("other"), "00:00:00:00:00:01"),
            device(Some("ihoment_H6110_DBA2"), ADDRESS),
        ]);
        let strip = Controller::connect_by_name(
            &scanner,
            MockLink::new(),
            "ihoment_H6110_DBA2",
            Duration::from_millis(1),
            ControllerConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(strip.address().to_string(), ADDRESS);

        let missing = Controller::connect_by_name(
            &scanner,
            MockLink::new(),
            "missing",
            Duration::from_millis(1),
            ControllerConfig::default(),
        )
        .await;
        assert!(matches!(missing, Err(Error::DeviceNotFound(_))));
    }

    #[tokio::test]
    async fn test_diagnostics() {
        let link = MockLink::new();
        let strip = connect(&link).await;
        strip.power_on().await.unwrap();

        let diag = strip.diagnostics();
        assert_eq!(diag["id"], strip.id().to_string());
        assert_eq!(diag["address"], ADDRESS);
        assert_eq!(diag["state"], "ready");
        assert_eq!(diag["delivery"], "drained");
        assert_eq!(diag["history"]["command_count"], 1);
        assert_eq!(diag["recent_frames"][0]["kind"], "command");
    }
}
