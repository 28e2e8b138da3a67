//! CLI application for driving a light strip.
//!
//! No Bluetooth stack is bundled, so this demo connects through a dry-run
//! link that prints every frame it would write. Swap `PrintLink` for a real
//! [`Link`] implementation to drive hardware.
//!
//! Run with: cargo run --example strip_cli -- --help

use std::io;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use govee_ble_rs::{
    CONTROL_CHARACTERISTIC, Command, Connection, Controller, ControllerConfig, DeliveryMode,
    DeviceAddress, Fade, Frame, Link, NamedColor,
};

#[derive(Parser)]
#[command(name = "strip-cli")]
#[command(about = "Control BLE light strips from the command line", long_about = None)]
struct Cli {
    /// Address of the strip
    #[arg(short, long, global = true, default_value = "A4:C1:38:12:DB:A2")]
    address: DeviceAddress,

    /// Keep-alive interval in milliseconds
    #[arg(short, long, global = true, default_value = "3000")]
    keep_alive: u64,

    /// Return from each command once queued instead of once written
    #[arg(short, long, global = true)]
    queued: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn the strip on
    On,

    /// Turn the strip off
    Off,

    /// Set brightness (0-100)
    Brightness {
        /// Brightness level (0-100)
        level: i32,
    },

    /// Set RGB color (0-255 for each component)
    Rgb {
        /// Red component (0-255)
        red: i32,
        /// Green component (0-255)
        green: i32,
        /// Blue component (0-255)
        blue: i32,
    },

    /// Set a color by name, "#rrggbb" or "r,g,b"
    Color {
        color: String,
    },

    /// List the known color names
    Colors,

    /// Flash the strip
    Blink {
        #[arg(short, long, default_value = "3")]
        iterations: u32,
        /// Delay between flashes in milliseconds
        #[arg(short, long, default_value = "500")]
        delay: u64,
        #[arg(short, long)]
        color: Option<String>,
    },

    /// Ramp the brightness up and down
    Fade {
        #[arg(long, default_value = "100")]
        amount: i32,
        #[arg(long, default_value = "10")]
        step: i32,
        #[arg(short, long)]
        color: Option<String>,
        /// Only ramp down
        #[arg(long)]
        no_in: bool,
        /// Only ramp up
        #[arg(long)]
        no_out: bool,
    },

    /// Send a raw command code with a hex payload
    Raw {
        code: u32,
        #[arg(default_value = "")]
        payload: String,
    },

    /// Stay connected and idle to watch keep-alives
    Idle {
        #[arg(short, long, default_value = "10")]
        seconds: u64,
    },

    /// Turn on, then print diagnostics
    Diagnostics,
}

/// A link that prints frames instead of sending them.
struct PrintLink {
    started: Instant,
}

struct PrintConnection {
    started: Instant,
}

impl Link for PrintLink {
    type Connection = PrintConnection;

    async fn connect(&mut self, address: &DeviceAddress) -> io::Result<PrintConnection> {
        println!("connect {} (characteristic {})", address, CONTROL_CHARACTERISTIC);
        Ok(PrintConnection {
            started: self.started,
        })
    }
}

impl Connection for PrintConnection {
    async fn write_frame(&mut self, frame: &Frame) -> io::Result<()> {
        let elapsed = self.started.elapsed().as_secs_f64();
        println!("[{:8.3}s] {:>10}  {}", elapsed, frame.kind(), frame);
        Ok(())
    }

    async fn close(self) -> io::Result<()> {
        println!("disconnect");
        Ok(())
    }
}

fn parse_hex(s: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if s.len() % 2 != 0 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(format!("expected pairs of hex digits, got {s:?}").into());
    }
    s.as_bytes()
        .chunks(2)
        .map(|pair| -> Result<u8, Box<dyn std::error::Error>> {
            Ok(u8::from_str_radix(std::str::from_utf8(pair)?, 16)?)
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Commands::Colors = cli.command {
        for name in NamedColor::names() {
            println!("{name}");
        }
        return Ok(());
    }

    let delivery = if cli.queued {
        DeliveryMode::Queued
    } else {
        DeliveryMode::Drained
    };
    let config = ControllerConfig::new()
        .keep_alive_interval(Duration::from_millis(cli.keep_alive))
        .delivery(delivery);
    let link = PrintLink {
        started: Instant::now(),
    };
    let strip = Controller::connect(link, cli.address, config).await?;

    let result = match cli.command {
        Commands::On => strip.power_on().await,
        Commands::Off => strip.power_off().await,
        Commands::Brightness { level } => strip.set_brightness(level).await,
        Commands::Rgb { red, green, blue } => strip.set_rgb(red, green, blue).await,
        Commands::Color { color } => strip.set_color(&color).await,
        Commands::Colors => Ok(()),
        Commands::Blink {
            iterations,
            delay,
            color,
        } => {
            strip
                .blink(iterations, Duration::from_millis(delay), color.as_deref())
                .await
        }
        Commands::Fade {
            amount,
            step,
            color,
            no_in,
            no_out,
        } => {
            let mut fade = Fade::new()
                .amount(amount)
                .step(step)
                .fade_in(!no_in)
                .fade_out(!no_out);
            if let Some(color) = color {
                fade = fade.color(&color);
            }
            strip.fade(&fade).await
        }
        Commands::Raw { code, payload } => {
            let payload = parse_hex(&payload)?;
            strip.send(&Command::Raw { code, payload }).await
        }
        Commands::Idle { seconds } => {
            tokio::time::sleep(Duration::from_secs(seconds)).await;
            Ok(())
        }
        Commands::Diagnostics => {
            let result = strip.power_on().await;
            println!("{}", serde_json::to_string_pretty(&strip.diagnostics())?);
            result
        }
    };

    if let Err(e) = &result {
        eprintln!("Error: {}", e);
    }
    strip.wait_until_drained().await.ok();
    strip.disconnect(false).await?;
    result.map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("").unwrap(), Vec::<u8>::new());
        assert_eq!(parse_hex("02ff0080").unwrap(), vec![0x02, 0xFF, 0x00, 0x80]);
        assert!(parse_hex("0").is_err());
        assert!(parse_hex("zz").is_err());
        assert!(parse_hex("+1").is_err());
        assert!(parse_hex("\u{e9}0").is_err());
    }
}
