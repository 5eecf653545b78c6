//! Blink an LED on a Raspberry Pi.
//!
//! ```text
//! sudo -E RUST_LOG=gpio=debug cargo run -p gpio --features pigpio --example blink -- 17 10 [config.json]
//! ```
//!
//! Arguments: BCM pin (default 17), number of blinks (default 5), and an
//! optional JSON [`ControllerConfig`] file.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    prelude::*,
};

use gpio::{ControllerConfig, GpioController, Pin, PinLevel, PinMode};

const HALF_PERIOD: Duration = Duration::from_millis(250);

fn main() -> Result<()> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let pin = match args.next() {
        Some(arg) => Pin::new(arg.parse().context("pin must be a BCM number")?),
        None => Pin::new(17),
    };
    let blinks: u32 = match args.next() {
        Some(arg) => arg.parse().context("blink count must be a number")?,
        None => 5,
    };
    let config = match args.next() {
        Some(path) => ControllerConfig::load(&path)
            .with_context(|| format!("failed to load controller config {path}"))?,
        None => ControllerConfig::DEFAULT,
    };

    let gpio = GpioController::acquire_with(&config)?;
    gpio.set_mode(pin, PinMode::Output)?;

    for n in 0..blinks {
        tracing::info!(%pin, n, "blink");
        gpio.write(pin, PinLevel::On)?;
        std::thread::sleep(HALF_PERIOD);
        gpio.write(pin, PinLevel::Off)?;
        std::thread::sleep(HALF_PERIOD);
    }

    gpio.set_mode(pin, PinMode::Input)?;
    gpio.release();
    Ok(())
}

// Log to stdout, filtered by RUST_LOG, defaulting to INFO.
fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}
