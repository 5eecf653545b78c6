//! Host-side GPIO controller for the Raspberry Pi
//!
//! This crate drives GPIO pins through libpigpio: pin function select,
//! digital reads and writes, pull resistors, PWM and servo pulses. It is a
//! thin layer that owns the library's lifecycle, serialises calls into it and
//! turns its integer statuses into typed errors.
//!
//! # Architecture Layers
//!
//! ```text
//! Application
//!         ↓
//! GpioController (this crate - lifecycle, locking, status translation)
//!         ↓
//! GpioDriver (raw i32-status boundary)
//!         ↓
//! libpigpio (FFI, `pigpio` feature)  |  MockDriver (host tests)
//! ```
//!
//! # Modules
//!
//! - [`pin`] - `Pin`, `PinMode`, `PinLevel`, `PullMode`
//! - [`status`] - `ErrorKind` and the status table
//! - [`error`] - crate `Error`
//! - [`driver`] - `GpioDriver` trait
//! - [`config`] - pre-initialisation `ControllerConfig`
//! - [`controller`] - `GpioController` and `ControllerSlot`
//! - [`mocks`] - `MockDriver`
//!
//! # Features
//!
//! - `pigpio`: link libpigpio and expose `GpioController::<Pigpio>::acquire`
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(feature = "pigpio")]
//! # fn main() -> Result<(), gpio::Error> {
//! use gpio::{GpioController, Pin, PinLevel, PinMode};
//!
//! let gpio = GpioController::acquire()?;
//! gpio.set_mode(Pin::new(17), PinMode::Output)?;
//! gpio.write(Pin::new(17), PinLevel::On)?;
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "pigpio"))]
//! # fn main() {}
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() outside the contract-violation path
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::print_stdout)] // prefer tracing over println! in lib code
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod mocks;
pub mod pin;
#[cfg(feature = "pigpio")]
pub mod pigpio;
pub mod status;

pub use config::{
    ClockConfig, ClockPeripheral, ConfigError, ControllerConfig, InterfaceConfig, SampleRate,
};
pub use controller::{ControllerSlot, GpioController};
pub use driver::GpioDriver;
pub use error::{Error, Operation};
pub use pin::{Pin, PinLevel, PinMode, PullMode};
pub use status::ErrorKind;

#[cfg(feature = "pigpio")]
pub use pigpio::Pigpio;
