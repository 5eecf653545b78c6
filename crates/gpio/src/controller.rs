//! GPIO controller: driver lifecycle, call serialisation, status translation.
//!
//! # Lifecycle
//!
//! ```text
//!              acquire (config + initialise ok)
//!   Vacant ─────────────────────────────────────▶ Live ──── release / last drop ───▶ Released
//!     │                                             │                                   ▲
//!     │ acquire (initialise < 0)                    └── acquire: same handle            │
//!     ▼                                                                                 │
//!   Failed ── acquire: same InitializationFailed                  acquire: Released ────┘
//! ```
//!
//! A [`ControllerSlot`] initialises its driver at most once. Acquirers are
//! serialised by the slot mutex, so concurrent callers block until the first
//! one finishes and then observe its outcome. Terminate runs exactly once,
//! either from [`GpioController::release`] or when the last handle drops.
//!
//! # Calls
//!
//! Every driver call takes the controller's driver mutex, so the driver is
//! never entered concurrently. A negative status becomes [`Error::Driver`].
//! A non-negative status outside the domain a read expects (a mode code with
//! no [`PinMode`], a level other than 0/1) means the driver and this crate
//! disagree about the library version; that is not an `Error` but a panic,
//! raised after the driver mutex is released.

use core::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::config::ControllerConfig;
use crate::driver::GpioDriver;
use crate::error::{Error, Operation};
use crate::pin::{Pin, PinLevel, PinMode, PullMode};
use crate::status;

#[cfg(feature = "pigpio")]
use crate::pigpio::Pigpio;

// ---------------------------------------------------------------------------
// Shared driver state
// ---------------------------------------------------------------------------

/// The driver, present between initialise and terminate.
struct Shared<D: GpioDriver> {
    driver: Mutex<Option<D>>,
}

impl<D: GpioDriver> Shared<D> {
    fn lock(&self) -> MutexGuard<'_, Option<D>> {
        // A panic while holding this lock cannot leave the driver half-updated:
        // the guarded value is only the driver handle itself.
        self.driver.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_released(&self) -> bool {
        self.lock().is_none()
    }

    /// Terminate the driver if it is still live. Returns whether this call did it.
    fn terminate(driver: &mut Option<D>) -> bool {
        match driver.take() {
            Some(mut d) => {
                d.terminate();
                tracing::info!("gpio driver terminated");
                true
            }
            None => false,
        }
    }
}

impl<D: GpioDriver> Drop for Shared<D> {
    fn drop(&mut self) {
        let driver = self.driver.get_mut().unwrap_or_else(PoisonError::into_inner);
        Self::terminate(driver);
    }
}

// ---------------------------------------------------------------------------
// ControllerSlot
// ---------------------------------------------------------------------------

enum SlotState<D: GpioDriver> {
    Vacant,
    Live(Weak<Shared<D>>),
    Failed(i32),
    Released,
}

/// One-shot initialisation slot for a driver.
///
/// The process-wide pigpio slot is private to this module; tests create their
/// own slots around [`MockDriver`](crate::mocks::MockDriver)s.
///
/// `new` is `const` so a slot can live in a `static`.
pub struct ControllerSlot<D: GpioDriver> {
    state: Mutex<SlotState<D>>,
}

impl<D: GpioDriver> ControllerSlot<D> {
    /// Create an empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(SlotState::Vacant),
        }
    }

    /// Return the slot's controller, initialising the driver on first use.
    ///
    /// On the first call, `make_driver` builds the driver, `config` is applied
    /// and the driver is initialised. Later calls return a clone of the live
    /// handle without touching the driver; `make_driver` and `config` are
    /// ignored.
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] if the driver rejected `config`. Nothing was
    ///   initialised and the slot stays empty, so a corrected config may be
    ///   tried again.
    /// - [`Error::InitializationFailed`] if the driver's initialise call
    ///   failed, now or on an earlier call.
    /// - [`Error::Released`] if the slot's controller has been terminated.
    pub fn acquire(
        &self,
        config: &ControllerConfig,
        make_driver: impl FnOnce() -> D,
    ) -> Result<GpioController<D>, Error> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let existing = match &*state {
            SlotState::Vacant => None,
            SlotState::Live(weak) => Some(weak.upgrade()),
            SlotState::Failed(status) => {
                return Err(Error::InitializationFailed { status: *status });
            }
            SlotState::Released => return Err(Error::Released),
        };

        if let Some(upgraded) = existing {
            return match upgraded {
                Some(shared) if !shared.is_released() => {
                    tracing::debug!("gpio controller already initialised, sharing handle");
                    Ok(GpioController { shared })
                }
                _ => {
                    *state = SlotState::Released;
                    Err(Error::Released)
                }
            };
        }

        let mut driver = make_driver();
        match initialise(&mut driver, config) {
            Ok(version) => {
                tracing::info!(version, "gpio driver initialised");
                let shared = Arc::new(Shared {
                    driver: Mutex::new(Some(driver)),
                });
                *state = SlotState::Live(Arc::downgrade(&shared));
                Ok(GpioController { shared })
            }
            Err(err) => {
                if let Error::InitializationFailed { status } = err {
                    *state = SlotState::Failed(status);
                }
                Err(err)
            }
        }
    }
}

impl<D: GpioDriver> Default for ControllerSlot<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply `config`, then initialise. Returns the driver's version payload.
fn initialise<D: GpioDriver>(driver: &mut D, config: &ControllerConfig) -> Result<u32, Error> {
    let clock = config.clock;
    configured(
        Operation::ConfigureClock,
        driver.configure_clock(clock.sample_rate.micros(), clock.peripheral.code(), 0),
    )?;
    configured(
        Operation::ConfigureInterfaces,
        driver.configure_interfaces(config.interfaces.flags()),
    )?;

    let status = driver.initialise();
    status::check(status).map_err(|kind| {
        tracing::warn!(status, %kind, "gpio driver initialisation failed");
        Error::InitializationFailed { status }
    })
}

fn configured(op: Operation, status: i32) -> Result<(), Error> {
    status::check(status).map(drop).map_err(|kind| {
        tracing::warn!(%op, status, %kind, "gpio configuration rejected");
        Error::Configuration { op, kind, status }
    })
}

#[cfg(feature = "pigpio")]
static PIGPIO: ControllerSlot<Pigpio> = ControllerSlot::new();

// ---------------------------------------------------------------------------
// GpioController
// ---------------------------------------------------------------------------

/// Handle to an initialised GPIO driver.
///
/// Cheap to clone; all clones share one driver. The driver is terminated when
/// [`release`](Self::release) is called on any clone or when the last clone
/// is dropped, whichever comes first.
pub struct GpioController<D: GpioDriver> {
    shared: Arc<Shared<D>>,
}

impl<D: GpioDriver> Clone for GpioController<D> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<D: GpioDriver> fmt::Debug for GpioController<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GpioController")
            .field("released", &self.is_released())
            .finish()
    }
}

#[cfg(feature = "pigpio")]
impl GpioController<Pigpio> {
    /// Acquire the process-wide pigpio controller with the default config.
    ///
    /// # Errors
    ///
    /// As [`ControllerSlot::acquire`].
    pub fn acquire() -> Result<Self, Error> {
        Self::acquire_with(&ControllerConfig::DEFAULT)
    }

    /// Acquire the process-wide pigpio controller.
    ///
    /// `config` only takes effect on the call that initialises pigpio.
    ///
    /// # Errors
    ///
    /// As [`ControllerSlot::acquire`].
    pub fn acquire_with(config: &ControllerConfig) -> Result<Self, Error> {
        PIGPIO.acquire(config, Pigpio::new)
    }
}

impl<D: GpioDriver> GpioController<D> {
    /// Terminate the driver now.
    ///
    /// Every other clone of this handle fails with [`Error::Released`] from
    /// then on. Has no effect if the driver was already terminated.
    pub fn release(self) {
        let mut driver = self.shared.lock();
        if !Shared::<D>::terminate(&mut driver) {
            tracing::debug!("gpio driver already terminated, release ignored");
        }
    }

    /// Whether the driver has been terminated.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.shared.is_released()
    }

    /// Set the function of `pin`.
    ///
    /// # Errors
    ///
    /// [`Error::Driver`] with `InvalidPin` or `InvalidGpioMode`;
    /// [`Error::Released`] after termination.
    pub fn set_mode(&self, pin: Pin, mode: PinMode) -> Result<(), Error> {
        self.call(Operation::SetMode, pin, Some(mode.code()), |d| {
            d.set_mode(pin.get(), mode.code())
        })
            .map(drop)
    }

    /// Read the current function of `pin`.
    ///
    /// # Errors
    ///
    /// [`Error::Driver`] with `InvalidPin`; [`Error::Released`] after termination.
    ///
    /// # Panics
    ///
    /// If the driver reports a mode code with no [`PinMode`].
    pub fn mode(&self, pin: Pin) -> Result<PinMode, Error> {
        let code = self.call(Operation::GetMode, pin, None, |d| d.get_mode(pin.get()))?;
        Ok(PinMode::from_code(code)
            .unwrap_or_else(|| contract_violation(Operation::GetMode, pin, code)))
    }

    /// Read the level of `pin`.
    ///
    /// # Errors
    ///
    /// [`Error::Driver`] with `InvalidPin`; [`Error::Released`] after termination.
    ///
    /// # Panics
    ///
    /// If the driver reports a level other than 0 or 1.
    pub fn read(&self, pin: Pin) -> Result<PinLevel, Error> {
        let code = self.call(Operation::Read, pin, None, |d| d.read(pin.get()))?;
        Ok(PinLevel::from_code(code)
            .unwrap_or_else(|| contract_violation(Operation::Read, pin, code)))
    }

    /// Write a raw level to `pin`. The driver validates `level`.
    ///
    /// # Errors
    ///
    /// [`Error::Driver`] with `InvalidPin` or `InvalidLevel`;
    /// [`Error::Released`] after termination.
    pub fn write_level(&self, pin: Pin, level: u32) -> Result<(), Error> {
        self.call(Operation::Write, pin, Some(level), |d| d.write(pin.get(), level))
            .map(drop)
    }

    /// Write `level` to `pin`.
    ///
    /// # Errors
    ///
    /// As [`write_level`](Self::write_level).
    pub fn write(&self, pin: Pin, level: PinLevel) -> Result<(), Error> {
        self.write_level(pin, level.code())
    }

    /// Select the pull resistor of `pin`.
    ///
    /// # Errors
    ///
    /// [`Error::Driver`] with `InvalidPin` or `InvalidPullUpDownMode`;
    /// [`Error::Released`] after termination.
    pub fn set_pull(&self, pin: Pin, pull: PullMode) -> Result<(), Error> {
        self.call(Operation::SetPull, pin, Some(pull.code()), |d| {
            d.set_pull_up_down(pin.get(), pull.code())
        })
        .map(drop)
    }

    /// Start PWM on `pin` with `duty_cycle` out of the pin's range
    /// (0 stops PWM).
    ///
    /// # Errors
    ///
    /// [`Error::Driver`] with `InvalidUserAllowedPin` or `InvalidDutyCycle`;
    /// [`Error::Released`] after termination.
    pub fn pwm_write(&self, pin: Pin, duty_cycle: u32) -> Result<(), Error> {
        self.call(Operation::PwmWrite, pin, Some(duty_cycle), |d| {
            d.pwm_write(pin.get(), duty_cycle)
        })
            .map(drop)
    }

    /// Current PWM duty cycle of `pin`.
    ///
    /// # Errors
    ///
    /// [`Error::Driver`] with `InvalidUserAllowedPin`;
    /// [`Error::Released`] after termination.
    pub fn pwm_read(&self, pin: Pin) -> Result<u32, Error> {
        self.call(Operation::PwmRead, pin, None, |d| d.pwm_duty_cycle(pin.get()))
    }

    /// Set the PWM range (the duty cycle that means 100 %) of `pin`.
    ///
    /// # Errors
    ///
    /// [`Error::Driver`] with `InvalidUserAllowedPin` or `InvalidDutyRange`;
    /// [`Error::Released`] after termination.
    pub fn pwm_set_range(&self, pin: Pin, range: u32) -> Result<(), Error> {
        let real = self.call(Operation::PwmSetRange, pin, Some(range), |d| {
            d.set_pwm_range(pin.get(), range)
        })?;
        if real != range {
            tracing::debug!(pin = pin.get(), range, real, "pwm range adjusted for frequency");
        }
        Ok(())
    }

    /// Current PWM range of `pin`.
    ///
    /// # Errors
    ///
    /// [`Error::Driver`] with `InvalidUserAllowedPin`;
    /// [`Error::Released`] after termination.
    pub fn pwm_range(&self, pin: Pin) -> Result<u32, Error> {
        self.call(Operation::PwmRange, pin, None, |d| d.pwm_range(pin.get()))
    }

    /// Start servo pulses of `pulse_width` µs on `pin` (0 stops them).
    ///
    /// # Errors
    ///
    /// [`Error::Driver`] with `InvalidUserAllowedPin` or `InvalidPulseWidth`;
    /// [`Error::Released`] after termination.
    pub fn servo_write(&self, pin: Pin, pulse_width: u32) -> Result<(), Error> {
        self.call(Operation::ServoWrite, pin, Some(pulse_width), |d| {
            d.servo_write(pin.get(), pulse_width)
        })
            .map(drop)
    }

    /// Run one driver call under the driver mutex and translate its status.
    ///
    /// `arg` is the call's second argument, if it has one; it is only logged.
    fn call(
        &self,
        op: Operation,
        pin: Pin,
        arg: Option<u32>,
        f: impl FnOnce(&mut D) -> i32,
    ) -> Result<u32, Error> {
        let status = {
            let mut guard = self.shared.lock();
            let Some(driver) = guard.as_mut() else {
                tracing::debug!(%op, pin = pin.get(), arg, "gpio call after release");
                return Err(Error::Released);
            };
            f(driver)
        };

        match status::check(status) {
            Ok(value) => {
                tracing::debug!(%op, pin = pin.get(), arg, status, "gpio call");
                Ok(value)
            }
            Err(kind) => {
                tracing::warn!(%op, pin = pin.get(), arg, status, %kind, "gpio call rejected");
                Err(Error::Driver {
                    op,
                    pin,
                    kind,
                    status,
                })
            }
        }
    }
}

/// The driver returned a success value outside the operation's domain.
#[cold]
#[allow(clippy::panic)] // driver/crate version mismatch is not a recoverable error
fn contract_violation(op: Operation, pin: Pin, value: u32) -> ! {
    tracing::error!(%op, pin = pin.get(), value, "driver returned out-of-domain value");
    panic!("{op} returned unknown value {value} for {pin}");
}
