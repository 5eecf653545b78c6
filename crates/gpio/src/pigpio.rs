//! libpigpio FFI driver.
//!
//! Links against the system `libpigpio` (`apt install libpigpio-dev`).
//! pigpio maps the SoC peripherals through `/dev/mem`, so the process must
//! run as root.
//!
//! # Safety
//!
//! pigpio keeps all of its state in C globals. Two things keep the raw calls
//! below sound:
//! - only the process-wide slot in [`controller`](crate::controller) can
//!   construct a [`Pigpio`], so initialise/terminate are issued at most once;
//! - every call goes through the controller's driver mutex, so no two calls
//!   run concurrently.
//!
//! All arguments are plain integers validated by pigpio itself.

use core::ffi::{c_int, c_uint};

use crate::driver::GpioDriver;

#[link(name = "pigpio")]
extern "C" {
    fn gpioCfgClock(cfg_micros: c_uint, cfg_peripheral: c_uint, cfg_source: c_uint) -> c_int;
    fn gpioCfgInterfaces(if_flags: c_uint) -> c_int;
    fn gpioInitialise() -> c_int;
    fn gpioTerminate();
    fn gpioSetMode(gpio: c_uint, mode: c_uint) -> c_int;
    fn gpioGetMode(gpio: c_uint) -> c_int;
    fn gpioSetPullUpDown(gpio: c_uint, pud: c_uint) -> c_int;
    fn gpioRead(gpio: c_uint) -> c_int;
    fn gpioWrite(gpio: c_uint, level: c_uint) -> c_int;
    fn gpioPWM(user_gpio: c_uint, dutycycle: c_uint) -> c_int;
    fn gpioGetPWMdutycycle(user_gpio: c_uint) -> c_int;
    fn gpioSetPWMrange(user_gpio: c_uint, range: c_uint) -> c_int;
    fn gpioGetPWMrange(user_gpio: c_uint) -> c_int;
    fn gpioServo(user_gpio: c_uint, pulsewidth: c_uint) -> c_int;
}

/// Handle to the process-global libpigpio instance.
///
/// Zero-sized; obtain a controller through
/// [`GpioController::acquire`](crate::GpioController::acquire).
pub struct Pigpio {
    _private: (),
}

impl Pigpio {
    pub(crate) const fn new() -> Self {
        Self { _private: () }
    }
}

impl GpioDriver for Pigpio {
    fn configure_clock(&mut self, micros: u32, peripheral: u32, source: u32) -> i32 {
        // SAFETY: pre-initialisation config call, integer arguments only; see module docs.
        unsafe { gpioCfgClock(micros, peripheral, source) }
    }

    fn configure_interfaces(&mut self, flags: u32) -> i32 {
        // SAFETY: pre-initialisation config call, integer argument only; see module docs.
        unsafe { gpioCfgInterfaces(flags) }
    }

    fn initialise(&mut self) -> i32 {
        // SAFETY: called at most once per process by the controller slot.
        unsafe { gpioInitialise() }
    }

    fn terminate(&mut self) {
        // SAFETY: called exactly once, after a successful gpioInitialise.
        unsafe { gpioTerminate() }
    }

    fn set_mode(&mut self, pin: u32, mode: u32) -> i32 {
        // SAFETY: serialised by the controller mutex; pigpio range-checks both arguments.
        unsafe { gpioSetMode(pin, mode) }
    }

    fn get_mode(&mut self, pin: u32) -> i32 {
        // SAFETY: serialised by the controller mutex; pigpio range-checks the pin.
        unsafe { gpioGetMode(pin) }
    }

    fn read(&mut self, pin: u32) -> i32 {
        // SAFETY: serialised by the controller mutex; pigpio range-checks the pin.
        unsafe { gpioRead(pin) }
    }

    fn write(&mut self, pin: u32, level: u32) -> i32 {
        // SAFETY: serialised by the controller mutex; pigpio range-checks both arguments.
        unsafe { gpioWrite(pin, level) }
    }

    fn set_pull_up_down(&mut self, pin: u32, pud: u32) -> i32 {
        // SAFETY: serialised by the controller mutex; pigpio range-checks both arguments.
        unsafe { gpioSetPullUpDown(pin, pud) }
    }

    fn pwm_write(&mut self, pin: u32, duty_cycle: u32) -> i32 {
        // SAFETY: serialised by the controller mutex; pigpio range-checks both arguments.
        unsafe { gpioPWM(pin, duty_cycle) }
    }

    fn pwm_duty_cycle(&mut self, pin: u32) -> i32 {
        // SAFETY: serialised by the controller mutex; pigpio range-checks the pin.
        unsafe { gpioGetPWMdutycycle(pin) }
    }

    fn set_pwm_range(&mut self, pin: u32, range: u32) -> i32 {
        // SAFETY: serialised by the controller mutex; pigpio range-checks both arguments.
        unsafe { gpioSetPWMrange(pin, range) }
    }

    fn pwm_range(&mut self, pin: u32) -> i32 {
        // SAFETY: serialised by the controller mutex; pigpio range-checks the pin.
        unsafe { gpioGetPWMrange(pin) }
    }

    fn servo_write(&mut self, pin: u32, pulse_width: u32) -> i32 {
        // SAFETY: serialised by the controller mutex; pigpio range-checks both arguments.
        unsafe { gpioServo(pin, pulse_width) }
    }
}
