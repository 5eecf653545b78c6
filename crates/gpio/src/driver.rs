//! Raw driver boundary.
//!
//! [`GpioDriver`] mirrors the libpigpio C API one call at a time: plain
//! integers in, a signed status out. It carries no validation and no error
//! translation; both live in [`GpioController`](crate::GpioController).
//!
//! Implementations:
//! - `Pigpio`: FFI into libpigpio (`pigpio` feature)
//! - [`MockDriver`](crate::mocks::MockDriver): in-process model for host tests

/// Raw GPIO driver.
///
/// Methods take `&mut self`: the controller serialises every call behind one
/// mutex, so implementations need not be thread-safe themselves, only `Send`.
pub trait GpioDriver: Send {
    /// Select the sampling clock before initialisation (`gpioCfgClock`).
    ///
    /// `micros` is the sample period, `peripheral` 0 = PWM / 1 = PCM,
    /// `source` is ignored by current pigpio releases.
    fn configure_clock(&mut self, micros: u32, peripheral: u32, source: u32) -> i32;

    /// Select which side interfaces to disable before initialisation
    /// (`gpioCfgInterfaces`).
    fn configure_interfaces(&mut self, flags: u32) -> i32;

    /// Initialise the hardware (`gpioInitialise`). Returns the library
    /// version on success.
    fn initialise(&mut self) -> i32;

    /// Release the hardware (`gpioTerminate`).
    fn terminate(&mut self);

    /// `gpioSetMode`
    fn set_mode(&mut self, pin: u32, mode: u32) -> i32;

    /// `gpioGetMode`: mode code or negative status.
    fn get_mode(&mut self, pin: u32) -> i32;

    /// `gpioRead`: 0/1 or negative status.
    fn read(&mut self, pin: u32) -> i32;

    /// `gpioWrite`
    fn write(&mut self, pin: u32, level: u32) -> i32;

    /// `gpioSetPullUpDown`
    fn set_pull_up_down(&mut self, pin: u32, pud: u32) -> i32;

    /// `gpioPWM`
    fn pwm_write(&mut self, pin: u32, duty_cycle: u32) -> i32;

    /// `gpioGetPWMdutycycle`: duty cycle or negative status.
    fn pwm_duty_cycle(&mut self, pin: u32) -> i32;

    /// `gpioSetPWMrange`: real range for the current frequency or negative status.
    fn set_pwm_range(&mut self, pin: u32, range: u32) -> i32;

    /// `gpioGetPWMrange`: range or negative status.
    fn pwm_range(&mut self, pin: u32) -> i32;

    /// `gpioServo`
    fn servo_write(&mut self, pin: u32, pulse_width: u32) -> i32;
}
