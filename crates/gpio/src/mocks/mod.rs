//! Mock driver for testing
//!
//! [`MockDriver`] models the part of libpigpio this crate talks to: pin
//! modes, levels, pulls, PWM duty/range and servo pulse widths, with the same
//! argument checks and status codes the real library uses. It records every
//! call and can be scripted to return arbitrary statuses, which is how tests
//! reach error and contract-violation paths.
//!
//! The driver moves into the controller, so test assertions go through a
//! [`MockProbe`] that shares the driver's state.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::driver::GpioDriver;
use crate::error::Operation;

/// Highest BCM GPIO number accepted by mode/level/pull calls.
pub const MAX_PIN: u32 = 53;
/// Highest BCM GPIO number accepted by PWM and servo calls.
pub const MAX_USER_PIN: u32 = 31;
/// Status returned by a successful `initialise` (a pigpio version number).
pub const MOCK_VERSION: i32 = 79;
/// PWM range of a pin that has never had one set.
pub const DEFAULT_PWM_RANGE: u32 = 255;

const PI_BAD_USER_GPIO: i32 = -2;
const PI_BAD_GPIO: i32 = -3;
const PI_BAD_MODE: i32 = -4;
const PI_BAD_LEVEL: i32 = -5;
const PI_BAD_PUD: i32 = -6;
const PI_BAD_PULSEWIDTH: i32 = -7;
const PI_BAD_DUTYCYCLE: i32 = -8;
const PI_BAD_CLK_PERIPH: i32 = -17;
const PI_BAD_CLK_MICROS: i32 = -19;
const PI_BAD_DUTYRANGE: i32 = -21;
const PI_NOT_INITIALISED: i32 = -31;

/// One recorded driver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockCall {
    /// `configure_clock(micros, peripheral, source)`
    ConfigureClock {
        /// Sample period in µs.
        micros: u32,
        /// 0 = PWM, 1 = PCM.
        peripheral: u32,
    },
    /// `configure_interfaces(flags)`
    ConfigureInterfaces {
        /// Disable-flag bitmask.
        flags: u32,
    },
    /// `initialise()`
    Initialise,
    /// `terminate()`
    Terminate,
    /// Any pin call.
    Pin {
        /// Which call.
        op: Operation,
        /// Raw pin number.
        pin: u32,
        /// Second argument, if the call takes one.
        arg: Option<u32>,
    },
}

#[derive(Debug, Clone, Copy)]
struct PinState {
    mode: u32,
    level: u32,
    pud: u32,
    duty_cycle: u32,
    range: u32,
    pulse_width: u32,
}

impl Default for PinState {
    fn default() -> Self {
        Self {
            mode: 0,
            level: 0,
            pud: 0,
            duty_cycle: 0,
            range: DEFAULT_PWM_RANGE,
            pulse_width: 0,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    initialised: bool,
    init_status: Option<i32>,
    init_delay: Option<Duration>,
    forced: HashMap<Operation, i32>,
    pins: HashMap<u32, PinState>,
    calls: Vec<MockCall>,
}

fn lock(state: &Mutex<MockState>) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-process libpigpio model.
pub struct MockDriver {
    state: Arc<Mutex<MockState>>,
}

impl MockDriver {
    /// Create a mock whose `initialise` succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Make `initialise` return `status` instead of [`MOCK_VERSION`].
    #[must_use]
    pub fn with_init_status(self, status: i32) -> Self {
        lock(&self.state).init_status = Some(status);
        self
    }

    /// Sleep for `delay` inside `initialise`, widening race windows in
    /// concurrency tests.
    #[must_use]
    pub fn with_init_delay(self, delay: Duration) -> Self {
        lock(&self.state).init_delay = Some(delay);
        self
    }

    /// Make every call of `op` return `status` without touching pin state.
    #[must_use]
    pub fn with_status(self, op: Operation, status: i32) -> Self {
        lock(&self.state).forced.insert(op, status);
        self
    }

    /// Shared view of this driver's state for assertions.
    #[must_use]
    pub fn probe(&self) -> MockProbe {
        MockProbe {
            state: Arc::clone(&self.state),
        }
    }

    fn pin_call(
        &mut self,
        op: Operation,
        pin: u32,
        arg: Option<u32>,
        max_pin: u32,
        bad_pin: i32,
        apply: impl FnOnce(&mut PinState) -> i32,
    ) -> i32 {
        let mut state = lock(&self.state);
        state.calls.push(MockCall::Pin { op, pin, arg });
        if let Some(status) = state.forced.get(&op) {
            return *status;
        }
        if !state.initialised {
            return PI_NOT_INITIALISED;
        }
        if pin > max_pin {
            return bad_pin;
        }
        apply(state.pins.entry(pin).or_default())
    }
}

impl Default for MockDriver {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the payload of a pin value that is always within `i32` range.
fn payload(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

impl GpioDriver for MockDriver {
    fn configure_clock(&mut self, micros: u32, peripheral: u32, _source: u32) -> i32 {
        let mut state = lock(&self.state);
        state
            .calls
            .push(MockCall::ConfigureClock { micros, peripheral });
        if let Some(status) = state.forced.get(&Operation::ConfigureClock) {
            return *status;
        }
        if !matches!(micros, 1 | 2 | 4 | 5 | 8 | 10) {
            return PI_BAD_CLK_MICROS;
        }
        if peripheral > 1 {
            return PI_BAD_CLK_PERIPH;
        }
        0
    }

    fn configure_interfaces(&mut self, flags: u32) -> i32 {
        let mut state = lock(&self.state);
        state.calls.push(MockCall::ConfigureInterfaces { flags });
        state
            .forced
            .get(&Operation::ConfigureInterfaces)
            .copied()
            .unwrap_or(0)
    }

    fn initialise(&mut self) -> i32 {
        let delay = {
            let mut state = lock(&self.state);
            state.calls.push(MockCall::Initialise);
            state.init_delay
        };
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
        let mut state = lock(&self.state);
        let status = state.init_status.unwrap_or(MOCK_VERSION);
        state.initialised = status >= 0;
        status
    }

    fn terminate(&mut self) {
        let mut state = lock(&self.state);
        state.calls.push(MockCall::Terminate);
        state.initialised = false;
    }

    fn set_mode(&mut self, pin: u32, mode: u32) -> i32 {
        self.pin_call(Operation::SetMode, pin, Some(mode), MAX_PIN, PI_BAD_GPIO, |p| {
            if mode > 7 {
                return PI_BAD_MODE;
            }
            p.mode = mode;
            0
        })
    }

    fn get_mode(&mut self, pin: u32) -> i32 {
        self.pin_call(Operation::GetMode, pin, None, MAX_PIN, PI_BAD_GPIO, |p| {
            payload(p.mode)
        })
    }

    fn read(&mut self, pin: u32) -> i32 {
        self.pin_call(Operation::Read, pin, None, MAX_PIN, PI_BAD_GPIO, |p| {
            payload(p.level)
        })
    }

    fn write(&mut self, pin: u32, level: u32) -> i32 {
        self.pin_call(Operation::Write, pin, Some(level), MAX_PIN, PI_BAD_GPIO, |p| {
            if level > 1 {
                return PI_BAD_LEVEL;
            }
            // gpioWrite switches the pin to output.
            p.mode = 1;
            p.level = level;
            0
        })
    }

    fn set_pull_up_down(&mut self, pin: u32, pud: u32) -> i32 {
        self.pin_call(Operation::SetPull, pin, Some(pud), MAX_PIN, PI_BAD_GPIO, |p| {
            if pud > 2 {
                return PI_BAD_PUD;
            }
            p.pud = pud;
            0
        })
    }

    fn pwm_write(&mut self, pin: u32, duty_cycle: u32) -> i32 {
        self.pin_call(
            Operation::PwmWrite,
            pin,
            Some(duty_cycle),
            MAX_USER_PIN,
            PI_BAD_USER_GPIO,
            |p| {
                if duty_cycle > p.range {
                    return PI_BAD_DUTYCYCLE;
                }
                p.mode = 1;
                p.duty_cycle = duty_cycle;
                0
            },
        )
    }

    fn pwm_duty_cycle(&mut self, pin: u32) -> i32 {
        self.pin_call(
            Operation::PwmRead,
            pin,
            None,
            MAX_USER_PIN,
            PI_BAD_USER_GPIO,
            |p| payload(p.duty_cycle),
        )
    }

    fn set_pwm_range(&mut self, pin: u32, range: u32) -> i32 {
        self.pin_call(
            Operation::PwmSetRange,
            pin,
            Some(range),
            MAX_USER_PIN,
            PI_BAD_USER_GPIO,
            |p| {
                if !(25..=40_000).contains(&range) {
                    return PI_BAD_DUTYRANGE;
                }
                p.range = range;
                p.duty_cycle = p.duty_cycle.min(range);
                payload(range)
            },
        )
    }

    fn pwm_range(&mut self, pin: u32) -> i32 {
        self.pin_call(
            Operation::PwmRange,
            pin,
            None,
            MAX_USER_PIN,
            PI_BAD_USER_GPIO,
            |p| payload(p.range),
        )
    }

    fn servo_write(&mut self, pin: u32, pulse_width: u32) -> i32 {
        self.pin_call(
            Operation::ServoWrite,
            pin,
            Some(pulse_width),
            MAX_USER_PIN,
            PI_BAD_USER_GPIO,
            |p| {
                if pulse_width != 0 && !(500..=2500).contains(&pulse_width) {
                    return PI_BAD_PULSEWIDTH;
                }
                p.mode = 1;
                p.pulse_width = pulse_width;
                0
            },
        )
    }
}

/// Assertion handle sharing a [`MockDriver`]'s state.
#[derive(Clone)]
pub struct MockProbe {
    state: Arc<Mutex<MockState>>,
}

impl MockProbe {
    /// Every call made so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.state).calls.clone()
    }

    /// Number of `initialise` calls.
    #[must_use]
    pub fn initialise_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Initialise))
    }

    /// Number of `terminate` calls.
    #[must_use]
    pub fn terminate_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Terminate))
    }

    /// Number of pin calls (anything but configure/initialise/terminate).
    #[must_use]
    pub fn pin_call_count(&self) -> usize {
        self.count(|c| matches!(c, MockCall::Pin { .. }))
    }

    /// Whether the modelled library is between initialise and terminate.
    #[must_use]
    pub fn is_initialised(&self) -> bool {
        lock(&self.state).initialised
    }

    /// Raw pull code last set on `pin` (0 if never set).
    #[must_use]
    pub fn pull(&self, pin: u32) -> u32 {
        lock(&self.state).pins.get(&pin).map_or(0, |p| p.pud)
    }

    /// Servo pulse width last set on `pin` (0 if never set).
    #[must_use]
    pub fn pulse_width(&self, pin: u32) -> u32 {
        lock(&self.state).pins.get(&pin).map_or(0, |p| p.pulse_width)
    }

    fn count(&self, pred: impl Fn(&MockCall) -> bool) -> usize {
        lock(&self.state).calls.iter().filter(|c| pred(c)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initialised() -> MockDriver {
        let mut mock = MockDriver::new();
        assert_eq!(mock.initialise(), MOCK_VERSION);
        mock
    }

    #[test]
    fn calls_before_initialise_report_not_initialised() {
        let mut mock = MockDriver::new();
        assert_eq!(mock.set_mode(17, 1), PI_NOT_INITIALISED);
        assert_eq!(mock.read(17), PI_NOT_INITIALISED);
    }

    #[test]
    fn mode_persists_per_pin() {
        let mut mock = initialised();
        assert_eq!(mock.set_mode(17, 4), 0);
        assert_eq!(mock.get_mode(17), 4);
        assert_eq!(mock.get_mode(18), 0);
    }

    #[test]
    fn pin_range_checks() {
        let mut mock = initialised();
        assert_eq!(mock.set_mode(54, 0), PI_BAD_GPIO);
        assert_eq!(mock.pwm_write(32, 0), PI_BAD_USER_GPIO);
        assert_eq!(mock.set_mode(53, 0), 0);
        assert_eq!(mock.pwm_write(31, 0), 0);
    }

    #[test]
    fn argument_checks() {
        let mut mock = initialised();
        assert_eq!(mock.set_mode(4, 8), PI_BAD_MODE);
        assert_eq!(mock.write(4, 2), PI_BAD_LEVEL);
        assert_eq!(mock.set_pull_up_down(4, 3), PI_BAD_PUD);
        assert_eq!(mock.pwm_write(18, 256), PI_BAD_DUTYCYCLE);
        assert_eq!(mock.set_pwm_range(18, 24), PI_BAD_DUTYRANGE);
        assert_eq!(mock.servo_write(18, 499), PI_BAD_PULSEWIDTH);
        assert_eq!(mock.servo_write(18, 0), 0);
    }

    #[test]
    fn shrinking_range_clamps_duty_cycle() {
        let mut mock = initialised();
        assert_eq!(mock.pwm_write(18, 200), 0);
        assert_eq!(mock.set_pwm_range(18, 100), 100);
        assert_eq!(mock.pwm_duty_cycle(18), 100);
    }

    #[test]
    fn forced_status_overrides_model() {
        let mut mock = MockDriver::new().with_status(Operation::PwmRead, 128);
        // Forced statuses apply even before initialise.
        assert_eq!(mock.pwm_duty_cycle(18), 128);
    }

    #[test]
    fn probe_sees_calls_made_through_driver() {
        let mut mock = MockDriver::new();
        let probe = mock.probe();
        mock.initialise();
        mock.write(5, 1);
        mock.terminate();
        assert_eq!(probe.initialise_count(), 1);
        assert_eq!(probe.terminate_count(), 1);
        assert_eq!(probe.pin_call_count(), 1);
        assert!(!probe.is_initialised());
    }

    #[test]
    fn scripted_init_failure_leaves_library_uninitialised() {
        let mut mock = MockDriver::new().with_init_status(-1);
        assert_eq!(mock.initialise(), -1);
        assert_eq!(mock.read(4), PI_NOT_INITIALISED);
    }
}
