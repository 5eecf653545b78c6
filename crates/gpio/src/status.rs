//! Driver status codes and their translation.
//!
//! Every libpigpio call returns a signed status. Non-negative means success
//! (and, for reads, carries the payload); negative names the failure. The
//! failure codes live in one table, [`STATUS_TABLE`], which is the only place
//! a code is spelled out.
//!
//! | Code | Kind | pigpio name |
//! |------|------|-------------|
//! | -1 | [`ErrorKind::InitFailed`] | `PI_INIT_FAILED` |
//! | -2 | [`ErrorKind::InvalidUserAllowedPin`] | `PI_BAD_USER_GPIO` |
//! | -3 | [`ErrorKind::InvalidPin`] | `PI_BAD_GPIO` |
//! | -4 | [`ErrorKind::InvalidGpioMode`] | `PI_BAD_MODE` |
//! | -5 | [`ErrorKind::InvalidLevel`] | `PI_BAD_LEVEL` |
//! | -6 | [`ErrorKind::InvalidPullUpDownMode`] | `PI_BAD_PUD` |
//! | -7 | [`ErrorKind::InvalidPulseWidth`] | `PI_BAD_PULSEWIDTH` |
//! | -8 | [`ErrorKind::InvalidDutyCycle`] | `PI_BAD_DUTYCYCLE` |
//! | -9 | [`ErrorKind::InvalidTimer`] | `PI_BAD_TIMER` |
//! | -10 | [`ErrorKind::InvalidMs`] | `PI_BAD_MS` |
//! | -11 | [`ErrorKind::InvalidTimeType`] | `PI_BAD_TIMETYPE` |
//! | -12 | [`ErrorKind::InvalidSeconds`] | `PI_BAD_SECONDS` |
//! | -13 | [`ErrorKind::InvalidMicros`] | `PI_BAD_MICROS` |
//! | -14 | [`ErrorKind::TimerFailed`] | `PI_TIMER_FAILED` |
//! | -15 | [`ErrorKind::InvalidWatchdogTimer`] | `PI_BAD_WDOG_TIMEOUT` |
//! | -17 | [`ErrorKind::InvalidClockPeripheral`] | `PI_BAD_CLK_PERIPH` |
//! | -19 | [`ErrorKind::InvalidClockMicros`] | `PI_BAD_CLK_MICROS` |
//! | -21 | [`ErrorKind::InvalidDutyRange`] | `PI_BAD_DUTYRANGE` |
//! | -31 | [`ErrorKind::NotInitialised`] | `PI_NOT_INITIALISED` |
//! | other < 0 | [`ErrorKind::Unknown`] | |

/// Failure reported by the driver through a negative status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ErrorKind {
    /// Hardware initialisation failed.
    #[error("initialisation failed")]
    InitFailed,
    /// GPIO is outside the user range (0–31) accepted by PWM and servo calls.
    #[error("gpio not in user-allowed range")]
    InvalidUserAllowedPin,
    /// GPIO is outside 0–53.
    #[error("invalid gpio")]
    InvalidPin,
    /// Mode code is not a valid function select.
    #[error("invalid gpio mode")]
    InvalidGpioMode,
    /// Level is not 0 or 1.
    #[error("invalid level")]
    InvalidLevel,
    /// Pull code is not off, down or up.
    #[error("invalid pull-up/down mode")]
    InvalidPullUpDownMode,
    /// Servo pulse width is neither 0 nor within 500–2500 µs.
    #[error("invalid pulse width")]
    InvalidPulseWidth,
    /// Duty cycle exceeds the pin's PWM range.
    #[error("invalid duty cycle")]
    InvalidDutyCycle,
    /// Timer id is out of range.
    #[error("invalid timer")]
    InvalidTimer,
    /// Millisecond value is out of range.
    #[error("invalid milliseconds")]
    InvalidMs,
    /// Time type is neither relative nor absolute.
    #[error("invalid time type")]
    InvalidTimeType,
    /// Seconds value is out of range.
    #[error("invalid seconds")]
    InvalidSeconds,
    /// Microseconds value is out of range.
    #[error("invalid microseconds")]
    InvalidMicros,
    /// Timer thread could not be started.
    #[error("timer failed")]
    TimerFailed,
    /// Watchdog timeout is out of range.
    #[error("invalid watchdog timeout")]
    InvalidWatchdogTimer,
    /// Sampling clock peripheral is neither PWM nor PCM.
    #[error("invalid clock peripheral")]
    InvalidClockPeripheral,
    /// Sampling clock period is not one of 1, 2, 4, 5, 8, 10 µs.
    #[error("invalid clock sample rate")]
    InvalidClockMicros,
    /// PWM range is outside 25–40000.
    #[error("invalid pwm range")]
    InvalidDutyRange,
    /// Call made before initialisation.
    #[error("library not initialised")]
    NotInitialised,
    /// Negative status not present in the table.
    #[error("unknown driver error")]
    Unknown,
}

/// Every known negative status and the kind it names.
pub const STATUS_TABLE: [(i32, ErrorKind); 19] = [
    (-1, ErrorKind::InitFailed),
    (-2, ErrorKind::InvalidUserAllowedPin),
    (-3, ErrorKind::InvalidPin),
    (-4, ErrorKind::InvalidGpioMode),
    (-5, ErrorKind::InvalidLevel),
    (-6, ErrorKind::InvalidPullUpDownMode),
    (-7, ErrorKind::InvalidPulseWidth),
    (-8, ErrorKind::InvalidDutyCycle),
    (-9, ErrorKind::InvalidTimer),
    (-10, ErrorKind::InvalidMs),
    (-11, ErrorKind::InvalidTimeType),
    (-12, ErrorKind::InvalidSeconds),
    (-13, ErrorKind::InvalidMicros),
    (-14, ErrorKind::TimerFailed),
    (-15, ErrorKind::InvalidWatchdogTimer),
    (-17, ErrorKind::InvalidClockPeripheral),
    (-19, ErrorKind::InvalidClockMicros),
    (-21, ErrorKind::InvalidDutyRange),
    (-31, ErrorKind::NotInitialised),
];

impl ErrorKind {
    /// Look up a status in [`STATUS_TABLE`].
    ///
    /// Never fails: a status with no table entry yields [`ErrorKind::Unknown`].
    #[must_use]
    pub fn from_status(status: i32) -> Self {
        STATUS_TABLE
            .iter()
            .find(|(code, _)| *code == status)
            .map_or(ErrorKind::Unknown, |(_, kind)| *kind)
    }

    /// The driver code for this kind, or `None` for [`ErrorKind::Unknown`].
    #[must_use]
    pub fn code(self) -> Option<i32> {
        STATUS_TABLE
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(code, _)| *code)
    }
}

/// Split a raw status into its payload or its failure kind.
///
/// # Errors
///
/// Returns the translated [`ErrorKind`] when `status` is negative.
pub fn check(status: i32) -> Result<u32, ErrorKind> {
    u32::try_from(status).map_err(|_| ErrorKind::from_status(status))
}
