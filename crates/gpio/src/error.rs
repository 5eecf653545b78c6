//! Crate-level error type.

use core::fmt;

use crate::pin::Pin;
use crate::status::ErrorKind;

/// Driver call that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `gpioCfgClock`
    ConfigureClock,
    /// `gpioCfgInterfaces`
    ConfigureInterfaces,
    /// `gpioSetMode`
    SetMode,
    /// `gpioGetMode`
    GetMode,
    /// `gpioRead`
    Read,
    /// `gpioWrite`
    Write,
    /// `gpioSetPullUpDown`
    SetPull,
    /// `gpioPWM`
    PwmWrite,
    /// `gpioGetPWMdutycycle`
    PwmRead,
    /// `gpioSetPWMrange`
    PwmSetRange,
    /// `gpioGetPWMrange`
    PwmRange,
    /// `gpioServo`
    ServoWrite,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::ConfigureClock => "configure clock",
            Operation::ConfigureInterfaces => "configure interfaces",
            Operation::SetMode => "set mode",
            Operation::GetMode => "get mode",
            Operation::Read => "read",
            Operation::Write => "write",
            Operation::SetPull => "set pull",
            Operation::PwmWrite => "pwm write",
            Operation::PwmRead => "pwm read",
            Operation::PwmSetRange => "pwm set range",
            Operation::PwmRange => "pwm range",
            Operation::ServoWrite => "servo write",
        })
    }
}

/// Errors returned by [`GpioController`](crate::GpioController) and
/// [`ControllerSlot`](crate::ControllerSlot).
///
/// A driver returning an out-of-domain success value is not represented here;
/// see [`GpioController::mode`](crate::GpioController::mode).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The driver rejected a pin operation.
    #[error("{op} on {pin} failed: {kind} (status {status})")]
    Driver {
        /// Which call failed.
        op: Operation,
        /// Pin the call was made for.
        pin: Pin,
        /// Translated failure.
        kind: ErrorKind,
        /// Raw status as returned by the driver.
        status: i32,
    },

    /// A configuration call made before initialisation was rejected.
    /// Initialisation was not attempted.
    #[error("{op} failed: {kind} (status {status})")]
    Configuration {
        /// Which call failed.
        op: Operation,
        /// Translated failure.
        kind: ErrorKind,
        /// Raw status as returned by the driver.
        status: i32,
    },

    /// The driver's initialise call returned a negative status.
    ///
    /// Terminal for the slot: later acquirers get the same error.
    #[error("gpio initialisation failed (status {status})")]
    InitializationFailed {
        /// Raw status as returned by the driver.
        status: i32,
    },

    /// The controller has been terminated.
    #[error("gpio controller has been released")]
    Released,
}

impl Error {
    /// The driver failure behind this error, if the driver produced one.
    ///
    /// `InitializationFailed` maps through the status table like any other
    /// status; `Released` never reached the driver and has no kind.
    #[must_use]
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Error::Driver { kind, .. } | Error::Configuration { kind, .. } => Some(*kind),
            Error::InitializationFailed { status } => Some(ErrorKind::from_status(*status)),
            Error::Released => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_error_message_names_call_pin_and_status() {
        let err = Error::Driver {
            op: Operation::SetMode,
            pin: Pin::new(17),
            kind: ErrorKind::InvalidGpioMode,
            status: -4,
        };
        assert_eq!(
            err.to_string(),
            "set mode on GPIO17 failed: invalid gpio mode (status -4)"
        );
        assert_eq!(err.kind(), Some(ErrorKind::InvalidGpioMode));
    }

    #[test]
    fn init_failure_kind_comes_from_status() {
        let err = Error::InitializationFailed { status: -1 };
        assert_eq!(err.kind(), Some(ErrorKind::InitFailed));
        let err = Error::InitializationFailed { status: -77 };
        assert_eq!(err.kind(), Some(ErrorKind::Unknown));
    }

    #[test]
    fn released_has_no_kind() {
        assert_eq!(Error::Released.kind(), None);
    }
}
