//! Pin identifiers and the enumerations the driver speaks in.
//!
//! Every enum here maps to a fixed numeric code understood by libpigpio.
//! Encoding (`code`) is total; decoding (`from_code`) is fallible because the
//! driver may hand back a value this crate does not know about.
//!
//! - `Pin`: Broadcom (BCM) GPIO number, range-checked by the driver
//! - `PinMode`: input, output, and the six alternate functions
//! - `PinLevel`: logic low / high
//! - `PullMode`: internal pull resistor selection

use core::fmt;

// ── Pin ──────────────────────────────────────────────────────────────────────

/// Broadcom GPIO number.
///
/// The wrapper exists so pin numbers cannot be confused with the other `u32`
/// arguments (duty cycle, range, pulse width) at call sites. Range checking is
/// left to the driver, which knows the board revision: it answers
/// [`InvalidPin`](crate::ErrorKind::InvalidPin) for numbers outside 0–53 and
/// [`InvalidUserAllowedPin`](crate::ErrorKind::InvalidUserAllowedPin) for
/// PWM/servo calls outside 0–31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Pin(u32);

impl Pin {
    /// Create a pin identifier from a BCM GPIO number.
    #[must_use]
    pub const fn new(bcm: u32) -> Self {
        Self(bcm)
    }

    /// Return the BCM GPIO number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for Pin {
    fn from(bcm: u32) -> Self {
        Self(bcm)
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

// ── PinMode ──────────────────────────────────────────────────────────────────

/// Pin function select.
///
/// The numeric codes are the BCM283x FSEL field values, which is why the
/// alternate functions are not in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinMode {
    /// Digital input (FSEL 0b000).
    Input,
    /// Digital output (FSEL 0b001).
    Output,
    /// Alternate function 0 (FSEL 0b100).
    Alt0,
    /// Alternate function 1 (FSEL 0b101).
    Alt1,
    /// Alternate function 2 (FSEL 0b110).
    Alt2,
    /// Alternate function 3 (FSEL 0b111).
    Alt3,
    /// Alternate function 4 (FSEL 0b011).
    Alt4,
    /// Alternate function 5 (FSEL 0b010).
    Alt5,
}

impl PinMode {
    /// All modes, in declaration order.
    pub const ALL: [PinMode; 8] = [
        PinMode::Input,
        PinMode::Output,
        PinMode::Alt0,
        PinMode::Alt1,
        PinMode::Alt2,
        PinMode::Alt3,
        PinMode::Alt4,
        PinMode::Alt5,
    ];

    /// Numeric code passed to `gpioSetMode`.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            PinMode::Input => 0,
            PinMode::Output => 1,
            PinMode::Alt0 => 4,
            PinMode::Alt1 => 5,
            PinMode::Alt2 => 6,
            PinMode::Alt3 => 7,
            PinMode::Alt4 => 3,
            PinMode::Alt5 => 2,
        }
    }

    /// Decode a code returned by `gpioGetMode`.
    ///
    /// Returns `None` for values outside the 3-bit FSEL field.
    #[must_use]
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(PinMode::Input),
            1 => Some(PinMode::Output),
            4 => Some(PinMode::Alt0),
            5 => Some(PinMode::Alt1),
            6 => Some(PinMode::Alt2),
            7 => Some(PinMode::Alt3),
            3 => Some(PinMode::Alt4),
            2 => Some(PinMode::Alt5),
            _ => None,
        }
    }
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PinMode::Input => "input",
            PinMode::Output => "output",
            PinMode::Alt0 => "alt0",
            PinMode::Alt1 => "alt1",
            PinMode::Alt2 => "alt2",
            PinMode::Alt3 => "alt3",
            PinMode::Alt4 => "alt4",
            PinMode::Alt5 => "alt5",
        })
    }
}

// ── PinLevel ─────────────────────────────────────────────────────────────────

/// Digital pin level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinLevel {
    /// Low (logic 0)
    Off,
    /// High (logic 1)
    On,
}

impl PinLevel {
    /// Numeric code passed to `gpioWrite`.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            PinLevel::Off => 0,
            PinLevel::On => 1,
        }
    }

    /// Decode a value returned by `gpioRead`.
    #[must_use]
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(PinLevel::Off),
            1 => Some(PinLevel::On),
            _ => None,
        }
    }
}

impl From<bool> for PinLevel {
    fn from(value: bool) -> Self {
        if value {
            Self::On
        } else {
            Self::Off
        }
    }
}

impl From<PinLevel> for bool {
    fn from(value: PinLevel) -> Self {
        matches!(value, PinLevel::On)
    }
}

impl fmt::Display for PinLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PinLevel::Off => "off",
            PinLevel::On => "on",
        })
    }
}

// ── PullMode ─────────────────────────────────────────────────────────────────

/// Internal pull resistor configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PullMode {
    /// No pull resistor (floating)
    Off,
    /// Pull-down to ground
    Down,
    /// Pull-up to 3V3
    Up,
}

impl PullMode {
    /// Numeric code passed to `gpioSetPullUpDown`.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            PullMode::Off => 0,
            PullMode::Down => 1,
            PullMode::Up => 2,
        }
    }

    /// Decode a pull code.
    #[must_use]
    pub const fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(PullMode::Off),
            1 => Some(PullMode::Down),
            2 => Some(PullMode::Up),
            _ => None,
        }
    }
}

impl fmt::Display for PullMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PullMode::Off => "off",
            PullMode::Down => "down",
            PullMode::Up => "up",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_codes_match_fsel_field() {
        assert_eq!(PinMode::Input.code(), 0);
        assert_eq!(PinMode::Output.code(), 1);
        assert_eq!(PinMode::Alt0.code(), 4);
        assert_eq!(PinMode::Alt1.code(), 5);
        assert_eq!(PinMode::Alt2.code(), 6);
        assert_eq!(PinMode::Alt3.code(), 7);
        assert_eq!(PinMode::Alt4.code(), 3);
        assert_eq!(PinMode::Alt5.code(), 2);
    }

    #[test]
    fn mode_codes_are_a_bijection_on_fsel() {
        for mode in PinMode::ALL {
            assert_eq!(PinMode::from_code(mode.code()), Some(mode));
        }
        assert_eq!(PinMode::from_code(8), None);
        assert_eq!(PinMode::from_code(u32::MAX), None);
    }

    #[test]
    fn level_decodes_only_zero_and_one() {
        assert_eq!(PinLevel::from_code(0), Some(PinLevel::Off));
        assert_eq!(PinLevel::from_code(1), Some(PinLevel::On));
        assert_eq!(PinLevel::from_code(2), None);
    }

    #[test]
    fn level_bool_conversions() {
        assert_eq!(PinLevel::from(true), PinLevel::On);
        assert_eq!(PinLevel::from(false), PinLevel::Off);
        assert!(bool::from(PinLevel::On));
        assert!(!bool::from(PinLevel::Off));
    }

    #[test]
    fn pull_codes() {
        assert_eq!(PullMode::Off.code(), 0);
        assert_eq!(PullMode::Down.code(), 1);
        assert_eq!(PullMode::Up.code(), 2);
        assert_eq!(PullMode::from_code(3), None);
    }

    #[test]
    fn pin_displays_as_bcm_name() {
        assert_eq!(Pin::new(17).to_string(), "GPIO17");
        assert_eq!(Pin::from(4).get(), 4);
    }
}
