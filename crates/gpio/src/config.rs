//! Driver configuration applied before initialisation.
//!
//! pigpio reads its sampling clock and interface settings once, inside
//! `gpioInitialise`. [`ControllerConfig`] collects them so the controller can
//! hand them to the driver immediately before the one initialise call.
//!
//! # Example JSON
//! ```json
//! {
//!   "clock": { "sample_rate": 5, "peripheral": "pcm" },
//!   "interfaces": { "fifo": false, "socket": true, "localhost_only": true, "alerts": true }
//! }
//! ```
//!
//! Every field is optional; missing fields take [`ControllerConfig::DEFAULT`].

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors from loading or validating a [`ControllerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    /// The config text is not valid JSON for this schema.
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// Sample period is not one of 1, 2, 4, 5, 8, 10 µs.
    #[error("invalid sample rate {0}us (must be 1, 2, 4, 5, 8 or 10)")]
    InvalidSampleRate(u32),
}

// ── Clock ────────────────────────────────────────────────────────────────────

/// Sampling clock period in microseconds.
///
/// Only the periods pigpio supports can be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
#[repr(transparent)]
pub struct SampleRate(u32);

impl SampleRate {
    /// Periods accepted by `gpioCfgClock`.
    pub const SUPPORTED_US: [u32; 6] = [1, 2, 4, 5, 8, 10];

    /// pigpio's default period.
    pub const DEFAULT: Self = Self(5);

    /// Create a `SampleRate` from a period in microseconds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSampleRate`] for unsupported periods.
    pub fn new(micros: u32) -> Result<Self, ConfigError> {
        if Self::SUPPORTED_US.contains(&micros) {
            Ok(Self(micros))
        } else {
            Err(ConfigError::InvalidSampleRate(micros))
        }
    }

    /// Return the period in microseconds.
    #[must_use]
    pub fn micros(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for SampleRate {
    type Error = ConfigError;

    fn try_from(micros: u32) -> Result<Self, Self::Error> {
        Self::new(micros)
    }
}

impl From<SampleRate> for u32 {
    fn from(rate: SampleRate) -> Self {
        rate.0
    }
}

/// Peripheral that paces pigpio's DMA sampling.
///
/// Whichever one is chosen is unavailable for other uses (PWM audio or I2S).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockPeripheral {
    /// PWM peripheral (`PI_CLOCK_PWM`)
    Pwm,
    /// PCM peripheral (`PI_CLOCK_PCM`), pigpio's default
    Pcm,
}

impl ClockPeripheral {
    /// Numeric code passed to `gpioCfgClock`.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            ClockPeripheral::Pwm => 0,
            ClockPeripheral::Pcm => 1,
        }
    }
}

/// Sampling clock settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Sample period.
    pub sample_rate: SampleRate,
    /// Pacing peripheral.
    pub peripheral: ClockPeripheral,
}

impl ClockConfig {
    /// 5 µs, paced by PCM.
    pub const DEFAULT: Self = Self {
        sample_rate: SampleRate::DEFAULT,
        peripheral: ClockPeripheral::Pcm,
    };
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── Interfaces ───────────────────────────────────────────────────────────────

/// pigpio side interfaces.
///
/// These are the daemon-style control channels pigpio can open next to the
/// C API. An in-process controller does not need them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterfaceConfig {
    /// `/dev/pigpio` command pipe.
    pub fifo: bool,
    /// TCP command socket (port 8888).
    pub socket: bool,
    /// Bind the socket to localhost only.
    pub localhost_only: bool,
    /// Level-change alert thread.
    pub alerts: bool,
}

impl InterfaceConfig {
    /// FIFO and socket off, alerts on.
    pub const DEFAULT: Self = Self {
        fifo: false,
        socket: false,
        localhost_only: false,
        alerts: true,
    };

    const DISABLE_FIFO: u32 = 1;
    const DISABLE_SOCKET: u32 = 2;
    const LOCALHOST_SOCKET: u32 = 4;
    const DISABLE_ALERT: u32 = 8;

    /// Bitmask passed to `gpioCfgInterfaces`.
    #[must_use]
    pub const fn flags(self) -> u32 {
        let mut flags = 0;
        if !self.fifo {
            flags |= Self::DISABLE_FIFO;
        }
        if !self.socket {
            flags |= Self::DISABLE_SOCKET;
        }
        if self.localhost_only {
            flags |= Self::LOCALHOST_SOCKET;
        }
        if !self.alerts {
            flags |= Self::DISABLE_ALERT;
        }
        flags
    }
}

impl Default for InterfaceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ── ControllerConfig ─────────────────────────────────────────────────────────

/// Everything applied to the driver before `gpioInitialise`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Sampling clock.
    pub clock: ClockConfig,
    /// Side interfaces.
    pub interfaces: InterfaceConfig,
}

impl ControllerConfig {
    /// Default configuration.
    pub const DEFAULT: Self = Self {
        clock: ClockConfig::DEFAULT,
        interfaces: InterfaceConfig::DEFAULT,
    };

    /// Parse a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON, unknown enum values
    /// or unsupported sample rates.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`from_json`](Self::from_json).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serialise to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_flags_disable_fifo_and_socket() {
        assert_eq!(InterfaceConfig::DEFAULT.flags(), 0b0011);
    }

    #[test]
    fn all_interfaces_enabled_is_zero_flags() {
        let all = InterfaceConfig {
            fifo: true,
            socket: true,
            localhost_only: false,
            alerts: true,
        };
        assert_eq!(all.flags(), 0);
    }

    #[test]
    fn localhost_and_no_alerts_flags() {
        let cfg = InterfaceConfig {
            fifo: false,
            socket: true,
            localhost_only: true,
            alerts: false,
        };
        assert_eq!(cfg.flags(), 1 | 4 | 8);
    }

    #[test]
    fn sample_rate_accepts_only_supported_periods() {
        for us in SampleRate::SUPPORTED_US {
            assert_eq!(SampleRate::new(us).unwrap().micros(), us);
        }
        assert!(matches!(
            SampleRate::new(3),
            Err(ConfigError::InvalidSampleRate(3))
        ));
        assert!(SampleRate::new(0).is_err());
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(ControllerConfig::from_json("{}").unwrap(), ControllerConfig::DEFAULT);
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = ControllerConfig::from_json(r#"{"clock": {"sample_rate": 1}}"#).unwrap();
        assert_eq!(cfg.clock.sample_rate.micros(), 1);
        assert_eq!(cfg.clock.peripheral, ClockPeripheral::Pcm);
        assert_eq!(cfg.interfaces, InterfaceConfig::DEFAULT);
    }

    #[test]
    fn unsupported_sample_rate_in_json_is_rejected() {
        let err = ControllerConfig::from_json(r#"{"clock": {"sample_rate": 3}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("invalid sample rate 3us"));
    }

    #[test]
    fn json_round_trip() {
        let cfg = ControllerConfig {
            clock: ClockConfig {
                sample_rate: SampleRate::new(10).unwrap(),
                peripheral: ClockPeripheral::Pwm,
            },
            interfaces: InterfaceConfig {
                fifo: true,
                socket: true,
                localhost_only: true,
                alerts: false,
            },
        };
        let json = cfg.to_json().unwrap();
        assert!(json.contains("\"pwm\""));
        assert_eq!(ControllerConfig::from_json(&json).unwrap(), cfg);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gpio.json");
        std::fs::write(&path, r#"{"interfaces": {"socket": true}}"#).unwrap();
        let cfg = ControllerConfig::load(&path).unwrap();
        assert!(cfg.interfaces.socket);
        assert!(!cfg.interfaces.fifo);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ControllerConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
