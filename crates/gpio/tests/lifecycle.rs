//! Controller lifecycle tests: one-shot initialisation, cached failure,
//! terminate-once, and behaviour after release.
//!
//! Run with: cargo test -p gpio --test lifecycle

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
#![allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use gpio::mocks::{MockCall, MockDriver};
use gpio::{
    ClockConfig, ClockPeripheral, ControllerConfig, ControllerSlot, Error, ErrorKind,
    InterfaceConfig, Operation, Pin, PinLevel, PinMode, SampleRate,
};

const LED: Pin = Pin::new(17);

#[test]
fn second_acquire_shares_the_first_handle() {
    let slot = ControllerSlot::new();
    let mock = MockDriver::new();
    let probe = mock.probe();

    let first = slot.acquire(&ControllerConfig::DEFAULT, || mock).unwrap();
    let second = slot
        .acquire(&ControllerConfig::DEFAULT, || {
            panic!("driver must not be rebuilt for a live slot")
        })
        .unwrap();

    first.set_mode(LED, PinMode::Output).unwrap();
    assert_eq!(second.mode(LED).unwrap(), PinMode::Output);
    assert_eq!(probe.initialise_count(), 1);
}

#[test]
fn init_failure_is_reported_and_cached() {
    let slot = ControllerSlot::new();
    let mock = MockDriver::new().with_init_status(-1);
    let probe = mock.probe();

    let err = slot.acquire(&ControllerConfig::DEFAULT, || mock).err().unwrap();
    assert_eq!(err, Error::InitializationFailed { status: -1 });
    assert_eq!(err.kind(), Some(ErrorKind::InitFailed));

    // Later acquirers see the same failure without another initialise call.
    let again = slot
        .acquire(&ControllerConfig::DEFAULT, MockDriver::new)
        .err()
        .unwrap();
    assert_eq!(again, Error::InitializationFailed { status: -1 });
    assert_eq!(probe.initialise_count(), 1);
}

#[test]
fn failed_init_issues_no_pin_calls_and_no_terminate() {
    let slot = ControllerSlot::new();
    let mock = MockDriver::new().with_init_status(-1);
    let probe = mock.probe();

    assert!(slot.acquire(&ControllerConfig::DEFAULT, || mock).is_err());
    assert_eq!(probe.pin_call_count(), 0);
    assert_eq!(probe.terminate_count(), 0);
}

#[test]
fn config_is_applied_before_initialise() {
    let config = ControllerConfig {
        clock: ClockConfig {
            sample_rate: SampleRate::new(2).unwrap(),
            peripheral: ClockPeripheral::Pwm,
        },
        interfaces: InterfaceConfig {
            fifo: true,
            socket: true,
            localhost_only: true,
            alerts: true,
        },
    };
    let slot = ControllerSlot::new();
    let mock = MockDriver::new();
    let probe = mock.probe();
    let _gpio = slot.acquire(&config, || mock).unwrap();

    assert_eq!(
        probe.calls(),
        vec![
            MockCall::ConfigureClock {
                micros: 2,
                peripheral: 0
            },
            MockCall::ConfigureInterfaces { flags: 4 },
            MockCall::Initialise,
        ]
    );
}

#[test]
fn rejected_config_skips_initialise_and_allows_retry() {
    let slot = ControllerSlot::new();
    let rejecting = MockDriver::new().with_status(Operation::ConfigureInterfaces, -50);
    let probe = rejecting.probe();

    let err = slot
        .acquire(&ControllerConfig::DEFAULT, || rejecting)
        .err()
        .unwrap();
    assert_eq!(
        err,
        Error::Configuration {
            op: Operation::ConfigureInterfaces,
            kind: ErrorKind::Unknown,
            status: -50,
        }
    );
    assert_eq!(probe.initialise_count(), 0);

    // Nothing was initialised, so the slot is still open.
    let gpio = slot.acquire(&ControllerConfig::DEFAULT, MockDriver::new).unwrap();
    gpio.write(LED, PinLevel::On).unwrap();
}

#[test]
fn bad_clock_micros_reported_as_configuration_error() {
    let slot = ControllerSlot::new();
    let mock = MockDriver::new().with_status(Operation::ConfigureClock, -19);
    let err = slot.acquire(&ControllerConfig::DEFAULT, || mock).err().unwrap();
    assert_eq!(err.kind(), Some(ErrorKind::InvalidClockMicros));
}

#[test]
fn terminate_runs_once_when_last_handle_drops() {
    let slot = ControllerSlot::new();
    let mock = MockDriver::new();
    let probe = mock.probe();

    let a = slot.acquire(&ControllerConfig::DEFAULT, || mock).unwrap();
    let b = slot.acquire(&ControllerConfig::DEFAULT, MockDriver::new).unwrap();
    let c = b.clone();

    drop(a);
    drop(b);
    assert_eq!(probe.terminate_count(), 0);
    assert!(probe.is_initialised());
    drop(c);
    assert_eq!(probe.terminate_count(), 1);
    assert!(!probe.is_initialised());
}

#[test]
fn terminate_runs_on_early_return_path() {
    fn blink_once(slot: &ControllerSlot<MockDriver>, mock: MockDriver) -> Result<(), Error> {
        let gpio = slot.acquire(&ControllerConfig::DEFAULT, || mock)?;
        gpio.set_mode(LED, PinMode::Output)?;
        gpio.write_level(LED, 7)?; // rejected: returns early with the handle in scope
        Ok(())
    }

    let slot = ControllerSlot::new();
    let mock = MockDriver::new();
    let probe = mock.probe();
    let err = blink_once(&slot, mock).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::InvalidLevel));
    assert_eq!(probe.terminate_count(), 1);
}

#[test]
fn slot_is_not_reinitialised_after_termination() {
    let slot = ControllerSlot::new();
    let mock = MockDriver::new();
    let probe = mock.probe();

    let gpio = slot.acquire(&ControllerConfig::DEFAULT, || mock).unwrap();
    drop(gpio);

    let err = slot
        .acquire(&ControllerConfig::DEFAULT, MockDriver::new)
        .err()
        .unwrap();
    assert_eq!(err, Error::Released);
    assert_eq!(probe.initialise_count(), 1);
}

#[test]
fn explicit_release_fails_surviving_clones_and_new_acquirers() {
    let slot = ControllerSlot::new();
    let mock = MockDriver::new();
    let probe = mock.probe();

    let gpio = slot.acquire(&ControllerConfig::DEFAULT, || mock).unwrap();
    let survivor = gpio.clone();
    gpio.release();

    assert!(survivor.is_released());
    assert_eq!(survivor.set_mode(LED, PinMode::Input), Err(Error::Released));
    assert_eq!(survivor.pwm_read(Pin::new(18)), Err(Error::Released));
    assert_eq!(
        slot.acquire(&ControllerConfig::DEFAULT, MockDriver::new)
            .err()
            .unwrap(),
        Error::Released
    );
    assert_eq!(probe.pin_call_count(), 0);
    assert_eq!(probe.terminate_count(), 1);
}

#[test]
fn release_is_idempotent_across_clones() {
    let slot = ControllerSlot::new();
    let mock = MockDriver::new();
    let probe = mock.probe();

    let gpio = slot.acquire(&ControllerConfig::DEFAULT, || mock).unwrap();
    let other = gpio.clone();
    gpio.release();
    other.release();
    assert_eq!(probe.terminate_count(), 1);
}
