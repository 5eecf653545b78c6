//! Property-based tests for status translation and value decoding.
//! Verifies the invariants hold for ALL statuses, not just the tabled ones.

use gpio::status::{check, STATUS_TABLE};
use gpio::{ErrorKind, PinLevel, PinMode};

fn tabled(status: i32) -> bool {
    STATUS_TABLE.iter().any(|(code, _)| *code == status)
}

#[test]
fn every_tabled_status_translates_exactly() {
    for (code, kind) in STATUS_TABLE {
        assert_eq!(ErrorKind::from_status(code), kind, "status {code}");
        assert_eq!(check(code), Err(kind), "status {code}");
    }
}

proptest::proptest! {
    /// Translation never panics, whatever the driver returns.
    #[test]
    fn from_status_never_panics(status in proptest::num::i32::ANY) {
        let _ = ErrorKind::from_status(status);
    }

    /// Negative statuses outside the table are Unknown.
    #[test]
    fn untabled_negative_status_is_unknown(status in i32::MIN..0i32) {
        proptest::prop_assume!(!tabled(status));
        proptest::prop_assert_eq!(ErrorKind::from_status(status), ErrorKind::Unknown);
        proptest::prop_assert_eq!(check(status), Err(ErrorKind::Unknown));
    }

    /// Non-negative statuses are payloads, passed through unchanged.
    #[test]
    fn non_negative_status_is_payload(status in 0i32..=i32::MAX) {
        let payload = check(status);
        proptest::prop_assert!(payload.is_ok());
        proptest::prop_assert_eq!(i64::from(payload.unwrap_or(0)), i64::from(status));
    }

    /// Level decoding is defined on exactly {0, 1}.
    #[test]
    fn level_decodes_only_binary_values(code in 0u32..=u32::MAX) {
        let decoded = PinLevel::from_code(code);
        match code {
            0 => proptest::prop_assert_eq!(decoded, Some(PinLevel::Off)),
            1 => proptest::prop_assert_eq!(decoded, Some(PinLevel::On)),
            _ => proptest::prop_assert_eq!(decoded, None),
        }
    }

    /// Mode decoding is defined on exactly the 3-bit FSEL field, and inverts `code`.
    #[test]
    fn mode_decodes_only_fsel_values(code in 0u32..=u32::MAX) {
        match PinMode::from_code(code) {
            Some(mode) => {
                proptest::prop_assert!(code < 8);
                proptest::prop_assert_eq!(mode.code(), code);
            }
            None => proptest::prop_assert!(code >= 8),
        }
    }
}
