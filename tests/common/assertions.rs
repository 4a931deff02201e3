//! Domain-specific assertion macros for vuelog harnesses.
//!
//! These wrap `pretty_assertions` and say which normalization outcome was
//! expected when they fail.

/// Assert that a `Normalized` is a record with the given measurement, input
/// token and canonical value.
///
/// ```rust
/// assert_record!(normalized, Measurement::Power, "l15", 70_878);
/// ```
#[macro_export]
macro_rules! assert_record {
    ($normalized:expr, $measurement:expr, $input:expr, $value:expr) => {{
        let normalized: &vuelog::core::Normalized = &$normalized;
        match normalized.as_record() {
            Some(record) => {
                pretty_assertions::assert_eq!(record.measurement(), $measurement, "measurement");
                pretty_assertions::assert_eq!(record.input_id().to_string(), $input, "input id");
                pretty_assertions::assert_eq!(record.value(), $value, "canonical value");
            }
            None => panic!(
                "expected a {:?} record, line was rejected: {}",
                $measurement,
                normalized.rejection().map(|r| r.to_string()).unwrap_or_default()
            ),
        }
    }};
}

/// Assert that a `Normalized` fell back to a log record whose rejection
/// matches the given pattern.
///
/// ```rust
/// assert_log!(normalized, Rejection::NoMatch);
/// assert_log!(normalized, Rejection::InputMismatch { .. });
/// ```
#[macro_export]
macro_rules! assert_log {
    ($normalized:expr, $pattern:pat) => {{
        let normalized: &vuelog::core::Normalized = &$normalized;
        match normalized.rejection() {
            Some(reason) => assert!(
                matches!(reason, $pattern),
                "expected rejection {}, got {reason:?}",
                stringify!($pattern)
            ),
            None => panic!("expected a log record, got {normalized:?}"),
        }
    }};
}
