//! Core types for vuelog-core.
//!
//! This module defines the closed vocabularies the engine works with
//! ([`InputId`], [`Measurement`], [`RawUnit`], [`CanonicalUnit`]), the exact
//! [`Decimal`] literal captured from a line, and the two output shapes: a
//! validated [`Record`] and the fallback [`LogRecord`].
//!
//! None of these types can be built from arbitrary text directly; token
//! resolution goes through [`crate::registry`].

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Input identifiers
// ---------------------------------------------------------------------------

/// One of the two top-level devices (the left and right CT boards).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Device {
    Left,
    Right,
}

impl Device {
    pub const ALL: [Device; 2] = [Device::Left, Device::Right];

    pub fn token(self) -> &'static str {
        match self {
            Device::Left => "l",
            Device::Right => "r",
        }
    }
}

/// Mains phase of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    A,
    B,
    C,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::A, Phase::B, Phase::C];

    pub fn token(self) -> &'static str {
        match self {
            Phase::A => "a",
            Phase::B => "b",
            Phase::C => "c",
        }
    }
}

/// Circuit number on a device, always in `1..=16`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Circuit(pub(crate) u8);

impl Circuit {
    pub const COUNT: u8 = 16;

    pub fn new(number: u8) -> Option<Self> {
        (1..=Self::COUNT).contains(&number).then_some(Self(number))
    }

    pub fn number(self) -> u8 {
        self.0
    }
}

/// A physical sensing point: a whole device, one of its phases, or one of
/// its circuits.
///
/// Renders as the token used in sensor names (`l`, `la`, `l15`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputId {
    Device(Device),
    Phase(Device, Phase),
    Circuit(Device, Circuit),
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputId::Device(d) => f.write_str(d.token()),
            InputId::Phase(d, p) => write!(f, "{}{}", d.token(), p.token()),
            InputId::Circuit(d, c) => write!(f, "{}{}", d.token(), c.number()),
        }
    }
}

impl Serialize for InputId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Measurements
// ---------------------------------------------------------------------------

/// A physical quantity reported by the device.
///
/// The snake_case token doubles as the output row name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Measurement {
    Power,
    Voltage,
    Frequency,
    PhaseAngle,
    Uptime,
    DebugFreeMemory,
    DebugUsedMemory,
    DebugLoopTime,
    WifiSignal,
}

impl Measurement {
    pub const ALL: [Measurement; 9] = [
        Measurement::Power,
        Measurement::Voltage,
        Measurement::Frequency,
        Measurement::PhaseAngle,
        Measurement::Uptime,
        Measurement::DebugFreeMemory,
        Measurement::DebugUsedMemory,
        Measurement::DebugLoopTime,
        Measurement::WifiSignal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Measurement::Power => "power",
            Measurement::Voltage => "voltage",
            Measurement::Frequency => "frequency",
            Measurement::PhaseAngle => "phase_angle",
            Measurement::Uptime => "uptime",
            Measurement::DebugFreeMemory => "debug_free_memory",
            Measurement::DebugUsedMemory => "debug_used_memory",
            Measurement::DebugLoopTime => "debug_loop_time",
            Measurement::WifiSignal => "wifi_signal",
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

/// Unit symbol as it appears in device text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RawUnit {
    Bytes,
    DecibelMilliwatt,
    Degree,
    Hertz,
    Millisecond,
    Volt,
    Watt,
    Second,
}

impl RawUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            RawUnit::Bytes => "B",
            RawUnit::DecibelMilliwatt => "dBm",
            RawUnit::Degree => "°",
            RawUnit::Hertz => "Hz",
            RawUnit::Millisecond => "ms",
            RawUnit::Volt => "V",
            RawUnit::Watt => "W",
            RawUnit::Second => "s",
        }
    }
}

impl fmt::Display for RawUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Fixed-scale integer unit used in engine output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CanonicalUnit {
    #[serde(rename = "mV")]
    Millivolt,
    #[serde(rename = "mW")]
    Milliwatt,
    #[serde(rename = "mHz")]
    Millihertz,
    #[serde(rename = "mdeg")]
    Millidegree,
    #[serde(rename = "ms")]
    Millisecond,
    #[serde(rename = "dBm")]
    DecibelMilliwatt,
    #[serde(rename = "B")]
    Bytes,
}

impl CanonicalUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            CanonicalUnit::Millivolt => "mV",
            CanonicalUnit::Milliwatt => "mW",
            CanonicalUnit::Millihertz => "mHz",
            CanonicalUnit::Millidegree => "mdeg",
            CanonicalUnit::Millisecond => "ms",
            CanonicalUnit::DecibelMilliwatt => "dBm",
            CanonicalUnit::Bytes => "B",
        }
    }

    /// Suffix of the output field name, e.g. `mw` in `power_mw`.
    pub fn field_suffix(self) -> &'static str {
        match self {
            CanonicalUnit::Millivolt => "mv",
            CanonicalUnit::Milliwatt => "mw",
            CanonicalUnit::Millihertz => "mhz",
            CanonicalUnit::Millidegree => "mdeg",
            CanonicalUnit::Millisecond => "ms",
            CanonicalUnit::DecibelMilliwatt => "dbm",
            CanonicalUnit::Bytes => "bytes",
        }
    }
}

impl fmt::Display for CanonicalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Decimal literal
// ---------------------------------------------------------------------------

/// Exact decimal literal of the form `-?\d+\.\d+`.
///
/// Stored as `mantissa * 10^-scale`. The literal is limited to
/// [`Decimal::MAX_DIGITS`] significant digits so that scaling by 1000 always
/// fits in an `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: i64,
    scale: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecimalError {
    #[error("not a decimal literal: {0:?}")]
    Malformed(String),
    #[error("decimal literal has more than {max} digits: {literal:?}", max = Decimal::MAX_DIGITS)]
    TooManyDigits { literal: String },
}

impl Decimal {
    pub const MAX_DIGITS: usize = 15;

    pub fn mantissa(self) -> i64 {
        self.mantissa
    }

    pub fn scale(self) -> u32 {
        self.scale
    }

    /// `self * factor`, truncated toward zero.
    pub fn scale_truncate(self, factor: i64) -> i64 {
        // |mantissa| < 10^15 and factor <= 1000, so the product fits.
        (self.mantissa * factor) / 10i64.pow(self.scale)
    }
}

impl FromStr for Decimal {
    type Err = DecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || DecimalError::Malformed(s.to_string());

        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let (int_part, frac_part) = body.split_once('.').ok_or_else(malformed)?;
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) {
            return Err(malformed());
        }

        let int_part = int_part.trim_start_matches('0');
        let digits = int_part.len() + frac_part.len();
        if digits > Self::MAX_DIGITS {
            return Err(DecimalError::TooManyDigits { literal: s.to_string() });
        }

        let mut mantissa: i64 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            mantissa = mantissa * 10 + i64::from(b - b'0');
        }
        if negative {
            mantissa = -mantissa;
        }

        Ok(Self {
            mantissa,
            scale: frac_part.len() as u32,
        })
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pow = 10i64.pow(self.scale);
        let abs = self.mantissa.unsigned_abs();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        write!(
            f,
            "{sign}{}.{:0width$}",
            abs / pow as u64,
            abs % pow as u64,
            width = self.scale as usize
        )
    }
}

// ---------------------------------------------------------------------------
// Output records
// ---------------------------------------------------------------------------

/// A validated, unit-converted measurement.
///
/// Only [`crate::validator::validate`] constructs these; a `Record` that
/// exists has already passed the invariant table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub(crate) timestamp_ns: i64,
    pub(crate) input_id: InputId,
    pub(crate) measurement: Measurement,
    pub(crate) value: i64,
}

impl Record {
    pub fn timestamp_ns(&self) -> i64 {
        self.timestamp_ns
    }

    pub fn input_id(&self) -> InputId {
        self.input_id
    }

    pub fn measurement(&self) -> Measurement {
        self.measurement
    }

    /// Value in the measurement's canonical unit.
    pub fn value(&self) -> i64 {
        self.value
    }
}

/// Where a raw line came from, used only to tag fallback log rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Device name reported by the transport.
    Device(String),
    /// Message-bus topic the payload arrived on.
    Topic(String),
}

impl Origin {
    /// Tag key and value for the `log` row.
    pub fn tag(&self) -> (&'static str, &str) {
        match self {
            Origin::Device(name) => ("device_name", name),
            Origin::Topic(topic) => ("topic", topic),
        }
    }
}

/// A line that could not be normalized, kept verbatim for observability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub timestamp_ns: i64,
    pub message: String,
    pub origin: Option<Origin>,
}

impl LogRecord {
    pub fn new(timestamp_ns: i64, message: impl Into<String>, origin: Option<Origin>) -> Self {
        Self {
            timestamp_ns,
            message: message.into(),
            origin,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn input_id_renders_sensor_token() {
        assert_eq!(InputId::Device(Device::Right).to_string(), "r");
        assert_eq!(InputId::Phase(Device::Left, Phase::B).to_string(), "lb");
        let c = Circuit::new(15).unwrap();
        assert_eq!(InputId::Circuit(Device::Left, c).to_string(), "l15");
    }

    #[test]
    fn circuit_bounds() {
        assert!(Circuit::new(0).is_none());
        assert!(Circuit::new(1).is_some());
        assert!(Circuit::new(16).is_some());
        assert!(Circuit::new(17).is_none());
    }

    #[test]
    fn decimal_parses_exactly() {
        let d: Decimal = "70.87800".parse().unwrap();
        assert_eq!(d.mantissa(), 7_087_800);
        assert_eq!(d.scale(), 5);
        assert_eq!(d.to_string(), "70.87800");

        let neg: Decimal = "-0.50".parse().unwrap();
        assert_eq!(neg.mantissa(), -50);
        assert_eq!(neg.to_string(), "-0.50");
    }

    #[test]
    fn decimal_requires_both_parts() {
        for bad in ["70", "70.", ".5", "-", "--1.0", "1.2.3", "1e3", "+1.0", ""] {
            assert!(bad.parse::<Decimal>().is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn decimal_digit_limit_ignores_leading_zeros() {
        assert!("0000000000000000001.5".parse::<Decimal>().is_ok());
        assert!(matches!(
            "1234567890123456.0".parse::<Decimal>(),
            Err(DecimalError::TooManyDigits { .. })
        ));
    }

    #[test]
    fn scale_truncate_goes_toward_zero() {
        let d: Decimal = "70.87899".parse().unwrap();
        assert_eq!(d.scale_truncate(1000), 70_878);
        let n: Decimal = "-67.9".parse().unwrap();
        assert_eq!(n.scale_truncate(1), -67);
        let small: Decimal = "-0.0009".parse().unwrap();
        assert_eq!(small.scale_truncate(1000), 0);
    }

    #[test]
    fn origin_tags() {
        assert_eq!(Origin::Device("vue".into()).tag(), ("device_name", "vue"));
        assert_eq!(Origin::Topic("vue/debug".into()).tag(), ("topic", "vue/debug"));
    }
}
