//! Measurement invariant table.
//!
//! One immutable row per [`Measurement`]: which inputs may report it, the
//! raw unit it must arrive in, and how the raw decimal becomes a canonical
//! integer. The table is built once from [`row`], whose exhaustive `match`
//! keeps it total over the measurement set.

use crate::registry::{circuit_ids, device_ids, phase_ids};
use crate::types::{CanonicalUnit, Decimal, InputId, Measurement, RawUnit};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Raw decimal → canonical integer: multiply, then truncate toward zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    factor: i64,
}

impl Conversion {
    pub const TRUNCATE: Conversion = Conversion { factor: 1 };
    pub const MILLI: Conversion = Conversion { factor: 1000 };

    pub fn apply(self, value: Decimal) -> i64 {
        value.scale_truncate(self.factor)
    }
}

#[derive(Debug, Clone)]
pub struct MeasurementInvariant {
    pub measurement: Measurement,
    pub expected_input_ids: HashSet<InputId>,
    pub expected_unit: RawUnit,
    pub conversion: Conversion,
    pub output_unit: CanonicalUnit,
}

impl MeasurementInvariant {
    pub fn accepts_input(&self, input: InputId) -> bool {
        self.expected_input_ids.contains(&input)
    }

    /// Output field name, e.g. `power_mw`.
    pub fn field_name(&self) -> String {
        format!("{}_{}", self.measurement, self.output_unit.field_suffix())
    }
}

fn row(measurement: Measurement) -> MeasurementInvariant {
    use CanonicalUnit as C;
    use Measurement as M;

    let phases = || phase_ids().iter().copied().collect::<HashSet<_>>();
    let devices = || device_ids().iter().copied().collect::<HashSet<_>>();
    let phases_and_circuits = || {
        phase_ids().iter().chain(circuit_ids()).copied().collect::<HashSet<_>>()
    };

    let (expected_input_ids, expected_unit, conversion, output_unit) = match measurement {
        M::Power => (phases_and_circuits(), RawUnit::Watt, Conversion::MILLI, C::Milliwatt),
        M::Voltage => (phases(), RawUnit::Volt, Conversion::MILLI, C::Millivolt),
        M::Frequency => (phases(), RawUnit::Hertz, Conversion::MILLI, C::Millihertz),
        M::PhaseAngle => (phases(), RawUnit::Degree, Conversion::MILLI, C::Millidegree),
        M::Uptime => (devices(), RawUnit::Second, Conversion::MILLI, C::Millisecond),
        M::DebugFreeMemory => (devices(), RawUnit::Bytes, Conversion::TRUNCATE, C::Bytes),
        M::DebugUsedMemory => (devices(), RawUnit::Bytes, Conversion::TRUNCATE, C::Bytes),
        M::DebugLoopTime => (devices(), RawUnit::Millisecond, Conversion::TRUNCATE, C::Millisecond),
        M::WifiSignal => (
            devices(),
            RawUnit::DecibelMilliwatt,
            Conversion::TRUNCATE,
            C::DecibelMilliwatt,
        ),
    };

    MeasurementInvariant {
        measurement,
        expected_input_ids,
        expected_unit,
        conversion,
        output_unit,
    }
}

// Indexed by position in `Measurement::ALL`.
static TABLE: LazyLock<Vec<MeasurementInvariant>> =
    LazyLock::new(|| Measurement::ALL.into_iter().map(row).collect());

pub fn invariant_for(measurement: Measurement) -> &'static MeasurementInvariant {
    &TABLE[measurement as usize]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::parse_input_id;
    use pretty_assertions::assert_eq;

    #[test]
    fn table_is_total_and_keyed_correctly() {
        for m in Measurement::ALL {
            assert_eq!(invariant_for(m).measurement, m);
        }
    }

    #[test]
    fn field_names() {
        assert_eq!(invariant_for(Measurement::Power).field_name(), "power_mw");
        assert_eq!(invariant_for(Measurement::Voltage).field_name(), "voltage_mv");
        assert_eq!(invariant_for(Measurement::PhaseAngle).field_name(), "phase_angle_mdeg");
        assert_eq!(
            invariant_for(Measurement::DebugFreeMemory).field_name(),
            "debug_free_memory_bytes"
        );
        assert_eq!(invariant_for(Measurement::WifiSignal).field_name(), "wifi_signal_dbm");
    }

    #[test]
    fn legal_inputs() {
        let id = |t: &str| parse_input_id(t).unwrap();
        let power = invariant_for(Measurement::Power);
        assert!(power.accepts_input(id("l15")));
        assert!(power.accepts_input(id("ra")));
        assert!(!power.accepts_input(id("l")));

        let frequency = invariant_for(Measurement::Frequency);
        assert!(frequency.accepts_input(id("lb")));
        assert!(!frequency.accepts_input(id("r3")));

        let uptime = invariant_for(Measurement::Uptime);
        assert!(uptime.accepts_input(id("r")));
        assert!(!uptime.accepts_input(id("rc")));
    }

    #[test]
    fn conversions_only_identity_or_milli() {
        for m in Measurement::ALL {
            let c = invariant_for(m).conversion;
            assert!(c == Conversion::TRUNCATE || c == Conversion::MILLI, "{m}");
        }
    }

    #[test]
    fn milli_truncates_instead_of_rounding() {
        let v: Decimal = "117.94299".parse().unwrap();
        assert_eq!(Conversion::MILLI.apply(v), 117_942);
        let neg: Decimal = "-1.0009".parse().unwrap();
        assert_eq!(Conversion::MILLI.apply(neg), -1_000);
    }
}
