//! Identifier, measurement and unit registries.
//!
//! Every token captured from a line is resolved here by exact lookup against
//! a compile-time perfect hash map. Unknown tokens are rejected, never
//! coerced (`LA`, `l0`, `l17` and `kW` all fail).
//!
//! The derived identifier sets ([`device_ids`], [`phase_ids`],
//! [`circuit_ids`]) are built once on first use and shared afterwards.

use crate::types::{Circuit, Device, InputId, Measurement, Phase, RawUnit};
use phf::phf_map;
use std::sync::LazyLock;

const L: Device = Device::Left;
const R: Device = Device::Right;

static INPUT_IDS: phf::Map<&'static str, InputId> = phf_map! {
    "l" => InputId::Device(L),
    "r" => InputId::Device(R),
    "la" => InputId::Phase(L, Phase::A),
    "lb" => InputId::Phase(L, Phase::B),
    "lc" => InputId::Phase(L, Phase::C),
    "ra" => InputId::Phase(R, Phase::A),
    "rb" => InputId::Phase(R, Phase::B),
    "rc" => InputId::Phase(R, Phase::C),
    "l1" => InputId::Circuit(L, Circuit(1)),
    "l2" => InputId::Circuit(L, Circuit(2)),
    "l3" => InputId::Circuit(L, Circuit(3)),
    "l4" => InputId::Circuit(L, Circuit(4)),
    "l5" => InputId::Circuit(L, Circuit(5)),
    "l6" => InputId::Circuit(L, Circuit(6)),
    "l7" => InputId::Circuit(L, Circuit(7)),
    "l8" => InputId::Circuit(L, Circuit(8)),
    "l9" => InputId::Circuit(L, Circuit(9)),
    "l10" => InputId::Circuit(L, Circuit(10)),
    "l11" => InputId::Circuit(L, Circuit(11)),
    "l12" => InputId::Circuit(L, Circuit(12)),
    "l13" => InputId::Circuit(L, Circuit(13)),
    "l14" => InputId::Circuit(L, Circuit(14)),
    "l15" => InputId::Circuit(L, Circuit(15)),
    "l16" => InputId::Circuit(L, Circuit(16)),
    "r1" => InputId::Circuit(R, Circuit(1)),
    "r2" => InputId::Circuit(R, Circuit(2)),
    "r3" => InputId::Circuit(R, Circuit(3)),
    "r4" => InputId::Circuit(R, Circuit(4)),
    "r5" => InputId::Circuit(R, Circuit(5)),
    "r6" => InputId::Circuit(R, Circuit(6)),
    "r7" => InputId::Circuit(R, Circuit(7)),
    "r8" => InputId::Circuit(R, Circuit(8)),
    "r9" => InputId::Circuit(R, Circuit(9)),
    "r10" => InputId::Circuit(R, Circuit(10)),
    "r11" => InputId::Circuit(R, Circuit(11)),
    "r12" => InputId::Circuit(R, Circuit(12)),
    "r13" => InputId::Circuit(R, Circuit(13)),
    "r14" => InputId::Circuit(R, Circuit(14)),
    "r15" => InputId::Circuit(R, Circuit(15)),
    "r16" => InputId::Circuit(R, Circuit(16)),
};

static MEASUREMENTS: phf::Map<&'static str, Measurement> = phf_map! {
    "power" => Measurement::Power,
    "voltage" => Measurement::Voltage,
    "frequency" => Measurement::Frequency,
    "phase_angle" => Measurement::PhaseAngle,
    "uptime" => Measurement::Uptime,
    "debug_free_memory" => Measurement::DebugFreeMemory,
    "debug_used_memory" => Measurement::DebugUsedMemory,
    "debug_loop_time" => Measurement::DebugLoopTime,
    "wifi_signal" => Measurement::WifiSignal,
};

static RAW_UNITS: phf::Map<&'static str, RawUnit> = phf_map! {
    "B" => RawUnit::Bytes,
    "dBm" => RawUnit::DecibelMilliwatt,
    "°" => RawUnit::Degree,
    "Hz" => RawUnit::Hertz,
    "ms" => RawUnit::Millisecond,
    "V" => RawUnit::Volt,
    "W" => RawUnit::Watt,
    "s" => RawUnit::Second,
};

pub fn parse_input_id(token: &str) -> Option<InputId> {
    INPUT_IDS.get(token).copied()
}

pub fn parse_measurement(token: &str) -> Option<Measurement> {
    MEASUREMENTS.get(token).copied()
}

pub fn parse_unit(token: &str) -> Option<RawUnit> {
    RAW_UNITS.get(token).copied()
}

static DEVICE_IDS: LazyLock<Vec<InputId>> =
    LazyLock::new(|| Device::ALL.into_iter().map(InputId::Device).collect());

static PHASE_IDS: LazyLock<Vec<InputId>> = LazyLock::new(|| {
    Device::ALL
        .into_iter()
        .flat_map(|d| Phase::ALL.into_iter().map(move |p| InputId::Phase(d, p)))
        .collect()
});

static CIRCUIT_IDS: LazyLock<Vec<InputId>> = LazyLock::new(|| {
    Device::ALL
        .into_iter()
        .flat_map(|d| (1..=Circuit::COUNT).map(move |n| InputId::Circuit(d, Circuit(n))))
        .collect()
});

/// Top-level device identifiers: `l`, `r`.
pub fn device_ids() -> &'static [InputId] {
    &DEVICE_IDS
}

/// Device × {a, b, c}.
pub fn phase_ids() -> &'static [InputId] {
    &PHASE_IDS
}

/// Device × 1..=16.
pub fn circuit_ids() -> &'static [InputId] {
    &CIRCUIT_IDS
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
