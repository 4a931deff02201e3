//! Static line corpora used across harnesses.
//!
//! Lines are shaped like ESPHome `logs` output from an Emporia Vue, minus the
//! ANSI colour codes unless a fixture says otherwise.

/// Fixed capture timestamp (2024-01-15T10:00:00Z) for deterministic rows.
pub const TS: i64 = 1_705_312_800_000_000_000;

/// Sensor lines that must all normalize into records.
pub const CORPUS_SENSOR: &[&str] = &[
    "[D][sensor:094]: 'circuit_l15_power': Sending state 70.87800 W with 1 decimals of accuracy",
    "[D][sensor:094]: 'phase_la_voltage': Sending state 117.94200 V with 1 decimals of accuracy",
    "[D][sensor:094]: 'phase_rb_frequency': Sending state 59.98700 Hz with 2 decimals of accuracy",
    "[D][sensor:094]: 'phase_lc_phase_angle': Sending state -119.40000 ° with 1 decimals of accuracy",
    "[D][sensor:094]: 'phase_ra_power': Sending state -12.30000 W with 1 decimals of accuracy",
    "[D][sensor:094]: 'vue_l_uptime': Sending state 86400.51200 s with 0 decimals of accuracy",
    "[D][sensor:094]: 'vue_r_debug_free_memory': Sending state 143212.00000 B with 0 decimals of accuracy",
    "[D][sensor:094]: 'vue_r_debug_used_memory': Sending state 98304.00000 B with 0 decimals of accuracy",
    "[D][sensor:094]: 'vue_l_debug_loop_time': Sending state 16.00000 ms with 0 decimals of accuracy",
    "[D][sensor:094]: 'vue_l_wifi_signal': Sending state -67.00000 dBm with 0 decimals of accuracy",
];

/// Lines the classifier matches but the validator rejects.
pub const CORPUS_REJECTED: &[&str] = &[
    // frequency is only reported per phase
    "[D][sensor:094]: 'circuit_l3_frequency': Sending state 60.00000 Hz with 1 decimals of accuracy",
    // voltage in the wrong unit
    "[D][sensor:094]: 'phase_lb_voltage': Sending state 120.00000 W with 1 decimals of accuracy",
    // circuit 17 does not exist
    "[D][sensor:094]: 'circuit_r17_power': Sending state 1.00000 W with 1 decimals of accuracy",
    // unknown measurement
    "[D][sensor:094]: 'circuit_l2_current': Sending state 0.50000 A with 2 decimals of accuracy",
];

/// Lines with no measurement shape at all.
pub const CORPUS_UNMATCHED: &[&str] = &[
    "[I][app:029]: Running through setup()...",
    "[C][wifi:443]:   SSID: [redacted]",
    "[D][sensor:094]: 'circuit_l15_power': Sending state 70 W with 1 decimals of accuracy",
    "[I][ota:096]: Boot seems successful, resetting boot loop counter.",
    "",
];

/// A session as it arrives from the device, records and logs interleaved.
pub const CORPUS_MIXED: &[&str] = &[
    "[I][app:102]: ESPHome version 2023.12.5 compiled on Jan 10 2024, 12:00:00",
    "\x1b[0;36m[D][sensor:094]: 'circuit_l1_power': Sending state 250.12345 W with 1 decimals of accuracy\x1b[0m",
    "[W][component:204]: Component emporia_vue took a long time for an operation (0.05 s).",
    "[D][sensor:094]: 'phase_la_voltage': Sending state 121.50000 V with 1 decimals of accuracy",
    "[D][sensor:094]: 'circuit_l3_frequency': Sending state 60.00000 Hz with 1 decimals of accuracy",
];
