//! vuelog-core: normalization engine for Emporia Vue telemetry text.
//!
//! Turns one line of device debug output into either a typed, unit-converted
//! [`Record`] or, when that is not possible, a [`LogRecord`] carrying the raw
//! text. Both render as one InfluxDB line-protocol row.
//!
//! # Pipeline
//!
//! ```text
//! line ──► classifier ──► validator ──► serializer ──► line protocol
//!              │              │    ▲
//!              │              │    └── registry + invariants
//!              └──────────────┴──► LogRecord (no match / rejected)
//! ```
//!
//! The engine does no I/O and holds no state across lines; the queue, sinks
//! and transports live in `vuelog-feeds`.

pub mod classifier;
pub mod config;
pub mod invariants;
pub mod normalizer;
pub mod registry;
pub mod serializer;
pub mod types;
pub mod validator;

pub use normalizer::{Normalized, Normalizer};
pub use serializer::ToLineProtocol;
pub use types::{InputId, LogRecord, Measurement, Origin, Record};
pub use validator::Rejection;
