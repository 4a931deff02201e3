//! vuelog: Emporia Vue telemetry to InfluxDB line protocol.
//!
//! Exposes the engine and its collaborators so that integration tests and
//! benches can import them directly, plus the [`app`] wiring used by the
//! binary.
//!
//! # Architecture
//!
//! ```text
//! source ──► Ingestor ──► Normalizer ──► queue ──► drain loop ──► Sink
//!              (feeds)       (core)       (feeds)     (feeds)
//! ```

pub mod app;

pub use vuelog_core as core;
pub use vuelog_feeds as feeds;
