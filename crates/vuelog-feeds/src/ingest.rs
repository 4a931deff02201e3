//! Ingestor: the reception side of the pipeline.
//!
//! Stamps each received line with its capture time, runs it through the
//! [`Normalizer`] once and pushes the single resulting row onto the queue.

use crate::queue::{QueueClosed, QueueSender};
use std::sync::Arc;
use vuelog_core::{Normalizer, Origin, ToLineProtocol};

/// Current wall-clock time in nanoseconds since the Unix epoch.
pub fn capture_timestamp_ns() -> i64 {
    // Only out of range after the year 2262.
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

/// Cheap to clone; every clone shares the engine and the queue.
#[derive(Debug, Clone)]
pub struct Ingestor {
    normalizer: Arc<Normalizer>,
    queue: QueueSender,
}

impl Ingestor {
    pub fn new(normalizer: Arc<Normalizer>, queue: QueueSender) -> Self {
        Self { normalizer, queue }
    }

    /// Ingest a line received just now.
    pub fn on_line(&self, line: &str, origin: Option<&Origin>) -> Result<(), QueueClosed> {
        self.ingest_at(line, capture_timestamp_ns(), origin)
    }

    /// Ingest a raw message. Messages that are not valid UTF-8 are skipped.
    pub fn on_bytes(&self, message: &[u8], origin: Option<&Origin>) -> Result<(), QueueClosed> {
        match std::str::from_utf8(message) {
            Ok(line) => self.on_line(line, origin),
            Err(error) => {
                tracing::debug!(%error, len = message.len(), "skipping message that is not UTF-8");
                Ok(())
            }
        }
    }

    /// Ingest a line with an explicit capture timestamp.
    pub fn ingest_at(&self, line: &str, timestamp_ns: i64, origin: Option<&Origin>) -> Result<(), QueueClosed> {
        let row = self.normalizer.normalize(line, timestamp_ns, origin).to_line_protocol();
        self.queue.push(row)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::line_queue;
    use pretty_assertions::assert_eq;

    fn ingestor() -> (Ingestor, crate::queue::LineQueue) {
        let (tx, queue) = line_queue();
        (Ingestor::new(Arc::new(Normalizer::default()), tx), queue)
    }

    #[test]
    fn one_row_per_line() {
        let (ingestor, mut queue) = ingestor();
        let origin = Origin::Device("vue".into());
        ingestor
            .ingest_at("'phase_la_voltage': Sending state 117.94200 V with 1 decimals of accuracy", 10, Some(&origin))
            .unwrap();
        ingestor.ingest_at("[I][app:029]: Running through setup()...", 11, Some(&origin)).unwrap();

        let mut rows = Vec::new();
        queue.drain_now(&mut rows);
        assert_eq!(
            rows,
            [
                "voltage,input_id=la voltage_mv=117942i 10",
                "log,device_name=vue log_message=\"[I][app:029]: Running through setup()...\" 11",
            ]
        );
    }

    #[test]
    fn invalid_utf8_is_skipped() {
        let (ingestor, mut queue) = ingestor();
        ingestor.on_bytes(&[0xff, 0xfe, b'a'], None).unwrap();
        let mut rows = Vec::new();
        queue.drain_now(&mut rows);
        assert!(rows.is_empty());
    }

    #[test]
    fn capture_timestamp_is_recent() {
        // 2023-01-01T00:00:00Z
        assert!(capture_timestamp_ns() > 1_672_531_200_000_000_000);
    }
}
