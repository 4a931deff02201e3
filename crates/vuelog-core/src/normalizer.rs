//! Normalizer: one line in, exactly one outcome out.
//!
//! Every input line produces exactly one [`Normalized`] value and therefore
//! exactly one output row. Lines that do not become a [`Record`] are kept as
//! a [`LogRecord`] together with the reason they were rejected.

use crate::classifier::Classifier;
use crate::serializer::ToLineProtocol;
use crate::types::{LogRecord, Origin, Record};
use crate::validator::{validate, Rejection};
use serde::{Serialize, Serializer};

/// Outcome of normalizing one line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Normalized {
    Record(Record),
    Log {
        record: LogRecord,
        #[serde(serialize_with = "display")]
        reason: Rejection,
    },
}

fn display<S: Serializer>(reason: &Rejection, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

impl Normalized {
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Normalized::Record(r) => Some(r),
            Normalized::Log { .. } => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Normalized::Record(_) => None,
            Normalized::Log { reason, .. } => Some(reason),
        }
    }
}

impl ToLineProtocol for Normalized {
    fn to_line_protocol(&self) -> String {
        match self {
            Normalized::Record(r) => r.to_line_protocol(),
            Normalized::Log { record, .. } => record.to_line_protocol(),
        }
    }
}

/// Stateless, reentrant engine; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    classifier: Classifier,
}

impl Normalizer {
    pub fn new(classifier: Classifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub fn normalize(&self, line: &str, timestamp_ns: i64, origin: Option<&Origin>) -> Normalized {
        let outcome = match self.classifier.classify(line) {
            Some(fields) => validate(&fields, timestamp_ns),
            None => Err(Rejection::NoMatch),
        };

        match outcome {
            Ok(record) => Normalized::Record(record),
            Err(reason) => {
                tracing::debug!(%reason, "line kept as log record");
                Normalized::Log {
                    record: LogRecord::new(timestamp_ns, line, origin.cloned()),
                    reason,
                }
            }
        }
    }

    /// Shorthand for `normalize(..).to_line_protocol()`.
    pub fn to_line_protocol(&self, line: &str, timestamp_ns: i64, origin: Option<&Origin>) -> String {
        self.normalize(line, timestamp_ns, origin).to_line_protocol()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
