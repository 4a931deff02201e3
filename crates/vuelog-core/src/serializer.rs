//! Serializer: renders records as InfluxDB line protocol.
//!
//! ```text
//! power,input_id=l15 power_mw=70878i 1700000000000000000
//! log,device_name=emporia-vue log_message="[I][app:102]: ready" 1700000000000000000
//! ```
//!
//! Tags are written in key order. Newlines, carriage returns and tabs are
//! escaped in every position, so a single input line always renders as a
//! single output line.

use crate::invariants::invariant_for;
use crate::types::{LogRecord, Record};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Row name used for fallback log records.
pub const LOG_MEASUREMENT: &str = "log";
/// Field carrying the raw text of a fallback log record.
pub const LOG_FIELD: &str = "log_message";
/// Tag carrying the input id of a measurement record.
pub const INPUT_ID_TAG: &str = "input_id";

/// Something that renders as exactly one line-protocol row.
pub trait ToLineProtocol {
    fn to_line_protocol(&self) -> String;
}

impl ToLineProtocol for Record {
    fn to_line_protocol(&self) -> String {
        let invariant = invariant_for(self.measurement);
        Point::new(self.measurement.as_str())
            .tag(INPUT_ID_TAG, self.input_id.to_string())
            .field(invariant.field_name(), FieldValue::Integer(self.value))
            .time(self.timestamp_ns)
            .to_line_protocol()
    }
}

impl ToLineProtocol for LogRecord {
    fn to_line_protocol(&self) -> String {
        let mut point = Point::new(LOG_MEASUREMENT);
        if let Some(origin) = &self.origin {
            let (key, value) = origin.tag();
            point = point.tag(key, value);
        }
        point
            .field(LOG_FIELD, FieldValue::String(self.message.clone()))
            .time(self.timestamp_ns)
            .to_line_protocol()
    }
}

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    String(String),
}

/// A single line-protocol row under construction.
#[derive(Debug, Clone)]
pub struct Point {
    measurement: String,
    tags: BTreeMap<String, String>,
    fields: BTreeMap<String, FieldValue>,
    timestamp_ns: Option<i64>,
}

impl Point {
    pub fn new(measurement: impl Into<String>) -> Self {
        Self {
            measurement: measurement.into(),
            tags: BTreeMap::new(),
            fields: BTreeMap::new(),
            timestamp_ns: None,
        }
    }

    /// Empty tag values are dropped; line protocol cannot represent them.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.tags.insert(key.into(), value);
        }
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    pub fn time(mut self, timestamp_ns: i64) -> Self {
        self.timestamp_ns = Some(timestamp_ns);
        self
    }

    pub fn to_line_protocol(&self) -> String {
        let mut line = String::with_capacity(64);
        escape_into(&mut line, &self.measurement, &[',', ' ']);
        for (key, value) in &self.tags {
            line.push(',');
            escape_into(&mut line, key, &[',', '=', ' ']);
            line.push('=');
            escape_into(&mut line, value, &[',', '=', ' ']);
        }
        for (i, (key, value)) in self.fields.iter().enumerate() {
            line.push(if i == 0 { ' ' } else { ',' });
            escape_into(&mut line, key, &[',', '=', ' ']);
            line.push('=');
            match value {
                FieldValue::Integer(v) => {
                    let _ = write!(line, "{v}i");
                }
                FieldValue::String(s) => {
                    line.push('"');
                    escape_into(&mut line, s, &['"']);
                    line.push('"');
                }
            }
        }
        if let Some(ts) = self.timestamp_ns {
            let _ = write!(line, " {ts}");
        }
        line
    }
}

fn escape_into(out: &mut String, s: &str, special: &[char]) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            // Influx stores `\n` in a string field as written, so a raw
            // newline ends up as the same text as a literal backslash-n.
            // Accepted: a row must never span two lines.
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if special.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Fields;
    use crate::types::Origin;
    use crate::validator::validate;
    use pretty_assertions::assert_eq;

    const TS: i64 = 1_700_000_000_123_456_789;

    fn record(input: &str, measurement: &str, value: &str, unit: &str) -> Record {
        validate(&Fields { input, measurement, value, unit }, TS).unwrap()
    }

    #[test]
    fn record_row() {
        assert_eq!(
            record("l15", "power", "70.87800", "W").to_line_protocol(),
            "power,input_id=l15 power_mw=70878i 1700000000123456789"
        );
        assert_eq!(
            record("lb", "phase_angle", "-120.00000", "°").to_line_protocol(),
            "phase_angle,input_id=lb phase_angle_mdeg=-120000i 1700000000123456789"
        );
    }

    #[test]
    fn log_row_with_origin() {
        let log = LogRecord::new(TS, "[I][app:102]: ready", Some(Origin::Device("emporia vue".into())));
        assert_eq!(
            log.to_line_protocol(),
            r#"log,device_name=emporia\ vue log_message="[I][app:102]: ready" 1700000000123456789"#
        );
    }

    #[test]
    fn log_row_without_origin_or_with_empty_origin() {
        let bare = LogRecord::new(TS, "x", None);
        assert_eq!(bare.to_line_protocol(), r#"log log_message="x" 1700000000123456789"#);
        let empty = LogRecord::new(TS, "x", Some(Origin::Topic(String::new())));
        assert_eq!(empty.to_line_protocol(), bare.to_line_protocol());
    }

    #[test]
    fn string_field_escaping() {
        let log = LogRecord::new(TS, "say \"hi\" \\ bye\nnext", Some(Origin::Topic("a,b=c".into())));
        assert_eq!(
            log.to_line_protocol(),
            r#"log,topic=a\,b\=c log_message="say \"hi\" \\ bye\nnext" 1700000000123456789"#
        );
        assert!(!log.to_line_protocol().contains('\n'));
    }

    #[test]
    fn raw_newline_and_literal_backslash_n_render_differently() {
        let raw = LogRecord::new(TS, "a\nb", None).to_line_protocol();
        let literal = LogRecord::new(TS, "a\\nb", None).to_line_protocol();
        assert_eq!(raw, format!("log log_message=\"a\\nb\" {TS}"));
        assert_eq!(literal, format!("log log_message=\"a\\\\nb\" {TS}"));
    }

    #[test]
    fn tags_and_fields_are_ordered() {
        let line = Point::new("m")
            .tag("z", "1")
            .tag("a", "2")
            .field("y", FieldValue::Integer(1))
            .field("b", FieldValue::Integer(2))
            .to_line_protocol();
        assert_eq!(line, "m,a=2,z=1 b=2i,y=1i");
    }

    #[test]
    fn serialization_is_idempotent() {
        let r = record("ra", "voltage", "121.00000", "V");
        assert_eq!(r.to_line_protocol(), r.to_line_protocol());
    }
}
