//! Record validator: turns classifier tokens into a [`Record`] or a
//! [`Rejection`].
//!
//! A rejection is an ordinary outcome: the caller falls back to a
//! [`LogRecord`](crate::types::LogRecord) for the line.

use crate::classifier::Fields;
use crate::invariants::invariant_for;
use crate::registry::{parse_input_id, parse_measurement, parse_unit};
use crate::types::{Decimal, InputId, Measurement, RawUnit, Record};

/// Which captured token failed to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Input,
    Measurement,
    Value,
    Unit,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Input => write!(f, "input id"),
            TokenKind::Measurement => write!(f, "measurement"),
            TokenKind::Value => write!(f, "value"),
            TokenKind::Unit => write!(f, "unit"),
        }
    }
}

/// Why a line did not become a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("no classifier pattern matched")]
    NoMatch,

    #[error("unrecognized {kind} token {token:?}")]
    UnrecognizedToken { kind: TokenKind, token: String },

    #[error("{measurement} is not reported by input {input}")]
    InputMismatch {
        measurement: Measurement,
        input: InputId,
    },

    #[error("{measurement} must arrive in {expected}, got {actual}")]
    UnitMismatch {
        measurement: Measurement,
        expected: RawUnit,
        actual: RawUnit,
    },
}

fn unrecognized(kind: TokenKind, token: &str) -> Rejection {
    Rejection::UnrecognizedToken {
        kind,
        token: token.to_string(),
    }
}

/// Validate classifier output against the registries and the invariant
/// table, converting the value to its canonical unit on success.
pub fn validate(fields: &Fields<'_>, timestamp_ns: i64) -> Result<Record, Rejection> {
    let input_id =
        parse_input_id(fields.input).ok_or_else(|| unrecognized(TokenKind::Input, fields.input))?;
    let measurement = parse_measurement(fields.measurement)
        .ok_or_else(|| unrecognized(TokenKind::Measurement, fields.measurement))?;
    let value: Decimal = fields
        .value
        .parse()
        .map_err(|_| unrecognized(TokenKind::Value, fields.value))?;
    let unit = parse_unit(fields.unit).ok_or_else(|| unrecognized(TokenKind::Unit, fields.unit))?;

    let invariant = invariant_for(measurement);
    if !invariant.accepts_input(input_id) {
        return Err(Rejection::InputMismatch {
            measurement,
            input: input_id,
        });
    }
    if unit != invariant.expected_unit {
        return Err(Rejection::UnitMismatch {
            measurement,
            expected: invariant.expected_unit,
            actual: unit,
        });
    }

    Ok(Record {
        timestamp_ns,
        input_id,
        measurement,
        value: invariant.conversion.apply(value),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
