//! Input classifier: extracts raw measurement tokens from a line of text.
//!
//! A [`Classifier`] is an ordered list of [`LinePattern`] generations. Each
//! generation is one regular expression with the named groups `input`,
//! `measurement`, `value` and `unit`. Generations are tried in order and the
//! first one that matches wins; within a line only the first match counts.
//!
//! The current generation is deliberately loose about the text between the
//! sensor name and the number, and strict about the number itself: it must
//! carry a fractional part, which keeps counters such as `[sensor:094]` or
//! `with 1 decimals` from being picked up as values.

use regex::Regex;
use std::sync::LazyLock;

/// Named groups every pattern generation must define.
pub const REQUIRED_GROUPS: [&str; 4] = ["input", "measurement", "value", "unit"];

/// Current generation: `_<id>_<measurement>` followed by a signed decimal and
/// its unit, e.g. `'circuit_l15_power': Sending state 70.87800 W`.
pub const CURRENT_PATTERN: &str = r"_(?P<input>[A-Za-z0-9]{1,3})_(?P<measurement>[a-z](?:[a-z_]*[a-z])?)\b[^\d-]*(?P<value>-?\d+\.\d+) (?P<unit>\S+)";

/// First-generation pattern anchored to the full ESPHome sensor log wording.
///
/// Every line it accepts is also accepted by [`CURRENT_PATTERN`] with the same
/// tokens, so it never changes a result. It is kept as a strict reference for
/// the older firmware wording and for classifiers built without the current
/// generation.
pub const ANCHORED_PATTERN: &str = r"'(?:phase|circuit)_(?P<input>[lrab0-9]+)_(?P<measurement>voltage|power)': Sending state (?P<value>-?\d+\.\d+) (?P<unit>[VW]) with \d+ decimals of accuracy";

static CURRENT: LazyLock<LinePattern> = LazyLock::new(|| builtin("current", CURRENT_PATTERN));
static ANCHORED: LazyLock<LinePattern> = LazyLock::new(|| builtin("anchored", ANCHORED_PATTERN));

fn builtin(name: &str, pattern: &str) -> LinePattern {
    LinePattern::new(name, pattern).expect("built-in classifier pattern must be valid")
}

#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("pattern {name:?} is not a valid regex: {source}")]
    InvalidRegex {
        name: String,
        #[source]
        source: regex::Error,
    },
    #[error("pattern {name:?} is missing the named group {group:?}")]
    MissingGroup { name: String, group: &'static str },
}

/// The four raw tokens captured from a line, borrowed from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fields<'a> {
    pub input: &'a str,
    pub measurement: &'a str,
    pub value: &'a str,
    pub unit: &'a str,
}

/// One line-format generation.
#[derive(Debug, Clone)]
pub struct LinePattern {
    name: String,
    regex: Regex,
}

impl LinePattern {
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, PatternError> {
        let name = name.into();
        let regex = Regex::new(pattern).map_err(|source| PatternError::InvalidRegex {
            name: name.clone(),
            source,
        })?;
        for group in REQUIRED_GROUPS {
            if !regex.capture_names().flatten().any(|n| n == group) {
                return Err(PatternError::MissingGroup { name, group });
            }
        }
        Ok(Self { name, regex })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extract<'a>(&self, line: &'a str) -> Option<Fields<'a>> {
        let caps = self.regex.captures(line)?;
        // Groups can be optional inside a user pattern; an absent group is no match.
        Some(Fields {
            input: caps.name("input")?.as_str(),
            measurement: caps.name("measurement")?.as_str(),
            value: caps.name("value")?.as_str(),
            unit: caps.name("unit")?.as_str(),
        })
    }
}

/// Ordered strategy list of line-format generations.
#[derive(Debug, Clone)]
pub struct Classifier {
    patterns: Vec<LinePattern>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::with_legacy()
    }
}

impl Classifier {
    /// Only the current generation.
    pub fn current() -> Self {
        Self {
            patterns: vec![CURRENT.clone()],
        }
    }

    /// The current generation followed by the anchored first generation.
    pub fn with_legacy() -> Self {
        Self {
            patterns: vec![CURRENT.clone(), ANCHORED.clone()],
        }
    }

    /// Append a generation; it is tried after all existing ones.
    pub fn push(&mut self, pattern: LinePattern) {
        self.patterns.push(pattern);
    }

    pub fn patterns(&self) -> &[LinePattern] {
        &self.patterns
    }

    pub fn classify<'a>(&self, line: &'a str) -> Option<Fields<'a>> {
        self.patterns.iter().find_map(|p| {
            let fields = p.extract(line)?;
            tracing::trace!(pattern = p.name(), ?fields, "line classified");
            Some(fields)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
