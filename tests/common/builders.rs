//! Test builders: ergonomic constructors for device lines.
//!
//! These builders favour readability in test assertions. They panic on
//! invalid input rather than returning `Result`.

/// Fluent builder for an ESPHome sensor state line.
///
/// # Example
///
/// ```rust
/// let line = SensorLineBuilder::circuit("l15", "power")
///     .value("70.87800")
///     .unit("W")
///     .build();
/// ```
pub struct SensorLineBuilder {
    prefix: String,
    input: String,
    measurement: String,
    value: String,
    unit: String,
    decimals: u8,
}

impl SensorLineBuilder {
    pub fn new(prefix: &str, input: &str, measurement: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            input: input.to_string(),
            measurement: measurement.to_string(),
            value: "0.00000".to_string(),
            unit: "W".to_string(),
            decimals: 1,
        }
    }

    pub fn circuit(input: &str, measurement: &str) -> Self {
        Self::new("circuit", input, measurement)
    }

    pub fn phase(input: &str, measurement: &str) -> Self {
        Self::new("phase", input, measurement)
    }

    pub fn device(input: &str, measurement: &str) -> Self {
        Self::new("vue", input, measurement)
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn unit(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    pub fn decimals(mut self, decimals: u8) -> Self {
        self.decimals = decimals;
        self
    }

    pub fn build(self) -> String {
        format!(
            "[D][sensor:094]: '{}_{}_{}': Sending state {} {} with {} decimals of accuracy",
            self.prefix, self.input, self.measurement, self.value, self.unit, self.decimals
        )
    }
}
