// Telemetry data domain models
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_TIME: &str = "00:00:00";

/// A raw value as it appears in the feed document. Numbers may arrive
/// string-encoded, and malformed feeds may carry booleans, nulls or nested
/// structures.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Flag(bool),
    Null(()),
    /// Maps, sequences and anything else with no numeric reading.
    Unsupported(IgnoredAny),
}

impl RawValue {
    /// Coerce to a finite number, or `None` when the value is unusable.
    pub fn as_finite(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(n) => *n,
            RawValue::Text(s) => s.trim().parse::<f64>().ok()?,
            RawValue::Flag(_) | RawValue::Null(_) | RawValue::Unsupported(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Number(n) => write!(f, "{}", n),
            RawValue::Text(s) => write!(f, "\"{}\"", s),
            RawValue::Flag(b) => write!(f, "{}", b),
            RawValue::Null(_) => f.write_str("null"),
            RawValue::Unsupported(_) => f.write_str("<unsupported>"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSample {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default = "missing_value")]
    pub value: RawValue,
}

fn missing_value() -> RawValue {
    RawValue::Null(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSeries {
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub values: Vec<RawSample>,
}

/// The parsed feed document: one power series (MW) and one temperature
/// series (deciKelvin).
#[derive(Debug, Clone, Deserialize)]
pub struct RawSeriesDoc {
    pub power: RawSeries,
    pub temperature: RawSeries,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSample {
    pub time: String,
    pub value: f64,
}

impl ValidatedSample {
    pub fn new(time: impl Into<String>, value: f64) -> Self {
        Self {
            time: time.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSeries {
    pub unit: String,
    pub samples: Vec<ValidatedSample>,
}

impl ValidatedSeries {
    pub fn new(unit: impl Into<String>, samples: Vec<ValidatedSample>) -> Self {
        Self {
            unit: unit.into(),
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Index-aligned power and temperature series of equal, non-zero length.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPair {
    pub power: ValidatedSeries,
    pub temperature: ValidatedSeries,
}

impl SeriesPair {
    pub fn len(&self) -> usize {
        self.power.len().min(self.temperature.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw `(time, power MW, temperature dK)` at `index`, if both series have it.
    pub fn at(&self, index: usize) -> Option<(&str, f64, f64)> {
        let power = self.power.samples.get(index)?;
        let temperature = self.temperature.samples.get(index)?;
        Some((power.time.as_str(), power.value, temperature.value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Real,
    Synthetic,
}

/// The one data source active for a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Real(SeriesPair),
    Synthetic(SeriesPair),
}

impl Source {
    pub fn series(&self) -> &SeriesPair {
        match self {
            Source::Real(pair) | Source::Synthetic(pair) => pair,
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Source::Real(_) => SourceKind::Real,
            Source::Synthetic(_) => SourceKind::Synthetic,
        }
    }
}

/// One converted, display-unit data point held in the window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedSample {
    pub timestamp_ms: i64,
    pub display_time: String,
    pub power_kwh: f64,
    pub temp_celsius: f64,
}

impl DerivedSample {
    pub fn new(timestamp_ms: i64, display_time: String, power_kwh: f64, temp_celsius: f64) -> Self {
        Self {
            timestamp_ms,
            display_time,
            power_kwh,
            temp_celsius,
        }
    }
}
