// Series normalizer - Raw document to index-aligned validated series
use crate::domain::telemetry::{
    DEFAULT_SAMPLE_TIME, RawSeries, RawSeriesDoc, SeriesPair, ValidatedSample, ValidatedSeries,
};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesName {
    Power,
    Temperature,
}

impl fmt::Display for SeriesName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesName::Power => f.write_str("power"),
            SeriesName::Temperature => f.write_str("temperature"),
        }
    }
}

/// A sample dropped because its value was not a finite number.
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedSample {
    pub series: SeriesName,
    pub position: usize,
    pub raw_value: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("no usable telemetry data (power: {power} valid samples, temperature: {temperature} valid samples)")]
    NoUsableData { power: usize, temperature: usize },
}

#[derive(Debug, Clone)]
pub struct Normalized {
    pub series: SeriesPair,
    pub dropped: Vec<DroppedSample>,
}

/// Validates both series and truncates them to a shared length.
///
/// Invalid samples are dropped, never substituted. Truncation keeps the
/// series index-aligned when one lost more samples than the other.
pub fn normalize(doc: RawSeriesDoc) -> Result<Normalized, NormalizeError> {
    let mut dropped = Vec::new();
    let mut power = validate(SeriesName::Power, doc.power, &mut dropped);
    let mut temperature = validate(SeriesName::Temperature, doc.temperature, &mut dropped);

    let shared = power.len().min(temperature.len());
    if shared == 0 {
        return Err(NormalizeError::NoUsableData {
            power: power.len(),
            temperature: temperature.len(),
        });
    }

    if power.len() != temperature.len() {
        tracing::debug!(
            "Truncating series to {} samples (power: {}, temperature: {})",
            shared,
            power.len(),
            temperature.len()
        );
    }
    power.samples.truncate(shared);
    temperature.samples.truncate(shared);

    Ok(Normalized {
        series: SeriesPair { power, temperature },
        dropped,
    })
}

fn validate(name: SeriesName, raw: RawSeries, dropped: &mut Vec<DroppedSample>) -> ValidatedSeries {
    let mut samples = Vec::with_capacity(raw.values.len());

    for (position, sample) in raw.values.into_iter().enumerate() {
        match sample.value.as_finite() {
            Some(value) => {
                let time = sample.time.unwrap_or_else(|| DEFAULT_SAMPLE_TIME.to_string());
                samples.push(ValidatedSample::new(time, value));
            }
            None => {
                let raw_value = sample.value.to_string();
                tracing::warn!("Invalid {} value at position {}: {}", name, position, raw_value);
                dropped.push(DroppedSample {
                    series: name,
                    position,
                    raw_value,
                });
            }
        }
    }

    ValidatedSeries::new(raw.unit, samples)
}
