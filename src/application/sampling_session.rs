// Sampling session - One active source, its window and the display signals
use crate::domain::clock::resolve_index;
use crate::domain::dashboard::{DashboardSnapshot, DisplaySignals, SessionPhase};
use crate::domain::telemetry::{DerivedSample, SeriesPair, Source, SourceKind};
use crate::domain::units::{power_kwh_per_tick, temp_celsius};
use crate::domain::window::WindowBuffer;
use chrono::{DateTime, FixedOffset};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TickError {
    #[error("no sample at index {index} (series length {len})")]
    MissingSample { index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Sampled(DerivedSample),
    /// The real source failed and the session switched to synthetic data.
    FellBack(DerivedSample),
    Failed(TickError),
}

/// Owns the active source and the window. Only the sampling tick mutates it.
#[derive(Debug, Clone)]
pub struct SamplingSession {
    source: Source,
    window: WindowBuffer,
    signals: DisplaySignals,
}

impl SamplingSession {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            window: WindowBuffer::new(),
            signals: DisplaySignals::default(),
        }
    }

    pub fn source_kind(&self) -> SourceKind {
        self.source.kind()
    }

    pub fn phase(&self) -> SessionPhase {
        SessionPhase::Active(self.source.kind())
    }

    pub fn window(&self) -> &WindowBuffer {
        &self.window
    }

    pub fn signals(&self) -> &DisplaySignals {
        &self.signals
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot::new(self.phase(), self.signals.clone(), self.window.snapshot())
    }

    /// Resolves the sample for `now`, converts it and appends it to the window.
    pub fn tick(&mut self, now: &DateTime<FixedOffset>) -> Result<DerivedSample, TickError> {
        let (power_mw, temp_dk) = {
            let series = self.source.series();
            let index = resolve_index(now, series.len());
            let (feed_time, power_mw, temp_dk) = series.at(index).ok_or(TickError::MissingSample {
                index,
                len: series.len(),
            })?;
            tracing::debug!(
                "Sample {} (feed time {}): {} MW, {} dK",
                index,
                feed_time,
                power_mw,
                temp_dk
            );
            (power_mw, temp_dk)
        };

        let display_time = now.format("%H:%M:%S").to_string();
        let sample = DerivedSample::new(
            now.timestamp_millis(),
            display_time.clone(),
            power_kwh_per_tick(power_mw),
            temp_celsius(temp_dk),
        );

        self.signals = DisplaySignals {
            current_power_kwh: format!("{:.2}", sample.power_kwh),
            current_temp_celsius: format!("{:.2}", sample.temp_celsius),
            last_update: display_time,
        };
        self.window.push(sample.clone());

        Ok(sample)
    }

    /// Ticks, switching a failing real source over to synthetic data.
    ///
    /// The switch is one-way and replaces the window wholesale; the first
    /// synthetic sample is taken immediately.
    pub fn tick_or_fall_back<F>(&mut self, now: &DateTime<FixedOffset>, fallback: F) -> TickOutcome
    where
        F: FnOnce() -> SeriesPair,
    {
        let error = match self.tick(now) {
            Ok(sample) => return TickOutcome::Sampled(sample),
            Err(e) => e,
        };

        tracing::error!("Sampling tick failed: {}", error);
        if self.source.kind() == SourceKind::Synthetic {
            return TickOutcome::Failed(error);
        }

        tracing::warn!("Falling back to simulated data");
        self.source = Source::Synthetic(fallback());
        self.window = WindowBuffer::new();

        match self.tick(now) {
            Ok(sample) => TickOutcome::FellBack(sample),
            Err(e) => {
                tracing::error!("Sampling tick failed on simulated data: {}", e);
                TickOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dashboard::PLACEHOLDER;
    use crate::domain::telemetry::{ValidatedSample, ValidatedSeries};
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 19, h, m, s)
            .unwrap()
    }

    fn pair(power: &[f64], temperature: &[f64]) -> SeriesPair {
        let samples = |values: &[f64]| {
            values
                .iter()
                .enumerate()
                .map(|(i, v)| ValidatedSample::new(format!("00:00:{:02}", i * 5), *v))
                .collect()
        };
        SeriesPair {
            power: ValidatedSeries::new("MW", samples(power)),
            temperature: ValidatedSeries::new("dK", samples(temperature)),
        }
    }

    #[test]
    fn test_initial_signals_are_placeholders() {
        let session = SamplingSession::new(Source::Real(pair(&[50.0], &[2931.0])));

        assert_eq!(session.signals().current_power_kwh, PLACEHOLDER);
        assert_eq!(session.signals().current_temp_celsius, PLACEHOLDER);
        assert_eq!(session.signals().last_update, PLACEHOLDER);
        assert!(session.window().is_empty());
        assert_eq!(session.phase(), SessionPhase::Active(SourceKind::Real));
    }

    #[test]
    fn test_tick_converts_resolved_sample() {
        let mut session = SamplingSession::new(Source::Real(pair(&[50.0, 51.2], &[2931.0, 2932.0])));

        let first = session.tick(&at(0, 0, 0)).unwrap();
        assert_eq!(format!("{:.2}", first.power_kwh), "69.44");
        assert_eq!(format!("{:.2}", first.temp_celsius), "19.95");
        assert_eq!(first.display_time, "00:00:00");

        session.tick(&at(0, 0, 5)).unwrap();
        assert_eq!(session.signals().current_power_kwh, "71.11");
        assert_eq!(session.signals().current_temp_celsius, "20.05");
        assert_eq!(session.signals().last_update, "00:00:05");
        assert_eq!(session.window().len(), 2);
    }

    #[test]
    fn test_tick_past_end_of_feed_clamps() {
        let mut session = SamplingSession::new(Source::Real(pair(&[50.0, 51.2], &[2931.0, 2932.0])));

        let sample = session.tick(&at(23, 59, 59)).unwrap();

        assert_eq!(format!("{:.2}", sample.power_kwh), "71.11");
        assert_eq!(sample.timestamp_ms, at(23, 59, 59).timestamp_millis());
    }

    #[test]
    fn test_missing_sample_falls_back_to_synthetic() {
        let mut session = SamplingSession::new(Source::Real(pair(&[], &[])));

        let outcome = session.tick_or_fall_back(&at(0, 0, 10), || pair(&[54.0], &[2931.0]));

        match outcome {
            TickOutcome::FellBack(sample) => assert!((sample.power_kwh - 75.0).abs() < 1e-9),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(session.source_kind(), SourceKind::Synthetic);
        assert_eq!(session.window().len(), 1);
    }

    #[test]
    fn test_fallback_discards_real_history() {
        let mut session = SamplingSession::new(Source::Real(pair(&[50.0], &[2931.0])));
        session.tick(&at(0, 0, 0)).unwrap();
        session.tick(&at(0, 0, 5)).unwrap();
        assert_eq!(session.window().len(), 2);

        session.source = Source::Real(pair(&[], &[]));
        let outcome = session.tick_or_fall_back(&at(0, 0, 10), || pair(&[55.0], &[2925.0]));

        assert!(matches!(outcome, TickOutcome::FellBack(_)));
        assert_eq!(session.window().len(), 1);
    }

    #[test]
    fn test_synthetic_failure_does_not_loop() {
        let mut session = SamplingSession::new(Source::Synthetic(pair(&[], &[])));

        let outcome = session.tick_or_fall_back(&at(0, 0, 0), || unreachable!());

        assert_eq!(
            outcome,
            TickOutcome::Failed(TickError::MissingSample { index: 0, len: 0 })
        );
        assert_eq!(session.source_kind(), SourceKind::Synthetic);
    }
}
