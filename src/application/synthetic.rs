// Synthetic fallback dataset
use crate::domain::clock::format_time_from_seconds;
use crate::domain::telemetry::{SeriesPair, ValidatedSample, ValidatedSeries};
use crate::domain::units::TICK_SECONDS;
use rand::Rng;

/// One full day of 5-second samples.
pub const SYNTHETIC_SAMPLES: usize = 24 * 60 * 12;

const POWER_RANGE_MW: std::ops::Range<f64> = 54.5..56.0;
const TEMPERATURE_RANGE_DK: std::ops::Range<f64> = 2920.0..2930.0;

pub fn generate() -> SeriesPair {
    generate_with_rng(&mut rand::thread_rng())
}

pub fn generate_with_rng<R: Rng>(rng: &mut R) -> SeriesPair {
    let mut power = Vec::with_capacity(SYNTHETIC_SAMPLES);
    let mut temperature = Vec::with_capacity(SYNTHETIC_SAMPLES);

    for i in 0..SYNTHETIC_SAMPLES {
        let time = format_time_from_seconds(i as u32 * TICK_SECONDS);
        power.push(ValidatedSample::new(time.clone(), rng.gen_range(POWER_RANGE_MW)));
        temperature.push(ValidatedSample::new(time, rng.gen_range(TEMPERATURE_RANGE_DK)));
    }

    SeriesPair {
        power: ValidatedSeries::new("MW", power),
        temperature: ValidatedSeries::new("dK", temperature),
    }
}
