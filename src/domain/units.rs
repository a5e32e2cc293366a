// Raw feed units to display units

/// Sampling cadence of the feed. The energy conversion below integrates
/// over exactly one tick, so the two must change together.
pub const TICK_SECONDS: u32 = 5;

const SECONDS_PER_HOUR: f64 = 3600.0;
const KELVIN_OFFSET: f64 = 273.15;

/// Energy produced over one tick, in kWh, from an instantaneous power in MW.
pub fn power_kwh_per_tick(mw: f64) -> f64 {
    mw * 1000.0 * (TICK_SECONDS as f64 / SECONDS_PER_HOUR)
}

/// Degrees Celsius from deciKelvin.
pub fn temp_celsius(deci_kelvin: f64) -> f64 {
    deci_kelvin / 10.0 - KELVIN_OFFSET
}
