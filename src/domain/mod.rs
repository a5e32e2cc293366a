// Domain layer - Telemetry models and pure computations
pub mod clock;
pub mod dashboard;
pub mod telemetry;
pub mod units;
pub mod window;
