// Application layer - Use cases over the telemetry domain
pub mod normalizer;
pub mod sampling_service;
pub mod sampling_session;
pub mod series_feed;
pub mod synthetic;
pub mod view_projector;
