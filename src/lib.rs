// Telemetry windowing engine and its HTTP dashboard surface
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
