// Presentation layer - HTTP surface over dashboard snapshots
pub mod app_state;
pub mod handlers;
