// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod format_parser;
pub mod http_feed;
