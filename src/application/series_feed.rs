// Collaborator traits for loading the raw telemetry feed
use crate::domain::telemetry::RawSeriesDoc;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to request telemetry feed from {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("telemetry feed {url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("failed to read telemetry feed from {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed YAML telemetry document")]
    Yaml(#[from] serde_yaml::Error),
    #[error("malformed JSON telemetry document")]
    Json(#[from] serde_json::Error),
}

/// Fetches the raw text of the telemetry dataset.
#[async_trait]
pub trait SeriesFeed: Send + Sync {
    /// Human-readable location, used in logs
    fn describe(&self) -> String;

    async fn fetch_raw_series(&self) -> Result<String, FeedError>;
}

/// Turns raw feed text into the two-series document.
pub trait SeriesParser: Send + Sync {
    fn parse_series(&self, text: &str) -> Result<RawSeriesDoc, ParseError>;
}
