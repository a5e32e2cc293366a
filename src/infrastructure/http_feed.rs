// HTTP and file implementations of the telemetry feed
use crate::application::series_feed::{FeedError, SeriesFeed};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct HttpSeriesFeed {
    url: String,
    client: reqwest::Client,
}

impl HttpSeriesFeed {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SeriesFeed for HttpSeriesFeed {
    fn describe(&self) -> String {
        self.url.clone()
    }

    async fn fetch_raw_series(&self) -> Result<String, FeedError> {
        let transport = |source| FeedError::Transport {
            url: self.url.clone(),
            source,
        };

        tracing::debug!("Fetching telemetry feed from {}", self.url);
        let response = self.client.get(&self.url).send().await.map_err(transport)?;

        if !response.status().is_success() {
            return Err(FeedError::Status {
                url: self.url.clone(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(transport)
    }
}

#[derive(Debug, Clone)]
pub struct FileSeriesFeed {
    path: PathBuf,
}

impl FileSeriesFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SeriesFeed for FileSeriesFeed {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_raw_series(&self) -> Result<String, FeedError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FeedError::Io {
                path: self.describe(),
                source,
            })
    }
}

/// `http://` and `https://` sources are fetched over HTTP, anything else is
/// read as a local path.
pub fn feed_for_source(source: &str) -> Arc<dyn SeriesFeed> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Arc::new(HttpSeriesFeed::new(source.to_string()))
    } else {
        Arc::new(FileSeriesFeed::new(source))
    }
}
