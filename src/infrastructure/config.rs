use crate::application::sampling_service::SchedulerConfig;
use crate::infrastructure::format_parser::FormatParser;
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub server: ServerSettings,
    pub feed: FeedSettings,
    pub sampling: SamplingSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedSettings {
    /// URL or local path of the telemetry document
    pub source: String,
    pub format: FormatParser,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SamplingSettings {
    pub settle_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplaySettings {
    pub clock_format: String,
}

impl DashboardConfig {
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            settle_delay: Duration::from_millis(self.sampling.settle_delay_ms),
            clock_format: self.display.clock_format.clone(),
        }
    }
}

/// Defaults, then `config/dashboard.*` when present, then `DASHBOARD__*`
/// environment variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    build_config(
        config::File::with_name("config/dashboard").required(false),
        config::Environment::with_prefix("DASHBOARD")
            .separator("__")
            .try_parsing(true),
    )
}

fn build_config<F, E>(file: F, env: E) -> anyhow::Result<DashboardConfig>
where
    F: config::Source + Send + Sync + 'static,
    E: config::Source + Send + Sync + 'static,
{
    let settings = config::Config::builder()
        .set_default("server.addr", "0.0.0.0:8080")?
        .set_default("feed.source", "data.yml")?
        .set_default("feed.format", "yaml")?
        .set_default("sampling.settle_delay_ms", 100)?
        .set_default("display.clock_format", "%A, %d %B %Y %H:%M:%S")?
        .add_source(file)
        .add_source(env)
        .build()?;

    let config: DashboardConfig = settings.try_deserialize()?;
    validate_clock_format(&config.display.clock_format)?;
    Ok(config)
}

fn validate_clock_format(format: &str) -> anyhow::Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        anyhow::bail!("invalid display.clock_format: {:?}", format);
    }
    Ok(())
}
