// Sampling scheduler - Loads the feed once and drives the periodic ticks
use crate::application::normalizer::{NormalizeError, Normalized, normalize};
use crate::application::sampling_session::{SamplingSession, TickOutcome};
use crate::application::series_feed::{FeedError, ParseError, SeriesFeed, SeriesParser};
use crate::application::synthetic;
use crate::domain::clock::Clock;
use crate::domain::dashboard::{DashboardSnapshot, SessionPhase};
use crate::domain::telemetry::{Source, SourceKind};
use crate::domain::units::TICK_SECONDS;
use chrono::{DateTime, FixedOffset};
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const CLOCK_TICK: Duration = Duration::from_secs(1);
const FALLBACK_CLOCK_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Delay before the extra first tick on a real feed
    pub settle_delay: Duration,
    pub clock_format: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_millis(100),
            clock_format: "%A, %d %B %Y %H:%M:%S".to_string(),
        }
    }
}

/// Fetch, parse and normalize in one pass.
pub async fn load_series(
    feed: &dyn SeriesFeed,
    parser: &dyn SeriesParser,
) -> Result<Normalized, LoadError> {
    let text = feed.fetch_raw_series().await?;
    let doc = parser.parse_series(&text)?;
    Ok(normalize(doc)?)
}

/// Picks the session's source: the real feed when usable, synthetic otherwise.
pub async fn load_source(feed: &dyn SeriesFeed, parser: &dyn SeriesParser) -> Source {
    match load_series(feed, parser).await {
        Ok(normalized) => {
            tracing::info!(
                "Loaded {} samples per series from {} ({} dropped)",
                normalized.series.len(),
                feed.describe(),
                normalized.dropped.len()
            );
            Source::Real(normalized.series)
        }
        Err(e) => {
            tracing::error!("Failed to load telemetry from {}: {}", feed.describe(), e);
            tracing::warn!("Falling back to simulated data");
            Source::Synthetic(synthetic::generate())
        }
    }
}

pub fn format_clock(now: &DateTime<FixedOffset>, format: &str) -> String {
    let mut clock = String::new();
    if write!(clock, "{}", now.format(format)).is_err() {
        clock.clear();
        clock.push_str(&now.format(FALLBACK_CLOCK_FORMAT).to_string());
    }
    clock
}

#[derive(Clone)]
pub struct SamplingScheduler {
    feed: Arc<dyn SeriesFeed>,
    parser: Arc<dyn SeriesParser>,
    clock: Arc<dyn Clock>,
    config: SchedulerConfig,
}

impl SamplingScheduler {
    pub fn new(
        feed: Arc<dyn SeriesFeed>,
        parser: Arc<dyn SeriesParser>,
        clock: Arc<dyn Clock>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            feed,
            parser,
            clock,
            config,
        }
    }

    /// Starts loading and returns immediately. Both periodic actions live
    /// in the returned handle until it is shut down or dropped.
    pub fn start(&self) -> SchedulerHandle {
        let feed = self.feed.clone();
        let parser = self.parser.clone();
        self.spawn(async move { load_source(feed.as_ref(), parser.as_ref()).await })
    }

    fn spawn<L>(&self, load: L) -> SchedulerHandle
    where
        L: Future<Output = Source> + Send + 'static,
    {
        let (snapshot_tx, snapshot_rx) = watch::channel(DashboardSnapshot::default());
        let (clock_tx, clock_rx) = watch::channel(format_clock(
            &self.clock.now(),
            &self.config.clock_format,
        ));

        let sampling_task = tokio::spawn(self.clone().run_sampling(load, snapshot_tx));
        let clock_task = tokio::spawn(self.clone().run_clock(snapshot_rx.clone(), clock_tx));

        SchedulerHandle {
            tasks: Some((clock_task, sampling_task)),
            snapshots: snapshot_rx,
            clock: clock_rx,
        }
    }

    async fn run_sampling<L>(self, load: L, snapshot_tx: watch::Sender<DashboardSnapshot>)
    where
        L: Future<Output = Source>,
    {
        snapshot_tx.send_modify(|snapshot| snapshot.phase = SessionPhase::Loading);

        let mut session = SamplingSession::new(load.await);
        tracing::info!(
            "Sampling session active on {:?} data",
            session.source_kind()
        );
        snapshot_tx.send_replace(session.snapshot());

        let period = Duration::from_secs(TICK_SECONDS as u64);
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        if session.source_kind() == SourceKind::Real {
            tokio::time::sleep(self.config.settle_delay).await;
        }
        self.sample(&mut session, &snapshot_tx);

        loop {
            ticker.tick().await;
            self.sample(&mut session, &snapshot_tx);
        }
    }

    fn sample(&self, session: &mut SamplingSession, snapshot_tx: &watch::Sender<DashboardSnapshot>) {
        let now = self.clock.now();
        match session.tick_or_fall_back(&now, synthetic::generate) {
            TickOutcome::Sampled(sample) | TickOutcome::FellBack(sample) => {
                tracing::debug!(
                    "Sampled {} kWh, {} °C at {}",
                    sample.power_kwh,
                    sample.temp_celsius,
                    sample.display_time
                );
            }
            TickOutcome::Failed(_) => {}
        }
        snapshot_tx.send_replace(session.snapshot());
    }

    async fn run_clock(
        self,
        mut snapshots: watch::Receiver<DashboardSnapshot>,
        clock_tx: watch::Sender<String>,
    ) {
        let active = snapshots
            .wait_for(|s| matches!(s.phase, SessionPhase::Active(_)))
            .await
            .is_ok();
        if !active {
            return;
        }

        let mut ticker = tokio::time::interval(CLOCK_TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            clock_tx.send_replace(format_clock(&self.clock.now(), &self.config.clock_format));
        }
    }
}

/// Owns the two periodic tasks; they are only ever cancelled together.
pub struct SchedulerHandle {
    tasks: Option<(JoinHandle<()>, JoinHandle<()>)>,
    snapshots: watch::Receiver<DashboardSnapshot>,
    clock: watch::Receiver<String>,
}

impl SchedulerHandle {
    pub fn snapshots(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshots.clone()
    }

    pub fn clock(&self) -> watch::Receiver<String> {
        self.clock.clone()
    }

    /// Cancels both ticks and waits until neither can run again.
    pub async fn shutdown(&mut self) {
        if let Some((clock_task, sampling_task)) = self.tasks.take() {
            clock_task.abort();
            sampling_task.abort();
            let _ = clock_task.await;
            let _ = sampling_task.await;
            tracing::info!("Sampling scheduler stopped");
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        if let Some((clock_task, sampling_task)) = self.tasks.take() {
            clock_task.abort();
            sampling_task.abort();
        }
    }
}
