// Dashboard domain model
use std::sync::Arc;

use serde::Serialize;

use super::telemetry::{DerivedSample, SourceKind};

pub const PLACEHOLDER: &str = "--";

/// Lifecycle of a sampling session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "source", rename_all = "lowercase")]
pub enum SessionPhase {
    Uninitialized,
    Loading,
    Active(SourceKind),
}

/// The scalar values shown on the dashboard cards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySignals {
    pub current_power_kwh: String,
    pub current_temp_celsius: String,
    pub last_update: String,
}

impl Default for DisplaySignals {
    fn default() -> Self {
        Self {
            current_power_kwh: PLACEHOLDER.to_string(),
            current_temp_celsius: PLACEHOLDER.to_string(),
            last_update: PLACEHOLDER.to_string(),
        }
    }
}

/// Immutable view of a session published after every change.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub phase: SessionPhase,
    pub signals: DisplaySignals,
    pub window: Arc<[DerivedSample]>,
}

impl Default for DashboardSnapshot {
    fn default() -> Self {
        Self::new(SessionPhase::Uninitialized, DisplaySignals::default(), Vec::new())
    }
}

impl DashboardSnapshot {
    pub fn new(phase: SessionPhase, signals: DisplaySignals, window: Vec<DerivedSample>) -> Self {
        Self {
            phase,
            signals,
            window: window.into(),
        }
    }
}
