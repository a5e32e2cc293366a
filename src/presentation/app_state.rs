// Application state for HTTP handlers
use crate::application::view_projector::ViewState;
use crate::domain::dashboard::DashboardSnapshot;
use tokio::sync::{Mutex, watch};

pub struct AppState {
    pub snapshots: watch::Receiver<DashboardSnapshot>,
    pub clock: watch::Receiver<String>,
    pub view: Mutex<ViewState>,
}

impl AppState {
    pub fn new(snapshots: watch::Receiver<DashboardSnapshot>, clock: watch::Receiver<String>) -> Self {
        Self {
            snapshots,
            clock,
            view: Mutex::new(ViewState::default()),
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        self.snapshots.borrow().clone()
    }
}
