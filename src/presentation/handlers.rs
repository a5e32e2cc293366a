// HTTP request handlers
use crate::application::view_projector::{
    AxisLabel, ChartProjection, Metric, PAGE_SIZES, PageItem, TableRow, ViewState, WindowView,
};
use crate::domain::dashboard::{DashboardSnapshot, SessionPhase};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub clock: String,
    pub current_power_kwh: String,
    pub current_temp_celsius: String,
    pub last_update: String,
    pub phase: SessionPhase,
    pub record_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ChartsResponse {
    pub width: f64,
    pub power: ChartProjection,
    pub temperature: ChartProjection,
    pub labels: Vec<AxisLabel>,
}

#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub rows: Vec<TableRow>,
    pub current_page: usize,
    pub items_per_page: usize,
    pub total_pages: usize,
    pub record_count: usize,
    pub page_numbers: Vec<PageItem>,
    pub page_sizes: [usize; 4],
}

impl TableResponse {
    fn build(snapshot: &DashboardSnapshot, view: &ViewState) -> Self {
        let window = WindowView::new(&snapshot.window);
        let record_count = window.len();
        Self {
            rows: window.paginated_rows(view),
            current_page: view.current_page(),
            items_per_page: view.items_per_page(),
            total_pages: view.total_pages(record_count),
            record_count,
            page_numbers: view.page_numbers(record_count),
            page_sizes: PAGE_SIZES,
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current scalar signals and wall clock
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardResponse> {
    let snapshot = state.snapshot();
    let clock = state.clock.borrow().clone();

    Json(DashboardResponse {
        clock,
        current_power_kwh: snapshot.signals.current_power_kwh,
        current_temp_celsius: snapshot.signals.current_temp_celsius,
        last_update: snapshot.signals.last_update,
        phase: snapshot.phase,
        record_count: snapshot.window.len(),
    })
}

/// Chart coordinates for both metrics over the whole window
pub async fn charts(State(state): State<Arc<AppState>>) -> Json<ChartsResponse> {
    let snapshot = state.snapshot();
    let window = WindowView::new(&snapshot.window);

    Json(ChartsResponse {
        width: window.chart_width(),
        power: window.chart(Metric::Power),
        temperature: window.chart(Metric::Temperature),
        labels: window.axis_labels(),
    })
}

pub async fn table(State(state): State<Arc<AppState>>) -> Json<TableResponse> {
    let view = state.view.lock().await;
    Json(TableResponse::build(&state.snapshot(), &view))
}

/// Out-of-range pages leave the current page unchanged
pub async fn change_page(
    Path(page): Path<usize>,
    State(state): State<Arc<AppState>>,
) -> Json<TableResponse> {
    let snapshot = state.snapshot();
    let mut view = state.view.lock().await;
    if !view.change_page(page, snapshot.window.len()) {
        tracing::debug!("Ignoring page change to {}", page);
    }
    Json(TableResponse::build(&snapshot, &view))
}

pub async fn change_page_size(
    Path(size): Path<usize>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<TableResponse>, (StatusCode, String)> {
    let snapshot = state.snapshot();
    let mut view = state.view.lock().await;
    view.change_page_size(size)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    Ok(Json(TableResponse::build(&snapshot, &view)))
}
