// View projector - Window snapshots to chart coordinates and table pages
use crate::domain::telemetry::DerivedSample;
use serde::{Serialize, Serializer};
use thiserror::Error;

pub const CHART_WIDTH: f64 = 800.0;
const CHART_BASELINE: f64 = 240.0;
const CHART_PLOT_HEIGHT: f64 = 220.0;
const AXIS_LABELS: usize = 5;

/// One minute of samples at the 5-second cadence.
pub const RECENT_ROWS: usize = 12;
pub const PAGE_SIZES: [usize; 4] = [5, 10, 20, 50];
const PAGE_WINDOW: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Power,
    Temperature,
}

impl Metric {
    fn value(self, sample: &DerivedSample) -> f64 {
        match self {
            Metric::Power => sample.power_kwh,
            Metric::Temperature => sample.temp_celsius,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    pub key: String,
    pub x: f64,
    pub display_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartMarker {
    pub key: String,
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub display_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartProjection {
    pub metric: Metric,
    pub width: f64,
    /// A line needs at least two samples.
    pub has_line: bool,
    pub points: String,
    pub markers: Vec<ChartMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub key: String,
    pub timestamp_ms: i64,
    pub display_time: String,
    pub power_kwh: f64,
    pub temp_celsius: f64,
}

/// Min-max normalisation into the inverted plot band `[20, 240]`.
/// A flat series uses a range of 1 so every point sits on the baseline.
pub fn y_coordinate(value: f64, values: &[f64]) -> f64 {
    let (min, max) = bounds(values);
    scale_y(value, min, max)
}

fn bounds(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| (min.min(*v), max.max(*v)))
}

fn scale_y(value: f64, min: f64, max: f64) -> f64 {
    let range = if max - min == 0.0 { 1.0 } else { max - min };
    CHART_BASELINE - ((value - min) / range) * CHART_PLOT_HEIGHT
}

/// Read-only projections over a window snapshot.
#[derive(Debug, Clone, Copy)]
pub struct WindowView<'a> {
    samples: &'a [DerivedSample],
}

impl<'a> WindowView<'a> {
    pub fn new(samples: &'a [DerivedSample]) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn chart_width(&self) -> f64 {
        CHART_WIDTH
    }

    /// Linear position across the whole window.
    pub fn x_coordinate(&self, index: usize) -> f64 {
        let n = self.samples.len();
        if n <= 1 {
            return 0.0;
        }
        (index as f64 / (n - 1) as f64) * self.chart_width()
    }

    pub fn values(&self, metric: Metric) -> Vec<f64> {
        self.samples.iter().map(|s| metric.value(s)).collect()
    }

    pub fn polyline_points(&self, metric: Metric) -> String {
        self.coordinates(metric)
            .iter()
            .map(|(x, y)| format!("{},{}", x, y))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn coordinates(&self, metric: Metric) -> Vec<(f64, f64)> {
        let (min, max) = bounds(&self.values(metric));
        self.samples
            .iter()
            .enumerate()
            .map(|(i, s)| (self.x_coordinate(i), scale_y(metric.value(s), min, max)))
            .collect()
    }

    pub fn chart(&self, metric: Metric) -> ChartProjection {
        let coordinates = self.coordinates(metric);
        let markers = self
            .samples
            .iter()
            .zip(&coordinates)
            .map(|(s, (x, y))| ChartMarker {
                key: format!("point_{}", s.timestamp_ms),
                x: *x,
                y: *y,
                value: metric.value(s),
                display_time: s.display_time.clone(),
            })
            .collect();

        ChartProjection {
            metric,
            width: self.chart_width(),
            has_line: self.samples.len() > 1,
            points: self.polyline_points(metric),
            markers,
        }
    }

    /// About five `HH:MM` labels spread over the window.
    pub fn axis_labels(&self) -> Vec<AxisLabel> {
        let step = (self.samples.len() / AXIS_LABELS).max(1);
        self.samples
            .iter()
            .enumerate()
            .step_by(step)
            .map(|(i, s)| AxisLabel {
                key: format!("label_{}", s.timestamp_ms),
                x: self.x_coordinate(i),
                display_time: s.display_time.split(':').take(2).collect::<Vec<_>>().join(":"),
            })
            .collect()
    }

    /// The last minute of samples, newest first.
    pub fn recent_rows(&self) -> Vec<TableRow> {
        self.samples
            .iter()
            .rev()
            .take(RECENT_ROWS)
            .map(|s| TableRow {
                key: format!("data_{}", s.timestamp_ms),
                timestamp_ms: s.timestamp_ms,
                display_time: s.display_time.clone(),
                power_kwh: s.power_kwh,
                temp_celsius: s.temp_celsius,
            })
            .collect()
    }

    pub fn paginated_rows(&self, view: &ViewState) -> Vec<TableRow> {
        let start = (view.current_page() - 1) * view.items_per_page();
        self.recent_rows()
            .into_iter()
            .skip(start)
            .take(view.items_per_page())
            .collect()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PageSizeError {
    #[error("unsupported page size {0}, expected one of 5, 10, 20 or 50")]
    Unsupported(usize),
}

/// Table pagination. The page count is derived from the record count on
/// every call rather than stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    current_page: usize,
    items_per_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            current_page: 1,
            items_per_page: PAGE_SIZES[0],
        }
    }
}

impl ViewState {
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn total_pages(&self, record_count: usize) -> usize {
        record_count.div_ceil(self.items_per_page)
    }

    /// Moves to `page` when it exists; returns whether the page changed.
    pub fn change_page(&mut self, page: usize, record_count: usize) -> bool {
        if page >= 1 && page <= self.total_pages(record_count) {
            self.current_page = page;
            return true;
        }
        false
    }

    pub fn change_page_size(&mut self, size: usize) -> Result<(), PageSizeError> {
        if !PAGE_SIZES.contains(&size) {
            return Err(PageSizeError::Unsupported(size));
        }
        self.items_per_page = size;
        self.current_page = 1;
        Ok(())
    }

    pub fn page_numbers(&self, record_count: usize) -> Vec<PageItem> {
        page_numbers(self.total_pages(record_count), self.current_page)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(usize),
    Gap,
}

impl Serialize for PageItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageItem::Page(n) => serializer.serialize_u64(*n as u64),
            PageItem::Gap => serializer.serialize_str("..."),
        }
    }
}

/// First page, up to two pages either side of `current`, last page, with
/// gaps where the sequence jumps.
pub fn page_numbers(total: usize, current: usize) -> Vec<PageItem> {
    let (total, current) = (total as i64, current as i64);
    let mut items = vec![PageItem::Page(1)];

    if current - PAGE_WINDOW > 2 {
        items.push(PageItem::Gap);
    }
    for page in (current - PAGE_WINDOW).max(2)..=(current + PAGE_WINDOW).min(total - 1) {
        items.push(PageItem::Page(page as usize));
    }
    if current + PAGE_WINDOW < total - 1 {
        items.push(PageItem::Gap);
    }
    if total > 1 {
        items.push(PageItem::Page(total as usize));
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::PageItem::{Gap, Page};

    fn window(values: &[(f64, f64)]) -> Vec<DerivedSample> {
        values
            .iter()
            .enumerate()
            .map(|(i, (power, temp))| {
                let seconds = i as u32 * 5;
                DerivedSample::new(
                    1_000_000 + i as i64 * 5000,
                    format!("10:{:02}:{:02}", seconds / 60, seconds % 60),
                    *power,
                    *temp,
                )
            })
            .collect()
    }

    #[test]
    fn test_x_coordinate() {
        let empty = window(&[]);
        assert_eq!(WindowView::new(&empty).x_coordinate(0), 0.0);

        let single = window(&[(1.0, 1.0)]);
        assert_eq!(WindowView::new(&single).x_coordinate(0), 0.0);

        let three = window(&[(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]);
        let view = WindowView::new(&three);
        assert_eq!(view.x_coordinate(0), 0.0);
        assert_eq!(view.x_coordinate(1), 400.0);
        assert_eq!(view.x_coordinate(2), view.chart_width());
    }

    #[test]
    fn test_y_coordinate() {
        let values = [10.0, 20.0, 30.0];
        assert_eq!(y_coordinate(10.0, &values), 240.0);
        assert_eq!(y_coordinate(20.0, &values), 130.0);
        assert_eq!(y_coordinate(30.0, &values), 20.0);

        // flat window
        assert_eq!(y_coordinate(5.0, &[5.0, 5.0]), 240.0);
    }

    #[test]
    fn test_polyline_points() {
        let samples = window(&[(1.0, 20.0), (3.0, 20.0)]);
        let view = WindowView::new(&samples);

        assert_eq!(view.polyline_points(Metric::Power), "0,240 800,20");
        assert_eq!(view.polyline_points(Metric::Temperature), "0,240 800,240");
        assert_eq!(WindowView::new(&[]).polyline_points(Metric::Power), "");
    }

    #[test]
    fn test_chart_projection() {
        let single = window(&[(1.0, 20.0)]);
        let chart = WindowView::new(&single).chart(Metric::Power);
        assert!(!chart.has_line);
        assert_eq!(chart.markers.len(), 1);

        let samples = window(&[(1.0, 20.0), (3.0, 21.0)]);
        let chart = WindowView::new(&samples).chart(Metric::Temperature);
        assert!(chart.has_line);
        assert_eq!(chart.width, 800.0);
        assert_eq!(chart.markers[1].key, "point_1005000");
        assert_eq!((chart.markers[1].x, chart.markers[1].y), (800.0, 20.0));
        assert_eq!(chart.markers[1].value, 21.0);
    }

    #[test]
    fn test_axis_labels() {
        let samples = window(&vec![(1.0, 1.0); 12]);
        let labels = WindowView::new(&samples).axis_labels();

        // step = floor(12 / 5) = 2
        assert_eq!(labels.len(), 6);
        assert_eq!(labels[0].display_time, "10:00");
        assert_eq!(labels[0].key, "label_1000000");
        assert_eq!(labels[1].x, WindowView::new(&samples).x_coordinate(2));
        assert!(WindowView::new(&[]).axis_labels().is_empty());

        let few = window(&[(1.0, 1.0), (2.0, 2.0)]);
        assert_eq!(WindowView::new(&few).axis_labels().len(), 2);
    }

    #[test]
    fn test_recent_rows_newest_first() {
        let samples = window(&vec![(1.0, 1.0); 30]);
        let rows = WindowView::new(&samples).recent_rows();

        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0].timestamp_ms, samples[29].timestamp_ms);
        assert_eq!(rows[11].timestamp_ms, samples[18].timestamp_ms);
        assert!(rows.windows(2).all(|w| w[0].timestamp_ms >= w[1].timestamp_ms));
        assert_eq!(rows[0].key, format!("data_{}", samples[29].timestamp_ms));
    }

    #[test]
    fn test_paginated_rows() {
        let samples = window(&vec![(1.0, 1.0); 30]);
        let view = WindowView::new(&samples);
        let mut state = ViewState::default();

        assert_eq!(view.paginated_rows(&state).len(), 5);
        assert!(state.change_page(3, view.len()));
        // recent rows hold 12 entries, so the third page of five has two
        assert_eq!(view.paginated_rows(&state).len(), 2);
        assert!(state.change_page(4, view.len()));
        assert!(view.paginated_rows(&state).is_empty());
    }

    #[test]
    fn test_change_page_bounds() {
        let mut state = ViewState::default();
        assert_eq!(state.total_pages(12), 3);

        assert!(!state.change_page(0, 12));
        assert!(!state.change_page(4, 12));
        assert_eq!(state.current_page(), 1);
        assert!(state.change_page(3, 12));
        assert_eq!(state.current_page(), 3);
        assert!(!state.change_page(1, 0));
    }

    #[test]
    fn test_change_page_size_resets_page() {
        let mut state = ViewState::default();
        state.change_page(2, 50);

        state.change_page_size(20).unwrap();
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.items_per_page(), 20);
        assert_eq!(state.total_pages(50), 3);

        assert_eq!(state.change_page_size(7), Err(PageSizeError::Unsupported(7)));
        assert_eq!(state.items_per_page(), 20);
    }

    #[test]
    fn test_page_numbers() {
        assert_eq!(
            page_numbers(10, 5),
            vec![Page(1), Gap, Page(3), Page(4), Page(5), Page(6), Page(7), Gap, Page(10)]
        );
        assert_eq!(page_numbers(10, 1), vec![Page(1), Page(2), Page(3), Gap, Page(10)]);
        assert_eq!(page_numbers(5, 3), vec![Page(1), Page(2), Page(3), Page(4), Page(5)]);
        assert_eq!(page_numbers(1, 1), vec![Page(1)]);
        assert_eq!(page_numbers(0, 1), vec![Page(1)]);
    }

    #[test]
    fn test_page_items_serialize() {
        let json = serde_json::to_string(&page_numbers(10, 5)).unwrap();
        assert_eq!(json, r#"[1,"...",3,4,5,6,7,"...",10]"#);
    }
}
