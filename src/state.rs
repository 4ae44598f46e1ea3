use std::sync::Arc;

use chrono::NaiveDate;

use crate::charts::top_n::TopNScope;
use crate::charts::{ChartOptions, Dashboard, build_dashboard};
use crate::color::BoroughColors;
use crate::data::filter::FilterSelection;
use crate::data::model::{Dataset, RoomType};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
///
/// Every mutator re-runs the filter and the chart builders before returning,
/// so `dashboard` always matches `selection`.
pub struct AppState {
    /// Loaded once at startup, never replaced.
    dataset: Arc<Dataset>,

    /// Current control values.
    pub selection: FilterSelection,

    /// Presentation options (top-N size and scope).
    pub options: ChartOptions,

    /// Chart specs for the current selection.
    pub dashboard: Dashboard,

    /// Colour per borough, fixed for the dataset.
    pub colors: BoroughColors,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>, options: ChartOptions) -> Self {
        let selection = FilterSelection::all(&dataset);
        let dashboard = build_dashboard(&dataset, &selection, &options);
        let colors = BoroughColors::new(&dataset.boroughs);
        Self {
            dataset,
            selection,
            options,
            dashboard,
            colors,
            status_message: None,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Recompute the dashboard after a control change.
    pub fn refilter(&mut self) {
        self.dashboard = build_dashboard(&self.dataset, &self.selection, &self.options);
        log::debug!(
            "refiltered: {}/{} listings visible",
            self.dashboard.visible,
            self.dashboard.total
        );
    }

    pub fn toggle_borough(&mut self, borough: &str) {
        self.selection.toggle_borough(borough);
        self.refilter();
    }

    pub fn select_all_boroughs(&mut self) {
        self.selection.boroughs = self.dataset.boroughs.clone();
        self.refilter();
    }

    pub fn select_no_boroughs(&mut self) {
        self.selection.boroughs.clear();
        self.refilter();
    }

    pub fn toggle_room_type(&mut self, room_type: RoomType) {
        self.selection.toggle_room_type(room_type);
        self.refilter();
    }

    pub fn set_price_range(&mut self, min: f64, max: f64) {
        self.selection.min_price = min;
        self.selection.max_price = max;
        self.refilter();
    }

    /// Picked dates are clamped to the dataset's review span.
    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        let (start, end) = match self.dataset.review_bounds {
            Some((first, last)) => (start.clamp(first, last), end.clamp(first, last)),
            None => (start, end),
        };
        self.selection.start_date = start;
        self.selection.end_date = end;
        self.refilter();
    }

    pub fn set_top_n_scope(&mut self, scope: TopNScope) {
        self.options.top_n_scope = scope;
        self.refilter();
    }

    /// Restore the initial selection.
    pub fn reset(&mut self) {
        self.selection = FilterSelection::all(&self.dataset);
        self.refilter();
    }
}
