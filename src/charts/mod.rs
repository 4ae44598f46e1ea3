//! Chart builders: pure transformations from a filtered view to renderable
//! chart specs. Nothing here mutates the dataset or the view.

pub mod histogram;
pub mod map;
pub mod top_n;

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::filter::{FilterSelection, FilteredView, filter};
use crate::data::model::Dataset;
use histogram::{HistogramSpec, build_histogram};
use map::{MapSpec, build_map};
use top_n::{BarChartSpec, DEFAULT_TOP_N, TopNScope, build_top_n};

/// Presentation options that do not come from the filter controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub top_n: usize,
    pub top_n_scope: TopNScope,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            top_n_scope: TopNScope::Dataset,
        }
    }
}

/// Everything the dashboard shows for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub visible: usize,
    pub total: usize,
    pub price_label: String,
    pub histogram: HistogramSpec,
    pub map: MapSpec,
    pub top_n: BarChartSpec,
}

/// Status text under the price slider.
pub fn price_label(min: f64, max: f64) -> String {
    format!("Min Price: ${min}, Max Price: {max}")
}

/// Build the top-N chart for the configured scope.
pub fn build_top_n_for(
    dataset: &Dataset,
    view: &FilteredView<'_>,
    options: &ChartOptions,
) -> BarChartSpec {
    match options.top_n_scope {
        TopNScope::Dataset => build_top_n(&dataset.listings, options.top_n, TopNScope::Dataset),
        TopNScope::Filtered => build_top_n(view.iter(), options.top_n, TopNScope::Filtered),
    }
}

/// Run the filter pipeline and every chart builder for one selection.
pub fn build_dashboard(
    dataset: &Dataset,
    selection: &FilterSelection,
    options: &ChartOptions,
) -> Dashboard {
    let view = filter(dataset, selection);
    log::debug!("{} of {} listings pass the filters", view.len(), dataset.len());

    Dashboard {
        visible: view.len(),
        total: dataset.len(),
        price_label: price_label(selection.min_price, selection.max_price),
        histogram: build_histogram(&view),
        map: build_map(&view),
        top_n: build_top_n_for(dataset, &view, options),
    }
}

impl Dashboard {
    /// Write `dashboard.json` plus one file per chart into `dir`.
    pub fn export_to_dir(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating export directory {}", dir.display()))?;

        write_json(&dir.join("histogram.json"), &self.histogram)?;
        write_json(&dir.join("map.json"), &self.map)?;
        write_json(&dir.join("top_n.json"), &self.top_n)?;
        write_json(&dir.join("dashboard.json"), self)?;

        log::info!("Exported chart specs to {}", dir.display());
        Ok(())
    }

    /// Write the whole dashboard as a single JSON document.
    pub fn export_to_file(&self, path: &Path) -> Result<()> {
        write_json(path, self)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("serializing chart spec")?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RoomType;
    use crate::data::model::tests::listing;

    fn dataset() -> Dataset {
        Dataset::from_listings(vec![
            listing(1, "Manhattan", "Harlem", RoomType::PrivateRoom, 50.0, Some("2019-05-01")),
            listing(2, "Brooklyn", "Bushwick", RoomType::EntireHome, 200.0, Some("2019-06-01")),
            listing(3, "Manhattan", "Harlem", RoomType::SharedRoom, 30.0, Some("2018-01-01")),
        ])
    }

    #[test]
    fn price_label_format() {
        assert_eq!(price_label(0.0, 10000.0), "Min Price: $0, Max Price: 10000");
        assert_eq!(price_label(12.5, 99.0), "Min Price: $12.5, Max Price: 99");
    }

    #[test]
    fn dataset_scope_ignores_filters() {
        let ds = dataset();
        let mut selection = FilterSelection::all(&ds);
        selection.boroughs = ["Brooklyn".to_string()].into();

        let board = build_dashboard(&ds, &selection, &ChartOptions::default());
        assert_eq!(board.visible, 1);
        assert_eq!(board.total, 3);
        assert_eq!(board.top_n.bars[0].category, "Harlem");
        assert_eq!(board.top_n.bars[0].count, 2);
    }

    #[test]
    fn filtered_scope_follows_filters() {
        let ds = dataset();
        let mut selection = FilterSelection::all(&ds);
        selection.boroughs = ["Brooklyn".to_string()].into();
        let options = ChartOptions {
            top_n_scope: TopNScope::Filtered,
            ..ChartOptions::default()
        };

        let board = build_dashboard(&ds, &selection, &options);
        assert_eq!(board.top_n.bars.len(), 1);
        assert_eq!(board.top_n.bars[0].category, "Bushwick");
        assert_eq!(board.top_n.scope, TopNScope::Filtered);
    }

    #[test]
    fn empty_selection_still_builds_every_chart() {
        let ds = dataset();
        let mut selection = FilterSelection::all(&ds);
        selection.room_types.clear();

        let board = build_dashboard(&ds, &selection, &ChartOptions::default());
        assert_eq!(board.visible, 0);
        assert!(board.histogram.bars.is_empty());
        assert!(board.map.markers.is_empty());
    }

    #[test]
    fn export_writes_json_files() {
        let ds = dataset();
        let board = build_dashboard(&ds, &FilterSelection::all(&ds), &ChartOptions::default());
        let dir = tempfile::tempdir().unwrap();

        board.export_to_dir(dir.path()).unwrap();

        for name in ["histogram.json", "map.json", "top_n.json", "dashboard.json"] {
            assert!(dir.path().join(name).exists(), "{name} missing");
        }
        let text = std::fs::read_to_string(dir.path().join("dashboard.json")).unwrap();
        let back: Dashboard = serde_json::from_str(&text).unwrap();
        assert_eq!(back.visible, 3);
    }
}
