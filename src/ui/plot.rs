use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoints, Points};

use crate::charts::histogram::HistogramSpec;
use crate::charts::map::{MapMarker, MapSpec};
use crate::charts::top_n::BarChartSpec;
use crate::color::BoroughColors;
use crate::state::AppState;

/// Degrees of longitude visible at zoom level 0.
const WORLD_SPAN: f64 = 360.0;
/// Hover distance, in degrees, for showing a marker's label.
const HOVER_RADIUS: f64 = 0.003;

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the three charts of the current dashboard.
pub fn dashboard(ui: &mut Ui, state: &AppState) {
    let board = &state.dashboard;
    let chart_height = (ui.available_height() * 0.4).max(160.0);

    ui.columns(2, |cols: &mut [Ui]| {
        histogram_plot(&mut cols[0], &board.histogram, &state.colors, chart_height);
        top_n_plot(&mut cols[1], &board.top_n, chart_height);
    });

    ui.separator();
    map_plot(ui, &board.map, &state.colors);
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

fn histogram_plot(ui: &mut Ui, spec: &HistogramSpec, colors: &BoroughColors, height: f32) {
    ui.strong(format!("{} ({} listings)", spec.title, spec.total()));
    if spec.bars.is_empty() {
        ui.label("No listings match the filters.");
    }

    let names: Vec<String> = spec.bars.iter().map(|b| b.category.clone()).collect();
    let bars: Vec<Bar> = spec
        .bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new(i as f64, b.count as f64)
                .name(&b.category)
                .fill(colors.color_for(&b.category))
                .width(0.7)
        })
        .collect();

    Plot::new("borough_histogram")
        .height(height)
        .x_axis_label(spec.x_label.as_str())
        .y_axis_label(spec.y_label.as_str())
        .x_axis_formatter(move |mark: GridMark, _range| category_at(&names, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

// ---------------------------------------------------------------------------
// Top-N neighbourhoods
// ---------------------------------------------------------------------------

fn top_n_plot(ui: &mut Ui, spec: &BarChartSpec, height: f32) {
    ui.strong(&spec.title);

    let n = spec.bars.len();
    // Reversed axis: rank 1 sits at the top of the category axis.
    let position = move |rank: usize| {
        if spec.reversed_category_axis {
            (n - 1 - rank) as f64
        } else {
            rank as f64
        }
    };

    let mut names = vec![String::new(); n];
    let bars: Vec<Bar> = spec
        .bars
        .iter()
        .enumerate()
        .map(|(rank, b)| {
            let pos = position(rank);
            names[pos as usize] = b.category.clone();
            Bar::new(pos, b.count as f64)
                .name(&b.category)
                .fill(Color32::LIGHT_BLUE)
                .width(0.7)
        })
        .collect();

    let mut chart = BarChart::new(bars);
    if spec.horizontal {
        chart = chart.horizontal();
    }

    let plot = Plot::new("top_neighbourhoods")
        .height(height)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false);
    let plot = if spec.horizontal {
        plot.y_axis_formatter(move |mark: GridMark, _range| category_at(&names, mark.value))
    } else {
        plot.x_axis_formatter(move |mark: GridMark, _range| category_at(&names, mark.value))
    };

    plot.show(ui, |plot_ui| {
        plot_ui.bar_chart(chart);
    });
}

// ---------------------------------------------------------------------------
// Map
// ---------------------------------------------------------------------------

fn map_plot(ui: &mut Ui, spec: &MapSpec, colors: &BoroughColors) {
    ui.strong(format!("Listings map ({} markers)", spec.markers.len()));

    // One series per borough so the legend doubles as a colour key.
    let mut by_borough: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
    for marker in &spec.markers {
        by_borough
            .entry(marker.borough.as_str())
            .or_default()
            .push([marker.position.longitude, marker.position.latitude]);
    }

    let half_span = WORLD_SPAN / 2f64.powf(spec.zoom) / 2.0;
    let center = spec.center;

    let response = Plot::new("listings_map")
        .legend(Legend::default())
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .data_aspect(1.3)
        .include_x(center.longitude - half_span)
        .include_x(center.longitude + half_span)
        .include_y(center.latitude - half_span)
        .include_y(center.latitude + half_span)
        .height((ui.available_height() - 24.0).max(200.0))
        .show(ui, |plot_ui| {
            for (borough, positions) in by_borough {
                let points: PlotPoints = positions.into();
                plot_ui.points(
                    Points::new(points)
                        .name(borough)
                        .color(colors.color_for(borough))
                        .radius(1.5),
                );
            }
            plot_ui.pointer_coordinate()
        });

    let hovered = response
        .inner
        .and_then(|p| nearest_marker(&spec.markers, p.x, p.y));
    match hovered {
        Some(marker) => ui.label(format!("{}  ({})", marker.label, marker.borough)),
        None => ui.label(""),
    };
}

fn nearest_marker(markers: &[MapMarker], lon: f64, lat: f64) -> Option<&MapMarker> {
    markers
        .iter()
        .map(|m| {
            let dx = m.position.longitude - lon;
            let dy = m.position.latitude - lat;
            (dx * dx + dy * dy, m)
        })
        .filter(|(d2, _)| *d2 <= HOVER_RADIUS * HOVER_RADIUS)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, m)| m)
}

/// Axis tick label for a categorical axis; blank between categories.
fn category_at(names: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    names.get(idx as usize).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::map::GeoPoint;

    #[test]
    fn category_labels_only_on_integers() {
        let names = vec!["Bronx".to_string(), "Queens".to_string()];
        assert_eq!(category_at(&names, 1.0), "Queens");
        assert_eq!(category_at(&names, 0.5), "");
        assert_eq!(category_at(&names, -1.0), "");
        assert_eq!(category_at(&names, 7.0), "");
    }

    #[test]
    fn hover_picks_closest_marker_in_range() {
        let marker = |label: &str, lat: f64, lon: f64| MapMarker {
            position: GeoPoint {
                latitude: lat,
                longitude: lon,
            },
            label: label.to_string(),
            borough: "Manhattan".to_string(),
        };
        let markers = vec![marker("a", 40.70, -74.00), marker("b", 40.701, -74.0)];

        let hit = nearest_marker(&markers, -74.0, 40.7009);
        assert_eq!(hit.map(|m| m.label.as_str()), Some("b"));
        assert!(nearest_marker(&markers, -73.5, 40.7).is_none());
    }
}
