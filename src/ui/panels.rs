use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::charts::top_n::TopNScope;
use crate::data::model::RoomType;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel. Each changed control calls back into
/// [`AppState`], which refilters synchronously.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.label("Filter the graphs using the selections below:");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            borough_filter(ui, state);
            ui.separator();
            date_filter(ui, state);
            ui.separator();
            room_type_filter(ui, state);
            ui.separator();
            price_filter(ui, state);
            ui.separator();

            if ui.button("Reset filters").clicked() {
                state.reset();
            }
        });
}

fn borough_filter(ui: &mut Ui, state: &mut AppState) {
    let boroughs = state.dataset().boroughs.clone();
    let header = format!(
        "Borough  ({}/{})",
        state.selection.boroughs.len(),
        boroughs.len()
    );
    ui.strong(header);

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.select_all_boroughs();
        }
        if ui.small_button("None").clicked() {
            state.select_no_boroughs();
        }
    });

    for borough in &boroughs {
        let mut checked = state.selection.boroughs.contains(borough);
        let text = RichText::new(borough).color(state.colors.color_for(borough));
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_borough(borough);
        }
    }
}

fn date_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Last Review Date");

    if state.dataset().review_bounds.is_none() {
        ui.label("No listing has a review date.");
        return;
    }

    let mut start = state.selection.start_date;
    let mut end = state.selection.end_date;

    ui.horizontal(|ui: &mut Ui| {
        ui.label("From");
        ui.add(DatePickerButton::new(&mut start).id_salt("review_start"));
    });
    ui.horizontal(|ui: &mut Ui| {
        ui.label("To");
        ui.add(DatePickerButton::new(&mut end).id_salt("review_end"));
    });

    if start != state.selection.start_date || end != state.selection.end_date {
        state.set_date_range(start, end);
    }
}

fn room_type_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Room Type");
    for room_type in RoomType::ALL {
        let mut checked = state.selection.room_types.contains(&room_type);
        if ui.checkbox(&mut checked, room_type.label()).changed() {
            state.toggle_room_type(room_type);
        }
    }
}

fn price_filter(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Price");

    let Some((lo, hi)) = state.dataset().price_bounds else {
        ui.label("No prices loaded.");
        return;
    };

    let mut min = state.selection.min_price;
    let mut max = state.selection.max_price;

    ui.add(egui::Slider::new(&mut min, lo..=hi).step_by(1.0).text("min"));
    ui.add(egui::Slider::new(&mut max, lo..=hi).step_by(1.0).text("max"));

    if min != state.selection.min_price || max != state.selection.max_price {
        state.set_price_range(min, max);
    }

    ui.label(&state.dashboard.price_label);
    if min > max {
        ui.label(RichText::new("Min is above max: nothing matches.").color(Color32::YELLOW));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export charts…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} listings loaded, {} visible",
            state.dashboard.total, state.dashboard.visible
        ));

        ui.separator();

        ui.label("Top neighbourhoods:");
        let scope = state.options.top_n_scope;
        if ui
            .selectable_label(scope == TopNScope::Dataset, "All listings")
            .clicked()
        {
            state.set_top_n_scope(TopNScope::Dataset);
        }
        if ui
            .selectable_label(scope == TopNScope::Filtered, "Filtered")
            .clicked()
        {
            state.set_top_n_scope(TopNScope::Filtered);
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Export dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export chart specs")
        .set_file_name("dashboard.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match state.dashboard.export_to_file(&path) {
            Ok(()) => {
                log::info!("Exported dashboard to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export dashboard: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
