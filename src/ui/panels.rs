use eframe::egui::{self, Color32, DragValue, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::{AppState, Outcome};
use crate::ui::report;

// ---------------------------------------------------------------------------
// Left side panel – channel selection and analysis
// ---------------------------------------------------------------------------

/// Render the left analysis panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Channel");
    ui.separator();

    if !state.session.is_open() {
        ui.label("No file loaded.");
    } else if state.channels.is_empty() {
        ui.label("The file has no channels.");
    } else {
        channel_selector(ui, state);
    }

    ui.add_space(8.0);
    ui.heading("Analysis window");
    ui.separator();
    analysis_controls(ui, state);

    if state.session.is_open() {
        ui.add_space(8.0);
        ui.heading("Catalog");
        ui.separator();
        catalog_table(ui, state);
    }
}

/// Combo box over display names; the first match wins.
fn channel_selector(ui: &mut Ui, state: &mut AppState) {
    let selected_text = state
        .selected
        .as_deref()
        .and_then(|id| state.channels.iter().find(|c| c.id == id))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "Select a channel".to_string());

    let mut picked: Option<String> = None;
    egui::ComboBox::from_id_salt("channel_select")
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for ch in &state.channels {
                let is_current = state.selected.as_deref() == Some(ch.id.as_str());
                if ui.selectable_label(is_current, &ch.name).clicked() {
                    picked = Some(ch.name.clone());
                }
            }
        });
    if let Some(name) = picked {
        state.select_by_name(&name);
    }
}

/// Window bounds and the two analysis buttons. Always shown: without a file
/// the buttons report that one is needed.
fn analysis_controls(ui: &mut Ui, state: &mut AppState) {
    egui::Grid::new("window_bounds").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("Start");
        ui.add(DragValue::new(&mut state.window_start).speed(0.01));
        ui.end_row();
        ui.label("End");
        ui.add(DragValue::new(&mut state.window_end).speed(0.01));
        ui.end_row();
    });

    ui.add_space(4.0);
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("O/F ratio").clicked() {
            state.compute_of_ratio();
        }
        if ui.button("Average thrust").clicked() {
            state.compute_thrust();
        }
    });

    if let Some(outcome) = &state.outcome {
        let roles = state.session.roles();
        let text = match outcome {
            Outcome::OfRatio(r) => report::of_ratio_text(roles, r),
            Outcome::Thrust(s) => report::thrust_text(roles, s),
        };
        ui.add_space(4.0);
        ui.label(RichText::new(text).monospace());
    }
}

/// id / name / units / sample count for every channel, in file order.
fn catalog_table(ui: &mut Ui, state: &AppState) {
    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::auto())
            .column(Column::remainder())
            .header(20.0, |mut header| {
                for title in ["Id", "Name", "Units", "Samples"] {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for ch in &state.channels {
                    body.row(18.0, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.colored_label(state.palette.color_for(&ch.id), &ch.id);
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(&ch.name);
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(&ch.units);
                        });
                        row.col(|ui: &mut Ui| {
                            ui.label(ch.len.to_string());
                        });
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Close").clicked() {
                state.close();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Ok(catalog) = state.session.catalog() {
            ui.label(format!(
                "{}  ·  {} channels",
                catalog.path().display(),
                catalog.len()
            ));
        }

        ui.separator();

        if let Some(status) = &state.status {
            let color = if status.is_error {
                Color32::from_rgb(0xd3, 0x2f, 0x2f)
            } else {
                ui.visuals().text_color()
            };
            ui.label(RichText::new(&status.text).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Select HDF5 File")
        .add_filter("HDF5 files", &["h5", "hdf5"])
        .add_filter("Other channel files", &["json", "csv", "parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
