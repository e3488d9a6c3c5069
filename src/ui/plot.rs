use eframe::egui::{Color32, Ui};
use egui_plot::{Legend, Plot, PlotPoints, Points, VLine};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Channel plot (central panel)
// ---------------------------------------------------------------------------

/// Render the selected channel as a point series with the analysis window
/// bounds marked.
pub fn channel_plot(ui: &mut Ui, state: &AppState) {
    if !state.session.is_open() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view channels  (File → Open…)");
        });
        return;
    }

    let Some(id) = state.selected.as_deref() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Select a channel");
        });
        return;
    };

    // Errors were already reported when the channel was selected.
    let Ok(view) = state.session.get_series(id) else {
        return;
    };

    ui.vertical_centered(|ui: &mut Ui| {
        ui.strong(view.name);
    });

    let points: PlotPoints = view
        .time
        .iter()
        .zip(view.data)
        .map(|(&t, &v)| [t, v])
        .collect();

    let window_color = Color32::from_gray(140);

    Plot::new("channel_plot")
        .legend(Legend::default())
        .x_axis_label("Time")
        .y_axis_label(view.units)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .name(format!("{} ({})", view.name, view.units))
                    .color(state.palette.color_for(id))
                    .radius(2.0),
            );
            plot_ui.vline(VLine::new(state.window_start).color(window_color));
            plot_ui.vline(VLine::new(state.window_end).color(window_color));
        });
}
