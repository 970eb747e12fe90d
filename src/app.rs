use std::sync::Arc;

use eframe::egui;

use crate::state::AppState;
use crate::ui::{map, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PenguinDashApp {
    pub state: AppState,
}

impl PenguinDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PenguinDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // One snapshot per frame: every renderer below reads this view.
        let view = self.state.view();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &view);
        });

        // ---- Left side panel: inputs ----
        egui::SidePanel::left("sidebar")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: tables, charts, map ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.columns(2, |columns| {
                        table::data_table(&mut columns[0], &view);
                        table::data_grid(&mut columns[1], &mut self.state, &view);
                    });
                    ui.separator();

                    if view.is_empty() {
                        ui.allocate_ui(egui::vec2(ui.available_width(), 120.0), plot::empty_notice);
                    } else {
                        ui.columns(3, |columns| {
                            plot::attribute_histogram(&mut columns[0], &self.state, &view);
                            plot::species_histogram(&mut columns[1], &self.state, &view);
                            plot::mass_scatter(&mut columns[2], &self.state, &view);
                        });
                    }
                    ui.separator();

                    map::island_map(ui, &mut self.state);
                });
        });

        // Inputs changed this frame: draw the new snapshot right away.
        if !Arc::ptr_eq(&view, &self.state.view()) {
            ctx.request_repaint();
        }
    }
}
