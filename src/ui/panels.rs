use anyhow::Context;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::{export_view, ExportFormat};
use crate::data::filter::{DerivedView, Selection};
use crate::data::loader::load_file;
use crate::data::model::{Category, Island, Measurement};
use crate::state::{AppState, MAX_STACKED_BINS};

// ---------------------------------------------------------------------------
// Left side panel – inputs
// ---------------------------------------------------------------------------

/// One edit requested through a checkbox group.
enum GroupEdit<T> {
    Set(T, bool),
    All,
    None,
}

/// Render the left input panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Sidebar");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Attribute selector ----
            ui.strong("Select Penguin Attribute");
            egui::ComboBox::from_id_salt("selected_attribute")
                .selected_text(state.measurement.column_name())
                .show_ui(ui, |ui: &mut Ui| {
                    for m in Measurement::ALL {
                        ui.selectable_value(&mut state.measurement, m, m.column_name());
                    }
                });
            ui.add_space(6.0);

            // ---- Bin counts ----
            ui.strong("Number of Bins");
            let mut bar_bins = state.bar_bins;
            if ui
                .add(egui::DragValue::new(&mut bar_bins).range(1..=500))
                .changed()
            {
                state.set_bar_bins(bar_bins);
            }
            ui.add_space(6.0);

            ui.strong("Stacked Bin Count");
            let mut stacked_bins = state.stacked_bins;
            if ui
                .add(egui::Slider::new(&mut stacked_bins, 1..=MAX_STACKED_BINS))
                .changed()
            {
                state.set_stacked_bins(stacked_bins);
            }
            ui.separator();

            // ---- Categorical filters ----
            let species_edit = checkbox_group(ui, "Species", state.species(), |s| {
                state.species_colors.color_for(s)
            });
            match species_edit {
                Some(GroupEdit::Set(s, checked)) => state.set_species(s, checked),
                Some(GroupEdit::All) => state.select_all_species(),
                Some(GroupEdit::None) => state.select_no_species(),
                None => {}
            }

            let island_edit = checkbox_group(ui, "Islands", state.islands(), |i| {
                state.island_colors.color_for(i)
            });
            match island_edit {
                Some(GroupEdit::Set(i, checked)) => state.set_island(i, checked),
                Some(GroupEdit::All) => state.select_all_islands(),
                Some(GroupEdit::None) => state.select_no_islands(),
                None => {}
            }
            ui.separator();

            // ---- Map centre ----
            ui.strong("Map Center");
            let mut center = state.map_center();
            egui::ComboBox::from_id_salt("map_center")
                .selected_text(center.as_str())
                .show_ui(ui, |ui: &mut Ui| {
                    for &island in Island::ALL {
                        ui.selectable_value(&mut center, island, island.as_str());
                    }
                });
            state.set_map_center(center);

            if let Some(link) = &state.repo_link {
                ui.separator();
                ui.hyperlink_to("Project repository", link);
            }
        });
}

/// A titled group of checkboxes, one per category value, with All/None
/// shortcuts. Returns the edit the user made this frame, if any.
fn checkbox_group<T: Category>(
    ui: &mut Ui,
    title: &str,
    selected: &Selection<T>,
    color: impl Fn(T) -> Color32,
) -> Option<GroupEdit<T>> {
    let mut edit = None;

    // Show count of selected / total in the header
    let header_text = format!("{title}  ({}/{})", selected.len(), T::ALL.len());
    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    edit = Some(GroupEdit::All);
                }
                if ui.small_button("None").clicked() {
                    edit = Some(GroupEdit::None);
                }
            });

            ui.horizontal_wrapped(|ui: &mut Ui| {
                for &value in T::ALL {
                    let mut checked = selected.contains(&value);
                    let text = RichText::new(value.as_str()).color(color(value));
                    if ui.checkbox(&mut checked, text).changed() {
                        edit = Some(GroupEdit::Set(value, checked));
                    }
                }
            });
        });

    edit
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState, view: &DerivedView) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            ui.menu_button("Export view", |ui: &mut Ui| {
                for format in ExportFormat::ALL {
                    let label = format.extension().to_uppercase();
                    if ui.button(label).clicked() {
                        save_file_dialog(state, view, format);
                        ui.close_menu();
                    }
                }
            });
        });

        ui.separator();

        ui.label(format!(
            "{} penguins loaded, {} visible",
            state.dataset().len(),
            view.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open penguin data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match load_file(&path).with_context(|| format!("loading {}", path.display())) {
            Ok(dataset) => {
                log::info!("Loaded {} penguins from {}", dataset.len(), path.display());
                state.replace_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

pub fn save_file_dialog(state: &mut AppState, view: &DerivedView, format: ExportFormat) {
    let ext = format.extension();
    let file = rfd::FileDialog::new()
        .set_title("Export visible penguins")
        .set_file_name(format!("penguins.{ext}"))
        .add_filter(ext.to_uppercase(), &[ext])
        .save_file();

    if let Some(path) = file {
        match export_view(view, &path).with_context(|| format!("exporting to {}", path.display())) {
            Ok(()) => {
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export view: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Species;

    #[test]
    fn checkbox_group_reports_no_edit_without_clicks() {
        let ctx = egui::Context::default();
        let mut edit = None;
        let selected: Selection<Species> = [Species::Gentoo].into_iter().collect();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                edit = checkbox_group(ui, "Species", &selected, |_| Color32::WHITE);
            });
        });
        // No pointer input, so nothing was clicked.
        assert!(edit.is_none());
    }

    #[test]
    fn side_panel_renders_without_input() {
        let ctx = egui::Context::default();
        let mut state = AppState::new(
            crate::data::sample::bundled_dataset(),
            &crate::config::DashboardConfig::default(),
        );
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::SidePanel::left("filters").show(ctx, |ui| side_panel(ui, &mut state));
        });
        assert_eq!(state.species().len(), 3);
        assert_eq!(state.map_center(), Island::Biscoe);
        assert_eq!(state.measurement, Measurement::BillLength);
    }
}
