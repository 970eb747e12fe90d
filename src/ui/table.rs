use std::sync::Arc;

use eframe::egui::{self, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::filter::DerivedView;
use crate::data::model::{Column, Penguin};
use crate::state::{AppState, GridSort, SortOrder};

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 22.0;
const MAX_TABLE_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Tabular renderings of the derived view
// ---------------------------------------------------------------------------

/// Plain table of the visible penguins, in dataset order.
pub fn data_table(ui: &mut Ui, view: &DerivedView) {
    ui.strong("Penguins Table");
    if view.is_empty() {
        ui.label("No penguins match the current selection.");
        return;
    }

    builder(ui, "penguins_table")
        .header(HEADER_HEIGHT, |mut header| {
            for col in Column::ALL {
                header.col(|ui: &mut Ui| {
                    ui.strong(col.name());
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, view.len(), |mut row| {
                let Some(penguin) = view.get(row.index()) else {
                    return;
                };
                cells(&mut row, penguin);
            });
        });
}

/// Grid of the visible penguins. Clicking a header sorts by that column.
pub fn data_grid(ui: &mut Ui, state: &mut AppState, view: &Arc<DerivedView>) {
    ui.strong("Penguins Data Grid");
    if view.is_empty() {
        ui.label("No penguins match the current selection.");
        return;
    }

    let rows = state.grid_rows(view);
    let sort = state.grid_sort;
    let mut clicked = None;

    builder(ui, "penguins_grid")
        .header(HEADER_HEIGHT, |mut header| {
            for col in Column::ALL {
                header.col(|ui: &mut Ui| {
                    if ui.button(header_label(col, sort)).clicked() {
                        clicked = Some(col);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let Some(penguin) = rows.get(row.index()).and_then(|&r| view.get(r)) else {
                    return;
                };
                cells(&mut row, penguin);
            });
        });

    if let Some(col) = clicked {
        state.toggle_grid_sort(col);
    }
}

fn builder<'a>(ui: &'a mut Ui, id: &str) -> TableBuilder<'a> {
    TableBuilder::new(ui)
        .id_salt(id)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(TableColumn::auto().at_least(48.0), Column::ALL.len())
        .min_scrolled_height(0.0)
        .max_scroll_height(MAX_TABLE_HEIGHT)
}

fn cells(row: &mut egui_extras::TableRow<'_, '_>, penguin: &Penguin) {
    for col in Column::ALL {
        row.col(|ui: &mut Ui| {
            ui.label(col.cell(penguin));
        });
    }
}

/// Header text with an arrow on the sorted column.
fn header_label(col: Column, sort: Option<GridSort>) -> String {
    match sort {
        Some(GridSort { column, order }) if column == col => {
            let arrow = match order {
                SortOrder::Ascending => "⏶",
                SortOrder::Descending => "⏷",
            };
            format!("{} {arrow}", col.name())
        }
        _ => col.name().to_string(),
    }
}
