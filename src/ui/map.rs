use eframe::egui::{Color32, Ui};
use egui_plot::{MarkerShape, Plot, PlotBounds, PlotPoint, Points, Text};

use crate::data::model::Island;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Island map
// ---------------------------------------------------------------------------
//
// Longitude on x, latitude on y. Centred from the fixed island lookup table;
// the filtered view plays no part here.

/// Viewport `(min, max)` as `[lon, lat]` corners around `center`.
pub fn map_bounds(center: Island, span_degrees: f64) -> ([f64; 2], [f64; 2]) {
    let (lat, lon) = center.coordinates();
    let span = span_degrees.abs().max(0.01);
    ([lon - span, lat - span / 2.0], [lon + span, lat + span / 2.0])
}

pub fn island_map(ui: &mut Ui, state: &mut AppState) {
    ui.strong(format!("Map: {}", state.map_center()));

    let center = state.map_center();
    let recenter = state.take_map_recenter();
    let (min, max) = map_bounds(center, state.map_span_degrees);

    Plot::new("island_map")
        .height(320.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .show(ui, |plot_ui| {
            if recenter {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(min, max));
            }
            for &island in Island::ALL {
                let (lat, lon) = island.coordinates();
                let selected = island == center;
                plot_ui.points(
                    Points::new(vec![[lon, lat]])
                        .name(island.as_str())
                        .shape(if selected {
                            MarkerShape::Diamond
                        } else {
                            MarkerShape::Circle
                        })
                        .radius(if selected { 8.0 } else { 5.0 })
                        .color(state.island_colors.color_for(island))
                        .filled(true),
                );
                plot_ui.text(
                    Text::new(PlotPoint::new(lon, lat + 0.08), island.as_str())
                        .color(Color32::GRAY),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_centred_on_the_island() {
        let (min, max) = map_bounds(Island::Dream, 2.0);
        let (lat, lon) = Island::Dream.coordinates();
        assert!(((min[0] + max[0]) / 2.0 - lon).abs() < 1e-9);
        assert!(((min[1] + max[1]) / 2.0 - lat).abs() < 1e-9);
        assert!((max[0] - min[0] - 4.0).abs() < 1e-9);
    }

    #[test]
    fn non_positive_span_still_gives_a_viewport() {
        let (min, max) = map_bounds(Island::Biscoe, 0.0);
        assert!(max[0] > min[0]);
        assert!(max[1] > min[1]);
    }

    #[test]
    fn lookup_table_matches_the_field_sites() {
        assert_eq!(Island::Biscoe.coordinates(), (-65.7474, -65.9164));
        assert_eq!(Island::Dream.coordinates(), (-64.7333, -64.2333));
        assert_eq!(Island::Torgersen.coordinates(), (-64.7667, -64.0833));
    }
}
