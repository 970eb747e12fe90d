use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, Points};

use crate::color::ColorMap;
use crate::data::filter::DerivedView;
use crate::data::histogram::{stacked_histogram, StackedHistogram};
use crate::data::model::{Category, Measurement, Sex, Species};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Bar histogram: selected attribute, stacked by island
// ---------------------------------------------------------------------------

pub fn attribute_histogram(ui: &mut Ui, state: &AppState, view: &DerivedView) {
    let m = state.measurement;
    ui.strong(format!("{} by Island", m.column_name()));

    let hist = stacked_histogram(
        view.iter().filter_map(|p| Some((p.island, m.value(p)?))),
        state.bar_bins,
    );

    Plot::new("attribute_histogram")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label(m.label())
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            if let Some(hist) = &hist {
                for chart in stacked_bar_charts(hist, &state.island_colors) {
                    plot_ui.bar_chart(chart);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Stacked histogram: selected attribute, stacked by species
// ---------------------------------------------------------------------------

pub fn species_histogram(ui: &mut Ui, state: &AppState, view: &DerivedView) {
    let m = state.measurement;
    ui.strong(format!("{} by Species", m.column_name()));

    let hist = stacked_histogram(
        view.iter().filter_map(|p| Some((p.species, m.value(p)?))),
        state.stacked_bins,
    );

    Plot::new("species_histogram")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label(m.label())
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            if let Some(hist) = &hist {
                for chart in stacked_bar_charts(hist, &state.species_colors) {
                    plot_ui.bar_chart(chart);
                }
            }
        });
}

/// One bar chart per layer, each stacked on all layers before it.
fn stacked_bar_charts<K: Category>(hist: &StackedHistogram<K>, colors: &ColorMap<K>) -> Vec<BarChart> {
    let mut charts: Vec<BarChart> = Vec::with_capacity(hist.layers.len());
    for (key, counts) in &hist.layers {
        let bars = counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                Bar::new(hist.bins.center(i), count as f64)
                    .width(hist.bins.width * 0.95)
                    .name(key.as_str())
            })
            .collect();
        let chart = {
            let below: Vec<&BarChart> = charts.iter().collect();
            BarChart::new(bars)
                .name(key.as_str())
                .color(colors.color_for(*key))
                .stack_on(&below)
        };
        charts.push(chart);
    }
    charts
}

// ---------------------------------------------------------------------------
// Faceted scatter: body mass against year, one panel per sex
// ---------------------------------------------------------------------------

/// Points of one facet, grouped by species.
pub type Facet = BTreeMap<Species, Vec<[f64; 2]>>;

/// Split the view into sex facets of `(x, y)` points.
///
/// Female and Male are always present; a facet for unknown sex is added
/// only when such penguins have a plottable point. Penguins missing either
/// coordinate are skipped.
pub fn scatter_facets(
    view: &DerivedView,
    x: impl Fn(&crate::data::model::Penguin) -> Option<f64>,
    y: impl Fn(&crate::data::model::Penguin) -> Option<f64>,
) -> Vec<(Option<Sex>, Facet)> {
    let mut facets: BTreeMap<Option<Sex>, Facet> = Sex::ALL
        .iter()
        .map(|&s| (Some(s), Facet::new()))
        .collect();

    for p in view.iter() {
        let (Some(px), Some(py)) = (x(p), y(p)) else {
            continue;
        };
        facets
            .entry(p.sex)
            .or_default()
            .entry(p.species)
            .or_default()
            .push([px, py]);
    }

    // `None` sorts first in a BTreeMap; show it last.
    let mut out: Vec<(Option<Sex>, Facet)> = facets.into_iter().collect();
    let lead = usize::from(out.first().is_some_and(|(s, _)| s.is_none()));
    out.rotate_left(lead);
    out
}

pub fn mass_scatter(ui: &mut Ui, state: &AppState, view: &DerivedView) {
    ui.strong("Scatterplot: Species");

    let facets = scatter_facets(
        view,
        |p| Measurement::BodyMass.value(p),
        |p| Some(p.year as f64),
    );

    ui.columns(facets.len(), |columns: &mut [Ui]| {
        for (ui, (sex, facet)) in columns.iter_mut().zip(&facets) {
            let title = match sex {
                Some(s) => format!("sex = {s}"),
                None => "sex = NA".to_string(),
            };
            ui.label(title.as_str());

            Plot::new(format!("mass_scatter_{title}"))
                .legend(Legend::default())
                .height(CHART_HEIGHT)
                .x_axis_label(Measurement::BodyMass.label())
                .y_axis_label("Year")
                .link_axis("mass_scatter", [true, true])
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    for (species, points) in facet {
                        plot_ui.points(
                            Points::new(points.clone())
                                .name(species.as_str())
                                .color(state.species_colors.color_for(*species))
                                .radius(3.0),
                        );
                    }
                });
        }
    });
}

/// Placeholder shown instead of the charts when nothing is visible.
pub fn empty_notice(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.colored_label(Color32::GRAY, "No penguins match the current selection.");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{compute_view, select_all, Selection};
    use crate::data::model::{Island, Penguin, PenguinDataset};

    fn penguin(species: Species, sex: Option<Sex>, mass: Option<f64>) -> Penguin {
        Penguin {
            species,
            island: Island::Biscoe,
            bill_length_mm: None,
            bill_depth_mm: None,
            flipper_length_mm: None,
            body_mass_g: mass,
            sex,
            year: 2009,
        }
    }

    fn facets(records: Vec<Penguin>) -> Vec<(Option<Sex>, Facet)> {
        let view = compute_view(&PenguinDataset::new(records), &select_all(), &select_all());
        scatter_facets(&view, |p| p.body_mass_g, |p| Some(p.year as f64))
    }

    #[test]
    fn female_and_male_facets_always_exist() {
        let out = facets(Vec::new());
        let sexes: Vec<Option<Sex>> = out.iter().map(|(s, _)| *s).collect();
        assert_eq!(sexes, vec![Some(Sex::Female), Some(Sex::Male)]);
        assert!(out.iter().all(|(_, f)| f.is_empty()));
    }

    #[test]
    fn unknown_sex_facet_comes_last() {
        let out = facets(vec![
            penguin(Species::Gentoo, None, Some(5000.0)),
            penguin(Species::Adelie, Some(Sex::Male), Some(4000.0)),
        ]);
        let sexes: Vec<Option<Sex>> = out.iter().map(|(s, _)| *s).collect();
        assert_eq!(sexes, vec![Some(Sex::Female), Some(Sex::Male), None]);
        assert_eq!(out[2].1[&Species::Gentoo], vec![[5000.0, 2009.0]]);
        assert_eq!(out[1].1[&Species::Adelie], vec![[4000.0, 2009.0]]);
    }

    #[test]
    fn points_missing_a_coordinate_are_skipped() {
        let out = facets(vec![penguin(Species::Adelie, None, None)]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn empty_selection_gives_empty_facets() {
        let ds = PenguinDataset::new(vec![penguin(Species::Adelie, Some(Sex::Female), Some(3000.0))]);
        let view = compute_view(&ds, &Selection::new(), &select_all());
        let out = scatter_facets(&view, |p| p.body_mass_g, |p| Some(p.year as f64));
        assert!(out.iter().all(|(_, f)| f.is_empty()));
    }
}
