use std::sync::Arc;

use crate::color::{island_color, ColorMap};
use crate::config::DashboardConfig;
use crate::data::filter::{compute_view, parse_selection, select_all, DerivedView, Selection};
use crate::data::model::{Category, Column, Island, Measurement, PenguinDataset, Species};
use crate::reactive::{Input, Memo};

/// Upper bound of the stacked-histogram bin slider.
pub const MAX_STACKED_BINS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Column and direction the grid view is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSort {
    pub column: Column,
    pub order: SortOrder,
}

/// Versions of the two selections the derived view depends on.
type ViewKey = (u64, u64);

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// One user session: the dataset handle, the selections and the chart
/// inputs. Independent of rendering.
pub struct AppState {
    dataset: PenguinDataset,
    /// Startup settings; a new dataset starts a fresh session from these.
    config: DashboardConfig,

    islands: Input<Selection<Island>>,
    species: Input<Selection<Species>>,

    /// The filtered records, recomputed only when a selection changes.
    view: Memo<ViewKey, DerivedView>,

    /// Row order of the grid view for the current view and sort.
    grid_rows: Memo<(ViewKey, Option<GridSort>), Vec<usize>>,
    pub grid_sort: Option<GridSort>,

    /// Attribute plotted by both histograms.
    pub measurement: Measurement,
    pub bar_bins: usize,
    pub stacked_bins: usize,

    map_center: Island,
    /// Set when the map viewport must jump to `map_center`.
    map_recenter: bool,
    pub map_span_degrees: f64,

    pub island_colors: ColorMap<Island>,
    pub species_colors: ColorMap<Species>,

    pub repo_link: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: PenguinDataset, config: &DashboardConfig) -> Self {
        Self {
            dataset,
            config: config.clone(),
            islands: Input::new(parse_selection(&config.default_islands)),
            species: Input::new(parse_selection(&config.default_species)),
            view: Memo::new(),
            grid_rows: Memo::new(),
            grid_sort: None,
            measurement: config.default_measurement,
            bar_bins: config.bar_bins.max(1),
            stacked_bins: config.stacked_bins.clamp(1, MAX_STACKED_BINS),
            map_center: config.map_center,
            map_recenter: true,
            map_span_degrees: config.map_span_degrees,
            island_colors: ColorMap::from_fn(island_color),
            species_colors: ColorMap::generated(),
            repo_link: config.repo_link.clone(),
            status_message: None,
        }
    }

    pub fn dataset(&self) -> &PenguinDataset {
        &self.dataset
    }

    /// Swap in a newly loaded dataset and start over from the startup
    /// settings, as a restart with that file would.
    pub fn replace_dataset(&mut self, dataset: PenguinDataset) {
        log::info!("Dataset replaced: {} penguins", dataset.len());
        *self = Self::new(dataset, &self.config);
    }

    pub fn islands(&self) -> &Selection<Island> {
        self.islands.get()
    }

    pub fn species(&self) -> &Selection<Species> {
        self.species.get()
    }

    /// Check or uncheck one island.
    pub fn set_island(&mut self, island: Island, checked: bool) {
        set_member(&mut self.islands, island, checked);
    }

    /// Check or uncheck one species.
    pub fn set_species(&mut self, species: Species, checked: bool) {
        set_member(&mut self.species, species, checked);
    }

    pub fn select_all_islands(&mut self) {
        self.islands.set(select_all());
    }

    pub fn select_no_islands(&mut self) {
        self.islands.set(Selection::new());
    }

    pub fn select_all_species(&mut self) {
        self.species.set(select_all());
    }

    pub fn select_no_species(&mut self) {
        self.species.set(Selection::new());
    }

    pub fn set_bar_bins(&mut self, bins: usize) {
        self.bar_bins = bins.max(1);
    }

    pub fn set_stacked_bins(&mut self, bins: usize) {
        self.stacked_bins = bins.clamp(1, MAX_STACKED_BINS);
    }

    pub fn map_center(&self) -> Island {
        self.map_center
    }

    /// Select a new map centre. The map widget moves on its next frame.
    pub fn set_map_center(&mut self, island: Island) {
        if island != self.map_center {
            self.map_center = island;
            self.map_recenter = true;
        }
    }

    /// Whether the map must recentre this frame. Clears the flag.
    pub fn take_map_recenter(&mut self) -> bool {
        std::mem::take(&mut self.map_recenter)
    }

    fn view_key(&self) -> ViewKey {
        (self.islands.version(), self.species.version())
    }

    /// The current derived view.
    ///
    /// Recomputed only if the dataset or a selection changed since the last
    /// call; otherwise every caller gets the same snapshot.
    pub fn view(&mut self) -> Arc<DerivedView> {
        let key = self.view_key();
        let (dataset, islands, species) = (&self.dataset, self.islands.get(), self.species.get());
        self.view.get_or_compute(key, || {
            let view = compute_view(dataset, islands, species);
            log::debug!(
                "Recomputed view: {} of {} penguins (islands {:?}, species {:?})",
                view.len(),
                dataset.len(),
                islands,
                species
            );
            view
        })
    }

    /// Number of times the view has been recomputed in this session.
    pub fn view_recomputes(&self) -> u64 {
        self.view.recomputes()
    }

    /// Click on a grid header: ascending first, then flip direction.
    pub fn toggle_grid_sort(&mut self, column: Column) {
        self.grid_sort = match self.grid_sort {
            Some(GridSort {
                column: current,
                order: SortOrder::Ascending,
            }) if current == column => Some(GridSort {
                column,
                order: SortOrder::Descending,
            }),
            _ => Some(GridSort {
                column,
                order: SortOrder::Ascending,
            }),
        };
    }

    /// Row order for the grid view of `view`. Sorting never touches the
    /// derived view itself.
    ///
    /// Cached against the key `view` was computed for. A snapshot that is
    /// no longer current (an input changed mid-frame) is sorted uncached.
    pub fn grid_rows(&mut self, view: &Arc<DerivedView>) -> Arc<Vec<usize>> {
        let sort = self.grid_sort;
        match self.view.key_of(view).copied() {
            Some(key) => self
                .grid_rows
                .get_or_compute((key, sort), || sorted_rows(view, sort)),
            None => Arc::new(sorted_rows(view, sort)),
        }
    }
}

fn set_member<T: Category>(input: &mut Input<Selection<T>>, value: T, checked: bool) {
    input.update(|selected| {
        if checked {
            selected.insert(value);
        } else {
            selected.remove(&value);
        }
    });
}

/// Positions into `view` ordered by `sort`; view order when unsorted.
/// The sort is stable so ties keep dataset order.
pub fn sorted_rows(view: &DerivedView, sort: Option<GridSort>) -> Vec<usize> {
    let mut rows: Vec<usize> = (0..view.len()).collect();
    if let Some(GridSort { column, order }) = sort {
        rows.sort_by(|&a, &b| {
            let (Some(pa), Some(pb)) = (view.get(a), view.get(b)) else {
                return std::cmp::Ordering::Equal;
            };
            let ord = column.compare(pa, pb);
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample::bundled_dataset;

    fn state() -> AppState {
        AppState::new(bundled_dataset(), &DashboardConfig::default())
    }

    #[test]
    fn starts_with_configured_defaults() {
        let mut s = state();
        assert_eq!(s.islands().iter().copied().collect::<Vec<_>>(), vec![Island::Dream]);
        assert_eq!(s.species().len(), 3);
        let view = s.view();
        assert!(!view.is_empty());
        assert!(view.iter().all(|p| p.island == Island::Dream));
    }

    #[test]
    fn view_is_memoized_between_changes() {
        let mut s = state();
        let first = s.view();
        let second = s.view();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(s.view_recomputes(), 1);

        s.set_island(Island::Biscoe, true);
        let third = s.view();
        assert!(!Arc::ptr_eq(&first, &third));
        assert!(third.len() > first.len());
        assert_eq!(s.view_recomputes(), 2);
    }

    #[test]
    fn no_op_input_does_not_recompute() {
        let mut s = state();
        s.view();
        s.set_island(Island::Dream, true);
        s.select_all_species();
        s.view();
        assert_eq!(s.view_recomputes(), 1);
    }

    #[test]
    fn chart_inputs_do_not_recompute_the_view() {
        let mut s = state();
        s.view();
        s.set_bar_bins(10);
        s.measurement = Measurement::BodyMass;
        s.toggle_grid_sort(Column::Year);
        s.view();
        assert_eq!(s.view_recomputes(), 1);
    }

    #[test]
    fn selecting_none_empties_the_view() {
        let mut s = state();
        s.select_no_species();
        assert!(s.view().is_empty());
        s.select_all_species();
        s.select_no_islands();
        assert!(s.view().is_empty());
    }

    #[test]
    fn replacing_the_dataset_invalidates_the_view() {
        let mut s = state();
        let before = s.view();
        assert!(!before.is_empty());
        s.replace_dataset(PenguinDataset::new(Vec::new()));
        let after = s.view();
        assert!(after.is_empty());
        assert!(!Arc::ptr_eq(&before, &after));
    }

    #[test]
    fn replacing_the_dataset_restores_startup_settings() {
        let mut s = state();
        s.select_all_islands();
        s.set_species(Species::Gentoo, false);
        s.measurement = Measurement::FlipperLength;
        s.set_stacked_bins(12);
        s.set_map_center(Island::Torgersen);
        s.toggle_grid_sort(Column::Year);
        s.status_message = Some("Error: old".to_string());

        s.replace_dataset(bundled_dataset());

        assert_eq!(s.islands().iter().copied().collect::<Vec<_>>(), vec![Island::Dream]);
        assert_eq!(s.species().len(), 3);
        assert_eq!(s.measurement, Measurement::BillLength);
        assert_eq!(s.stacked_bins, 5);
        assert_eq!(s.map_center(), Island::Biscoe);
        assert!(s.take_map_recenter());
        assert_eq!(s.grid_sort, None);
        assert_eq!(s.status_message, None);
    }

    /// Mirrors one `update` call: snapshot, sidebar edit, tables, charts.
    fn frame(s: &mut AppState, edit: impl FnOnce(&mut AppState)) -> (usize, usize) {
        let view = s.view();
        edit(s);
        let rows = s.grid_rows(&view);
        assert!(rows.iter().all(|&r| view.get(r).is_some()));
        (view.len(), rows.len())
    }

    #[test]
    fn grid_follows_the_frame_snapshot_across_edits() {
        let mut s = state();
        s.toggle_grid_sort(Column::Measurement(Measurement::BodyMass));

        let (len, rows) = frame(&mut s, |_| {});
        assert_eq!(len, rows);

        // Checkbox clicked after the snapshot was taken.
        let (len, rows) = frame(&mut s, |s| s.set_island(Island::Biscoe, true));
        assert_eq!(len, rows);

        // Next frame sees the new view and a matching grid.
        let (len, rows) = frame(&mut s, |_| {});
        assert_eq!(len, rows);
        assert_eq!(len, s.view().len());
        assert!(s.view().iter().any(|p| p.island == Island::Biscoe));

        let (len, rows) = frame(&mut s, |s| s.select_no_species());
        assert_eq!(len, rows);
        let (len, rows) = frame(&mut s, |_| {});
        assert_eq!((len, rows), (0, 0));
    }

    #[test]
    fn grid_rows_are_cached_for_the_current_snapshot() {
        let mut s = state();
        let view = s.view();
        let a = s.grid_rows(&view);
        let b = s.grid_rows(&view);
        assert!(Arc::ptr_eq(&a, &b));

        s.set_island(Island::Torgersen, true);
        let stale = s.grid_rows(&view);
        assert_eq!(stale.len(), view.len());
        let fresh = s.view();
        assert_eq!(s.grid_rows(&fresh).len(), fresh.len());
    }

    #[test]
    fn bin_inputs_are_clamped() {
        let mut s = state();
        s.set_bar_bins(0);
        s.set_stacked_bins(500);
        assert_eq!((s.bar_bins, s.stacked_bins), (1, MAX_STACKED_BINS));
    }

    #[test]
    fn map_recentres_once_per_change() {
        let mut s = state();
        assert!(s.take_map_recenter());
        assert!(!s.take_map_recenter());
        s.set_map_center(Island::Biscoe);
        assert!(!s.take_map_recenter());
        s.set_map_center(Island::Torgersen);
        assert!(s.take_map_recenter());
        assert_eq!(s.map_center(), Island::Torgersen);
    }

    #[test]
    fn map_center_is_independent_of_the_filter() {
        let mut s = state();
        s.view();
        s.set_map_center(Island::Dream);
        s.view();
        assert_eq!(s.view_recomputes(), 1);
    }

    #[test]
    fn grid_sort_toggles_direction() {
        let mut s = state();
        s.toggle_grid_sort(Column::Year);
        assert_eq!(s.grid_sort.map(|g| g.order), Some(SortOrder::Ascending));
        s.toggle_grid_sort(Column::Year);
        assert_eq!(s.grid_sort.map(|g| g.order), Some(SortOrder::Descending));
        s.toggle_grid_sort(Column::Species);
        assert_eq!(
            s.grid_sort,
            Some(GridSort {
                column: Column::Species,
                order: SortOrder::Ascending
            })
        );
    }

    #[test]
    fn grid_rows_sort_without_touching_the_view() {
        let mut s = state();
        s.select_all_islands();
        let view = s.view();
        s.grid_sort = Some(GridSort {
            column: Column::Measurement(Measurement::BodyMass),
            order: SortOrder::Descending,
        });
        let rows = s.grid_rows(&view);
        assert_eq!(rows.len(), view.len());

        let masses: Vec<Option<f64>> = rows
            .iter()
            .map(|&r| view.get(r).and_then(|p| p.body_mass_g))
            .collect();
        // Descending flips "missing last" too, so the two unmeasured birds lead.
        assert_eq!(&masses[..2], &[None, None]);
        assert!(masses[2..].windows(2).all(|w| w[0] >= w[1]));

        assert!(Arc::ptr_eq(&view, &s.view()));
    }
}
