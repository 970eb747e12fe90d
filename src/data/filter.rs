use std::collections::BTreeSet;

use super::model::{Category, Island, Penguin, PenguinDataset, Species};

// ---------------------------------------------------------------------------
// Selections: which values of a categorical dimension are checked
// ---------------------------------------------------------------------------

/// Set of selected values for one categorical dimension.
///
/// An empty selection means "nothing selected" and filters out every row.
/// There is no implicit select-all.
pub type Selection<T> = BTreeSet<T>;

/// Every value of the dimension selected.
pub fn select_all<T: Category>() -> Selection<T> {
    T::ALL.iter().copied().collect()
}

/// Build a selection from user supplied names.
///
/// Names that do not parse are dropped with a warning; they would match no
/// record anyway.
pub fn parse_selection<T: Category>(names: &[String]) -> Selection<T> {
    names
        .iter()
        .filter_map(|name| match name.parse::<T>() {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring {}: {e}", T::KIND);
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// DerivedView: the filtered subsequence of the dataset
// ---------------------------------------------------------------------------

/// The records passing the current selections, in dataset order.
///
/// Holds a handle to the dataset plus the indices of the matching rows, so
/// building one never copies records.
#[derive(Debug, Clone)]
pub struct DerivedView {
    dataset: PenguinDataset,
    indices: Vec<usize>,
}

impl DerivedView {
    /// Number of visible penguins.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Positions of the visible records in the parent dataset (ascending).
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// The `row`-th visible record.
    pub fn get(&self, row: usize) -> Option<&Penguin> {
        self.indices.get(row).and_then(|&i| self.dataset.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Penguin> + '_ {
        let records = self.dataset.records();
        self.indices.iter().map(move |&i| &records[i])
    }

    /// Owned copy of the visible records.
    pub fn to_records(&self) -> Vec<Penguin> {
        self.iter().cloned().collect()
    }
}

/// Views compare by the records they contain, not by which dataset they
/// point into.
impl PartialEq for DerivedView {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Return the penguins whose island is in `islands` AND whose species is in
/// `species`, preserving dataset order.
///
/// * Either selection empty → empty view
/// * Both selections complete → the whole dataset
pub fn compute_view(
    dataset: &PenguinDataset,
    islands: &Selection<Island>,
    species: &Selection<Species>,
) -> DerivedView {
    let indices = if islands.is_empty() || species.is_empty() {
        Vec::new()
    } else {
        dataset
            .records()
            .iter()
            .enumerate()
            .filter(|(_, p)| islands.contains(&p.island) && species.contains(&p.species))
            .map(|(i, _)| i)
            .collect()
    };

    DerivedView {
        dataset: dataset.clone(),
        indices,
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::model::Sex;

    fn penguin(island: Island, species: Species) -> Penguin {
        Penguin {
            species,
            island,
            bill_length_mm: Some(40.0),
            bill_depth_mm: Some(18.0),
            flipper_length_mm: Some(190.0),
            body_mass_g: Some(3800.0),
            sex: Some(Sex::Female),
            year: 2008,
        }
    }

    fn set<T: Ord + Copy>(values: &[T]) -> Selection<T> {
        values.iter().copied().collect()
    }

    #[test]
    fn dream_adelie_example() {
        let ds = PenguinDataset::new(vec![
            penguin(Island::Dream, Species::Adelie),
            penguin(Island::Biscoe, Species::Gentoo),
        ]);
        let view = compute_view(
            &ds,
            &set(&[Island::Dream]),
            &set(&[Species::Adelie, Species::Gentoo]),
        );
        assert_eq!(view.to_records(), vec![penguin(Island::Dream, Species::Adelie)]);
        assert_eq!(view.indices(), &[0]);
    }

    #[test]
    fn empty_selection_yields_empty_view() {
        let ds = PenguinDataset::new(vec![penguin(Island::Dream, Species::Adelie)]);
        assert!(compute_view(&ds, &Selection::new(), &select_all()).is_empty());
        assert!(compute_view(&ds, &select_all(), &Selection::new()).is_empty());
    }

    #[test]
    fn no_match_yields_empty_view() {
        let ds = PenguinDataset::new(vec![penguin(Island::Dream, Species::Adelie)]);
        let view = compute_view(&ds, &set(&[Island::Biscoe]), &select_all());
        assert!(view.is_empty());
        assert_eq!(view.get(0), None);
    }

    #[test]
    fn parse_selection_drops_unknown_names() {
        let names = vec!["Dream".to_string(), "Atlantis".to_string(), "biscoe".to_string()];
        let islands: Selection<Island> = parse_selection(&names);
        assert_eq!(islands, set(&[Island::Biscoe, Island::Dream]));
    }

    #[test]
    fn views_compare_by_value() {
        let a = PenguinDataset::new(vec![penguin(Island::Dream, Species::Adelie)]);
        let b = PenguinDataset::new(vec![
            penguin(Island::Biscoe, Species::Gentoo),
            penguin(Island::Dream, Species::Adelie),
        ]);
        let dream = set(&[Island::Dream]);
        assert_eq!(
            compute_view(&a, &dream, &select_all()),
            compute_view(&b, &dream, &select_all())
        );
    }

    // -- properties --

    prop_compose! {
        fn arb_penguin()(
            island in 0usize..3,
            species in 0usize..3,
            year in 2007i32..2010,
            mass in proptest::option::of(2700.0f64..6300.0),
        ) -> Penguin {
            Penguin {
                body_mass_g: mass,
                year,
                ..penguin(Island::ALL[island], Species::ALL[species])
            }
        }
    }

    fn arb_dataset() -> impl Strategy<Value = PenguinDataset> {
        proptest::collection::vec(arb_penguin(), 0..60).prop_map(PenguinDataset::new)
    }

    fn arb_selection<T: Category + std::fmt::Debug>() -> impl Strategy<Value = Selection<T>> {
        any::<[bool; 3]>().prop_map(|mask| {
            T::ALL
                .iter()
                .zip(mask)
                .filter(|(_, on)| *on)
                .map(|(v, _)| *v)
                .collect()
        })
    }

    proptest! {
        #[test]
        fn view_is_ordered_subsequence(
            ds in arb_dataset(),
            islands in arb_selection::<Island>(),
            species in arb_selection::<Species>(),
        ) {
            let view = compute_view(&ds, &islands, &species);
            prop_assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
            for (idx, p) in view.indices().iter().zip(view.iter()) {
                prop_assert_eq!(ds.get(*idx), Some(p));
                prop_assert!(islands.contains(&p.island) && species.contains(&p.species));
            }
            let expected = ds
                .records()
                .iter()
                .filter(|p| islands.contains(&p.island) && species.contains(&p.species))
                .count();
            prop_assert_eq!(view.len(), expected);
        }

        #[test]
        fn full_selection_is_identity(ds in arb_dataset()) {
            let view = compute_view(&ds, &select_all(), &select_all());
            prop_assert_eq!(view.to_records(), ds.records().to_vec());
        }

        #[test]
        fn empty_selection_is_empty(ds in arb_dataset(), species in arb_selection::<Species>()) {
            prop_assert!(compute_view(&ds, &Selection::new(), &species).is_empty());
        }

        #[test]
        fn recomputing_is_idempotent(
            ds in arb_dataset(),
            islands in arb_selection::<Island>(),
            species in arb_selection::<Species>(),
        ) {
            prop_assert_eq!(
                compute_view(&ds, &islands, &species),
                compute_view(&ds, &islands, &species)
            );
        }

        #[test]
        fn widening_a_selection_never_drops_rows(
            ds in arb_dataset(),
            islands in arb_selection::<Island>(),
            extra in arb_selection::<Island>(),
            species in arb_selection::<Species>(),
        ) {
            let wider: Selection<Island> = islands.union(&extra).copied().collect();
            let narrow = compute_view(&ds, &islands, &species);
            let wide = compute_view(&ds, &wider, &species);
            prop_assert!(narrow.indices().iter().all(|i| wide.indices().contains(i)));
        }
    }
}
