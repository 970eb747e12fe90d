use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Equal-width binning
// ---------------------------------------------------------------------------

/// `count` equal-width bins covering `[min, min + count * width]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bins {
    pub min: f64,
    pub width: f64,
    pub count: usize,
}

impl Bins {
    /// Bins spanning the finite values. `None` when there are none.
    ///
    /// A zero-width range (every value equal) gets unit-wide bins centred on
    /// the value so the bars stay visible.
    pub fn spanning(values: impl IntoIterator<Item = f64>, count: usize) -> Option<Self> {
        let count = count.max(1);
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;

        let range = max - min;
        if range.abs() < f64::EPSILON {
            return Some(Bins {
                min: min - 0.5 * count as f64,
                width: 1.0,
                count,
            });
        }
        Some(Bins {
            min,
            width: range / count as f64,
            count,
        })
    }

    /// Bin for `value`. The upper edge belongs to the last bin; values
    /// outside the range are clamped.
    pub fn index_of(&self, value: f64) -> usize {
        let raw = ((value - self.min) / self.width).floor();
        if raw <= 0.0 {
            0
        } else {
            (raw as usize).min(self.count - 1)
        }
    }

    pub fn center(&self, index: usize) -> f64 {
        self.min + (index as f64 + 0.5) * self.width
    }
}

// ---------------------------------------------------------------------------
// Stacked histogram: one layer of counts per group
// ---------------------------------------------------------------------------

/// Per-group counts over shared bins. Layers are ordered by key and only
/// include groups that contributed at least one value.
#[derive(Debug, Clone, PartialEq)]
pub struct StackedHistogram<K> {
    pub bins: Bins,
    pub layers: Vec<(K, Vec<usize>)>,
}

/// Bin `(group, value)` pairs into `bins` shared equal-width bins.
///
/// Non-finite values are skipped. Returns `None` if nothing is left to bin.
pub fn stacked_histogram<K: Ord + Copy>(
    points: impl IntoIterator<Item = (K, f64)>,
    bins: usize,
) -> Option<StackedHistogram<K>> {
    let points: Vec<(K, f64)> = points.into_iter().filter(|(_, v)| v.is_finite()).collect();
    let bins = Bins::spanning(points.iter().map(|(_, v)| *v), bins)?;

    let mut layers: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for (key, value) in points {
        let counts = layers.entry(key).or_insert_with(|| vec![0; bins.count]);
        counts[bins.index_of(value)] += 1;
    }

    Some(StackedHistogram {
        bins,
        layers: layers.into_iter().collect(),
    })
}
