use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Categorical attributes
// ---------------------------------------------------------------------------

/// A category name that does not belong to the expected enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseCategoryError {
    pub kind: &'static str,
    pub value: String,
}

/// Shared behaviour of the fixed categorical dimensions.
///
/// `Ord` is required because selections are kept in `BTreeSet`s so that
/// widgets and exports list values in a stable order.
pub trait Category: Copy + Ord + fmt::Display + FromStr<Err = ParseCategoryError> + 'static {
    /// Every value, in display order.
    const ALL: &'static [Self];
    /// Human readable name of the dimension ("island", "species", ...).
    const KIND: &'static str;

    fn as_str(&self) -> &'static str;
}

/// Implements `Display`, `FromStr` and `Category` for a fieldless enum.
macro_rules! category {
    ($ty:ident, $kind:literal, [$($variant:ident => $name:literal),+ $(,)?]) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }

        impl Category for $ty {
            const ALL: &'static [Self] = $ty::ALL;
            const KIND: &'static str = $kind;

            fn as_str(&self) -> &'static str {
                $ty::as_str(self)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ParseCategoryError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| ParseCategoryError {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Island {
    Biscoe,
    Dream,
    Torgersen,
}

category!(Island, "island", [
    Biscoe => "Biscoe",
    Dream => "Dream",
    Torgersen => "Torgersen",
]);

impl Island {
    /// Map centre for the island as `(latitude, longitude)`.
    pub fn coordinates(&self) -> (f64, f64) {
        match self {
            Island::Biscoe => (-65.7474, -65.9164),
            Island::Dream => (-64.7333, -64.2333),
            Island::Torgersen => (-64.7667, -64.0833),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    Adelie,
    Chinstrap,
    Gentoo,
}

category!(Species, "species", [
    Adelie => "Adelie",
    Chinstrap => "Chinstrap",
    Gentoo => "Gentoo",
]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

category!(Sex, "sex", [
    Female => "female",
    Male => "male",
]);

// ---------------------------------------------------------------------------
// Penguin – one row of the dataset
// ---------------------------------------------------------------------------

/// One observed penguin. Measurements are `None` when the source had `NA`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Penguin {
    pub species: Species,
    pub island: Island,
    pub bill_length_mm: Option<f64>,
    pub bill_depth_mm: Option<f64>,
    pub flipper_length_mm: Option<f64>,
    pub body_mass_g: Option<f64>,
    pub sex: Option<Sex>,
    pub year: i32,
}

// ---------------------------------------------------------------------------
// Measurement – the numeric attributes that can be plotted
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Measurement {
    #[default]
    #[serde(rename = "bill_length_mm")]
    BillLength,
    #[serde(rename = "bill_depth_mm")]
    BillDepth,
    #[serde(rename = "flipper_length_mm")]
    FlipperLength,
    #[serde(rename = "body_mass_g")]
    BodyMass,
}

impl Measurement {
    pub const ALL: [Measurement; 4] = [
        Measurement::BillLength,
        Measurement::BillDepth,
        Measurement::FlipperLength,
        Measurement::BodyMass,
    ];

    /// Column name in the source data.
    pub fn column_name(&self) -> &'static str {
        match self {
            Measurement::BillLength => "bill_length_mm",
            Measurement::BillDepth => "bill_depth_mm",
            Measurement::FlipperLength => "flipper_length_mm",
            Measurement::BodyMass => "body_mass_g",
        }
    }

    /// Axis label for charts.
    pub fn label(&self) -> &'static str {
        match self {
            Measurement::BillLength => "Bill length (mm)",
            Measurement::BillDepth => "Bill depth (mm)",
            Measurement::FlipperLength => "Flipper length (mm)",
            Measurement::BodyMass => "Mass (g)",
        }
    }

    pub fn value(&self, penguin: &Penguin) -> Option<f64> {
        match self {
            Measurement::BillLength => penguin.bill_length_mm,
            Measurement::BillDepth => penguin.bill_depth_mm,
            Measurement::FlipperLength => penguin.flipper_length_mm,
            Measurement::BodyMass => penguin.body_mass_g,
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// Column – table layout
// ---------------------------------------------------------------------------

/// The dataset columns, in source order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Species,
    Island,
    Measurement(Measurement),
    Sex,
    Year,
}

impl Column {
    pub const ALL: [Column; 8] = [
        Column::Species,
        Column::Island,
        Column::Measurement(Measurement::BillLength),
        Column::Measurement(Measurement::BillDepth),
        Column::Measurement(Measurement::FlipperLength),
        Column::Measurement(Measurement::BodyMass),
        Column::Sex,
        Column::Year,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Column::Species => "species",
            Column::Island => "island",
            Column::Measurement(m) => m.column_name(),
            Column::Sex => "sex",
            Column::Year => "year",
        }
    }

    /// Text shown in a table cell. Missing values render as `NA`.
    pub fn cell(&self, penguin: &Penguin) -> String {
        match self {
            Column::Species => penguin.species.to_string(),
            Column::Island => penguin.island.to_string(),
            Column::Measurement(m) => match m.value(penguin) {
                Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
                Some(v) => format!("{v:.1}"),
                None => "NA".to_string(),
            },
            Column::Sex => penguin
                .sex
                .map(|s| s.to_string())
                .unwrap_or_else(|| "NA".to_string()),
            Column::Year => penguin.year.to_string(),
        }
    }

    /// Ordering of two rows by this column. Missing values sort last.
    pub fn compare(&self, a: &Penguin, b: &Penguin) -> Ordering {
        fn missing_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
            match (a, b) {
                (Some(a), Some(b)) => cmp(a, b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        }
        match self {
            Column::Species => a.species.cmp(&b.species),
            Column::Island => a.island.cmp(&b.island),
            Column::Measurement(m) => missing_last(m.value(a), m.value(b), |x, y| x.total_cmp(&y)),
            Column::Sex => missing_last(a.sex, b.sex, |x, y| x.cmp(&y)),
            Column::Year => a.year.cmp(&b.year),
        }
    }
}

// ---------------------------------------------------------------------------
// PenguinDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Immutable, cheaply clonable handle to the loaded records.
///
/// Built once by the loader and handed to the session; clones share the
/// same allocation.
#[derive(Debug, Clone)]
pub struct PenguinDataset {
    records: Arc<[Penguin]>,
}

impl PenguinDataset {
    pub fn new(records: Vec<Penguin>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[Penguin] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&Penguin> {
        self.records.get(index)
    }

    /// Number of penguins.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn penguin(bill: Option<f64>, sex: Option<Sex>) -> Penguin {
        Penguin {
            species: Species::Adelie,
            island: Island::Dream,
            bill_length_mm: bill,
            bill_depth_mm: None,
            flipper_length_mm: Some(181.0),
            body_mass_g: Some(3750.0),
            sex,
            year: 2007,
        }
    }

    #[test]
    fn categories_parse_case_insensitively() {
        assert_eq!("dream".parse::<Island>(), Ok(Island::Dream));
        assert_eq!(" GENTOO ".parse::<Species>(), Ok(Species::Gentoo));
        assert_eq!("MALE".parse::<Sex>(), Ok(Sex::Male));
    }

    #[test]
    fn unknown_category_is_an_error() {
        let err = "Anvers".parse::<Island>().unwrap_err();
        assert_eq!(err.kind, "island");
        assert_eq!(err.to_string(), "unknown island 'Anvers'");
    }

    #[test]
    fn all_lists_every_variant() {
        assert_eq!(<Island as Category>::ALL.len(), 3);
        assert_eq!(<Species as Category>::ALL.len(), 3);
        assert_eq!(Species::ALL, [Species::Adelie, Species::Chinstrap, Species::Gentoo]);
    }

    #[test]
    fn cells_render_missing_as_na() {
        let p = penguin(None, None);
        assert_eq!(Column::Measurement(Measurement::BillLength).cell(&p), "NA");
        assert_eq!(Column::Sex.cell(&p), "NA");
        assert_eq!(Column::Measurement(Measurement::BodyMass).cell(&p), "3750");

        let p = penguin(Some(39.1), Some(Sex::Male));
        assert_eq!(Column::Measurement(Measurement::BillLength).cell(&p), "39.1");
        assert_eq!(Column::Sex.cell(&p), "male");
    }

    #[test]
    fn compare_sorts_missing_last() {
        let col = Column::Measurement(Measurement::BillLength);
        let some = penguin(Some(30.0), None);
        let none = penguin(None, None);
        assert_eq!(col.compare(&some, &none), Ordering::Less);
        assert_eq!(col.compare(&none, &some), Ordering::Greater);
        assert_eq!(col.compare(&none, &none), Ordering::Equal);
    }

    #[test]
    fn dataset_clones_share_records() {
        let ds = PenguinDataset::new(vec![penguin(Some(1.0), None)]);
        let other = ds.clone();
        assert!(std::ptr::eq(ds.records(), other.records()));
        assert_eq!(other.len(), 1);
        assert!(PenguinDataset::new(vec![]).is_empty());
    }

    #[test]
    fn measurement_serde_uses_column_names() {
        let json = serde_json::to_string(&Measurement::BodyMass).unwrap();
        assert_eq!(json, "\"body_mass_g\"");
        let m: Measurement = serde_json::from_str("\"flipper_length_mm\"").unwrap();
        assert_eq!(m, Measurement::FlipperLength);
    }
}
