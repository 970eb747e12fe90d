use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::{Category, Island};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Fixed island colours: Dream skyblue, Biscoe salmon, Torgersen lightgreen.
pub fn island_color(island: Island) -> Color32 {
    match island {
        Island::Dream => Color32::from_rgb(135, 206, 235),
        Island::Biscoe => Color32::from_rgb(250, 128, 114),
        Island::Torgersen => Color32::from_rgb(144, 238, 144),
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps every value of a categorical dimension to a distinct colour.
#[derive(Debug, Clone)]
pub struct ColorMap<T> {
    mapping: BTreeMap<T, Color32>,
    default_color: Color32,
}

impl<T: Category> ColorMap<T> {
    /// Evenly spaced hues over all values of `T`.
    pub fn generated() -> Self {
        let mapping = T::ALL
            .iter()
            .copied()
            .zip(generate_palette(T::ALL.len()))
            .collect();
        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Colours given by a fixed function.
    pub fn from_fn(f: impl Fn(T) -> Color32) -> Self {
        ColorMap {
            mapping: T::ALL.iter().map(|&v| (v, f(v))).collect(),
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: T) -> Color32 {
        self.mapping
            .get(&value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Species;

    #[test]
    fn palette_has_distinct_colors() {
        let colors = generate_palette(3);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn generated_map_covers_every_species() {
        let map = ColorMap::<Species>::generated();
        let colors: Vec<Color32> = Species::ALL.iter().map(|&s| map.color_for(s)).collect();
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert_ne!(colors[0], Color32::GRAY);
    }

    #[test]
    fn island_map_uses_fixed_colors() {
        let map = ColorMap::from_fn(island_color);
        assert_eq!(map.color_for(Island::Dream), Color32::from_rgb(135, 206, 235));
    }
}
