use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};
use plotters::style::RGBColor;

use crate::data::model::Species;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            RGBColor(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: species → RGBColor
// ---------------------------------------------------------------------------

/// Maps each species to a distinct colour, stable across charts.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<Species, RGBColor>,
    default_color: RGBColor,
}

impl ColorMap {
    pub fn for_species() -> Self {
        let palette = generate_palette(Species::ALL.len());
        let mapping = Species::ALL.into_iter().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: RGBColor(128, 128, 128),
        }
    }

    /// Look up the colour for a species.
    pub fn color_for(&self, species: Species) -> RGBColor {
        self.mapping
            .get(&species)
            .copied()
            .unwrap_or(self.default_color)
    }
}
