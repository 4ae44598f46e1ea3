use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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

// ---------------------------------------------------------------------------
// Borough → Color32
// ---------------------------------------------------------------------------

/// Stable colour per borough, shared by the histogram, the map and the legend.
#[derive(Debug, Clone, Default)]
pub struct BoroughColors {
    mapping: BTreeMap<String, Color32>,
}

impl BoroughColors {
    pub fn new(boroughs: &BTreeSet<String>) -> Self {
        let mapping = boroughs
            .iter()
            .cloned()
            .zip(generate_palette(boroughs.len()))
            .collect();
        BoroughColors { mapping }
    }

    pub fn color_for(&self, borough: &str) -> Color32 {
        self.mapping.get(borough).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let palette = generate_palette(5);
        assert_eq!(palette.len(), 5);
        let unique: BTreeSet<_> = palette.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 5);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_borough_is_gray() {
        let colors = BoroughColors::new(&["Bronx".to_string(), "Queens".to_string()].into());
        assert_ne!(colors.color_for("Bronx"), colors.color_for("Queens"));
        assert_eq!(colors.color_for("Atlantis"), Color32::GRAY);
    }
}
