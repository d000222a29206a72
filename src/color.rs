use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use survey_explorer::{FacetIndex, EMPTY_BUCKET};

/// Bar colour of Group A in comparison charts.
pub const GROUP_A: Color32 = Color32::from_rgb(102, 126, 234);
/// Bar colour of Group B in comparison charts.
pub const GROUP_B: Color32 = Color32::from_rgb(255, 99, 132);

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
            let hsl = Hsl::new(hue, 0.65, 0.6);
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
// Color mapping: chart value → Color32
// ---------------------------------------------------------------------------

/// Maps the values of one chartable column to distinct colours, so a value
/// keeps its colour while filters change the counts.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the sorted distinct values of a column.
    pub fn new(values: &[String]) -> Self {
        let palette = generate_palette(values.len());
        let mapping = values.iter().cloned().zip(palette).collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Colour for a value; the empty bucket and unknown values are grey.
    pub fn color_for(&self, value: &str) -> Color32 {
        if value == EMPTY_BUCKET {
            return self.default_color;
        }
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

/// One colour map per chartable column.
pub fn chart_color_maps(chart_facets: &FacetIndex) -> BTreeMap<String, ColorMap> {
    chart_facets
        .iter()
        .map(|facet| (facet.column.clone(), ColorMap::new(&facet.values)))
        .collect()
}
