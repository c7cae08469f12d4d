use std::collections::BTreeMap;

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
            let hsl = Hsl::new(hue, 0.65, 0.55);
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
// Stage colours for the stacked breakdown
// ---------------------------------------------------------------------------

/// Maps lifecycle stage names to distinct colours.
#[derive(Debug, Clone)]
pub struct StagePalette {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl StagePalette {
    /// One colour per stage, assigned in the given order.
    pub fn new(stages: &[String]) -> Self {
        let mapping = stages
            .iter()
            .cloned()
            .zip(generate_palette(stages.len()))
            .collect();

        StagePalette {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a stage.
    pub fn color_for(&self, stage: &str) -> Color32 {
        self.mapping
            .get(stage)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let colours = generate_palette(7);
        assert_eq!(colours.len(), 7);
        for (i, a) in colours.iter().enumerate() {
            assert!(colours[i + 1..].iter().all(|b| a != b));
        }
    }

    #[test]
    fn unknown_stage_gets_default() {
        let palette = StagePalette::new(&["Farm".to_string(), "Retail".to_string()]);
        assert_ne!(palette.color_for("Farm"), palette.color_for("Retail"));
        assert_eq!(palette.color_for("Other"), Color32::GRAY);
    }
}
