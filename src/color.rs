use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Per-channel plot colours
// ---------------------------------------------------------------------------

/// Colour of the `index`-th of `count` evenly spaced hues.
fn hue_color(index: usize, count: usize) -> Color32 {
    let hue = (index as f32 / count.max(1) as f32) * 360.0;
    let rgb: Srgb = Hsl::new(hue, 0.7, 0.45).into_color();
    let (r, g, b) = rgb.into_format::<u8>().into_components();
    Color32::from_rgb(r, g, b)
}

/// Stable colour for every channel of the open catalog, assigned in
/// catalog order so a channel keeps its colour while the file stays open.
#[derive(Debug, Clone, Default)]
pub struct ChannelPalette {
    colors: HashMap<String, Color32>,
}

impl ChannelPalette {
    pub fn new<'a>(ids: impl ExactSizeIterator<Item = &'a str>) -> Self {
        let count = ids.len();
        let colors = ids
            .enumerate()
            .map(|(i, id)| (id.to_string(), hue_color(i, count)))
            .collect();
        Self { colors }
    }

    pub fn color_for(&self, id: &str) -> Color32 {
        self.colors
            .get(id)
            .copied()
            .unwrap_or(Color32::LIGHT_BLUE)
    }
}
