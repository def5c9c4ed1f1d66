use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

use crate::charts::{ColorScale, Template};

// ---------------------------------------------------------------------------
// Template themes
// ---------------------------------------------------------------------------

/// Colours used to draw a chart in a given template.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    pub background: Color32,
    pub text: Color32,
    pub series: Color32,
}

impl Theme {
    pub fn for_template(template: Template) -> Self {
        match template {
            Template::Plotly => Theme {
                background: hex(0xE5ECF6),
                text: hex(0x2A3F5F),
                series: hex(0x636EFA),
            },
            Template::PlotlyDark => Theme {
                background: hex(0x111111),
                text: hex(0xF2F5FA),
                series: hex(0x636EFA),
            },
        }
    }
}

fn hex(rgb: u32) -> Color32 {
    Color32::from_rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

// ---------------------------------------------------------------------------
// Continuous colour scales
// ---------------------------------------------------------------------------

/// Viridis control points, evenly spaced over [0, 1].
const VIRIDIS: [u32; 10] = [
    0x440154, 0x482878, 0x3E4989, 0x31688E, 0x26828E, 0x1F9E89, 0x35B779, 0x6ECE58, 0xB5DE2B,
    0xFDE725,
];

impl ColorScale {
    fn stops(self) -> &'static [u32] {
        match self {
            ColorScale::Viridis => &VIRIDIS,
        }
    }

    /// Colour at position `t` in [0, 1], interpolated in linear RGB.
    pub fn sample(self, t: f64) -> Color32 {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let pos = t as f32 * (stops.len() - 1) as f32;
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(stops.len() - 1);
        let a = to_linear(stops[lo]);
        let b = to_linear(stops[hi]);
        let mixed: Srgb = Srgb::from_linear(a.mix(b, pos - lo as f32));
        Color32::from_rgb(
            (mixed.red * 255.0).round() as u8,
            (mixed.green * 255.0).round() as u8,
            (mixed.blue * 255.0).round() as u8,
        )
    }

    /// Colour for a correlation coefficient in [-1, 1].
    pub fn for_correlation(self, r: f64) -> Color32 {
        self.sample((r + 1.0) / 2.0)
    }
}

fn to_linear(rgb: u32) -> LinSrgb {
    Srgb::<u8>::new((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
        .into_format::<f32>()
        .into_linear()
}
