use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Supplies display colors for categories that have no predefined color.
///
/// Implementations must be pure: the same name always yields the same color,
/// otherwise colors drift every time a snapshot is reloaded.
pub trait ColorSource: Send + Sync {
    fn color_for(&self, name: &str) -> String;
}

/// Default color source: derives a hue from the category name and renders
/// it as an RGB hex string with fixed saturation and lightness.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultPalette;

impl ColorSource for DefaultPalette {
    fn color_for(&self, name: &str) -> String {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        let hue = (hasher.finish() % 360) as f64;
        hsl_to_hex(hue, 0.70, 0.60)
    }
}

fn hsl_to_hex(hue: f64, saturation: f64, lightness: f64) -> String {
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let m = lightness - c / 2.0;
    let (r, g, b) = match hue as u32 {
        0..=59 => (c, x, 0.0),
        60..=119 => (x, c, 0.0),
        120..=179 => (0.0, c, x),
        180..=239 => (0.0, x, c),
        240..=299 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_byte = |v: f64| ((v + m) * 255.0).round() as u8;
    format!("#{:02X}{:02X}{:02X}", to_byte(r), to_byte(g), to_byte(b))
}
