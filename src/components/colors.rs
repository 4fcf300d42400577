use eframe::egui;
use egui::{Color32, Stroke, Vec2};
use image::Rgba;

/// Starting palette, in display order.
pub const DEFAULT_PALETTE: &[&str] = &[
    "#ff0000", "#00ff00", "#0000ff", "#ffff00", "#ff00ff", "#00ffff", "#000000", "#ffffff",
    "#ff9500", "#4cd964", "#5ac8fa", "#007aff", "#5856d6", "#ff2d55", "#8e8e93", "#d1d1d6",
];

const SWATCH_SIZE: f32 = 22.0;
const SWATCHES_PER_ROW: usize = 8;

// ============================================================================
// COLOR HELPERS
// ============================================================================

/// Parse `#rrggbb` (case-insensitive, leading `#` required). Palette dedup
/// falls out of this: two spellings of the same color parse to the same
/// `Color32`.
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

/// Canonical lowercase `#rrggbb` form (alpha is always opaque here).
pub fn to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// UI color → canvas pixel. Drawing colors are always opaque.
pub fn color32_to_rgba(color: Color32) -> Rgba<u8> {
    Rgba([color.r(), color.g(), color.b(), 255])
}

/// Canvas pixel → UI color, dropping alpha (the canvas is opaque).
pub fn rgba_to_color32(px: Rgba<u8>) -> Color32 {
    Color32::from_rgb(px.0[0], px.0[1], px.0[2])
}

// ============================================================================
// PALETTE PANEL
// ============================================================================

/// Ordered set of unique swatches with one active selection, plus a custom
/// color input that can be promoted into the palette.
pub struct PalettePanel {
    swatches: Vec<Color32>,
    /// Index of the active swatch; `None` while a custom (unlisted) color
    /// is in use.
    active: Option<usize>,
    custom: Color32,
}

impl Default for PalettePanel {
    fn default() -> Self {
        let swatches: Vec<Color32> = DEFAULT_PALETTE
            .iter()
            .filter_map(|hex| parse_hex(hex))
            .collect();
        Self {
            swatches,
            active: Some(0),
            custom: Color32::from_rgb(255, 0, 0),
        }
    }
}

impl PalettePanel {
    /// Append `color` unless an equal swatch already exists; either way the
    /// matching swatch becomes active. Returns true when a swatch was added.
    pub fn add_color(&mut self, color: Color32) -> bool {
        if let Some(idx) = self.swatches.iter().position(|c| *c == color) {
            self.active = Some(idx);
            return false;
        }
        self.swatches.push(color);
        self.active = Some(self.swatches.len() - 1);
        true
    }

    pub fn swatch_count(&self) -> usize {
        self.swatches.len()
    }

    pub fn active_color(&self) -> Color32 {
        match self.active {
            Some(idx) => self.swatches[idx],
            None => self.custom,
        }
    }

    /// Renders the swatch grid and the custom color row. Returns the newly
    /// selected color when the user picked one this frame.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Option<Color32> {
        let mut picked = None;

        egui::Grid::new("palette_swatches")
            .spacing([4.0, 4.0])
            .show(ui, |ui| {
                for (idx, color) in self.swatches.clone().into_iter().enumerate() {
                    let is_active = self.active == Some(idx);
                    let (rect, response) = ui.allocate_exact_size(
                        Vec2::splat(SWATCH_SIZE),
                        egui::Sense::click(),
                    );
                    let painter = ui.painter();
                    painter.rect_filled(rect, 3.0, color);
                    if is_active {
                        painter.rect_stroke(rect, 3.0, Stroke::new(2.0, Color32::WHITE));
                    } else if response.hovered() {
                        painter.rect_stroke(rect, 3.0, Stroke::new(1.0, Color32::GRAY));
                    }
                    let response = response.on_hover_text(to_hex(color));
                    if response.clicked() {
                        self.active = Some(idx);
                        self.custom = color;
                        picked = Some(color);
                    }
                    if (idx + 1) % SWATCHES_PER_ROW == 0 {
                        ui.end_row();
                    }
                }
            });

        ui.add_space(4.0);
        ui.horizontal(|ui| {
            let mut rgb = [self.custom.r(), self.custom.g(), self.custom.b()];
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                self.custom = Color32::from_rgb(rgb[0], rgb[1], rgb[2]);
                self.active = None;
                picked = Some(self.custom);
            }
            if ui.button("Add to palette").clicked() {
                let color = self.custom;
                self.add_color(color);
                picked = Some(color);
            }
            ui.label(to_hex(self.custom));
        });

        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_accepts_both_cases() {
        assert_eq!(parse_hex("#ff9500"), Some(Color32::from_rgb(255, 149, 0)));
        assert_eq!(parse_hex("#FF9500"), Some(Color32::from_rgb(255, 149, 0)));
        assert_eq!(parse_hex("ff9500"), None);
        assert_eq!(parse_hex("#ff95"), None);
        assert_eq!(parse_hex("#gg0000"), None);
    }

    #[test]
    fn hex_round_trip_is_lowercase() {
        let color = parse_hex("#5AC8FA").unwrap();
        assert_eq!(to_hex(color), "#5ac8fa");
    }

    #[test]
    fn default_palette_has_sixteen_unique_swatches() {
        let panel = PalettePanel::default();
        assert_eq!(panel.swatch_count(), 16);
        assert_eq!(panel.active_color(), Color32::from_rgb(255, 0, 0));
    }

    #[test]
    fn add_color_dedups_case_insensitively() {
        let mut panel = PalettePanel::default();
        let before = panel.swatch_count();
        // Same color as the existing "#ff9500" swatch, spelled uppercase.
        assert!(!panel.add_color(parse_hex("#FF9500").unwrap()));
        assert_eq!(panel.swatch_count(), before);
        // A genuinely new color grows the palette and becomes active.
        assert!(panel.add_color(Color32::from_rgb(1, 2, 3)));
        assert_eq!(panel.swatch_count(), before + 1);
        assert_eq!(panel.active_color(), Color32::from_rgb(1, 2, 3));
    }

    #[test]
    fn ui_color_converts_to_opaque_pixel() {
        let px = color32_to_rgba(Color32::from_rgb(9, 8, 7));
        assert_eq!(px, Rgba([9, 8, 7, 255]));
        assert_eq!(rgba_to_color32(px), Color32::from_rgb(9, 8, 7));
    }
}
