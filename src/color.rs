//! Hex color handling for grid cells and project files.

use egui::Color32;
use image::Rgba;

/// What an empty grid cell looks like in a project file.
pub const EMPTY_MARKER: &str = "transparent";

/// Parses `#RGB`, `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
pub fn parse_hex(text: &str) -> Option<Color32> {
    let hex = text.trim().trim_start_matches('#');
    if !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                rgb[i] = v * 17;
            }
            Some(Color32::from_rgb(rgb[0], rgb[1], rgb[2]))
        }
        6 => Some(Color32::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)?,
        )),
        _ => None,
    }
}

/// Formats as upper-case `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
pub fn to_hex(color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    if a == 255 {
        format!("#{r:02X}{g:02X}{b:02X}")
    } else {
        format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
    }
}

/// Grid cell → project file string.
pub fn cell_to_string(cell: Option<Color32>) -> String {
    match cell {
        Some(color) => to_hex(color),
        None => EMPTY_MARKER.to_owned(),
    }
}

/// Project file string → grid cell. `None` means the text is not a color.
pub fn cell_from_str(text: &str) -> Option<Option<Color32>> {
    if text == EMPTY_MARKER || text.is_empty() {
        return Some(None);
    }
    parse_hex(text).map(Some)
}

pub fn to_rgba(color: Color32) -> Rgba<u8> {
    Rgba(color.to_srgba_unmultiplied())
}
