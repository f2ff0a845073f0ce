use serde::{Deserialize, Serialize};

/// Largest width or height any canvas may have, in cells or pixels.
pub const MAX_CANVAS_SIDE: u32 = 4096;

/// Tunable editor defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)] // if we add new fields, give them default values when deserializing old config
pub struct EditorConfig {
    pub grid_width: usize,
    pub grid_height: usize,
    pub sketch_width: u32,
    pub sketch_height: u32,
    /// Undo and redo stacks each hold at most this many entries.
    pub history_capacity: usize,
    pub autosave_interval_secs: u64,
    /// A selection drag must exceed this in both axes to create a selection.
    pub selection_min_size: f32,
    pub max_brush_size: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_width: 16,
            grid_height: 16,
            sketch_width: 800,
            sketch_height: 600,
            history_capacity: 50,
            autosave_interval_secs: 30,
            selection_min_size: 5.0,
            max_brush_size: 200.0,
        }
    }
}

impl EditorConfig {
    /// Reads a config from JSON. Unknown or broken input falls back to defaults.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Ignoring unreadable editor config: {err}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = EditorConfig::from_json(r#"{ "grid_width": 32 }"#);
        assert_eq!(config.grid_width, 32);
        assert_eq!(config.grid_height, 16);
        assert_eq!(config.history_capacity, 50);
    }

    #[test]
    fn garbage_falls_back() {
        assert_eq!(EditorConfig::from_json("not json"), EditorConfig::default());
    }
}
