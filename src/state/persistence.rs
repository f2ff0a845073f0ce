use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use futures::future::try_join_all;
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{EditorMode, EditorState};
use crate::blend::BlendMode;
use crate::color;
use crate::config::MAX_CANVAS_SIDE;
use crate::grid::RasterGrid;
use crate::layer::{Layer, LayerStack};
use crate::sprite::{Sprite, SpriteSheet};
use crate::symmetry::SymmetryMode;

/// Current project file version. Version 1 files predate sketch mode and
/// load with the sketch canvas left as it is.
pub const PROJECT_VERSION: u32 = 2;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Errors that can occur while saving or loading a project
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to (de)serialize project: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to access project storage: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode or decode layer image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Layer data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Invalid project data: {0}")]
    InvalidState(String),
}

/// Result type for persistence operations
pub type PersistenceResult<T> = Result<T, PersistenceError>;

fn invalid(msg: impl Into<String>) -> PersistenceError {
    PersistenceError::InvalidState(msg.into())
}

fn side_allowed(side: usize) -> bool {
    (1..=MAX_CANVAS_SIDE as usize).contains(&side)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteRecord {
    pub name: String,
    /// `null` for a sprite that was never drawn on
    pub grid: Option<Vec<Vec<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerRecord {
    /// PNG data URL
    pub data: String,
    pub visible: bool,
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub name: String,
}

/// The saved form of a whole project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    pub version: u32,
    pub mode: EditorMode,
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub sprites: Vec<SpriteRecord>,
    pub current_sprite: usize,
    /// Row-major color strings, `"transparent"` for empty cells
    pub grid: Vec<Vec<String>>,
    pub primary_color: String,
    pub secondary_color: String,
    pub symmetry_mode: SymmetryMode,
    pub show_grid: bool,
    #[serde(default)]
    pub sketch_canvas: Option<CanvasSize>,
    #[serde(default)]
    pub layers: Vec<LayerRecord>,
    #[serde(default)]
    pub current_layer: usize,
}

/// Encodes a layer surface as a PNG data URL. PNG is lossless, so
/// decoding gives back the exact pixels.
pub fn encode_layer(surface: &RgbaImage) -> PersistenceResult<String> {
    let mut bytes = Vec::new();
    surface.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(&bytes)))
}

pub fn decode_layer(data_url: &str) -> PersistenceResult<RgbaImage> {
    let payload = data_url
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or_else(|| invalid("layer data is not a PNG data URL"))?;
    let bytes = STANDARD.decode(payload)?;
    Ok(image::load_from_memory_with_format(&bytes, ImageFormat::Png)?.to_rgba8())
}

async fn decode_layer_record(record: LayerRecord) -> PersistenceResult<Layer> {
    let surface = decode_layer(&record.data)?;
    Ok(Layer {
        id: Uuid::new_v4(),
        name: record.name,
        visible: record.visible,
        opacity: if record.opacity.is_finite() {
            record.opacity.clamp(0.0, 1.0)
        } else {
            1.0
        },
        blend_mode: record.blend_mode,
        surface,
    })
}

fn parse_color(text: &str, field: &str) -> PersistenceResult<egui::Color32> {
    color::parse_hex(text).ok_or_else(|| invalid(format!("{field} is not a color: {text:?}")))
}

impl ProjectFile {
    /// Captures `state`. The current sprite's slot is written from the live
    /// grid so the file never holds a stale copy.
    pub fn from_state(state: &EditorState) -> PersistenceResult<Self> {
        let current_sprite = state.sprites.current_index();
        let sprites = state
            .sprites
            .sprites()
            .iter()
            .enumerate()
            .map(|(i, sprite)| SpriteRecord {
                name: sprite.name.clone(),
                grid: if i == current_sprite {
                    Some(state.grid.to_strings())
                } else {
                    sprite.grid.as_ref().map(RasterGrid::to_strings)
                },
            })
            .collect();
        let layers = state
            .layers
            .layers()
            .iter()
            .map(|layer| -> PersistenceResult<LayerRecord> {
                Ok(LayerRecord {
                    data: encode_layer(&layer.surface)?,
                    visible: layer.visible,
                    opacity: layer.opacity,
                    blend_mode: layer.blend_mode,
                    name: layer.name.clone(),
                })
            })
            .collect::<PersistenceResult<Vec<_>>>()?;

        Ok(Self {
            version: PROJECT_VERSION,
            mode: state.mode,
            canvas_width: state.grid.width(),
            canvas_height: state.grid.height(),
            sprites,
            current_sprite,
            grid: state.grid.to_strings(),
            primary_color: color::to_hex(state.primary_color),
            secondary_color: color::to_hex(state.secondary_color),
            symmetry_mode: state.symmetry,
            show_grid: state.show_grid,
            sketch_canvas: Some(CanvasSize {
                width: state.layers.width(),
                height: state.layers.height(),
            }),
            layers,
            current_layer: state.layers.current_index(),
        })
    }

    pub fn to_json(&self) -> PersistenceResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> PersistenceResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Structural checks that do not need any image decoding.
    pub fn validate(&self) -> PersistenceResult<()> {
        if self.version == 0 || self.version > PROJECT_VERSION {
            return Err(invalid(format!("unsupported version {}", self.version)));
        }
        if !side_allowed(self.canvas_width) || !side_allowed(self.canvas_height) {
            return Err(invalid(format!(
                "canvas size {}x{} out of range",
                self.canvas_width, self.canvas_height
            )));
        }
        if self.grid.len() != self.canvas_height || self.grid.iter().any(|row| row.len() != self.canvas_width) {
            return Err(invalid(format!(
                "grid does not match the {}x{} canvas",
                self.canvas_width, self.canvas_height
            )));
        }
        if !self.sprites.is_empty() && self.current_sprite >= self.sprites.len() {
            return Err(invalid(format!("current sprite {} out of range", self.current_sprite)));
        }
        if let Some(size) = self.sketch_canvas {
            if !side_allowed(size.width as usize) || !side_allowed(size.height as usize) {
                return Err(invalid(format!(
                    "sketch canvas size {}x{} out of range",
                    size.width, size.height
                )));
            }
        }
        if !self.layers.is_empty() && self.current_layer >= self.layers.len() {
            return Err(invalid(format!("current layer {} out of range", self.current_layer)));
        }
        Ok(())
    }

    /// Builds the complete state this file describes. Tool and brush
    /// settings are carried over from `base`. Every layer is decoded before
    /// anything is returned, so a bad layer fails the whole load.
    pub async fn into_state(self, base: &EditorState) -> PersistenceResult<EditorState> {
        self.validate()?;

        let grid = RasterGrid::from_strings(&self.grid).map_err(invalid)?;
        let sprites = self
            .sprites
            .iter()
            .map(|record| -> PersistenceResult<Sprite> {
                let grid = match &record.grid {
                    Some(rows) => Some(RasterGrid::from_strings(rows).map_err(invalid)?),
                    None => None,
                };
                Ok(Sprite {
                    name: record.name.clone(),
                    grid,
                })
            })
            .collect::<PersistenceResult<Vec<_>>>()?;
        let primary_color = parse_color(&self.primary_color, "primaryColor")?;
        let secondary_color = parse_color(&self.secondary_color, "secondaryColor")?;

        let layers = match self.sketch_canvas {
            Some(size) => {
                let decoded = try_join_all(self.layers.into_iter().map(decode_layer_record)).await?;
                LayerStack::from_layers(decoded, self.current_layer, size.width, size.height)
            }
            None => base.layers.clone(),
        };

        let mut state = base.clone();
        state.mode = self.mode;
        if !state.tool.available_in(self.mode) {
            state.tool = crate::tools::Tool::default_for(self.mode);
        }
        state.grid = grid;
        state.sprites = SpriteSheet::from_sprites(sprites, self.current_sprite);
        state.layers = layers;
        state.selection = None;
        state.primary_color = primary_color;
        state.secondary_color = secondary_color;
        state.symmetry = self.symmetry_mode;
        state.show_grid = self.show_grid;
        Ok(state)
    }
}

/// Parses, validates and fully decodes a saved project.
pub async fn load_state(json: &str, base: &EditorState) -> PersistenceResult<EditorState> {
    ProjectFile::from_json(json)?.into_state(base).await
}
