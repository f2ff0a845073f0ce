use image::{Rgba, RgbaImage, imageops};
use uuid::Uuid;

use crate::blend::{BlendMode, blend_pixel};
use crate::error::{EditorError, EditorResult};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// One independently drawable surface in sketch mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Unique identifier for the layer
    pub id: Uuid,
    /// Display name of the layer
    pub name: String,
    /// Hidden layers keep their pixels but are skipped when compositing
    pub visible: bool,
    /// 0.0..=1.0
    pub opacity: f32,
    pub blend_mode: BlendMode,
    pub surface: RgbaImage,
}

impl Layer {
    /// A fully transparent layer.
    pub fn new(name: &str, width: u32, height: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            visible: true,
            opacity: 1.0,
            blend_mode: BlendMode::Normal,
            surface: RgbaImage::new(width.max(1), height.max(1)),
        }
    }

    /// True when any pixel is not fully transparent.
    pub fn has_content(&self) -> bool {
        self.surface.pixels().any(|p| p[3] != 0)
    }

    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// Resizes the surface anchored at the origin. Content outside the new
    /// bounds is dropped; new area is transparent.
    fn resize(&mut self, width: u32, height: u32) {
        let mut surface = RgbaImage::new(width.max(1), height.max(1));
        imageops::replace(&mut surface, &self.surface, 0, 0);
        self.surface = surface;
    }
}

/// The ordered layer list for sketch mode, bottom layer first.
///
/// Never empty: the last remaining layer cannot be deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerStack {
    layers: Vec<Layer>,
    current: usize,
    width: u32,
    height: u32,
    /// Used to name new layers "Layer N"
    next_number: usize,
}

impl LayerStack {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        Self {
            layers: vec![Layer::new("Layer 1", width, height)],
            current: 0,
            width,
            height,
            next_number: 2,
        }
    }

    /// Builds a stack from already decoded layers. Layers whose surface does
    /// not match the canvas are resized to fit. An empty list yields one
    /// fresh layer.
    pub fn from_layers(mut layers: Vec<Layer>, current: usize, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        if layers.is_empty() {
            return Self::new(width, height);
        }
        for layer in &mut layers {
            if layer.surface.dimensions() != (width, height) {
                layer.resize(width, height);
            }
        }
        let next_number = layers.len() + 1;
        let current = current.min(layers.len() - 1);
        Self {
            layers,
            current,
            width,
            height,
            next_number,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Layer {
        &self.layers[self.current]
    }

    pub fn current_mut(&mut self) -> &mut Layer {
        &mut self.layers[self.current]
    }

    pub fn get(&self, index: usize) -> EditorResult<&Layer> {
        self.layers.get(index).ok_or(EditorError::NoSuchLayer(index))
    }

    pub fn get_mut(&mut self, index: usize) -> EditorResult<&mut Layer> {
        self.layers
            .get_mut(index)
            .ok_or(EditorError::NoSuchLayer(index))
    }

    pub fn select(&mut self, index: usize) -> EditorResult<()> {
        self.get(index)?;
        self.current = index;
        Ok(())
    }

    /// Appends a transparent layer on top and makes it current.
    pub fn add_layer(&mut self) -> usize {
        let name = format!("Layer {}", self.next_number);
        self.next_number += 1;
        self.layers.push(Layer::new(&name, self.width, self.height));
        self.current = self.layers.len() - 1;
        log::debug!("Added {name}");
        self.current
    }

    /// Removes a layer. Refused when it is the only one.
    pub fn delete_layer(&mut self, index: usize) -> EditorResult<Layer> {
        if self.layers.len() <= 1 {
            return Err(EditorError::LastLayer);
        }
        self.get(index)?;
        let removed = self.layers.remove(index);
        if self.current > index || self.current >= self.layers.len() {
            self.current = self.current.saturating_sub(1);
        }
        self.current = self.current.min(self.layers.len() - 1);
        Ok(removed)
    }

    /// Moves a layer to a new position in the stack; the current layer
    /// follows its content.
    pub fn move_layer(&mut self, from: usize, to: usize) -> EditorResult<()> {
        self.get(from)?;
        self.get(to)?;
        let current_id = self.current().id;
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
        self.current = self
            .layers
            .iter()
            .position(|l| l.id == current_id)
            .unwrap_or(to);
        Ok(())
    }

    pub fn set_visibility(&mut self, index: usize, visible: bool) -> EditorResult<()> {
        self.get_mut(index)?.visible = visible;
        Ok(())
    }

    pub fn set_opacity(&mut self, index: usize, opacity: f32) -> EditorResult<()> {
        self.get_mut(index)?.opacity = opacity.clamp(0.0, 1.0);
        Ok(())
    }

    pub fn set_blend_mode(&mut self, index: usize, mode: BlendMode) -> EditorResult<()> {
        self.get_mut(index)?.blend_mode = mode;
        Ok(())
    }

    /// Flattens visible layers bottom to top into a new surface.
    pub fn composite(&self) -> RgbaImage {
        let mut out = RgbaImage::new(self.width, self.height);
        for layer in self.layers.iter().filter(|l| l.visible && l.opacity > 0.0) {
            for (dst, src) in out.pixels_mut().zip(layer.surface.pixels()) {
                *dst = blend_pixel(*dst, *src, layer.blend_mode, layer.opacity);
            }
        }
        out
    }

    /// Reads one composited pixel without flattening the whole stack.
    pub fn composite_pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let mut px = TRANSPARENT;
        for layer in self.layers.iter().filter(|l| l.visible) {
            px = blend_pixel(px, *layer.surface.get_pixel(x, y), layer.blend_mode, layer.opacity);
        }
        Some(px)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        for layer in &mut self.layers {
            layer.resize(width, height);
        }
        self.width = width;
        self.height = height;
    }

    /// Rotates every layer a quarter turn clockwise; the canvas dimensions swap.
    pub fn rotate_clockwise(&mut self) {
        for layer in &mut self.layers {
            layer.surface = imageops::rotate90(&layer.surface);
        }
        std::mem::swap(&mut self.width, &mut self.height);
    }

    pub fn flip_horizontal(&mut self) {
        for layer in &mut self.layers {
            imageops::flip_horizontal_in_place(&mut layer.surface);
        }
    }

    pub fn flip_vertical(&mut self) {
        for layer in &mut self.layers {
            imageops::flip_vertical_in_place(&mut layer.surface);
        }
    }

    pub fn clear_current(&mut self) {
        for px in self.current_mut().surface.pixels_mut() {
            *px = TRANSPARENT;
        }
    }
}
