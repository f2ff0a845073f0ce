#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod blend;
pub mod brush;
pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod grid;
pub mod input;
pub mod layer;
pub mod panels;
pub mod raster;
pub mod renderer;
pub mod selection;
pub mod shape;
pub mod sprite;
pub mod state;
pub mod symmetry;
pub mod tools;

pub use app::PaintApp;
pub use command::{Command, HistoryManager};
pub use config::EditorConfig;
pub use error::{DestructiveAction, EditorError, EditorResult};
pub use grid::{Cell, RasterGrid};
pub use input::{PointerEvent, PointerTracker};
pub use layer::{Layer, LayerStack};
pub use renderer::Renderer;
pub use state::{EditorContext, EditorMode, EditorState};
pub use symmetry::SymmetryMode;
pub use tools::Tool;
