mod context;
mod editor_state;
mod interaction;
mod persistence;
mod store;

pub use context::EditorContext;
pub use editor_state::{EditorMode, EditorState};
pub use interaction::Interaction;
pub use persistence::{
    CanvasSize, LayerRecord, PROJECT_VERSION, PersistenceError, PersistenceResult, ProjectFile, SpriteRecord,
    decode_layer, encode_layer, load_state,
};
pub use store::{AUTOSAVE_KEY, AutoSaver, DirStore, MemoryStore, ProjectStore};
