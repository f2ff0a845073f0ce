use std::collections::VecDeque;

use crate::grid::RasterGrid;
use crate::layer::LayerStack;
use crate::sprite::SpriteSheet;
use crate::state::{EditorMode, EditorState};

/// Deep copy of the mode-appropriate part of the editor state.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Pixel { grid: RasterGrid, sprites: SpriteSheet },
    Sketch { layers: LayerStack },
}

impl Snapshot {
    pub fn capture(state: &EditorState) -> Self {
        match state.mode {
            EditorMode::Pixel => Self::Pixel {
                grid: state.grid.clone(),
                sprites: state.sprites.clone(),
            },
            EditorMode::Sketch => Self::Sketch {
                layers: state.layers.clone(),
            },
        }
    }

    /// Swaps the snapshot into the state. A sketch restore drops the
    /// selection, whose captured pixels belong to the replaced surfaces.
    pub fn restore_into(self, state: &mut EditorState) {
        match self {
            Self::Pixel { grid, sprites } => {
                state.grid = grid;
                state.sprites = sprites;
            }
            Self::Sketch { layers } => {
                state.layers = layers;
                state.selection = None;
            }
        }
    }
}

/// One undo step.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// What the user did, e.g. "Pencil" or "Add layer"
    pub label: String,
    pub snapshot: Snapshot,
}

impl HistoryEntry {
    pub fn capture(label: impl Into<String>, state: &EditorState) -> Self {
        Self {
            label: label.into(),
            snapshot: Snapshot::capture(state),
        }
    }
}

/// Snapshot-based undo/redo with bounded stacks.
///
/// When the undo stack is full the oldest entry is dropped; history never
/// fails for lack of room.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(50)
    }
}

impl HistoryManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records an entry taken before a mutation. Clears the redo stack.
    pub fn push(&mut self, entry: HistoryEntry) {
        log::debug!("History push: {}", entry.label);
        self.redo_stack.clear();
        self.undo_stack.push_back(entry);
        while self.undo_stack.len() > self.capacity {
            self.undo_stack.pop_front();
        }
    }

    /// Captures `state` and pushes it.
    pub fn snapshot(&mut self, label: impl Into<String>, state: &EditorState) {
        self.push(HistoryEntry::capture(label, state));
    }

    /// Restores the most recent entry. Returns its label, or `None` when
    /// there was nothing to undo.
    pub fn undo(&mut self, state: &mut EditorState) -> Option<String> {
        let entry = self.undo_stack.pop_back()?;
        let label = entry.label.clone();
        Self::bounded_push(
            &mut self.redo_stack,
            HistoryEntry::capture(label.clone(), state),
            self.capacity,
        );
        entry.snapshot.restore_into(state);
        log::debug!("Undo: {label}");
        Some(label)
    }

    pub fn redo(&mut self, state: &mut EditorState) -> Option<String> {
        let entry = self.redo_stack.pop_back()?;
        let label = entry.label.clone();
        Self::bounded_push(
            &mut self.undo_stack,
            HistoryEntry::capture(label.clone(), state),
            self.capacity,
        );
        entry.snapshot.restore_into(state);
        log::debug!("Redo: {label}");
        Some(label)
    }

    fn bounded_push(stack: &mut VecDeque<HistoryEntry>, entry: HistoryEntry, capacity: usize) {
        stack.push_back(entry);
        while stack.len() > capacity {
            stack.pop_front();
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|e| e.label.as_str())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.back().map(|e| e.label.as_str())
    }

    /// Undo entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.undo_stack.iter()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    #[test]
    fn undo_then_redo_round_trips() {
        let mut state = EditorState::default();
        let mut history = HistoryManager::default();
        history.snapshot("Pencil", &state);
        state.grid.set(0, 0, Some(Color32::RED));
        let after = state.grid.clone();

        assert_eq!(history.undo(&mut state).as_deref(), Some("Pencil"));
        assert!(state.grid.is_blank());
        assert_eq!(history.redo(&mut state).as_deref(), Some("Pencil"));
        assert_eq!(state.grid, after);
    }

    #[test]
    fn empty_stacks_are_no_ops() {
        let mut state = EditorState::default();
        let mut history = HistoryManager::default();
        assert!(history.undo(&mut state).is_none());
        assert!(history.redo(&mut state).is_none());
    }

    #[test]
    fn new_push_clears_redo() {
        let mut state = EditorState::default();
        let mut history = HistoryManager::default();
        history.snapshot("a", &state);
        history.undo(&mut state);
        assert!(history.can_redo());
        history.snapshot("b", &state);
        assert!(!history.can_redo());
    }

    #[test]
    fn oldest_entry_is_evicted() {
        let state = EditorState::default();
        let mut history = HistoryManager::new(3);
        for i in 1..=4 {
            history.snapshot(format!("#{i}"), &state);
        }
        assert_eq!(history.undo_count(), 3);
        assert_eq!(history.entries().next().map(|e| e.label.as_str()), Some("#2"));
    }

    #[test]
    fn sketch_restore_drops_selection() {
        let mut state = EditorState::default();
        state.mode = EditorMode::Sketch;
        let snapshot = Snapshot::capture(&state);
        state.selection = Some(crate::selection::Selection::new(crate::selection::SelectionRect {
            x: 0,
            y: 0,
            width: 10,
            height: 10,
        }));
        snapshot.restore_into(&mut state);
        assert!(state.selection.is_none());
    }
}
