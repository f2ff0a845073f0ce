use crate::error::{EditorError, EditorResult};
use crate::grid::RasterGrid;

/// A named saved grid. `grid == None` means the sprite has never been
/// drawn on and starts blank when switched to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub name: String,
    pub grid: Option<RasterGrid>,
}

impl Sprite {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            grid: None,
        }
    }

    fn has_content(&self) -> bool {
        self.grid.as_ref().is_some_and(|g| !g.is_blank())
    }
}

/// The project's ordered sprites. Exactly one is current, and its content
/// lives in the editor's live grid rather than in its slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteSheet {
    sprites: Vec<Sprite>,
    current: usize,
}

impl Default for SpriteSheet {
    fn default() -> Self {
        Self::new()
    }
}

impl SpriteSheet {
    pub fn new() -> Self {
        Self {
            sprites: vec![Sprite::new("Sprite 1")],
            current: 0,
        }
    }

    /// An empty list yields a single default sprite.
    pub fn from_sprites(sprites: Vec<Sprite>, current: usize) -> Self {
        if sprites.is_empty() {
            return Self::new();
        }
        let current = current.min(sprites.len() - 1);
        Self { sprites, current }
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Sprite {
        &self.sprites[self.current]
    }

    fn check(&self, index: usize) -> EditorResult<()> {
        if index < self.sprites.len() {
            Ok(())
        } else {
            Err(EditorError::NoSuchSprite(index))
        }
    }

    /// Writes the live grid into the current sprite's slot.
    pub fn store_current(&mut self, live: &RasterGrid) {
        self.sprites[self.current].grid = Some(live.clone());
    }

    /// Saves the live grid into the outgoing sprite and loads the incoming
    /// one, or a blank grid of the live size if it was never drawn on.
    pub fn switch_to(&mut self, index: usize, live: &mut RasterGrid) -> EditorResult<()> {
        self.check(index)?;
        if index == self.current {
            return Ok(());
        }
        self.store_current(live);
        self.current = index;
        *live = match &self.sprites[index].grid {
            Some(grid) => grid.clone(),
            None => RasterGrid::new(live.width(), live.height()),
        };
        log::debug!("Switched to sprite {index} ({})", self.sprites[index].name);
        Ok(())
    }

    /// Appends a blank sprite and switches to it.
    pub fn add(&mut self, name: &str, live: &mut RasterGrid) -> usize {
        self.sprites.push(Sprite::new(name));
        let index = self.sprites.len() - 1;
        // cannot fail: the index was just pushed
        let _ = self.switch_to(index, live);
        index
    }

    /// Copies a sprite (the live grid, if it is the current one) to the end
    /// of the list and switches to the copy.
    pub fn duplicate(&mut self, index: usize, live: &mut RasterGrid) -> EditorResult<usize> {
        self.check(index)?;
        self.store_current(live);
        let mut copy = self.sprites[index].clone();
        copy.name = format!("{} copy", copy.name);
        self.sprites.push(copy);
        let new_index = self.sprites.len() - 1;
        self.switch_to(new_index, live)?;
        Ok(new_index)
    }

    /// Deletes a sprite. Refused for the last one. When the current sprite
    /// goes, its neighbour is loaded into the live grid.
    pub fn delete(&mut self, index: usize, live: &mut RasterGrid) -> EditorResult<Sprite> {
        self.check(index)?;
        if self.sprites.len() <= 1 {
            return Err(EditorError::LastSprite);
        }
        if index == self.current {
            self.store_current(live);
            let removed = self.sprites.remove(index);
            self.current = index.min(self.sprites.len() - 1);
            *live = match &self.sprites[self.current].grid {
                Some(grid) => grid.clone(),
                None => RasterGrid::new(live.width(), live.height()),
            };
            Ok(removed)
        } else {
            let removed = self.sprites.remove(index);
            if self.current > index {
                self.current -= 1;
            }
            Ok(removed)
        }
    }

    pub fn rename(&mut self, index: usize, name: String) -> EditorResult<()> {
        self.check(index)?;
        self.sprites[index].name = name;
        Ok(())
    }

    /// Whether deleting `index` would lose drawn content.
    pub fn has_content(&self, index: usize, live: &RasterGrid) -> bool {
        if index == self.current {
            !live.is_blank()
        } else {
            self.sprites.get(index).is_some_and(Sprite::has_content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    #[test]
    fn switching_round_trips_content() {
        let mut live = RasterGrid::new(4, 4);
        let mut sheet = SpriteSheet::new();
        live.set(1, 1, Some(Color32::RED));
        sheet.add("Sprite 2", &mut live);
        assert!(live.is_blank());
        live.set(2, 2, Some(Color32::BLUE));
        sheet.switch_to(0, &mut live).unwrap();
        assert_eq!(live.get(1, 1), Some(Color32::RED));
        assert_eq!(live.get(2, 2), None);
        sheet.switch_to(1, &mut live).unwrap();
        assert_eq!(live.get(2, 2), Some(Color32::BLUE));
    }

    #[test]
    fn last_sprite_is_kept() {
        let mut live = RasterGrid::new(2, 2);
        let mut sheet = SpriteSheet::new();
        assert!(matches!(sheet.delete(0, &mut live), Err(EditorError::LastSprite)));
        assert!(matches!(sheet.switch_to(3, &mut live), Err(EditorError::NoSuchSprite(3))));
    }

    #[test]
    fn deleting_current_loads_neighbour() {
        let mut live = RasterGrid::new(2, 2);
        let mut sheet = SpriteSheet::new();
        live.set(0, 0, Some(Color32::RED));
        sheet.add("Sprite 2", &mut live);
        live.set(1, 1, Some(Color32::BLUE));
        sheet.delete(1, &mut live).unwrap();
        assert_eq!(sheet.current_index(), 0);
        assert_eq!(live.get(0, 0), Some(Color32::RED));
    }

    #[test]
    fn duplicate_copies_live_grid() {
        let mut live = RasterGrid::new(2, 2);
        let mut sheet = SpriteSheet::new();
        live.set(0, 1, Some(Color32::GREEN));
        let copy = sheet.duplicate(0, &mut live).unwrap();
        assert_eq!(copy, 1);
        assert_eq!(sheet.current().name, "Sprite 1 copy");
        assert_eq!(live.get(0, 1), Some(Color32::GREEN));
    }
}
