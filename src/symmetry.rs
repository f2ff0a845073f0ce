use serde::{Deserialize, Serialize};

/// Mirroring applied by symmetric tools.
///
/// `Horizontal` mirrors across the horizontal midline (y flips),
/// `Vertical` across the vertical midline (x flips).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymmetryMode {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

/// A single mirror transform over a `width × height` canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reflection {
    pub flip_x: bool,
    pub flip_y: bool,
}

impl Reflection {
    pub fn apply(self, x: i32, y: i32, width: usize, height: usize) -> (i32, i32) {
        let mx = if self.flip_x { width as i32 - 1 - x } else { x };
        let my = if self.flip_y { height as i32 - 1 - y } else { y };
        (mx, my)
    }
}

const HORIZONTAL: Reflection = Reflection {
    flip_x: false,
    flip_y: true,
};
const VERTICAL: Reflection = Reflection {
    flip_x: true,
    flip_y: false,
};
const DIAGONAL: Reflection = Reflection {
    flip_x: true,
    flip_y: true,
};

impl SymmetryMode {
    pub fn all() -> &'static [SymmetryMode] {
        &[Self::None, Self::Horizontal, Self::Vertical, Self::Both]
    }

    /// Cycle to the next mode.
    pub fn next(self) -> Self {
        match self {
            Self::None => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Both,
            Self::Both => Self::None,
        }
    }

    /// The mirror transforms this mode adds on top of the original stroke.
    pub fn reflections(self) -> &'static [Reflection] {
        match self {
            Self::None => &[],
            Self::Horizontal => &[HORIZONTAL],
            Self::Vertical => &[VERTICAL],
            // The doubly mirrored point is a third, separate position.
            Self::Both => &[HORIZONTAL, VERTICAL, DIAGONAL],
        }
    }

    /// Mirrored copies of `(x, y)`, never including `(x, y)` itself and
    /// without repeats (points on a midline mirror onto themselves).
    pub fn positions_for(self, x: i32, y: i32, width: usize, height: usize) -> Vec<(i32, i32)> {
        let mut out: Vec<(i32, i32)> = Vec::with_capacity(3);
        for reflection in self.reflections() {
            let p = reflection.apply(x, y, width, height);
            if p != (x, y) && !out.contains(&p) {
                out.push(p);
            }
        }
        out
    }
}
