//! Cell states and grid addressing
//!
//! Every position of the forest grid holds exactly one [`CellState`]. Cells only
//! move forward through `Tree -> Burning -> Ash`; ash is terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellState {
    /// Unburned vegetation, the only state that can ignite
    #[default]
    Tree,
    /// Burning for the current step, becomes ash on the next one
    Burning,
    /// Burned out (terminal)
    Ash,
}

impl CellState {
    /// Whether a fire front can ignite this cell
    pub const fn is_flammable(self) -> bool {
        matches!(self, CellState::Tree)
    }

    pub const fn is_burning(self) -> bool {
        matches!(self, CellState::Burning)
    }

    /// Lowercase name used in logs and legends
    pub const fn name(self) -> &'static str {
        match self {
            CellState::Tree => "tree",
            CellState::Burning => "burning",
            CellState::Ash => "ash",
        }
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Row/column position on the grid (`row` counts down from the top edge)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub const fn new(row: usize, col: usize) -> Self {
        GridPos { row, col }
    }

    /// Whether the position lies inside a `width x height` grid
    pub const fn in_bounds(self, width: usize, height: usize) -> bool {
        self.row < height && self.col < width
    }
}

impl From<(usize, usize)> for GridPos {
    fn from((row, col): (usize, usize)) -> Self {
        GridPos::new(row, col)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
