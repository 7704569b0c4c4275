//! Fire front: one currently burning cell
//!
//! A [`FireFront`] exists exactly as long as its cell is `Burning`. Each step it
//! runs one Bernoulli trial per cardinal direction to decide which neighbours
//! it tries to ignite. The front never inspects the grid; whether a target is
//! still a tree is decided by the forest.

use crate::cell::GridPos;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Cardinal spread direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// row - 1
    North,
    /// row + 1
    South,
    /// col - 1
    West,
    /// col + 1
    East,
}

impl Direction {
    /// Draw order used by [`FireFront::target_neighbors`]. Changing it changes
    /// which random sample maps to which neighbour for a given seed.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Neighbour of `pos` in this direction, or `None` past the grid edge
    pub fn step(self, pos: GridPos, width: usize, height: usize) -> Option<GridPos> {
        let neighbour = match self {
            Direction::North => GridPos::new(pos.row.checked_sub(1)?, pos.col),
            Direction::South => GridPos::new(pos.row + 1, pos.col),
            Direction::West => GridPos::new(pos.row, pos.col.checked_sub(1)?),
            Direction::East => GridPos::new(pos.row, pos.col + 1),
        };
        neighbour.in_bounds(width, height).then_some(neighbour)
    }
}

/// A burning cell driving propagation for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FireFront {
    position: GridPos,
}

impl FireFront {
    pub const fn new(position: GridPos) -> Self {
        FireFront { position }
    }

    pub const fn position(&self) -> GridPos {
        self.position
    }

    /// Neighbours this front tries to ignite during the current step
    ///
    /// One uniform sample in `[0, 1)` is drawn per direction, in
    /// [`Direction::ALL`] order, and the neighbour is targeted when the sample is
    /// strictly below `spread_probability`. All four samples are always drawn so
    /// the random stream does not depend on where the front sits; targets past
    /// the grid edge are dropped afterwards.
    ///
    /// # Arguments
    /// * `spread_probability` - Per-direction ignition chance, assumed in `[0, 1]`
    /// * `width` - Grid width in cells
    /// * `height` - Grid height in cells
    /// * `rng` - Random source for the Bernoulli trials
    pub fn target_neighbors<R: Rng>(
        &self,
        spread_probability: f64,
        width: usize,
        height: usize,
        rng: &mut R,
    ) -> Vec<GridPos> {
        let mut targets = Vec::with_capacity(Direction::ALL.len());
        for direction in Direction::ALL {
            let hit = rng.random::<f64>() < spread_probability;
            if !hit {
                continue;
            }
            if let Some(neighbour) = direction.step(self.position, width, height) {
                targets.push(neighbour);
            }
        }
        targets
    }
}
