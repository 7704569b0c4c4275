//! Forest automaton
//!
//! Owns the cell grid, the set of burning fire fronts and the running cell
//! counts. All mutation goes through [`Forest::step_advance`] and
//! [`Forest::ignite`], which keep three invariants:
//!
//! - `trees + burning + ash == width * height`, and each count matches the grid
//! - the fire fronts are in exact bijection with the `Burning` cells
//! - cells only move `Tree -> Burning -> Ash`
//!
//! # Step ordering
//!
//! Fronts ignited during a step are collected separately and only propagate on
//! the following step, so every burning cell is active for exactly one step.

use crate::cell::{CellState, GridPos};
use crate::error::ForestError;
use crate::fire_front::FireFront;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

/// Snapshot of the three per-state cell counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CellCounts {
    pub trees: usize,
    pub burning: usize,
    pub ash: usize,
}

impl CellCounts {
    pub const fn total(&self) -> usize {
        self.trees + self.burning + self.ash
    }
}

/// Check construction parameters without building a forest
///
/// Used by [`Forest::new`] and by configuration loading so both report the
/// same error for the same input.
///
/// # Errors
/// Returns the first violated precondition: [`ForestError::InvalidDimension`],
/// [`ForestError::InvalidProbability`] or [`ForestError::IgnitionOutOfBounds`].
pub fn validate_parameters(
    width: usize,
    height: usize,
    ignitions: &[GridPos],
    spread_probability: f64,
) -> Result<(), ForestError> {
    if width == 0 || height == 0 || width.checked_mul(height).is_none() {
        return Err(ForestError::InvalidDimension { width, height });
    }
    if !(0.0..=1.0).contains(&spread_probability) {
        return Err(ForestError::InvalidProbability(spread_probability));
    }
    if let Some(&pos) = ignitions.iter().find(|pos| !pos.in_bounds(width, height)) {
        return Err(ForestError::IgnitionOutOfBounds { pos, width, height });
    }
    Ok(())
}

/// Grid of cells plus the active fire
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    width: usize,
    height: usize,
    /// Row-major, `width * height` cells
    cells: Vec<CellState>,
    fronts: Vec<FireFront>,
    spread_probability: f64,
    counts: CellCounts,
}

impl Forest {
    /// Create a forest of trees with the given cells already burning
    ///
    /// Repeated ignition coordinates are ignored after the first, so the
    /// burning count equals the number of distinct positions.
    ///
    /// # Arguments
    /// * `width` - Number of columns, must be positive
    /// * `height` - Number of rows, must be positive
    /// * `ignitions` - Initially burning cells, all within bounds
    /// * `spread_probability` - Per-direction spread chance in `[0, 1]`
    ///
    /// # Errors
    /// See [`validate_parameters`].
    pub fn new(
        width: usize,
        height: usize,
        ignitions: &[GridPos],
        spread_probability: f64,
    ) -> Result<Self, ForestError> {
        validate_parameters(width, height, ignitions, spread_probability)?;

        let mut forest = Forest {
            width,
            height,
            cells: vec![CellState::Tree; width * height],
            fronts: Vec::with_capacity(ignitions.len()),
            spread_probability,
            counts: CellCounts {
                trees: width * height,
                burning: 0,
                ash: 0,
            },
        };

        for &pos in ignitions {
            let idx = forest.index(pos);
            if forest.cells[idx].is_burning() {
                debug!("Ignition point {pos} listed more than once, ignoring repeat");
                continue;
            }
            let front = forest.burn_tree(idx, pos);
            forest.fronts.push(front);
        }

        Ok(forest)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells (`width * height`)
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn spread_probability(&self) -> f64 {
        self.spread_probability
    }

    pub fn tree_count(&self) -> usize {
        self.counts.trees
    }

    pub fn burning_count(&self) -> usize {
        self.counts.burning
    }

    pub fn ash_count(&self) -> usize {
        self.counts.ash
    }

    pub fn counts(&self) -> CellCounts {
        self.counts
    }

    /// No cell is burning; further steps change nothing
    pub fn is_quiescent(&self) -> bool {
        self.counts.burning == 0
    }

    /// Row-major cell buffer for rendering
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Iterate over grid rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[CellState]> {
        self.cells.chunks(self.width)
    }

    /// State at `pos`, or `None` when out of bounds
    pub fn cell(&self, pos: GridPos) -> Option<CellState> {
        pos.in_bounds(self.width, self.height)
            .then(|| self.cells[self.index(pos)])
    }

    /// Currently burning fronts, in ignition order
    pub fn fire_fronts(&self) -> &[FireFront] {
        &self.fronts
    }

    /// Independent deep copy for the run history
    ///
    /// The copy owns its own grid buffer and front set; stepping either forest
    /// afterwards leaves the other untouched.
    pub fn copy_snapshot(&self) -> Forest {
        self.clone()
    }

    /// Ignite a tree; it starts propagating on the next step
    ///
    /// # Errors
    /// - [`ForestError::IgnitionOutOfBounds`] if `pos` is off the grid
    /// - [`ForestError::IllegalIgnition`] if the cell is burning or ash
    pub fn ignite(&mut self, pos: GridPos) -> Result<(), ForestError> {
        if !pos.in_bounds(self.width, self.height) {
            return Err(ForestError::IgnitionOutOfBounds {
                pos,
                width: self.width,
                height: self.height,
            });
        }
        let idx = self.index(pos);
        let state = self.cells[idx];
        if !state.is_flammable() {
            return Err(ForestError::IllegalIgnition { pos, state });
        }
        let front = self.burn_tree(idx, pos);
        self.fronts.push(front);
        Ok(())
    }

    /// Advance the fire by one step
    ///
    /// 1. Every front burning at the start of the step picks its targets.
    /// 2. Targets that are still trees ignite and become next step's fronts.
    /// 3. Every front from step 1 burns out to ash.
    ///
    /// Calling this on a quiescent forest is a no-op.
    pub fn step_advance<R: Rng>(&mut self, rng: &mut R) {
        let burning = std::mem::take(&mut self.fronts);
        let mut ignited = Vec::new();

        for front in &burning {
            let targets =
                front.target_neighbors(self.spread_probability, self.width, self.height, rng);
            for target in targets {
                let idx = self.index(target);
                if self.cells[idx].is_flammable() {
                    ignited.push(self.burn_tree(idx, target));
                }
            }
        }

        for front in burning {
            self.finish_combustion(front);
        }

        self.fronts = ignited;
    }

    /// Recount the grid and check it against the running counts and fronts
    ///
    /// O(`width * height`); meant for tests and debug assertions.
    pub fn is_consistent(&self) -> bool {
        let mut recount = CellCounts::default();
        for state in &self.cells {
            match state {
                CellState::Tree => recount.trees += 1,
                CellState::Burning => recount.burning += 1,
                CellState::Ash => recount.ash += 1,
            }
        }

        let fronts_match = self.fronts.len() == recount.burning
            && self
                .fronts
                .iter()
                .all(|front| self.cell(front.position()) == Some(CellState::Burning));

        recount == self.counts && recount.total() == self.cell_count() && fronts_match
    }

    fn index(&self, pos: GridPos) -> usize {
        pos.row * self.width + pos.col
    }

    /// `Tree -> Burning` at a cell already known to hold a tree
    fn burn_tree(&mut self, idx: usize, pos: GridPos) -> FireFront {
        debug_assert_eq!(self.cells[idx], CellState::Tree);
        self.cells[idx] = CellState::Burning;
        self.counts.trees -= 1;
        self.counts.burning += 1;
        FireFront::new(pos)
    }

    /// `Burning -> Ash`, consuming the front
    fn finish_combustion(&mut self, front: FireFront) {
        let idx = self.index(front.position());
        debug_assert_eq!(self.cells[idx], CellState::Burning);
        self.cells[idx] = CellState::Ash;
        self.counts.burning -= 1;
        self.counts.ash += 1;
    }
}
