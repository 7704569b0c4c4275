//! Simulation driver
//!
//! Runs a [`Forest`] to quiescence and keeps a deep snapshot of every state,
//! starting with the initial one. Renderers replay the resulting
//! [`SimulationHistory`]; progress reporters hook in through [`StepObserver`].

use crate::forest::Forest;
use rand::Rng;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Callbacks invoked while a run is computed
pub trait StepObserver {
    /// Called once before the first step with the initial forest
    fn on_start(&mut self, _forest: &Forest) {}

    /// Called after every step
    fn on_step(&mut self, forest: &Forest);

    /// Called once after quiescence is reached
    fn on_finish(&mut self, _forest: &Forest, _report: &RunReport) {}
}

impl StepObserver for () {
    fn on_step(&mut self, _forest: &Forest) {}
}

/// Summary of a completed run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    /// Number of `step_advance` calls
    pub steps: usize,
    /// Wall time spent computing the run
    pub elapsed: Duration,
    pub total_cells: usize,
    /// Cells reduced to ash
    pub burned: usize,
}

impl RunReport {
    /// Share of the forest reduced to ash, in percent
    pub fn burned_percentage(&self) -> f64 {
        self.burned as f64 * 100.0 / self.total_cells as f64
    }
}

/// Every state of one run, initial state first
#[derive(Debug, Clone)]
pub struct SimulationHistory {
    snapshots: Vec<Forest>,
    report: RunReport,
}

impl SimulationHistory {
    pub fn snapshots(&self) -> &[Forest] {
        &self.snapshots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Forest> {
        self.snapshots.iter()
    }

    /// Number of steps taken (one less than the number of snapshots)
    pub fn steps(&self) -> usize {
        self.snapshots.len() - 1
    }

    pub fn initial(&self) -> &Forest {
        &self.snapshots[0]
    }

    /// Quiescent final state
    pub fn last(&self) -> &Forest {
        &self.snapshots[self.snapshots.len() - 1]
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }
}

impl<'a> IntoIterator for &'a SimulationHistory {
    type Item = &'a Forest;
    type IntoIter = std::slice::Iter<'a, Forest>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}

/// Run `forest` until no cell is burning
///
/// A snapshot is recorded before the first step and after each step. The
/// number of steps is bounded by the cell count since every step turns at
/// least one burning cell to ash; the loop stops there regardless.
///
/// # Arguments
/// * `forest` - Initial state, consumed
/// * `rng` - Random source for spread trials
/// * `observer` - Progress hooks, `&mut ()` for none
pub fn run_simulation<R: Rng, O: StepObserver + ?Sized>(
    mut forest: Forest,
    rng: &mut R,
    observer: &mut O,
) -> SimulationHistory {
    let max_steps = forest.cell_count() + 1;
    info!(
        "Computing simulation: {}x{} forest, {} initial fires, p = {}",
        forest.width(),
        forest.height(),
        forest.burning_count(),
        forest.spread_probability()
    );

    let start = Instant::now();
    let mut snapshots = vec![forest.copy_snapshot()];
    observer.on_start(&forest);

    while !forest.is_quiescent() {
        if snapshots.len() > max_steps {
            warn!(
                "Fire still burning after {} steps, stopping",
                snapshots.len() - 1
            );
            break;
        }
        forest.step_advance(rng);
        debug!(
            step = snapshots.len(),
            trees = forest.tree_count(),
            burning = forest.burning_count(),
            ash = forest.ash_count(),
            "Step complete"
        );
        snapshots.push(forest.copy_snapshot());
        observer.on_step(&forest);
    }

    let report = RunReport {
        steps: snapshots.len() - 1,
        elapsed: start.elapsed(),
        total_cells: forest.cell_count(),
        burned: forest.ash_count(),
    };
    info!(
        "Simulation quiescent after {} steps: {} of {} cells burned ({:.2}%)",
        report.steps,
        report.burned,
        report.total_cells,
        report.burned_percentage()
    );
    observer.on_finish(&forest, &report);

    SimulationHistory { snapshots, report }
}
