//! Forest Fire Core Library
//!
//! A stochastic cellular automaton for wildfire spread on a rectangular grid.
//! Each burning cell tries to ignite each of its four orthogonal neighbours
//! with a fixed probability per step, then turns to ash.
//!
//! ## Layout
//!
//! - [`cell`] - cell states and grid positions
//! - [`fire_front`] - per-cell spread trials
//! - [`forest`] - the automaton: grid, fronts, counts and the step transition
//! - [`simulation`] - runs a forest to quiescence and records every snapshot
//! - [`config`] - JSON configuration loading and validation
//! - [`render`] - snapshot to colour frame conversion
//!
//! ## Example
//!
//! ```rust
//! use forest_fire_core::{run_simulation, Forest, GridPos};
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let forest = Forest::new(20, 10, &[GridPos::new(5, 10)], 0.6).unwrap();
//! let history = run_simulation(forest, &mut StdRng::seed_from_u64(42), &mut ());
//! assert!(history.last().is_quiescent());
//! ```

pub mod cell;
#[allow(clippy::module_name_repetitions)]
pub mod config;
#[allow(clippy::module_name_repetitions)]
pub mod error;
#[allow(clippy::module_name_repetitions)]
pub mod fire_front;
pub mod forest;
pub mod render;
#[allow(clippy::module_name_repetitions)]
pub mod simulation;

pub use cell::{CellState, GridPos};
pub use config::{ConfigError, DisplayConfig, ForestParams, SimulationConfig, WindowConfig};
pub use error::ForestError;
pub use fire_front::{Direction, FireFront};
pub use forest::{CellCounts, Forest};
pub use render::{ColourParseError, Frame, Palette, Rgb};
pub use simulation::{run_simulation, RunReport, SimulationHistory, StepObserver};
