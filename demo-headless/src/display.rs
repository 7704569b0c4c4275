//! Terminal playback of a simulation history

use forest_fire_core::{DisplayConfig, Forest, Frame, Palette, SimulationHistory, WindowConfig};
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

/// Assumed pixel width of one terminal column when sizing from the window
const PIXELS_PER_COLUMN: usize = 8;

/// Terminal columns per cell when the window is extended
const NATIVE_CELL_WIDTH: usize = 2;

const MAX_CELL_WIDTH: usize = 4;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

pub struct TerminalDisplay {
    palette: Palette,
    cell_width: usize,
    frame_interval: Duration,
}

impl TerminalDisplay {
    pub fn new(display: &DisplayConfig, grid_width: usize) -> Self {
        TerminalDisplay {
            palette: display.palette,
            cell_width: cell_width(&display.window, grid_width),
            frame_interval: display.frame_interval(),
        }
    }

    fn render(&self, forest: &Forest) -> String {
        Frame::from_forest(forest, &self.palette).to_ansi(self.cell_width)
    }

    /// Play every snapshot in order, one frame per interval
    ///
    /// # Errors
    /// Propagates write failures on `out`.
    pub fn play<W: Write>(&self, history: &SimulationHistory, out: &mut W) -> io::Result<()> {
        for (step, forest) in history.iter().enumerate() {
            write!(out, "{CLEAR_SCREEN}Step {step}/{}\n{}", history.steps(), self.render(forest))?;
            out.flush()?;
            if step < history.steps() {
                thread::sleep(self.frame_interval);
            }
        }
        Ok(())
    }

    /// Show only the initial and final states
    ///
    /// # Errors
    /// Propagates write failures on `out`.
    pub fn show_start_and_final<W: Write>(
        &self,
        history: &SimulationHistory,
        out: &mut W,
    ) -> io::Result<()> {
        writeln!(out, "Initial state")?;
        write!(out, "{}", self.render(history.initial()))?;
        writeln!(out, "Final state (step {})", history.steps())?;
        write!(out, "{}", self.render(history.last()))?;
        out.flush()
    }
}

/// Terminal columns per cell so the grid fits the configured window width
fn cell_width(window: &WindowConfig, grid_width: usize) -> usize {
    if window.extend {
        return NATIVE_CELL_WIDTH;
    }
    let columns = window.width as usize / PIXELS_PER_COLUMN;
    (columns / grid_width.max(1)).clamp(1, MAX_CELL_WIDTH)
}
