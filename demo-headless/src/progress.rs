//! Console progress bar and run report

use forest_fire_core::{Forest, RunReport, StepObserver};
use std::io::{self, Write};

/// Width of the bar in characters
const BAR_SIZE: usize = 50;

const SEPARATOR: &str = "--------------------";

/// Progress line for `ash` burned cells out of `total`
pub fn line(ash: usize, total: usize) -> String {
    let progress = ash as f64 / total as f64;
    let filled = (progress * BAR_SIZE as f64) as usize;
    let empty = ((1.0 - progress) * BAR_SIZE as f64) as usize;
    format!(
        "Estimated progress: {:.2}% | [{}{}]",
        progress * 100.0,
        "#".repeat(filled),
        " ".repeat(empty)
    )
}

/// Report printed once the run is quiescent
pub fn report(report: &RunReport) -> String {
    format!(
        "Simulation computed ({:.3}s)\nBurned trees: {} of {} ({:.2}%)",
        report.elapsed.as_secs_f64(),
        report.burned,
        report.total_cells,
        report.burned_percentage()
    )
}

/// Prints estimated progress (share of the forest turned to ash) while a run
/// is computed, then a short report. Silent when disabled.
///
/// Observer callbacks cannot fail, so the first write error is kept and
/// returned by [`ProgressBar::finish`]. Output stops after it.
pub struct ProgressBar<W: Write> {
    out: W,
    enabled: bool,
    error: Option<io::Error>,
}

impl<W: Write> ProgressBar<W> {
    pub fn new(out: W, enabled: bool) -> Self {
        ProgressBar {
            out,
            enabled,
            error: None,
        }
    }

    /// # Errors
    /// Returns the first write failure seen during the run.
    pub fn finish(self) -> io::Result<()> {
        self.error.map_or(Ok(()), Err)
    }

    fn emit(&mut self, text: &str) {
        if !self.enabled || self.error.is_some() {
            return;
        }
        if let Err(e) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
        {
            self.error = Some(e);
        }
    }
}

impl<W: Write> StepObserver for ProgressBar<W> {
    fn on_start(&mut self, _forest: &Forest) {
        self.emit(&format!("{SEPARATOR}\nComputing simulation...\n"));
    }

    fn on_step(&mut self, forest: &Forest) {
        self.emit(&format!("{}\r", line(forest.ash_count(), forest.cell_count())));
    }

    fn on_finish(&mut self, _forest: &Forest, run: &RunReport) {
        self.emit(&format!(
            "Estimated progress: 100.00% | [{}]\n{SEPARATOR}\n{}\n",
            "#".repeat(BAR_SIZE),
            report(run)
        ));
    }
}

/// Banner shown before rendering starts
pub fn announce_display(enabled: bool) {
    if enabled {
        println!("{SEPARATOR}");
        println!("Starting display...");
    }
}

/// Banner shown just before exit
pub fn announce_end(enabled: bool) {
    if enabled {
        println!("{SEPARATOR}");
        println!("Simulation finished.");
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use forest_fire_core::{run_simulation, GridPos};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run_with<W: Write>(bar: &mut ProgressBar<W>) {
        let forest = Forest::new(3, 1, &[GridPos::new(0, 0)], 1.0).unwrap();
        run_simulation(forest, &mut StdRng::seed_from_u64(0), bar);
    }

    #[test]
    fn test_line_at_start() {
        assert_eq!(
            line(0, 200),
            format!("Estimated progress: 0.00% | [{}]", " ".repeat(50))
        );
    }

    #[test]
    fn test_line_half_way() {
        let line = line(50, 100);
        assert_eq!(
            line,
            format!(
                "Estimated progress: 50.00% | [{}{}]",
                "#".repeat(25),
                " ".repeat(25)
            )
        );
    }

    #[test]
    fn test_report_text() {
        let report = RunReport {
            steps: 12,
            elapsed: Duration::from_millis(1500),
            total_cells: 400,
            burned: 123,
        };
        assert_eq!(
            super::report(&report),
            "Simulation computed (1.500s)\nBurned trees: 123 of 400 (30.75%)"
        );
    }

    #[test]
    fn test_bar_writes_progress_and_report() {
        let mut bar = ProgressBar::new(Vec::new(), true);
        run_with(&mut bar);
        let text = String::from_utf8(bar.out).unwrap();

        assert!(text.starts_with(&format!("{SEPARATOR}\nComputing simulation...\n")));
        assert!(text.contains("Estimated progress: 100.00%"));
        assert!(text.contains("Burned trees: 3 of 3 (100.00%)"));
    }

    #[test]
    fn test_disabled_bar_is_silent() {
        let mut bar = ProgressBar::new(Vec::new(), false);
        run_with(&mut bar);
        assert!(bar.out.is_empty());
        assert!(bar.finish().is_ok());
    }

    #[test]
    fn test_write_error_surfaces_on_finish() {
        let mut bar = ProgressBar::new(BrokenPipe, true);
        run_with(&mut bar);
        let err = bar.finish().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
