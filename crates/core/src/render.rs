//! Snapshot rendering
//!
//! Turns a [`Forest`] snapshot into a [`Frame`] of colours with a count legend,
//! and a frame into 24-bit ANSI text for terminals. Frames only read the
//! snapshot; they never touch automaton state.

use crate::cell::CellState;
use crate::forest::{CellCounts, Forest};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::str::FromStr;

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Parse a `#rrggbb` colour code (case-insensitive)
    ///
    /// # Errors
    /// Returns [`ColourParseError`] when the string is not exactly `#` followed
    /// by six hex digits.
    pub fn from_hex(code: &str) -> Result<Self, ColourParseError> {
        let invalid = || ColourParseError(code.to_string());
        let digits = code.strip_prefix('#').ok_or_else(invalid)?;
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl FromStr for Rgb {
    type Err = ColourParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Malformed colour code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColourParseError(pub String);

impl fmt::Display for ColourParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a #rrggbb colour code", self.0)
    }
}

impl std::error::Error for ColourParseError {}

/// Colour for each cell state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub tree: Rgb,
    pub fire: Rgb,
    pub ash: Rgb,
}

impl Palette {
    pub const fn colour(&self, state: CellState) -> Rgb {
        match state {
            CellState::Tree => self.tree,
            CellState::Burning => self.fire,
            CellState::Ash => self.ash,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette {
            tree: Rgb::new(0x22, 0x8b, 0x22),
            fire: Rgb::new(0xff, 0x45, 0x00),
            ash: Rgb::new(0x3c, 0x3c, 0x3c),
        }
    }
}

/// One rendered snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
    counts: CellCounts,
}

impl Frame {
    pub fn from_forest(forest: &Forest, palette: &Palette) -> Self {
        Frame {
            width: forest.width(),
            height: forest.height(),
            pixels: forest
                .cells()
                .iter()
                .map(|&state| palette.colour(state))
                .collect(),
            counts: forest.counts(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn counts(&self) -> CellCounts {
        self.counts
    }

    /// Colour at `(row, col)`, `None` when out of bounds
    pub fn pixel(&self, row: usize, col: usize) -> Option<Rgb> {
        (row < self.height && col < self.width).then(|| self.pixels[row * self.width + col])
    }

    /// Legend line with per-state counts
    pub fn legend(&self) -> String {
        format!(
            "Trees: {} | Burning: {} | Ash: {}",
            self.counts.trees, self.counts.burning, self.counts.ash
        )
    }

    /// Render as 24-bit ANSI background blocks, `cell_width` columns per cell
    ///
    /// Each row ends with a colour reset and a newline; the legend follows the
    /// last row.
    pub fn to_ansi(&self, cell_width: usize) -> String {
        let block = " ".repeat(cell_width.max(1));
        let mut out = String::with_capacity(self.pixels.len() * (20 + block.len()));
        for row in self.pixels.chunks(self.width) {
            for colour in row {
                let _ = write!(
                    out,
                    "\x1b[48;2;{};{};{}m{}",
                    colour.r, colour.g, colour.b, block
                );
            }
            out.push_str("\x1b[0m\n");
        }
        out.push_str(&self.legend());
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::GridPos;

    #[test]
    fn test_parse_hex_colour() {
        assert_eq!(Rgb::from_hex("#228B22"), Ok(Rgb::new(34, 139, 34)));
        assert_eq!("#ff4500".parse::<Rgb>(), Ok(Rgb::new(255, 69, 0)));
        assert_eq!(Rgb::new(60, 60, 60).to_string(), "#3c3c3c");
    }

    #[test]
    fn test_reject_malformed_colour() {
        for code in ["228b22", "#228b2", "#228b222", "#22zb22", "", "#"] {
            assert_eq!(
                Rgb::from_hex(code),
                Err(ColourParseError(code.to_string())),
                "{code:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_frame_colours_follow_palette() {
        let forest = Forest::new(3, 2, &[GridPos::new(1, 2)], 0.5).unwrap();
        let palette = Palette::default();
        let frame = Frame::from_forest(&forest, &palette);

        assert_eq!(frame.pixel(0, 0), Some(palette.tree));
        assert_eq!(frame.pixel(1, 2), Some(palette.fire));
        assert_eq!(frame.pixel(2, 0), None);
        assert_eq!(frame.legend(), "Trees: 5 | Burning: 1 | Ash: 0");
    }

    #[test]
    fn test_ansi_layout() {
        let forest = Forest::new(2, 3, &[], 0.5).unwrap();
        let frame = Frame::from_forest(&forest, &Palette::default());
        let ansi = frame.to_ansi(2);
        let lines: Vec<_> = ansi.lines().collect();

        assert_eq!(lines.len(), 4, "three grid rows plus legend");
        assert_eq!(lines[0].matches("\x1b[48;2;34;139;34m  ").count(), 2);
        assert!(lines[0].ends_with("\x1b[0m"));
        assert_eq!(lines[3], "Trees: 6 | Burning: 0 | Ash: 0");
    }
}
