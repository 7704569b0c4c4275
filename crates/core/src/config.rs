//! Simulation configuration file
//!
//! Loads and validates the JSON file that supplies the forest parameters,
//! the starting fires and the display settings. Every parameter is checked
//! explicitly and reported with its name; nothing is clamped silently.
//!
//! # Format
//!
//! ```json
//! {
//!   "simulation": {
//!     "forest": { "width": 100, "height": 80, "spread_probability": 0.6 },
//!     "starting_fires": [{ "row": 40, "col": 50 }],
//!     "seed": 42
//!   },
//!   "display": {
//!     "console_logs": true,
//!     "play_animation": true,
//!     "max_fps": 20.0,
//!     "colours": { "tree": "#228b22", "fire": "#ff4500", "ash": "#3c3c3c" },
//!     "window": { "extend": false, "width": 800, "height": 600 }
//!   }
//! }
//! ```
//!
//! `seed` and the whole `display` section are optional.

use crate::cell::GridPos;
use crate::error::ForestError;
use crate::forest::{validate_parameters, Forest};
use crate::render::{ColourParseError, Palette, Rgb};
use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Default configuration file name, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config-sim.json";

/// Validated simulation configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub forest: ForestParams,
    /// Distinct starting fires, in file order
    pub starting_fires: Vec<GridPos>,
    /// Fixed seed for reproducible runs, `None` for an entropy seed
    pub seed: Option<u64>,
    pub display: DisplayConfig,
}

/// Forest construction parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestParams {
    pub width: usize,
    pub height: usize,
    pub spread_probability: f64,
}

/// Console and rendering settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayConfig {
    /// Print progress bar and run report
    pub console_logs: bool,
    /// Play every snapshot instead of only the first and last
    pub play_animation: bool,
    /// Upper bound on animation frame rate
    pub max_fps: f64,
    pub palette: Palette,
    pub window: WindowConfig,
}

impl DisplayConfig {
    /// Delay between animation frames: `floor(1000 / max_fps)` milliseconds
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis((1000.0 / self.max_fps).floor() as u64)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            console_logs: true,
            play_animation: false,
            max_fps: 10.0,
            palette: Palette::default(),
            window: WindowConfig::default(),
        }
    }
}

/// Viewport sizing hint for renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Use all available space instead of `width x height`
    pub extend: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            extend: true,
            width: 800,
            height: 600,
        }
    }
}

impl SimulationConfig {
    /// Read and validate a configuration file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, otherwise any error from
    /// [`SimulationConfig::from_json_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&contents)
    }

    /// Parse and validate configuration text
    ///
    /// # Errors
    /// - [`ConfigError::Parse`] for malformed JSON or wrongly typed values
    /// - [`ConfigError::MissingParameter`] for absent required parameters
    /// - [`ConfigError::InvalidParameter`] for out-of-range values
    /// - [`ConfigError::InvalidColour`] for bad colour codes
    /// - [`ConfigError::Forest`] when the forest parameters are rejected
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let simulation = raw
            .simulation
            .ok_or(ConfigError::MissingParameter("simulation"))?;
        let forest = parse_forest(
            simulation
                .forest
                .as_ref()
                .ok_or(ConfigError::MissingParameter("simulation.forest"))?,
        )?;
        let fires = simulation
            .starting_fires
            .as_deref()
            .ok_or(ConfigError::MissingParameter("simulation.starting_fires"))?;
        let starting_fires = parse_fires(fires)?;

        validate_parameters(
            forest.width,
            forest.height,
            &starting_fires,
            forest.spread_probability,
        )?;

        let display = match &raw.display {
            Some(display) => parse_display(display)?,
            None => DisplayConfig::default(),
        };

        Ok(SimulationConfig {
            forest,
            starting_fires,
            seed: simulation.seed,
            display,
        })
    }

    /// Build the initial forest described by this configuration
    ///
    /// # Errors
    /// Only if the configuration was modified after validation so that the
    /// forest parameters are no longer valid.
    pub fn build_forest(&self) -> Result<Forest, ForestError> {
        Forest::new(
            self.forest.width,
            self.forest.height,
            &self.starting_fires,
            self.forest.spread_probability,
        )
    }
}

fn parse_forest(raw: &RawForest) -> Result<ForestParams, ConfigError> {
    let width = raw
        .width
        .ok_or(ConfigError::MissingParameter("simulation.forest.width"))?;
    let height = raw
        .height
        .ok_or(ConfigError::MissingParameter("simulation.forest.height"))?;
    let spread_probability = raw.spread_probability.ok_or(ConfigError::MissingParameter(
        "simulation.forest.spread_probability",
    ))?;

    Ok(ForestParams {
        width: non_negative("simulation.forest.width", width)?,
        height: non_negative("simulation.forest.height", height)?,
        spread_probability,
    })
}

/// Coordinates in file order with repeats dropped
fn parse_fires(raw: &[RawFire]) -> Result<Vec<GridPos>, ConfigError> {
    let mut seen = FxHashSet::default();
    let mut fires = Vec::with_capacity(raw.len());
    for fire in raw {
        let row = fire
            .row
            .ok_or(ConfigError::MissingParameter("simulation.starting_fires[].row"))?;
        let col = fire
            .col
            .ok_or(ConfigError::MissingParameter("simulation.starting_fires[].col"))?;
        let pos = GridPos::new(
            non_negative("simulation.starting_fires[].row", row)?,
            non_negative("simulation.starting_fires[].col", col)?,
        );
        if seen.insert(pos) {
            fires.push(pos);
        } else {
            warn!("Starting fire {pos} listed more than once, keeping the first");
        }
    }
    Ok(fires)
}

fn parse_display(raw: &RawDisplay) -> Result<DisplayConfig, ConfigError> {
    let defaults = DisplayConfig::default();

    let max_fps = raw.max_fps.unwrap_or(defaults.max_fps);
    if !max_fps.is_finite() || max_fps <= 0.0 {
        return Err(ConfigError::InvalidParameter {
            name: "display.max_fps",
            reason: format!("must be a positive number, got {max_fps}"),
        });
    }

    let palette = match &raw.colours {
        Some(colours) => Palette {
            tree: parse_colour("display.colours.tree", colours.tree.as_deref())?,
            fire: parse_colour("display.colours.fire", colours.fire.as_deref())?,
            ash: parse_colour("display.colours.ash", colours.ash.as_deref())?,
        },
        None => defaults.palette,
    };

    let window = match &raw.window {
        Some(window) => parse_window(window)?,
        None => defaults.window,
    };
    if !window.extend && (window.width == 0 || window.height == 0) {
        return Err(ConfigError::InvalidParameter {
            name: "display.window",
            reason: format!(
                "width and height must be positive, got {}x{}",
                window.width, window.height
            ),
        });
    }

    Ok(DisplayConfig {
        console_logs: raw.console_logs.unwrap_or(defaults.console_logs),
        play_animation: raw.play_animation.unwrap_or(defaults.play_animation),
        max_fps,
        palette,
        window,
    })
}

fn parse_colour(name: &'static str, code: Option<&str>) -> Result<Rgb, ConfigError> {
    let code = code.ok_or(ConfigError::MissingParameter(name))?;
    Rgb::from_hex(code).map_err(|source| ConfigError::InvalidColour { name, source })
}

fn parse_window(raw: &RawWindow) -> Result<WindowConfig, ConfigError> {
    Ok(WindowConfig {
        extend: raw
            .extend
            .ok_or(ConfigError::MissingParameter("display.window.extend"))?,
        width: raw
            .width
            .ok_or(ConfigError::MissingParameter("display.window.width"))?,
        height: raw
            .height
            .ok_or(ConfigError::MissingParameter("display.window.height"))?,
    })
}

fn non_negative(name: &'static str, value: i64) -> Result<usize, ConfigError> {
    usize::try_from(value).map_err(|_| ConfigError::InvalidParameter {
        name,
        reason: format!("must be a non-negative integer, got {value}"),
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    simulation: Option<RawSimulation>,
    display: Option<RawDisplay>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSimulation {
    forest: Option<RawForest>,
    starting_fires: Option<Vec<RawFire>>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawForest {
    width: Option<i64>,
    height: Option<i64>,
    spread_probability: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFire {
    row: Option<i64>,
    col: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDisplay {
    console_logs: Option<bool>,
    play_animation: Option<bool>,
    max_fps: Option<f64>,
    colours: Option<RawColours>,
    window: Option<RawWindow>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawColours {
    tree: Option<String>,
    fire: Option<String>,
    ash: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWindow {
    extend: Option<bool>,
    width: Option<u32>,
    height: Option<u32>,
}

/// Errors that can occur while loading a configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// File could not be read
    Io { path: String, message: String },
    /// Malformed JSON or a value of the wrong type
    Parse(String),
    /// Required parameter absent (dotted path)
    MissingParameter(&'static str),
    /// Parameter present but out of range
    InvalidParameter { name: &'static str, reason: String },
    /// Colour code not in `#rrggbb` form
    InvalidColour {
        name: &'static str,
        source: ColourParseError,
    },
    /// Forest parameters rejected by the automaton
    Forest(ForestError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "Failed to read configuration file '{path}': {message}")
            }
            ConfigError::Parse(msg) => write!(f, "Failed to parse configuration: {msg}"),
            ConfigError::MissingParameter(name) => write!(f, "Missing parameter {name}"),
            ConfigError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter {name}: {reason}")
            }
            ConfigError::InvalidColour { name, source } => {
                write!(f, "Invalid colour {name}: {source}")
            }
            ConfigError::Forest(err) => write!(f, "Invalid forest configuration: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidColour { source, .. } => Some(source),
            ConfigError::Forest(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ForestError> for ConfigError {
    fn from(err: ForestError) -> Self {
        ConfigError::Forest(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r##"{
        "simulation": {
            "forest": { "width": 10, "height": 6, "spread_probability": 0.55 },
            "starting_fires": [{ "row": 2, "col": 3 }, { "row": 5, "col": 9 }],
            "seed": 1234
        },
        "display": {
            "console_logs": false,
            "play_animation": true,
            "max_fps": 24.0,
            "colours": { "tree": "#00ff00", "fire": "#FF0000", "ash": "#101010" },
            "window": { "extend": false, "width": 640, "height": 480 }
        }
    }"##;

    fn with_forest(forest: &str, fires: &str) -> String {
        format!(r#"{{ "simulation": {{ "forest": {forest}, "starting_fires": {fires} }} }}"#)
    }

    #[test]
    fn test_full_config() {
        let config = SimulationConfig::from_json_str(FULL).unwrap();
        assert_eq!(
            config.forest,
            ForestParams {
                width: 10,
                height: 6,
                spread_probability: 0.55
            }
        );
        assert_eq!(
            config.starting_fires,
            vec![GridPos::new(2, 3), GridPos::new(5, 9)]
        );
        assert_eq!(config.seed, Some(1234));
        assert!(!config.display.console_logs);
        assert!(config.display.play_animation);
        assert_eq!(config.display.palette.fire, Rgb::new(255, 0, 0));
        assert_eq!(
            config.display.window,
            WindowConfig {
                extend: false,
                width: 640,
                height: 480
            }
        );
        assert_eq!(config.display.frame_interval(), Duration::from_millis(41));

        let forest = config.build_forest().unwrap();
        assert_eq!(forest.burning_count(), 2);
        assert_eq!(forest.tree_count(), 58);
    }

    #[test]
    fn test_display_section_optional() {
        let text = with_forest(
            r#"{ "width": 3, "height": 3, "spread_probability": 1.0 }"#,
            r#"[{ "row": 0, "col": 0 }]"#,
        );
        let config = SimulationConfig::from_json_str(&text).unwrap();
        assert_eq!(config.display, DisplayConfig::default());
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_integer_probability_accepted() {
        let text = with_forest(
            r#"{ "width": 3, "height": 3, "spread_probability": 1 }"#,
            "[]",
        );
        let config = SimulationConfig::from_json_str(&text).unwrap();
        assert_eq!(config.forest.spread_probability, 1.0);
    }

    #[test]
    fn test_duplicate_fires_deduplicated() {
        let text = with_forest(
            r#"{ "width": 4, "height": 4, "spread_probability": 0.5 }"#,
            r#"[{ "row": 1, "col": 1 }, { "row": 0, "col": 3 }, { "row": 1, "col": 1 }]"#,
        );
        let config = SimulationConfig::from_json_str(&text).unwrap();
        assert_eq!(
            config.starting_fires,
            vec![GridPos::new(1, 1), GridPos::new(0, 3)]
        );
    }

    #[test]
    fn test_missing_parameters_named() {
        assert_eq!(
            SimulationConfig::from_json_str("{}"),
            Err(ConfigError::MissingParameter("simulation"))
        );

        let text = with_forest(r#"{ "width": 3, "spread_probability": 0.5 }"#, "[]");
        assert_eq!(
            SimulationConfig::from_json_str(&text),
            Err(ConfigError::MissingParameter("simulation.forest.height"))
        );

        let text = r#"{ "simulation": { "forest": { "width": 3, "height": 3, "spread_probability": 0.5 } } }"#;
        assert_eq!(
            SimulationConfig::from_json_str(text),
            Err(ConfigError::MissingParameter("simulation.starting_fires"))
        );
    }

    #[test]
    fn test_fires_must_be_a_list() {
        let text = with_forest(
            r#"{ "width": 3, "height": 3, "spread_probability": 0.5 }"#,
            r#"{ "row": 0, "col": 0 }"#,
        );
        assert!(matches!(
            SimulationConfig::from_json_str(&text),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_negative_values_rejected() {
        let text = with_forest(
            r#"{ "width": -3, "height": 3, "spread_probability": 0.5 }"#,
            "[]",
        );
        assert!(matches!(
            SimulationConfig::from_json_str(&text),
            Err(ConfigError::InvalidParameter {
                name: "simulation.forest.width",
                ..
            })
        ));

        let text = with_forest(
            r#"{ "width": 3, "height": 3, "spread_probability": 0.5 }"#,
            r#"[{ "row": -1, "col": 0 }]"#,
        );
        assert!(matches!(
            SimulationConfig::from_json_str(&text),
            Err(ConfigError::InvalidParameter {
                name: "simulation.starting_fires[].row",
                ..
            })
        ));
    }

    #[test]
    fn test_forest_errors_propagate() {
        let text = with_forest(
            r#"{ "width": 0, "height": 3, "spread_probability": 0.5 }"#,
            "[]",
        );
        assert_eq!(
            SimulationConfig::from_json_str(&text),
            Err(ConfigError::Forest(ForestError::InvalidDimension {
                width: 0,
                height: 3
            }))
        );

        let text = with_forest(
            r#"{ "width": 3, "height": 3, "spread_probability": 1.5 }"#,
            "[]",
        );
        assert_eq!(
            SimulationConfig::from_json_str(&text),
            Err(ConfigError::Forest(ForestError::InvalidProbability(1.5)))
        );

        let text = with_forest(
            r#"{ "width": 3, "height": 3, "spread_probability": 0.5 }"#,
            r#"[{ "row": 3, "col": 0 }]"#,
        );
        assert!(matches!(
            SimulationConfig::from_json_str(&text),
            Err(ConfigError::Forest(ForestError::IgnitionOutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        let text = with_forest(
            r#"{ "width": 9223372036854775807, "height": 4, "spread_probability": 0.5 }"#,
            "[]",
        );
        assert!(matches!(
            SimulationConfig::from_json_str(&text),
            Err(ConfigError::Forest(ForestError::InvalidDimension { height: 4, .. }))
        ));
    }

    #[test]
    fn test_missing_display_entries_named() {
        let text = FULL.replace(r##", "ash": "#101010""##, "");
        assert_eq!(
            SimulationConfig::from_json_str(&text),
            Err(ConfigError::MissingParameter("display.colours.ash"))
        );

        let text = FULL.replace(r#", "height": 480"#, "");
        assert_eq!(
            SimulationConfig::from_json_str(&text),
            Err(ConfigError::MissingParameter("display.window.height"))
        );

        let text = FULL.replace(r#""extend": false, "#, "");
        assert_eq!(
            SimulationConfig::from_json_str(&text),
            Err(ConfigError::MissingParameter("display.window.extend"))
        );
    }

    #[test]
    fn test_bad_colour_rejected() {
        let text = FULL.replace("#00ff00", "green");
        assert_eq!(
            SimulationConfig::from_json_str(&text),
            Err(ConfigError::InvalidColour {
                name: "display.colours.tree",
                source: ColourParseError("green".to_string())
            })
        );
    }

    #[test]
    fn test_non_positive_fps_rejected() {
        for fps in ["0.0", "-5.0"] {
            let text = FULL.replace("24.0", fps);
            assert!(matches!(
                SimulationConfig::from_json_str(&text),
                Err(ConfigError::InvalidParameter {
                    name: "display.max_fps",
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = FULL.replace("\"seed\"", "\"sead\"");
        assert!(matches!(
            SimulationConfig::from_json_str(&text),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = SimulationConfig::load("/nonexistent/config-sim.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/config-sim.json"));
    }
}
