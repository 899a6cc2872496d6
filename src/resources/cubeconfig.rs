//! Cube configuration resource.
//!
//! Holds the constants the geometric core consumes: cubelet size and gap,
//! slice tolerance, leg dimensions, animation pacing, and the face table.
//! Values come from an INI file; anything missing keeps its default.
//!
//! # Configuration File Format
//!
//! ```ini
//! [cube]
//! cubelet_size = 25
//! gap = 0
//! slice_tolerance = 0.25
//! legs = true
//!
//! [legs]
//! offset = 20
//! outer_length = 75
//! outer_diameter = 18
//! inner_length = 75
//! inner_diameter = 10
//! telescoping = false
//! travel = 30
//! speed_min = 5
//! speed_max = 15
//!
//! [animation]
//! step_count = 15
//! step_delay_ms = 30
//! move_pause_ms = 200
//!
//! [faces]
//! R = +x
//! L = -x
//! U = +y
//! D = -y
//! F = +z
//! B = -z
//!
//! [random]
//! seed = 42
//! ```

use crate::resources::facetable::{Face, FaceSpec, FaceTable};
use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CUBELET_SIZE: f64 = 25.0;
const DEFAULT_GAP: f64 = 0.0;
const DEFAULT_LEG_OFFSET: f64 = 20.0;
const DEFAULT_LEG_OUTER_LENGTH: f64 = 75.0;
const DEFAULT_LEG_OUTER_DIAMETER: f64 = 18.0;
const DEFAULT_LEG_INNER_LENGTH: f64 = 75.0;
const DEFAULT_LEG_INNER_DIAMETER: f64 = 10.0;
const DEFAULT_TELESCOPE_TRAVEL: f64 = 30.0;
const DEFAULT_TELESCOPE_SPEED_MIN: f64 = 5.0;
const DEFAULT_TELESCOPE_SPEED_MAX: f64 = 15.0;
const DEFAULT_STEP_COUNT: u32 = 15;
const DEFAULT_STEP_DELAY_MS: u64 = 30;
const DEFAULT_MOVE_PAUSE_MS: u64 = 200;
pub const DEFAULT_CONFIG_PATH: &str = "./magicube.ini";

/// Leg segment dimensions and telescoping behaviour.
#[derive(Debug, Clone, PartialEq)]
pub struct LegSettings {
    /// Distance from the corner centroid to the start of the outer segment.
    pub offset: f64,
    pub outer_length: f64,
    pub outer_diameter: f64,
    pub inner_length: f64,
    pub inner_diameter: f64,
    /// Animate inner segments in and out while their corner turns.
    pub telescoping: bool,
    /// Full extension of an inner segment.
    pub travel: f64,
    pub speed_min: f64,
    pub speed_max: f64,
}

impl Default for LegSettings {
    fn default() -> Self {
        Self {
            offset: DEFAULT_LEG_OFFSET,
            outer_length: DEFAULT_LEG_OUTER_LENGTH,
            outer_diameter: DEFAULT_LEG_OUTER_DIAMETER,
            inner_length: DEFAULT_LEG_INNER_LENGTH,
            inner_diameter: DEFAULT_LEG_INNER_DIAMETER,
            telescoping: false,
            travel: DEFAULT_TELESCOPE_TRAVEL,
            speed_min: DEFAULT_TELESCOPE_SPEED_MIN,
            speed_max: DEFAULT_TELESCOPE_SPEED_MAX,
        }
    }
}

/// Cube configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct CubeConfig {
    /// Edge length of one cubelet in millimetres.
    pub cubelet_size: f64,
    /// Gap between neighbouring cubelets.
    pub gap: f64,
    /// Maximum distance from a slice value that still counts as "on" it.
    /// Defaults to 1% of the cubelet size.
    pub slice_tolerance: f64,
    /// Build leg segments at the corners.
    pub legs: bool,
    pub leg: LegSettings,
    /// Animation steps per quarter turn.
    pub step_count: u32,
    pub step_delay_ms: u64,
    /// Pause between consecutive moves of a sequence.
    pub move_pause_ms: u64,
    pub faces: FaceTable,
    /// Seed for the move sequencer; random when absent.
    pub seed: Option<u64>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CubeConfig {
    /// Create a new configuration with the default dimensions.
    pub fn new() -> Self {
        Self {
            cubelet_size: DEFAULT_CUBELET_SIZE,
            gap: DEFAULT_GAP,
            slice_tolerance: DEFAULT_CUBELET_SIZE * 0.01,
            legs: true,
            leg: LegSettings::default(),
            step_count: DEFAULT_STEP_COUNT,
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            move_pause_ms: DEFAULT_MOVE_PAUSE_MS,
            faces: FaceTable::standard(DEFAULT_CUBELET_SIZE + DEFAULT_GAP),
            seed: None,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Distance between neighbouring grid slices.
    pub fn spacing(&self) -> f64 {
        self.cubelet_size + self.gap
    }

    /// Half the outer edge length of the assembled cube.
    pub fn half_extent(&self) -> f64 {
        self.spacing() + self.cubelet_size / 2.0
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn step_delay_secs(&self) -> f32 {
        self.step_delay_ms as f32 / 1000.0
    }

    pub fn move_pause_secs(&self) -> f32 {
        self.move_pause_ms as f32 / 1000.0
    }

    /// Face table with its slice offset matched to the current spacing.
    pub fn face_table(&self) -> FaceTable {
        let mut table = self.faces.clone();
        table.set_slice_offset(self.spacing());
        table
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or a face entry is bad.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [cube] section
        if let Some(size) = config.getfloat("cube", "cubelet_size").ok().flatten() {
            self.cubelet_size = size;
            self.slice_tolerance = size * 0.01;
        }
        if let Some(gap) = config.getfloat("cube", "gap").ok().flatten() {
            self.gap = gap;
        }
        if let Some(tol) = config.getfloat("cube", "slice_tolerance").ok().flatten() {
            self.slice_tolerance = tol;
        }
        if let Some(legs) = config.getbool("cube", "legs").ok().flatten() {
            self.legs = legs;
        }

        // [legs] section
        if let Some(v) = config.getfloat("legs", "offset").ok().flatten() {
            self.leg.offset = v;
        }
        if let Some(v) = config.getfloat("legs", "outer_length").ok().flatten() {
            self.leg.outer_length = v;
        }
        if let Some(v) = config.getfloat("legs", "outer_diameter").ok().flatten() {
            self.leg.outer_diameter = v;
        }
        if let Some(v) = config.getfloat("legs", "inner_length").ok().flatten() {
            self.leg.inner_length = v;
        }
        if let Some(v) = config.getfloat("legs", "inner_diameter").ok().flatten() {
            self.leg.inner_diameter = v;
        }
        if let Some(v) = config.getbool("legs", "telescoping").ok().flatten() {
            self.leg.telescoping = v;
        }
        if let Some(v) = config.getfloat("legs", "travel").ok().flatten() {
            self.leg.travel = v;
        }
        if let Some(v) = config.getfloat("legs", "speed_min").ok().flatten() {
            self.leg.speed_min = v;
        }
        if let Some(v) = config.getfloat("legs", "speed_max").ok().flatten() {
            self.leg.speed_max = v;
        }

        // [animation] section
        if let Some(steps) = config.getuint("animation", "step_count").ok().flatten() {
            self.step_count = (steps as u32).max(1);
        }
        if let Some(ms) = config.getuint("animation", "step_delay_ms").ok().flatten() {
            self.step_delay_ms = ms;
        }
        if let Some(ms) = config.getuint("animation", "move_pause_ms").ok().flatten() {
            self.move_pause_ms = ms;
        }

        // [faces] section
        for face in Face::ALL {
            let key = face.letter().to_ascii_lowercase().to_string();
            if let Some(entry) = config.get("faces", &key) {
                let spec: FaceSpec = entry.parse().map_err(|e| format!("{e}"))?;
                self.faces.set(face, spec);
            }
        }

        // [random] section
        if let Some(seed) = config.getuint("random", "seed").ok().flatten() {
            self.seed = Some(seed);
        }

        self.faces.set_slice_offset(self.spacing());

        info!(
            "Loaded config: cubelet {}mm, gap {}mm, tolerance {}, legs={}, telescoping={}, {} steps x {}ms, pause {}ms",
            self.cubelet_size,
            self.gap,
            self.slice_tolerance,
            self.legs,
            self.leg.telescoping,
            self.step_count,
            self.step_delay_ms,
            self.move_pause_ms
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [cube] section
        config.set("cube", "cubelet_size", Some(self.cubelet_size.to_string()));
        config.set("cube", "gap", Some(self.gap.to_string()));
        config.set("cube", "slice_tolerance", Some(self.slice_tolerance.to_string()));
        config.set("cube", "legs", Some(self.legs.to_string()));

        // [legs] section
        config.set("legs", "offset", Some(self.leg.offset.to_string()));
        config.set("legs", "outer_length", Some(self.leg.outer_length.to_string()));
        config.set("legs", "outer_diameter", Some(self.leg.outer_diameter.to_string()));
        config.set("legs", "inner_length", Some(self.leg.inner_length.to_string()));
        config.set("legs", "inner_diameter", Some(self.leg.inner_diameter.to_string()));
        config.set("legs", "telescoping", Some(self.leg.telescoping.to_string()));
        config.set("legs", "travel", Some(self.leg.travel.to_string()));
        config.set("legs", "speed_min", Some(self.leg.speed_min.to_string()));
        config.set("legs", "speed_max", Some(self.leg.speed_max.to_string()));

        // [animation] section
        config.set("animation", "step_count", Some(self.step_count.to_string()));
        config.set("animation", "step_delay_ms", Some(self.step_delay_ms.to_string()));
        config.set("animation", "move_pause_ms", Some(self.move_pause_ms.to_string()));

        // [faces] section
        for face in Face::ALL {
            if let Some(spec) = self.faces.spec(face) {
                let key = face.letter().to_ascii_lowercase().to_string();
                config.set("faces", &key, Some(spec.to_string()));
            }
        }

        if let Some(seed) = self.seed {
            config.set("random", "seed", Some(seed.to_string()));
        }

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("magicube-{}-{}.ini", name, std::process::id()))
    }

    #[test]
    fn test_defaults() {
        let config = CubeConfig::new();
        assert_eq!(config.spacing(), 25.0);
        assert_eq!(config.half_extent(), 37.5);
        assert!((config.slice_tolerance - 0.25).abs() < 1e-12);
        assert_eq!(config.face_table().lookup(Face::L).unwrap().target, -25.0);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let path = temp_path("partial");
        fs::write(&path, "[cube]\ngap = 1\n[animation]\nstep_count = 20\n[faces]\nf = -z\n").unwrap();
        let mut config = CubeConfig::with_path(&path);
        config.load_from_file().unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.gap, 1.0);
        assert_eq!(config.step_count, 20);
        assert_eq!(config.step_delay_ms, DEFAULT_STEP_DELAY_MS);
        assert_eq!(config.faces.spec(Face::F), Some(FaceSpec::new(2, -1)));
        assert_eq!(config.face_table().slice_offset(), 26.0);
    }

    #[test]
    fn test_bad_face_entry_fails() {
        let path = temp_path("badface");
        fs::write(&path, "[faces]\nr = +q\n").unwrap();
        let mut config = CubeConfig::with_path(&path);
        let err = config.load_from_file().unwrap_err();
        fs::remove_file(&path).ok();
        assert!(err.contains("invalid axis"));
    }

    #[test]
    fn test_missing_file_is_error() {
        let mut config = CubeConfig::with_path(temp_path("does-not-exist"));
        assert!(config.load_from_file().is_err());
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("save");
        let mut config = CubeConfig::with_path(&path);
        config.step_count = 18;
        config.leg.telescoping = true;
        config.seed = Some(7);
        config.save_to_file().unwrap();

        let mut loaded = CubeConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.step_count, 18);
        assert!(loaded.leg.telescoping);
        assert_eq!(loaded.seed, Some(7));
        assert_eq!(loaded.faces.spec(Face::D), Some(FaceSpec::new(1, -1)));
    }
}
