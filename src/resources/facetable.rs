//! Face labels and the face → (axis, slice) lookup table.
//!
//! The table is configuration data, not derived logic: each of the six
//! labels maps to an axis index and a slice sign. The slice value for a face
//! is `sign * slice_offset`, where `slice_offset` is the distance between
//! neighbouring grid slices (cubelet size plus gap).
//!
//! Every face turns about the positive unit axis of its entry through the
//! assembly origin, so `R` and `L` share the +X axis and a positive turn has
//! the same sense for both.

use crate::error::{CubeError, Result};
use crate::geometry::{Axis, axis_unit};
use bevy_ecs::prelude::Resource;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One of the six outer faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Face {
    R,
    L,
    U,
    D,
    F,
    B,
}

impl Face {
    pub const ALL: [Face; 6] = [Face::R, Face::L, Face::U, Face::D, Face::F, Face::B];

    pub fn letter(self) -> char {
        match self {
            Face::R => 'R',
            Face::L => 'L',
            Face::U => 'U',
            Face::D => 'D',
            Face::F => 'F',
            Face::B => 'B',
        }
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for Face {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "R" => Ok(Face::R),
            "L" => Ok(Face::L),
            "U" => Ok(Face::U),
            "D" => Ok(Face::D),
            "F" => Ok(Face::F),
            "B" => Ok(Face::B),
            other => Err(CubeError::InvalidAxis(format!("unknown face label '{other}'"))),
        }
    }
}

/// Axis index and slice sign for one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceSpec {
    /// 0 = X, 1 = Y, 2 = Z.
    pub axis_index: usize,
    /// +1 for the positive slice, -1 for the negative one.
    pub sign: i8,
}

impl FaceSpec {
    pub fn new(axis_index: usize, sign: i8) -> Self {
        Self { axis_index, sign }
    }
}

impl fmt::Display for FaceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.sign < 0 { '-' } else { '+' };
        let axis = ['x', 'y', 'z'][self.axis_index.min(2)];
        write!(f, "{sign}{axis}")
    }
}

/// Parses entries like `+x`, `-y` or `z` (implicitly positive).
impl FromStr for FaceSpec {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self> {
        let t = s.trim().to_ascii_lowercase();
        let (sign, rest) = match t.strip_prefix('-') {
            Some(rest) => (-1, rest),
            None => (1, t.strip_prefix('+').unwrap_or(t.as_str())),
        };
        let axis_index = match rest {
            "x" => 0,
            "y" => 1,
            "z" => 2,
            _ => return Err(CubeError::InvalidAxis(format!("bad face table entry '{s}'"))),
        };
        Ok(Self { axis_index, sign })
    }
}

/// Resolved geometry of one face: the slice it selects and the axis it
/// turns about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceSlice {
    pub axis_index: usize,
    pub sign: f64,
    /// Coordinate of the slice along `axis_index`.
    pub target: f64,
    pub axis: Axis,
}

/// Face lookup table.
#[derive(Resource, Debug, Clone)]
pub struct FaceTable {
    entries: FxHashMap<Face, FaceSpec>,
    slice_offset: f64,
}

impl Default for FaceTable {
    fn default() -> Self {
        Self::standard(25.0)
    }
}

impl FaceTable {
    /// An empty table; every lookup fails until entries are added.
    pub fn empty(slice_offset: f64) -> Self {
        Self {
            entries: FxHashMap::default(),
            slice_offset,
        }
    }

    /// R/L on X, U/D on Y, F/B on Z, positive face first.
    pub fn standard(slice_offset: f64) -> Self {
        Self::empty(slice_offset)
            .with(Face::R, FaceSpec::new(0, 1))
            .with(Face::L, FaceSpec::new(0, -1))
            .with(Face::U, FaceSpec::new(1, 1))
            .with(Face::D, FaceSpec::new(1, -1))
            .with(Face::F, FaceSpec::new(2, 1))
            .with(Face::B, FaceSpec::new(2, -1))
    }

    pub fn with(mut self, face: Face, spec: FaceSpec) -> Self {
        self.set(face, spec);
        self
    }

    pub fn set(&mut self, face: Face, spec: FaceSpec) {
        self.entries.insert(face, spec);
    }

    pub fn spec(&self, face: Face) -> Option<FaceSpec> {
        self.entries.get(&face).copied()
    }

    pub fn slice_offset(&self) -> f64 {
        self.slice_offset
    }

    pub fn set_slice_offset(&mut self, offset: f64) {
        self.slice_offset = offset;
    }

    /// Resolve the slice and turning axis for `face`.
    pub fn lookup(&self, face: Face) -> Result<FaceSlice> {
        let spec = self
            .entries
            .get(&face)
            .ok_or_else(|| CubeError::InvalidAxis(format!("face {face} has no table entry")))?;
        if spec.axis_index > 2 || spec.sign == 0 {
            return Err(CubeError::InvalidAxis(format!(
                "face {face} maps to axis {} sign {}",
                spec.axis_index, spec.sign
            )));
        }
        let sign = f64::from(spec.sign.signum());
        Ok(FaceSlice {
            axis_index: spec.axis_index,
            sign,
            target: sign * self.slice_offset,
            axis: axis_unit(spec.axis_index),
        })
    }
}
