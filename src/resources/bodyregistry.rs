//! Body registry resource.
//!
//! The [`BodyRegistry`] is the single source of truth for where every movable
//! body (cubelets and leg segments) currently is. Bodies are inserted once
//! when the assembly is built and are never removed while it is animated;
//! they only move, through [`BodyRegistry::set_pose`] or
//! [`BodyRegistry::set_position`].
//!
//! Face membership is never stored here. It is recomputed from positions by
//! [`crate::resolver::resolve`] every time a face is turned.

use crate::error::{CubeError, Result};
use crate::geometry::{Orientation, Point};
use bevy_ecs::prelude::Resource;
use nalgebra::Vector3;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;

/// Unique body identifier, e.g. `Corner_RUF` or `InnerLeg_LDB`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct BodyId(String);

impl BodyId {
    pub fn new(id: impl Into<String>) -> Self {
        BodyId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BodyId {
    fn from(s: &str) -> Self {
        BodyId::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    Center,
    Edge,
    Corner,
    LegOuter,
    LegInner,
}

impl BodyKind {
    pub fn is_cubelet(self) -> bool {
        matches!(self, BodyKind::Center | BodyKind::Edge | BodyKind::Corner)
    }

    pub fn is_leg(self) -> bool {
        !self.is_cubelet()
    }
}

/// Cosmetic color handed through to the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// Geometry the host builds the body from. Orientation after creation is
/// implicit; only the centroid is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum GeometrySpec {
    Box { size: f64 },
    Cylinder { radius: f64, length: f64, axis: [f64; 3] },
}

/// Extension state of an inner (telescoping) leg segment, in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Telescope {
    pub extension: f64,
    pub target: f64,
    pub speed: f64,
}

/// A movable rigid element of the assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub kind: BodyKind,
    /// Current world-space centroid.
    pub position: Point,
    /// Net rotation since the body was created.
    pub orientation: Orientation,
    pub geometry: GeometrySpec,
    pub color: Rgb,
    /// Present on inner leg segments only.
    pub telescope: Option<Telescope>,
}

impl Body {
    pub fn new(
        id: impl Into<String>,
        kind: BodyKind,
        position: Point,
        geometry: GeometrySpec,
        color: Rgb,
    ) -> Self {
        Self {
            id: BodyId::new(id),
            kind,
            position,
            orientation: Orientation::identity(),
            geometry,
            color,
            telescope: None,
        }
    }

    /// Current direction of a cylinder's long axis. `None` for boxes.
    pub fn axis(&self) -> Option<Vector3<f64>> {
        match self.geometry {
            GeometrySpec::Cylinder { axis, .. } => Some(self.orientation * Vector3::from(axis)),
            GeometrySpec::Box { .. } => None,
        }
    }

    pub fn with_telescope(mut self, telescope: Telescope) -> Self {
        self.telescope = Some(telescope);
        self
    }
}

/// All movable bodies of the assembly, keyed by id.
///
/// Storage is a dense vector plus an index map, so [`BodyRegistry::all`]
/// always yields bodies in the same order.
#[derive(Resource, Debug, Clone, Default)]
pub struct BodyRegistry {
    bodies: Vec<Body>,
    index: FxHashMap<BodyId, usize>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a body. A body with the same id is replaced in place and
    /// returned.
    pub fn insert(&mut self, body: Body) -> Option<Body> {
        if let Some(&i) = self.index.get(&body.id) {
            return Some(std::mem::replace(&mut self.bodies[i], body));
        }
        self.index.insert(body.id.clone(), self.bodies.len());
        self.bodies.push(body);
        None
    }

    pub fn get(&self, id: &BodyId) -> Result<&Body> {
        self.index
            .get(id)
            .map(|&i| &self.bodies[i])
            .ok_or_else(|| CubeError::NotFound(id.clone()))
    }

    pub fn contains(&self, id: &BodyId) -> bool {
        self.index.contains_key(id)
    }

    /// Overwrite the position of a body.
    pub fn set_position(&mut self, id: &BodyId, position: Point) -> Result<()> {
        let i = *self
            .index
            .get(id)
            .ok_or_else(|| CubeError::NotFound(id.clone()))?;
        self.bodies[i].position = position;
        Ok(())
    }

    /// Overwrite position and orientation of a body together.
    pub fn set_pose(&mut self, id: &BodyId, position: Point, orientation: Orientation) -> Result<()> {
        let i = *self
            .index
            .get(id)
            .ok_or_else(|| CubeError::NotFound(id.clone()))?;
        let body = &mut self.bodies[i];
        body.position = position;
        body.orientation = orientation;
        Ok(())
    }

    /// Replace the telescoping state of an inner leg.
    pub fn set_telescope(&mut self, id: &BodyId, telescope: Telescope) -> Result<()> {
        let i = *self
            .index
            .get(id)
            .ok_or_else(|| CubeError::NotFound(id.clone()))?;
        self.bodies[i].telescope = Some(telescope);
        Ok(())
    }

    /// Every body, in insertion order.
    pub fn all(&self) -> &[Body] {
        &self.bodies
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn cubelet_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.kind.is_cubelet()).count()
    }

    pub fn leg_count(&self) -> usize {
        self.bodies.iter().filter(|b| b.kind.is_leg()).count()
    }

    /// Copy of every body's position, for comparisons across moves.
    pub fn positions(&self) -> FxHashMap<BodyId, Point> {
        self.bodies
            .iter()
            .map(|b| (b.id.clone(), b.position))
            .collect()
    }

    /// Tear the assembly down.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.index.clear();
    }
}
