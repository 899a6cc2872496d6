//! Face rotation animation.
//!
//! A [`FaceTurn`] resolves its face exactly once, remembers where every body
//! of the group started, and then moves the group through `step_count`
//! increments. Each step places the bodies at the original position rotated
//! by the cumulative angle, so rounding never accumulates within a turn, and
//! the last step uses the exact total angle.
//!
//! Orientations follow the same rule: the cumulative rotation is applied to
//! the orientation each body had when the turn began.
//!
//! Poses for a step are all computed before any of them is written back.
//! A step therefore either updates the whole group or nothing.

use crate::error::{CubeError, Result};
use crate::events::host::HostSink;
use crate::geometry::{Axis, Orientation, Point, rotate_orientation, rotate_point};
use crate::pacer::Pacer;
use crate::resolver::{FaceGroup, resolve};
use crate::resources::bodyregistry::{BodyId, BodyKind, BodyRegistry};
use crate::resources::cubeconfig::CubeConfig;
use crate::resources::facetable::{Face, FaceTable};
use log::{debug, warn};
use nalgebra::Vector3;
use serde::Serialize;
use std::fmt;

/// Quarter-turn sense, relative to the face's rotation axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Positive,
    Negative,
}

impl Direction {
    /// Signed rotation angle in degrees.
    pub fn degrees(self) -> f64 {
        match self {
            Direction::Positive => 90.0,
            Direction::Negative => -90.0,
        }
    }

    pub fn inverse(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Positive => "CW",
            Direction::Negative => "CCW",
        }
    }
}

/// One quarter turn of one face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RotationMove {
    pub face: Face,
    pub direction: Direction,
}

impl RotationMove {
    pub fn new(face: Face, direction: Direction) -> Self {
        Self { face, direction }
    }

    /// Uniform choice over the six faces and both directions.
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        let face = Face::ALL[rng.usize(..Face::ALL.len())];
        let direction = if rng.bool() {
            Direction::Positive
        } else {
            Direction::Negative
        };
        Self { face, direction }
    }

    pub fn inverse(self) -> Self {
        Self {
            face: self.face,
            direction: self.direction.inverse(),
        }
    }

    /// Compact notation: `R` for positive, `R'` for negative.
    pub fn notation(self) -> String {
        match self.direction {
            Direction::Positive => self.face.to_string(),
            Direction::Negative => format!("{}'", self.face),
        }
    }
}

impl fmt::Display for RotationMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.face, self.direction.label())
    }
}

/// Result of one animation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepProgress {
    Stepping { step: u32, of: u32 },
    Finished,
}

#[derive(Debug, Clone)]
struct TurnMember {
    id: BodyId,
    origin: Point,
    orientation: Orientation,
    /// Radial direction and total extension change for telescoping legs.
    extension: Option<(Vector3<f64>, f64)>,
}

/// An in-flight face turn.
#[derive(Debug, Clone)]
pub struct FaceTurn {
    mv: RotationMove,
    group: FaceGroup,
    pivot: Point,
    axis: Axis,
    step_count: u32,
    step: u32,
    members: Vec<TurnMember>,
}

impl FaceTurn {
    /// Resolve `mv.face` and capture the group's starting positions.
    pub fn begin(
        mv: RotationMove,
        registry: &BodyRegistry,
        table: &FaceTable,
        slice_tolerance: f64,
        step_count: u32,
    ) -> Result<Self> {
        let group = resolve(mv.face, registry, table, slice_tolerance)?;
        Self::from_group(mv, group, registry, step_count)
    }

    /// Build a turn from an already resolved group.
    pub fn from_group(
        mv: RotationMove,
        group: FaceGroup,
        registry: &BodyRegistry,
        step_count: u32,
    ) -> Result<Self> {
        let members = group
            .iter()
            .map(|id| {
                let body = registry.get(id)?;
                Ok(TurnMember {
                    id: id.clone(),
                    origin: body.position,
                    orientation: body.orientation,
                    extension: None,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "Turn {} over {} bodies in {} steps",
            mv,
            members.len(),
            step_count.max(1)
        );

        Ok(Self {
            mv,
            axis: group.slice.axis,
            group,
            pivot: Point::origin(),
            step_count: step_count.max(1),
            step: 0,
            members,
        })
    }

    /// Attach telescoping movements. Each leg slides radially by its delta,
    /// spread evenly over the steps. Only effective before the first step.
    pub fn set_extensions(&mut self, plan: Vec<(BodyId, f64)>) {
        if self.step > 0 {
            warn!("Turn {} already started, ignoring telescoping plan", self.mv);
            return;
        }
        for (id, delta) in plan {
            match self.members.iter_mut().find(|m| m.id == id) {
                Some(member) => {
                    let radial = member.origin.coords.normalize();
                    member.extension = Some((radial, delta));
                }
                None => warn!("{id} is not part of turn {}", self.mv),
            }
        }
    }

    pub fn rotation_move(&self) -> RotationMove {
        self.mv
    }

    pub fn group(&self) -> &FaceGroup {
        &self.group
    }

    /// Ids of the inner leg segments in this turn.
    pub fn inner_legs(&self, registry: &BodyRegistry) -> Vec<BodyId> {
        self.group
            .legs
            .iter()
            .filter(|id| matches!(registry.get(id), Ok(b) if b.kind == BodyKind::LegInner))
            .cloned()
            .collect()
    }

    pub fn step_index(&self) -> u32 {
        self.step
    }

    pub fn step_count(&self) -> u32 {
        self.step_count
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.step_count
    }

    /// Cumulative angle after `step` steps.
    pub fn angle_at(&self, step: u32) -> f64 {
        let total = self.mv.direction.degrees();
        if step >= self.step_count {
            total
        } else {
            total * f64::from(step) / f64::from(self.step_count)
        }
    }

    /// Where `id` is placed after `step` steps, if it belongs to this turn.
    pub fn position_at(&self, id: &BodyId, step: u32) -> Option<Point> {
        self.members
            .iter()
            .find(|m| &m.id == id)
            .map(|m| self.member_position(m, step))
    }

    /// Orientation of `id` after `step` steps, if it belongs to this turn.
    pub fn orientation_at(&self, id: &BodyId, step: u32) -> Option<Orientation> {
        self.members
            .iter()
            .find(|m| &m.id == id)
            .map(|m| rotate_orientation(&m.orientation, &self.axis, self.angle_at(step)))
    }

    fn member_position(&self, member: &TurnMember, step: u32) -> Point {
        let base = match member.extension {
            Some((radial, delta)) => {
                let fraction = f64::from(step.min(self.step_count)) / f64::from(self.step_count);
                member.origin + radial * (delta * fraction)
            }
            None => member.origin,
        };
        rotate_point(&base, &self.pivot, &self.axis, self.angle_at(step))
    }

    /// Advance one step, commit every position, and notify the host.
    pub fn step<H: HostSink + ?Sized>(
        &mut self,
        registry: &mut BodyRegistry,
        host: &mut H,
    ) -> Result<StepProgress> {
        if self.is_finished() {
            return Ok(StepProgress::Finished);
        }

        if let Some(missing) = self.members.iter().find(|m| !registry.contains(&m.id)) {
            return Err(CubeError::NotFound(missing.id.clone()));
        }

        let next = self.step + 1;
        let angle = self.angle_at(next);
        let updates: Vec<(Point, Orientation)> = self
            .members
            .iter()
            .map(|m| {
                (
                    self.member_position(m, next),
                    rotate_orientation(&m.orientation, &self.axis, angle),
                )
            })
            .collect();

        for (member, (position, orientation)) in self.members.iter().zip(updates) {
            registry.set_pose(&member.id, position, orientation)?;
            host.set_body_position(&member.id, position, &orientation);
        }

        if next == self.step_count {
            for member in &self.members {
                let Some((_, delta)) = member.extension else {
                    continue;
                };
                if let Some(mut telescope) = registry.get(&member.id)?.telescope {
                    telescope.extension += delta;
                    registry.set_telescope(&member.id, telescope)?;
                }
            }
        }

        host.refresh_display();
        self.step = next;

        Ok(if self.is_finished() {
            StepProgress::Finished
        } else {
            StepProgress::Stepping {
                step: self.step,
                of: self.step_count,
            }
        })
    }
}

/// Run one face turn to completion, yielding to `pacer` between steps.
pub fn animate_face<H, P>(
    mv: RotationMove,
    registry: &mut BodyRegistry,
    config: &CubeConfig,
    host: &mut H,
    pacer: &mut P,
) -> Result<()>
where
    H: HostSink + ?Sized,
    P: Pacer + ?Sized,
{
    let table = config.face_table();
    let mut turn = FaceTurn::begin(
        mv,
        registry,
        &table,
        config.slice_tolerance,
        config.step_count,
    )?;
    let delay = config.step_delay();
    while turn.step(registry, host)? != StepProgress::Finished {
        pacer.wait(delay);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::build_assembly;
    use crate::events::host::{HostCmd, NullHost};
    use crate::pacer::FixedPacer;

    fn setup() -> (BodyRegistry, CubeConfig) {
        let config = CubeConfig::new();
        (build_assembly(&config), config)
    }

    #[test]
    fn test_move_notation() {
        let mv = RotationMove::new(Face::R, Direction::Negative);
        assert_eq!(mv.notation(), "R'");
        assert_eq!(mv.inverse().notation(), "R");
        assert_eq!(mv.to_string(), "R CCW");
    }

    #[test]
    fn test_random_moves_cover_all_faces() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(RotationMove::random(&mut rng));
        }
        assert_eq!(seen.len(), 12);
    }

    #[test]
    fn test_angle_schedule_ends_exactly() {
        let (reg, config) = setup();
        let table = config.face_table();
        let mv = RotationMove::new(Face::U, Direction::Negative);
        let turn = FaceTurn::begin(mv, &reg, &table, config.slice_tolerance, 7).unwrap();
        assert_eq!(turn.angle_at(0), 0.0);
        assert_eq!(turn.angle_at(7), -90.0);
        assert!(turn.angle_at(3) > -90.0 && turn.angle_at(3) < 0.0);
    }

    #[test]
    fn test_step_moves_whole_group_and_notifies_host() {
        let (mut reg, config) = setup();
        let table = config.face_table();
        let mv = RotationMove::new(Face::R, Direction::Positive);
        let mut turn = FaceTurn::begin(mv, &reg, &table, config.slice_tolerance, 3).unwrap();
        let mut sink: Vec<HostCmd> = Vec::new();

        assert_eq!(
            turn.step(&mut reg, &mut sink).unwrap(),
            StepProgress::Stepping { step: 1, of: 3 }
        );
        let moves = sink
            .iter()
            .filter(|c| matches!(c, HostCmd::SetBodyPosition { .. }))
            .count();
        assert_eq!(moves, turn.group().len());
        assert_eq!(sink.last(), Some(&HostCmd::RefreshDisplay));

        // Bodies outside the group stay put.
        let left = reg.get(&BodyId::new("Center_L")).unwrap().position;
        assert_eq!(left, Point::new(-25.0, 0.0, 0.0));
    }

    #[test]
    fn test_quarter_turn_lands_on_grid() {
        let (mut reg, config) = setup();
        let mv = RotationMove::new(Face::U, Direction::Positive);
        animate_face(mv, &mut reg, &config, &mut NullHost, &mut FixedPacer).unwrap();
        // Front edge of U goes to the right under +90 about Y.
        let p = reg.get(&BodyId::new("Edge_UF")).unwrap().position;
        assert_eq!(p, Point::new(25.0, 25.0, 0.0));
    }

    #[test]
    fn test_leg_axis_follows_its_corner() {
        let (mut reg, config) = setup();
        let leg = BodyId::new("InnerLeg_RUF");
        let mv = RotationMove::new(Face::U, Direction::Positive);
        animate_face(mv, &mut reg, &config, &mut NullHost, &mut FixedPacer).unwrap();

        let body = reg.get(&leg).unwrap();
        let along = body.position.coords.normalize();
        assert!((body.axis().unwrap() - along).norm() < 1e-9);
        assert!(along.z < 0.0);

        animate_face(mv.inverse(), &mut reg, &config, &mut NullHost, &mut FixedPacer).unwrap();
        let body = reg.get(&leg).unwrap();
        assert!(body.orientation.angle_to(&Orientation::identity()) < 1e-9);
    }

    #[test]
    fn test_missing_body_aborts_without_partial_commit() {
        let (reg, config) = setup();
        let table = config.face_table();
        let mv = RotationMove::new(Face::F, Direction::Positive);
        let mut turn = FaceTurn::begin(mv, &reg, &table, config.slice_tolerance, 5).unwrap();

        let mut trimmed = BodyRegistry::new();
        for body in reg.iter().filter(|b| b.id.as_str() != "Corner_LDF") {
            trimmed.insert(body.clone());
        }
        let before = trimmed.positions();
        let err = turn.step(&mut trimmed, &mut NullHost).unwrap_err();
        assert_eq!(err, CubeError::NotFound(BodyId::new("Corner_LDF")));
        assert_eq!(trimmed.positions(), before);
        assert_eq!(turn.step_index(), 0);
    }

    #[test]
    fn test_extension_commits_on_last_step() {
        let (mut reg, config) = setup();
        let table = config.face_table();
        let mv = RotationMove::new(Face::U, Direction::Positive);
        let mut turn = FaceTurn::begin(mv, &reg, &table, config.slice_tolerance, 4).unwrap();
        let leg = BodyId::new("InnerLeg_RUF");
        assert!(turn.inner_legs(&reg).contains(&leg));
        let start = reg.get(&leg).unwrap().position;
        turn.set_extensions(vec![(leg.clone(), 8.0)]);

        turn.step(&mut reg, &mut NullHost).unwrap();
        assert_eq!(reg.get(&leg).unwrap().telescope.unwrap().extension, 0.0);
        while !turn.is_finished() {
            turn.step(&mut reg, &mut NullHost).unwrap();
        }
        let body = reg.get(&leg).unwrap();
        assert_eq!(body.telescope.unwrap().extension, 8.0);
        assert!((body.position.coords.norm() - start.coords.norm() - 8.0).abs() < 1e-9);
    }
}
