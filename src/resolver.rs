//! Face resolver.
//!
//! Finds the bodies that currently sit on a face by looking at live
//! positions, never at names or at which face a body started on. Cubelets
//! are on a face when their coordinate along the face axis is within the
//! slice tolerance of the face's slice value. Leg segments sit outside the
//! grid, beyond the outer slice, so they are taken with a half-space test on
//! the same axis instead.
//!
//! Under the 3×3×3 grid invariant every face holds exactly nine cubelets and
//! half of the assembly's leg segments. Anything else is reported as a
//! [`CubeError::FaceResolutionFault`] so a corrupted group is never turned.

use crate::error::{CubeError, Result};
use crate::resources::bodyregistry::{BodyId, BodyRegistry};
use crate::resources::facetable::{Face, FaceSlice, FaceTable};
use arrayvec::ArrayVec;
use log::debug;
use smallvec::SmallVec;

/// Cubelets on one face of a 3×3×3 cube: one center, four edges, four corners.
pub const FACE_CUBELETS: usize = 9;

/// The bodies that make up one face at the moment it was resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceGroup {
    pub face: Face,
    pub slice: FaceSlice,
    pub cubelets: ArrayVec<BodyId, FACE_CUBELETS>,
    pub legs: SmallVec<[BodyId; 8]>,
}

impl FaceGroup {
    /// Cubelets first, then leg segments.
    pub fn iter(&self) -> impl Iterator<Item = &BodyId> {
        self.cubelets.iter().chain(self.legs.iter())
    }

    pub fn len(&self) -> usize {
        self.cubelets.len() + self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, id: &BodyId) -> bool {
        self.iter().any(|i| i == id)
    }
}

/// Resolve the bodies currently on `face`.
pub fn resolve(
    face: Face,
    registry: &BodyRegistry,
    table: &FaceTable,
    slice_tolerance: f64,
) -> Result<FaceGroup> {
    let slice = table.lookup(face)?;

    let mut cubelets: ArrayVec<BodyId, FACE_CUBELETS> = ArrayVec::new();
    let mut cubelet_matches = 0usize;
    let mut legs: SmallVec<[BodyId; 8]> = SmallVec::new();

    for body in registry.iter() {
        let coord = body.position[slice.axis_index];
        if body.kind.is_cubelet() {
            if (coord - slice.target).abs() <= slice_tolerance {
                cubelet_matches += 1;
                // Overflow is counted above and reported below.
                let _ = cubelets.try_push(body.id.clone());
            }
        } else if (coord - slice.target) * slice.sign >= -slice_tolerance {
            legs.push(body.id.clone());
        }
    }

    debug!(
        "resolve {face}: axis {} at {:.3} -> {} cubelets, {} legs",
        slice.axis_index,
        slice.target,
        cubelet_matches,
        legs.len()
    );

    if cubelet_matches != FACE_CUBELETS {
        return Err(CubeError::FaceResolutionFault {
            face,
            what: "cubelets",
            expected: FACE_CUBELETS,
            found: cubelet_matches,
        });
    }

    // Every corner lies on three of the six faces, so each face carries the
    // legs of half the corners.
    let expected_legs = registry.leg_count() / 2;
    if legs.len() != expected_legs {
        return Err(CubeError::FaceResolutionFault {
            face,
            what: "leg segments",
            expected: expected_legs,
            found: legs.len(),
        });
    }

    Ok(FaceGroup {
        face,
        slice,
        cubelets,
        legs,
    })
}
